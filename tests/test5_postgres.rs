#![cfg(feature = "postgres")]

use std::env;

use tablekit::prelude::*;

/// Connection settings from `TABLEKIT_TEST_PG_*`; `None` skips the test.
fn pg_options() -> Option<ConnectOptions> {
    let host = env::var("TABLEKIT_TEST_PG_HOST").ok()?;
    let mut opts = ConnectOptions::new(
        DatabaseType::Postgres,
        env::var("TABLEKIT_TEST_PG_DB").unwrap_or_else(|_| "postgres".into()),
    );
    opts.host = host;
    opts.port = env::var("TABLEKIT_TEST_PG_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(5432);
    opts.username = env::var("TABLEKIT_TEST_PG_USER").unwrap_or_else(|_| "postgres".into());
    opts.password = env::var("TABLEKIT_TEST_PG_PASSWORD").unwrap_or_default();
    opts.max_idle = 0;
    Some(opts)
}

#[derive(Debug)]
struct Account {
    id: i64,
    owner: String,
    balance: i64,
}

impl FromRow for Account {
    fn from_row(row: &DbRow) -> Result<Self, TableKitError> {
        Ok(Account {
            id: row.try_get("id")?,
            owner: row.try_get("owner")?,
            balance: row.try_get("balance")?,
        })
    }
}

#[test]
fn test5_postgres_table_and_transactions() -> Result<(), Box<dyn std::error::Error>> {
    let Some(opts) = pg_options() else {
        eprintln!("TABLEKIT_TEST_PG_HOST not set; skipping");
        return Ok(());
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = ConfigAndPool::connect(&opts).await?;
        let mut conn = cap.get_connection().await?;
        assert_eq!(conn.dialect(), Dialect::Postgres);

        let accounts: Table<Account> = Table::new("tablekit_accounts", ["id", "owner", "balance"])
            .with_schema("id BIGSERIAL PRIMARY KEY, owner TEXT NOT NULL, balance BIGINT NOT NULL");
        conn.execute_batch("DROP TABLE IF EXISTS tablekit_accounts;").await?;
        accounts.create(&mut conn).await?;

        let ana = accounts
            .insert()
            .set_map([("owner", RowValues::from("ana")), ("balance", RowValues::from(100))])
            .run(&mut conn)
            .await?;
        let bo = accounts
            .insert()
            .set_map([("owner", RowValues::from("bo")), ("balance", RowValues::from(5))])
            .run(&mut conn)
            .await?;
        assert_eq!(bo, ana + 1);

        commit_transaction(&mut conn, async |tx: &mut Connection<InTx>| {
            accounts
                .update()
                .set_expr("balance", ("balance - ?", 30))
                .filter(Expr::eq("id", ana))
                .run(tx)
                .await?;
            accounts
                .update()
                .set_expr("balance", ("balance + ?", 30))
                .filter(Expr::eq("id", bo))
                .run(tx)
                .await?;
            Ok::<(), TableKitError>(())
        })
        .await?;

        let res: Result<(), TableKitError> = commit_transaction(&mut conn, async |tx: &mut Connection<InTx>| {
            accounts.delete().filter(Expr::eq("id", ana)).run(tx).await?;
            Err(TableKitError::Other("abort".into()))
        })
        .await;
        assert!(res.is_err());

        let all = accounts.get_by_ids(&mut conn, &[ana, bo]).await?;
        assert_eq!(all.len(), 2);
        let by_owner: Vec<_> = all.iter().map(|a| (a.owner.as_str(), a.balance)).collect();
        assert!(by_owner.contains(&("ana", 70)));
        assert!(by_owner.contains(&("bo", 35)));
        assert_eq!(accounts.get_by_id(&mut conn, bo).await?.id, bo);

        // postgres understands neither `?` placeholders nor a driver-side last insert id
        let standard = accounts
            .insert()
            .placeholder_format(Dialect::Standard)
            .columns(["owner", "balance"])
            .values(sql_args!["cy", 1])
            .run(&mut conn)
            .await;
        assert!(standard.is_err());

        let row = conn
            .get_one::<DbRow>("SELECT DATE '2024-05-01' AS d, 12.50::numeric::text AS amount", &[])
            .await?;
        let expected = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .ok_or_else(|| TableKitError::Other("bad date".into()))?;
        assert_eq!(row.try_get::<chrono::NaiveDateTime>("d")?, expected);
        assert_eq!(row.try_get::<String>("amount")?, "12.50");

        conn.execute_batch("DROP TABLE tablekit_accounts;").await?;
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}
