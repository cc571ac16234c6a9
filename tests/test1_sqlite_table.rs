#![cfg(feature = "sqlite")]

use tablekit::prelude::*;

#[derive(Debug, PartialEq)]
struct Todo {
    id: i64,
    title: String,
    done: bool,
}

impl FromRow for Todo {
    fn from_row(row: &DbRow) -> Result<Self, TableKitError> {
        Ok(Todo {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            done: row.try_get("done")?,
        })
    }
}

fn todos() -> Table<Todo> {
    Table::new("todos", ["id", "title", "done"]).with_schema(
        "id INTEGER PRIMARY KEY AUTOINCREMENT, title TEXT NOT NULL, done BOOLEAN NOT NULL DEFAULT 0",
    )
}

async fn open(dir: &tempfile::TempDir) -> Result<ConfigAndPool, TableKitError> {
    let path = dir.path().join("tablekit.db");
    ConfigAndPool::sqlite_builder(path.to_string_lossy().into_owned())
        .max_size(2)
        .build()
        .await
}

#[test]
fn test1_sqlite_table_crud() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = open(&dir).await?;
        let mut conn = cap.get_connection().await?;
        let table = todos();
        table.create(&mut conn).await?;

        assert!(table.get_all(&mut conn).await?.is_empty());

        let first = table
            .insert()
            .set_map([
                ("title", RowValues::from("buy milk")),
                ("done", RowValues::from(false)),
            ])
            .run(&mut conn)
            .await?;
        let second = table
            .insert()
            .columns(["title", "done"])
            .values(sql_args!["walk dog", true])
            .run(&mut conn)
            .await?;
        assert_eq!(second, first + 1);

        let todo = table.get_by_id(&mut conn, first).await?;
        assert_eq!(
            todo,
            Todo {
                id: first,
                title: "buy milk".into(),
                done: false,
            }
        );

        let both = table.get_by_ids(&mut conn, &[first, second]).await?;
        assert_eq!(both.len(), 2);
        assert!(table.get_by_ids(&mut conn, &[]).await?.is_empty());

        let outcome = table
            .update()
            .set("done", true)
            .filter(Expr::eq("id", first))
            .run(&mut conn)
            .await?;
        assert_eq!(outcome.rows_affected, 1);
        assert!(table.get_by_id(&mut conn, first).await?.done);

        let open_todos = table
            .select()
            .filter(Expr::eq("done", false))
            .all(&mut conn)
            .await?;
        assert!(open_todos.is_empty());

        let outcome = table
            .delete()
            .filter(Expr::eq("id", second))
            .run(&mut conn)
            .await?;
        assert_eq!(outcome.rows_affected, 1);
        assert!(matches!(
            table.get_by_id(&mut conn, second).await,
            Err(TableKitError::NotFound)
        ));
        assert_eq!(table.get_all(&mut conn).await?.len(), 1);
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}

#[test]
fn test1_sqlite_only_reports_missing_and_ambiguous() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = open(&dir).await?;
        let mut conn = cap.get_connection().await?;
        let table = todos();
        table.create_if_not_exists(&mut conn).await?;
        // second call must be a no-op
        table.create_if_not_exists(&mut conn).await?;
        assert!(table.create(&mut conn).await.is_err());

        for title in ["a", "b"] {
            table
                .insert()
                .set_map([("title", title)])
                .run(&mut conn)
                .await?;
        }

        let none = table
            .select()
            .filter(Expr::eq("title", "zzz"))
            .only(&mut conn)
            .await;
        assert!(matches!(none, Err(TableKitError::NotFound)));

        let many = table.select().only(&mut conn).await;
        assert!(matches!(many, Err(TableKitError::Ambiguous(2))));

        let one = table
            .select()
            .filter(Expr::eq("title", "b"))
            .only(&mut conn)
            .await?;
        assert_eq!(one.title, "b");
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}

#[test]
fn test1_sqlite_postgres_dialect_uses_returning() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = open(&dir).await?;
        let mut conn = cap.get_connection().await?;
        let table = todos().with_dialect(Dialect::Postgres);
        table.create(&mut conn).await?;

        let id = table
            .insert()
            .columns(["title"])
            .values(["one"])
            .values(["two"])
            .values(["three"])
            .run(&mut conn)
            .await?;
        // the last returned id wins
        assert_eq!(id, 3);

        let rows = table
            .select()
            .filter(Expr::gt("id", 1))
            .order_by(["id"])
            .all(&mut conn)
            .await?;
        let titles: Vec<_> = rows.into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["two", "three"]);
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}

#[test]
fn test1_sqlite_custom_id_column_and_untyped_rows() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = open(&dir).await?;
        let mut conn = cap.get_connection().await?;
        let users: Table = Table::new("users", ["user_id", "name"])
            .with_schema("user_id INTEGER PRIMARY KEY, name TEXT NOT NULL")
            .with_id_column("user_id");
        users.create(&mut conn).await?;

        users
            .insert()
            .columns(["user_id", "name"])
            .values(sql_args![41, "ana"])
            .values(sql_args![42, "bo"])
            .run(&mut conn)
            .await?;

        let row = users.get_by_id(&mut conn, 42).await?;
        assert_eq!(row.get("name"), Some(&RowValues::Text("bo".into())));
        assert_eq!(row.try_get::<i64>("users.user_id")?, 42);

        let names = users
            .basic_select(&["name"])
            .order_by(["name DESC"])
            .rows(&mut conn)
            .await?;
        assert_eq!(names.len(), 2);
        assert_eq!(names.results[0].try_get::<String>("name")?, "bo");

        let count: DbRow = select_rows(["COUNT(*) AS n"])
            .from("users")
            .filter(Expr::eq_any("user_id", [41, 99]))
            .only(&mut conn)
            .await?;
        assert_eq!(count.try_get::<i64>("n")?, 1);
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}

#[test]
fn test1_sqlite_todos_scenario() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = open(&dir).await?;
        let mut conn = cap.get_connection().await?;
        let table: Table = Table::new("todos", ["id", "title"])
            .with_schema("id INTEGER PRIMARY KEY, title TEXT NOT NULL");
        table.create(&mut conn).await?;

        // a two-row insert reports the id of its last row
        let last = table
            .insert()
            .columns(["title"])
            .values(["first"])
            .values(["second"])
            .run(&mut conn)
            .await?;
        assert_eq!(last, 2);
        assert_eq!(table.get_by_id(&mut conn, last - 1).await?.try_get::<String>("title")?, "first");

        let all = table.get_all(&mut conn).await?;
        let titles = all
            .iter()
            .map(|row| row.try_get::<String>("title"))
            .collect::<Result<Vec<_>, _>>()?;
        assert_eq!(titles, vec!["first", "second"]);

        let second = table.get_by_id(&mut conn, 2).await?;
        assert_eq!(second.try_get::<String>("todos.title")?, "second");

        let outcome = table.delete().filter(("id = ?", 2)).run(&mut conn).await?;
        assert_eq!(outcome.rows_affected, 1);
        assert_eq!(table.get_all(&mut conn).await?.len(), 1);
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}
