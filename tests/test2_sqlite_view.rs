#![cfg(feature = "sqlite")]

use std::sync::LazyLock;

use tablekit::prelude::*;

static USERS: LazyLock<Table> = LazyLock::new(|| {
    Table::new("users", ["id", "name"]).with_schema("id INTEGER PRIMARY KEY, name TEXT NOT NULL")
});

static TODOS: LazyLock<Table> = LazyLock::new(|| {
    Table::new("todos", ["id", "user_id", "title"])
        .with_schema("id INTEGER PRIMARY KEY, user_id INTEGER NOT NULL, title TEXT NOT NULL")
});

#[derive(Debug, PartialEq)]
struct TodoWithOwner {
    id: i64,
    title: String,
    owner: String,
}

impl FromRow for TodoWithOwner {
    fn from_row(row: &DbRow) -> Result<Self, TableKitError> {
        Ok(TodoWithOwner {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            owner: row.try_get("owner")?,
        })
    }
}

fn todo_with_owner() -> SelectBuilder<TodoWithOwner> {
    select(["todos.id", "todos.title", "users.name AS owner"])
        .from(TODOS.name.as_str())
        .join("users ON users.id = todos.user_id")
        .order_by(["todos.id"])
}

#[test]
fn test2_sqlite_view_over_join() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("views.db");
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = ConfigAndPool::sqlite_builder(path.to_string_lossy().into_owned())
            .build()
            .await?;
        let mut conn = cap.get_connection().await?;
        USERS.create(&mut conn).await?;
        TODOS.create(&mut conn).await?;

        USERS
            .insert()
            .columns(["id", "name"])
            .values(sql_args![1, "ana"])
            .values(sql_args![2, "bo"])
            .run(&mut conn)
            .await?;
        TODOS
            .insert()
            .columns(["id", "user_id", "title"])
            .values(sql_args![10, 1, "write tests"])
            .values(sql_args![11, 2, "review"])
            .values(sql_args![12, 1, "ship"])
            .run(&mut conn)
            .await?;

        // both tables have an `id`, so lookups must be qualified
        let view = View::with_id_from(&*TODOS, todo_with_owner);
        assert_eq!(view.id_column(), "todos.id");

        let all = view.get_all(&mut conn).await?;
        assert_eq!(all.len(), 3);
        assert_eq!(all[0].owner, "ana");

        let one = view.get_by_id(&mut conn, 11).await?;
        assert_eq!(
            one,
            TodoWithOwner {
                id: 11,
                title: "review".into(),
                owner: "bo".into(),
            }
        );

        let some = view.get_by_ids(&mut conn, &[10, 12, 99]).await?;
        let titles: Vec<_> = some.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["write tests", "ship"]);
        assert!(view.get_by_ids(&mut conn, &[]).await?.is_empty());

        assert!(matches!(
            view.get_by_id(&mut conn, 99).await,
            Err(TableKitError::NotFound)
        ));

        let ambiguous = View::new(todo_with_owner);
        assert!(ambiguous.get_by_id(&mut conn, 10).await.is_err());
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}

#[test]
fn test2_sqlite_join_does_not_guess_duplicate_columns() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("dupes.db");
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async move {
        let cap = ConfigAndPool::sqlite_builder(path.to_string_lossy().into_owned())
            .build()
            .await?;
        let mut conn = cap.get_connection().await?;
        USERS.create(&mut conn).await?;
        TODOS.create(&mut conn).await?;
        USERS
            .insert()
            .columns(["id", "name"])
            .values(sql_args![1, "ana"])
            .run(&mut conn)
            .await?;
        TODOS
            .insert()
            .columns(["id", "user_id", "title"])
            .values(sql_args![10, 1, "write tests"])
            .run(&mut conn)
            .await?;

        let rows = select_rows(["todos.id", "users.id"])
            .from("todos")
            .join("users ON users.id = todos.user_id")
            .all(&mut conn)
            .await?;
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        // sqlite drops the table qualifier, leaving two bare `id` columns
        assert_eq!(row.column_names.as_slice(), ["id", "id"]);
        assert!(matches!(
            row.try_get::<i64>("users.id"),
            Err(TableKitError::DecodeError(_))
        ));
        assert_eq!(row.try_get_at::<i64>(0)?, 10);
        assert_eq!(row.try_get_at::<i64>(1)?, 1);

        // aliasing is the way to read both
        let row: DbRow = select_rows(["todos.id AS todo_id", "users.id AS user_id"])
            .from("todos")
            .join("users ON users.id = todos.user_id")
            .only(&mut conn)
            .await?;
        assert_eq!(row.try_get::<i64>("user_id")?, 1);
        assert_eq!(row.try_get::<i64>("todo_id")?, 10);
        Ok::<(), TableKitError>(())
    })?;
    Ok(())
}
