//! A row type bound to a table name and its columns.

use std::fmt;
use std::marker::PhantomData;

use crate::error::TableKitError;
use crate::query_builder::{DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder};
use crate::results::DbRow;
use crate::row::FromRow;
use crate::runner::Runner;
use crate::statement::Expr;
use crate::types::Dialect;

/// A SQL table whose rows map into `T`.
///
/// Tables are plain values, typically built once:
/// ```rust
/// use std::sync::LazyLock;
/// use tablekit::prelude::*;
///
/// static TODOS: LazyLock<Table> = LazyLock::new(|| {
///     Table::new("todos", ["id", "title"])
///         .with_schema("id INTEGER PRIMARY KEY, title TEXT NOT NULL")
/// });
///
/// let (sql, _) = TODOS.select().to_sql(Dialect::Standard)?;
/// assert_eq!(sql, "SELECT todos.id, todos.title FROM todos");
/// # Ok::<(), TableKitError>(())
/// ```
pub struct Table<T = DbRow> {
    pub name: String,
    pub columns: Vec<String>,
    /// Column definitions used by [`create`](Self::create).
    pub raw_schema: String,
    /// Primary key column for the `get_by_id*` lookups; `"id"` when unset.
    pub id_column: Option<String>,
    /// Dialect override for every builder this table hands out.
    pub dialect: Option<Dialect>,
    _row: PhantomData<fn() -> T>,
}

impl<T> Table<T> {
    #[must_use]
    pub fn new(name: impl Into<String>, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
            raw_schema: String::new(),
            id_column: None,
            dialect: None,
            _row: PhantomData,
        }
    }

    #[must_use]
    pub fn with_schema(mut self, raw_schema: impl Into<String>) -> Self {
        self.raw_schema = raw_schema.into();
        self
    }

    #[must_use]
    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = Some(id_column.into());
        self
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn id_column_name(&self) -> &str {
        self.id_column.as_deref().unwrap_or("id")
    }

    /// The table's own dialect when set, otherwise `default`.
    #[must_use]
    pub fn resolve_dialect(&self, default: Dialect) -> Dialect {
        Dialect::resolve(self.dialect, default)
    }

    /// SELECT of every declared column, qualified with the table name.
    #[must_use]
    pub fn select(&self) -> SelectBuilder<T> {
        let builder = SelectBuilder::new(prefix_columns(&self.name, &self.columns)).from(&self.name);
        match self.dialect {
            Some(dialect) => builder.placeholder_format(dialect),
            None => builder,
        }
    }

    /// Untyped SELECT of `columns` (all declared columns when empty), qualified with the
    /// table name.
    #[must_use]
    pub fn basic_select<S: AsRef<str>>(&self, columns: &[S]) -> SelectBuilder<DbRow> {
        let qualified = if columns.is_empty() {
            prefix_columns(&self.name, &self.columns)
        } else {
            prefix_columns(&self.name, columns)
        };
        let builder = SelectBuilder::new(qualified).from(&self.name);
        match self.dialect {
            Some(dialect) => builder.placeholder_format(dialect),
            None => builder,
        }
    }

    #[must_use]
    pub fn insert(&self) -> InsertBuilder {
        let builder = InsertBuilder::new(&self.name);
        match self.dialect {
            Some(dialect) => builder.placeholder_format(dialect),
            None => builder,
        }
    }

    #[must_use]
    pub fn update(&self) -> UpdateBuilder {
        let builder = UpdateBuilder::new(&self.name);
        match self.dialect {
            Some(dialect) => builder.placeholder_format(dialect),
            None => builder,
        }
    }

    #[must_use]
    pub fn delete(&self) -> DeleteBuilder {
        let builder = DeleteBuilder::new(&self.name);
        match self.dialect {
            Some(dialect) => builder.placeholder_format(dialect),
            None => builder,
        }
    }

    /// `CREATE TABLE name (raw_schema)`
    ///
    /// # Errors
    /// Fails when the table already exists or the schema is invalid.
    pub async fn create<R: Runner>(&self, runner: &mut R) -> Result<(), TableKitError> {
        let sql = format!("CREATE TABLE {} ({})", self.name, self.raw_schema);
        runner.execute_batch(&sql).await
    }

    /// `CREATE TABLE IF NOT EXISTS name (raw_schema)`
    ///
    /// # Errors
    /// Fails when the schema is invalid.
    pub async fn create_if_not_exists<R: Runner>(&self, runner: &mut R) -> Result<(), TableKitError> {
        let sql = format!(
            "CREATE TABLE IF NOT EXISTS {} ({})",
            self.name, self.raw_schema
        );
        runner.execute_batch(&sql).await
    }
}

impl<T: FromRow> Table<T> {
    /// # Errors
    /// Returns execution or row-mapping errors.
    pub async fn get_all<R: Runner>(&self, runner: &mut R) -> Result<Vec<T>, TableKitError> {
        self.select().all(runner).await
    }

    /// # Errors
    /// Returns `TableKitError::NotFound` when no row has this id, `Ambiguous` when the id
    /// column is not unique.
    pub async fn get_by_id<R: Runner>(&self, runner: &mut R, id: i64) -> Result<T, TableKitError> {
        self.select()
            .filter(Expr::eq(self.id_column_name(), id))
            .only(runner)
            .await
    }

    /// Rows whose id is in `ids`; empty `ids` gives an empty vector.
    ///
    /// # Errors
    /// Returns execution or row-mapping errors.
    pub async fn get_by_ids<R: Runner>(
        &self,
        runner: &mut R,
        ids: &[i64],
    ) -> Result<Vec<T>, TableKitError> {
        self.select()
            .filter(Expr::eq_any(self.id_column_name(), ids.iter().copied()))
            .all(runner)
            .await
    }
}

impl<T> Clone for Table<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
            raw_schema: self.raw_schema.clone(),
            id_column: self.id_column.clone(),
            dialect: self.dialect,
            _row: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("id_column", &self.id_column_name())
            .field("dialect", &self.dialect)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for Table<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Qualify each column as `prefix.column`, keeping order.
///
/// An empty prefix still emits the dot (`.column`).
#[must_use]
pub fn prefix_columns<S: AsRef<str>>(prefix: &str, columns: &[S]) -> Vec<String> {
    columns
        .iter()
        .map(|c| format!("{prefix}.{}", c.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefixes_columns() {
        assert_eq!(prefix_columns("yekshi", &["mesh"]), vec!["yekshi.mesh"]);
        assert_eq!(prefix_columns("", &["a", "b"]), vec![".a", ".b"]);
        assert!(prefix_columns("t", &Vec::<String>::new()).is_empty());
    }

    #[test]
    fn builders_carry_the_table_dialect() -> Result<(), TableKitError> {
        let table: Table = Table::new("users", ["id", "name"])
            .with_id_column("user_id")
            .with_dialect(Dialect::Postgres);

        let (sql, _) = table
            .select()
            .filter(Expr::eq(table.id_column_name(), 1))
            .to_sql(Dialect::Standard)?;
        assert_eq!(sql, "SELECT users.id, users.name FROM users WHERE user_id = $1");

        let (sql, _) = table.insert().columns(["name"]).values(["x"]).to_sql(Dialect::Standard)?;
        assert_eq!(sql, "INSERT INTO users (name) VALUES ($1)");

        let (sql, _) = table.basic_select(&["name"]).to_sql(Dialect::Standard)?;
        assert_eq!(sql, "SELECT users.name FROM users");

        assert_eq!(table.resolve_dialect(Dialect::Standard), Dialect::Postgres);
        assert_eq!(table.to_string(), "users");
        Ok(())
    }

    #[test]
    fn default_id_column_and_dialect() {
        let table: Table = Table::new("todos", ["id"]);
        assert_eq!(table.id_column_name(), "id");
        assert_eq!(table.resolve_dialect(Dialect::Standard), Dialect::Standard);
        assert_eq!(table.resolve_dialect(Dialect::Postgres), Dialect::Postgres);
    }
}
