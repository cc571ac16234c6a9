use std::collections::BTreeMap;

use tracing::debug;

use super::SelectBuilder;
use crate::error::TableKitError;
use crate::results::ExecOutcome;
use crate::runner::Runner;
use crate::statement::{Expr, InsertStatement};
use crate::types::{Dialect, RowValues};

/// INSERT builder. [`run`](Self::run) returns the generated id.
#[derive(Debug, Clone, Default)]
pub struct InsertBuilder {
    stmt: InsertStatement,
    dialect: Option<Dialect>,
}

impl InsertBuilder {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            stmt: InsertStatement::new(table),
            dialect: None,
        }
    }

    #[must_use]
    pub fn statement(&self) -> &InsertStatement {
        &self.stmt
    }

    #[must_use]
    pub fn placeholder_format(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn into_table(mut self, table: impl Into<String>) -> Self {
        self.stmt.table = table.into();
        self
    }

    #[must_use]
    pub fn prefix(mut self, expr: impl Into<Expr>) -> Self {
        self.stmt.prefixes.push(expr.into());
        self
    }

    /// Keywords between `INSERT` and `INTO`, e.g. `OR IGNORE`.
    #[must_use]
    pub fn options(mut self, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stmt
            .options
            .extend(options.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn columns(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stmt
            .columns
            .extend(columns.into_iter().map(Into::into));
        self
    }

    /// Add one row of bound values; call repeatedly for a multi-row insert.
    #[must_use]
    pub fn values(mut self, row: impl IntoIterator<Item = impl Into<RowValues>>) -> Self {
        self.stmt
            .values
            .push(row.into_iter().map(Expr::value).collect());
        self
    }

    /// Add one row whose cells may be SQL expressions such as `CURRENT_TIMESTAMP`.
    #[must_use]
    pub fn values_exprs(mut self, row: impl IntoIterator<Item = Expr>) -> Self {
        self.stmt.values.push(row.into_iter().collect());
        self
    }

    /// Set columns and a single row from a map; columns come out in key order.
    #[must_use]
    pub fn set_map<K, V>(mut self, clauses: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<RowValues>,
    {
        let sorted: BTreeMap<String, RowValues> = clauses
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let (columns, row): (Vec<_>, Vec<_>) = sorted
            .into_iter()
            .map(|(k, v)| (k, Expr::value(v)))
            .unzip();
        self.stmt.columns = columns;
        self.stmt.values = vec![row];
        self
    }

    /// `INSERT ... SELECT`
    #[must_use]
    pub fn select<T>(mut self, query: SelectBuilder<T>) -> Self {
        self.stmt.select = Some(Box::new(query.into_statement()));
        self
    }

    #[must_use]
    pub fn suffix(mut self, expr: impl Into<Expr>) -> Self {
        self.stmt.suffixes.push(expr.into());
        self
    }

    /// # Errors
    /// Returns `TableKitError::BuildError` for a missing table or an invalid values/select mix.
    pub fn to_sql(&self, dialect: Dialect) -> Result<(String, Vec<RowValues>), TableKitError> {
        self.stmt.to_sql(Dialect::resolve(self.dialect, dialect))
    }

    /// Run the insert and return the generated row id.
    ///
    /// With `Dialect::Standard` the id is the driver's last insert id. With
    /// `Dialect::Postgres`, `RETURNING id` is appended and the last returned id wins,
    /// so a multi-row insert reports the id of its final row.
    ///
    /// # Errors
    /// Returns build or execution errors, or `TableKitError::ExecutionError` when no id
    /// came back.
    pub async fn run<R: Runner>(&self, runner: &mut R) -> Result<i64, TableKitError> {
        match Dialect::resolve(self.dialect, runner.dialect()) {
            Dialect::Standard => {
                let (sql, args) = self.to_sql(Dialect::Standard)?;
                let outcome = runner.execute(&sql, &args).await?;
                outcome.last_insert_id.ok_or_else(|| {
                    TableKitError::ExecutionError(
                        "driver did not report a last insert id".to_string(),
                    )
                })
            }
            Dialect::Postgres => {
                let (sql, args) = self
                    .clone()
                    .suffix("RETURNING id")
                    .to_sql(Dialect::Postgres)?;
                let rs = runner.select(&sql, &args).await?;
                debug!(returned = rs.len(), "insert returned ids");
                let mut last_id = None;
                for row in &rs.results {
                    last_id = Some(row.try_get_at::<i64>(0)?);
                }
                last_id.ok_or_else(|| {
                    TableKitError::ExecutionError("could not get last insert id".to_string())
                })
            }
        }
    }

    /// Run the insert and return what the driver reported.
    ///
    /// # Errors
    /// Returns build or execution errors.
    pub async fn exec<R: Runner>(&self, runner: &mut R) -> Result<ExecOutcome, TableKitError> {
        let (sql, args) = self.to_sql(runner.dialect())?;
        runner.execute(&sql, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::DbRow;

    #[test]
    fn set_map_sorts_columns() -> Result<(), TableKitError> {
        let q = InsertBuilder::new("todos").set_map([
            ("title", RowValues::from("x")),
            ("done", RowValues::from(false)),
        ]);
        let (sql, args) = q.to_sql(Dialect::Postgres)?;
        assert_eq!(sql, "INSERT INTO todos (done, title) VALUES ($1, $2)");
        assert_eq!(args, vec![RowValues::Bool(false), RowValues::Text("x".into())]);
        Ok(())
    }

    #[test]
    fn insert_select_uses_one_placeholder_sequence() -> Result<(), TableKitError> {
        let src = SelectBuilder::<DbRow>::new(["title"])
            .from("drafts")
            .filter(Expr::eq("owner", 3));
        let q = InsertBuilder::new("todos")
            .prefix("/* nightly import */")
            .columns(["title"])
            .select(src);
        assert_eq!(
            q.to_sql(Dialect::Postgres)?.0,
            "/* nightly import */ INSERT INTO todos (title) SELECT title FROM drafts WHERE owner = $1"
        );
        Ok(())
    }
}
