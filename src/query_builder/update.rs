use std::collections::BTreeMap;

use crate::error::TableKitError;
use crate::results::ExecOutcome;
use crate::runner::Runner;
use crate::statement::{Expr, UpdateStatement};
use crate::types::{Dialect, RowValues};

/// UPDATE builder.
#[derive(Debug, Clone, Default)]
pub struct UpdateBuilder {
    stmt: UpdateStatement,
    dialect: Option<Dialect>,
}

impl UpdateBuilder {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            stmt: UpdateStatement::new(table),
            dialect: None,
        }
    }

    #[must_use]
    pub fn statement(&self) -> &UpdateStatement {
        &self.stmt
    }

    #[must_use]
    pub fn placeholder_format(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn table(mut self, table: impl Into<String>) -> Self {
        self.stmt.table = table.into();
        self
    }

    #[must_use]
    pub fn prefix(mut self, expr: impl Into<Expr>) -> Self {
        self.stmt.prefixes.push(expr.into());
        self
    }

    /// `column = ?`
    #[must_use]
    pub fn set(mut self, column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        self.stmt.set.push((column.into(), Expr::value(value)));
        self
    }

    /// `column = <expr>`, e.g. `set_expr("hits", ("hits + ?", 1))`.
    #[must_use]
    pub fn set_expr(mut self, column: impl Into<String>, expr: impl Into<Expr>) -> Self {
        self.stmt.set.push((column.into(), expr.into()));
        self
    }

    /// Add a SET entry per map key, in key order.
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
        self.stmt
            .set
            .extend(sorted.into_iter().map(|(k, v)| (k, Expr::value(v))));
        self
    }

    #[must_use]
    pub fn filter(mut self, pred: impl Into<Expr>) -> Self {
        self.stmt.wheres.push(pred.into());
        self
    }

    #[must_use]
    pub fn order_by(mut self, columns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.stmt
            .order_by
            .extend(columns.into_iter().map(|c| Expr::from(Into::<String>::into(c))));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: u64) -> Self {
        self.stmt.limit = Some(limit);
        self
    }

    #[must_use]
    pub fn offset(mut self, offset: u64) -> Self {
        self.stmt.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn suffix(mut self, expr: impl Into<Expr>) -> Self {
        self.stmt.suffixes.push(expr.into());
        self
    }

    /// # Errors
    /// Returns `TableKitError::BuildError` when the table or SET clause is missing.
    pub fn to_sql(&self, dialect: Dialect) -> Result<(String, Vec<RowValues>), TableKitError> {
        self.stmt.to_sql(Dialect::resolve(self.dialect, dialect))
    }

    /// # Errors
    /// Returns build or execution errors.
    pub async fn run<R: Runner>(&self, runner: &mut R) -> Result<ExecOutcome, TableKitError> {
        let (sql, args) = self.to_sql(runner.dialect())?;
        runner.execute(&sql, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_variants_keep_order() -> Result<(), TableKitError> {
        let q = UpdateBuilder::new("todos")
            .set("title", "x")
            .set_expr("hits", ("hits + ?", 1))
            .set_map([("b", 2), ("a", 1)])
            .filter(Expr::eq("id", 9))
            .order_by(["id"])
            .limit(1);
        let (sql, args) = q.to_sql(Dialect::Standard)?;
        assert_eq!(
            sql,
            "UPDATE todos SET title = ?, hits = hits + ?, a = ?, b = ? WHERE id = ? ORDER BY id LIMIT 1"
        );
        assert_eq!(args.len(), 5);
        Ok(())
    }
}
