use crate::error::TableKitError;
use crate::results::ExecOutcome;
use crate::runner::Runner;
use crate::statement::{DeleteStatement, Expr};
use crate::types::{Dialect, RowValues};

/// DELETE builder.
#[derive(Debug, Clone, Default)]
pub struct DeleteBuilder {
    stmt: DeleteStatement,
    dialect: Option<Dialect>,
}

impl DeleteBuilder {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            stmt: DeleteStatement::new(table),
            dialect: None,
        }
    }

    #[must_use]
    pub fn statement(&self) -> &DeleteStatement {
        &self.stmt
    }

    #[must_use]
    pub fn placeholder_format(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn from(mut self, table: impl Into<String>) -> Self {
        self.stmt.table = table.into();
        self
    }

    #[must_use]
    pub fn prefix(mut self, expr: impl Into<Expr>) -> Self {
        self.stmt.prefixes.push(expr.into());
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
    /// Returns `TableKitError::BuildError` when the table is missing.
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
