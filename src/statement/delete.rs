use crate::error::TableKitError;
use crate::types::{Dialect, RowValues};

use super::{Expr, SqlWriter};

/// A DELETE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeleteStatement {
    pub prefixes: Vec<Expr>,
    pub table: String,
    pub wheres: Vec<Expr>,
    pub order_by: Vec<Expr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub suffixes: Vec<Expr>,
}

impl DeleteStatement {
    #[must_use]
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            ..Self::default()
        }
    }

    /// Render the statement for `dialect`.
    ///
    /// # Errors
    /// Returns `TableKitError::BuildError` when the table is missing.
    pub fn to_sql(&self, dialect: Dialect) -> Result<(String, Vec<RowValues>), TableKitError> {
        if self.table.is_empty() {
            return Err(TableKitError::BuildError(
                "delete statements must specify a From table".to_string(),
            ));
        }

        let mut w = SqlWriter::default();
        w.fragments(&self.prefixes);
        w.clause("DELETE FROM ");
        w.push(&self.table);
        w.expr_list("WHERE", &self.wheres, " AND ");
        w.expr_list("ORDER BY", &self.order_by, ", ");
        w.limit_offset(self.limit, self.offset);
        w.fragments(&self.suffixes);
        Ok(w.finish(dialect))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_where_and_limit() -> Result<(), TableKitError> {
        let mut stmt = DeleteStatement::new("todos");
        stmt.wheres.push(Expr::sql("id = ?", [2]));
        stmt.limit = Some(1);
        let (sql, args) = stmt.to_sql(Dialect::Standard)?;
        assert_eq!(sql, "DELETE FROM todos WHERE id = ? LIMIT 1");
        assert_eq!(args, vec![RowValues::Int(2)]);
        Ok(())
    }

    #[test]
    fn missing_table_is_a_build_error() {
        assert!(matches!(
            DeleteStatement::default().to_sql(Dialect::Postgres),
            Err(TableKitError::BuildError(_))
        ));
    }
}
