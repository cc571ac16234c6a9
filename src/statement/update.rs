use crate::error::TableKitError;
use crate::types::{Dialect, RowValues};

use super::{Expr, SqlWriter};

/// An UPDATE statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateStatement {
    pub prefixes: Vec<Expr>,
    pub table: String,
    /// `column = value` pairs in the order they were set.
    pub set: Vec<(String, Expr)>,
    pub wheres: Vec<Expr>,
    pub order_by: Vec<Expr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub suffixes: Vec<Expr>,
}

impl UpdateStatement {
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
    /// Returns `TableKitError::BuildError` when the table or the SET clause is missing.
    pub fn to_sql(&self, dialect: Dialect) -> Result<(String, Vec<RowValues>), TableKitError> {
        if self.table.is_empty() {
            return Err(TableKitError::BuildError(
                "update statements must specify a table".to_string(),
            ));
        }
        if self.set.is_empty() {
            return Err(TableKitError::BuildError(
                "update statements must have at least one Set clause".to_string(),
            ));
        }

        let mut w = SqlWriter::default();
        w.fragments(&self.prefixes);
        w.clause("UPDATE ");
        w.push(&self.table);
        w.clause("SET ");
        for (i, (column, value)) in self.set.iter().enumerate() {
            if i > 0 {
                w.push(", ");
            }
            w.push(column);
            w.push(" = ");
            value.write_to(&mut w);
        }
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
    fn renders_set_and_where() -> Result<(), TableKitError> {
        let mut stmt = UpdateStatement::new("todos");
        stmt.set.push(("title".into(), Expr::value("done")));
        stmt.set.push(("hits".into(), Expr::sql("hits + ?", [1])));
        stmt.wheres.push(Expr::eq("id", 2));

        let (sql, args) = stmt.to_sql(Dialect::Postgres)?;
        assert_eq!(sql, "UPDATE todos SET title = $1, hits = hits + $2 WHERE id = $3");
        assert_eq!(
            args,
            vec![RowValues::Text("done".into()), RowValues::Int(1), RowValues::Int(2)]
        );
        Ok(())
    }

    #[test]
    fn missing_set_is_a_build_error() {
        assert!(matches!(
            UpdateStatement::new("todos").to_sql(Dialect::Standard),
            Err(TableKitError::BuildError(_))
        ));
        assert!(UpdateStatement::default().to_sql(Dialect::Standard).is_err());
    }
}
