use crate::error::TableKitError;
use crate::types::{Dialect, RowValues};

use super::{Expr, SelectStatement, SqlWriter};

/// An INSERT statement, fed either by `VALUES` rows or by a SELECT.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InsertStatement {
    pub prefixes: Vec<Expr>,
    pub options: Vec<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub values: Vec<Vec<Expr>>,
    pub select: Option<Box<SelectStatement>>,
    pub suffixes: Vec<Expr>,
}

impl InsertStatement {
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
    /// Returns `TableKitError::BuildError` when the table is missing, when there are
    /// neither values nor a select, or when both are set.
    pub fn to_sql(&self, dialect: Dialect) -> Result<(String, Vec<RowValues>), TableKitError> {
        if self.table.is_empty() {
            return Err(TableKitError::BuildError(
                "insert statements must specify a table".to_string(),
            ));
        }
        match (self.values.is_empty(), self.select.is_some()) {
            (true, false) => {
                return Err(TableKitError::BuildError(
                    "insert statements must have at least one set of values or select clause"
                        .to_string(),
                ));
            }
            (false, true) => {
                return Err(TableKitError::BuildError(
                    "insert statements must not have both values and a select clause".to_string(),
                ));
            }
            _ => {}
        }

        let mut w = SqlWriter::default();
        w.fragments(&self.prefixes);
        w.clause("INSERT");
        for option in &self.options {
            w.push(" ");
            w.push(option);
        }
        w.push(" INTO ");
        w.push(&self.table);
        if !self.columns.is_empty() {
            w.push(" (");
            w.push(&self.columns.join(", "));
            w.push(")");
        }

        if let Some(select) = &self.select {
            let mut inner = SqlWriter::default();
            select.write_to(&mut inner)?;
            w.clause("");
            w.append(inner);
        } else {
            w.clause("VALUES ");
            for (i, row) in self.values.iter().enumerate() {
                if i > 0 {
                    w.push(", ");
                }
                w.push("(");
                for (j, value) in row.iter().enumerate() {
                    if j > 0 {
                        w.push(", ");
                    }
                    value.write_to(&mut w);
                }
                w.push(")");
            }
        }

        w.fragments(&self.suffixes);
        Ok(w.finish(dialect))
    }
}
