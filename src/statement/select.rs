use crate::error::TableKitError;
use crate::types::{Dialect, RowValues};

use super::{Expr, SqlWriter};

/// What a SELECT reads from.
#[derive(Debug, Clone, PartialEq)]
pub enum FromSource {
    Table(String),
    /// `(subquery) AS alias`
    Subquery(Box<SelectStatement>, String),
}

/// A SELECT statement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectStatement {
    pub prefixes: Vec<Expr>,
    pub distinct: bool,
    pub options: Vec<String>,
    pub columns: Vec<Expr>,
    pub from: Option<FromSource>,
    pub joins: Vec<Expr>,
    pub wheres: Vec<Expr>,
    pub group_by: Vec<String>,
    pub havings: Vec<Expr>,
    pub order_by: Vec<Expr>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub suffixes: Vec<Expr>,
}

impl SelectStatement {
    #[must_use]
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns
                .into_iter()
                .map(|c| Expr::from(Into::<String>::into(c)))
                .collect(),
            ..Self::default()
        }
    }

    /// Render the statement for `dialect`.
    ///
    /// # Errors
    /// Returns `TableKitError::BuildError` when there are no result columns (here or in a
    /// nested subquery).
    pub fn to_sql(&self, dialect: Dialect) -> Result<(String, Vec<RowValues>), TableKitError> {
        let mut w = SqlWriter::default();
        self.write_to(&mut w)?;
        Ok(w.finish(dialect))
    }

    pub(crate) fn write_to(&self, w: &mut SqlWriter) -> Result<(), TableKitError> {
        if self.columns.is_empty() {
            return Err(TableKitError::BuildError(
                "select statements must have at least one result column".to_string(),
            ));
        }

        w.fragments(&self.prefixes);
        w.clause("SELECT");
        if self.distinct {
            w.push(" DISTINCT");
        }
        for option in &self.options {
            w.push(" ");
            w.push(option);
        }
        for (i, column) in self.columns.iter().enumerate() {
            w.push(if i == 0 { " " } else { ", " });
            column.write_to(w);
        }

        match &self.from {
            Some(FromSource::Table(table)) if !table.is_empty() => {
                w.clause("FROM ");
                w.push(table);
            }
            Some(FromSource::Subquery(sub, alias)) => {
                let mut inner = SqlWriter::default();
                sub.write_to(&mut inner)?;
                w.clause("FROM (");
                w.append(inner);
                w.push(") AS ");
                w.push(alias);
            }
            _ => {}
        }

        w.fragments(&self.joins);
        w.expr_list("WHERE", &self.wheres, " AND ");
        w.name_list("GROUP BY", &self.group_by);
        w.expr_list("HAVING", &self.havings, " AND ");
        w.expr_list("ORDER BY", &self.order_by, ", ");
        w.limit_offset(self.limit, self.offset);
        w.fragments(&self.suffixes);
        Ok(())
    }
}
