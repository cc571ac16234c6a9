//! SQL statement values and their rendering.
//!
//! Statements render with `?` placeholders and convert the finished text once for the
//! target dialect, so raw fragments are always written with `?`.

mod delete;
mod expr;
mod insert;
mod select;
mod update;

pub use delete::DeleteStatement;
pub use expr::Expr;
pub use insert::InsertStatement;
pub use select::{FromSource, SelectStatement};
pub use update::UpdateStatement;

use crate::translation::translate_placeholders;
use crate::types::{Dialect, RowValues};

/// Accumulates SQL text and bound arguments in render order.
#[derive(Debug, Default)]
pub(crate) struct SqlWriter {
    sql: String,
    args: Vec<RowValues>,
}

impl SqlWriter {
    pub(crate) fn push(&mut self, text: &str) {
        self.sql.push_str(text);
    }

    /// Start a new clause, separated from the previous one by a single space.
    pub(crate) fn clause(&mut self, keyword: &str) {
        if !self.sql.is_empty() {
            self.sql.push(' ');
        }
        self.sql.push_str(keyword);
    }

    pub(crate) fn bind(&mut self, value: RowValues) {
        self.args.push(value);
    }

    pub(crate) fn bind_all(&mut self, values: &[RowValues]) {
        self.args.extend_from_slice(values);
    }

    /// Splice in a separately rendered statement, keeping argument order.
    pub(crate) fn append(&mut self, other: SqlWriter) {
        self.sql.push_str(&other.sql);
        self.args.extend(other.args);
    }

    /// Write each non-empty fragment as its own clause.
    pub(crate) fn fragments(&mut self, exprs: &[Expr]) {
        for expr in exprs.iter().filter(|e| !e.is_empty()) {
            self.clause("");
            expr.write_to(self);
        }
    }

    /// `KEYWORD e1 <sep> e2`, skipped when every expression is empty.
    pub(crate) fn expr_list(&mut self, keyword: &str, exprs: &[Expr], sep: &str) {
        let mut parts = exprs.iter().filter(|e| !e.is_empty()).peekable();
        if parts.peek().is_none() {
            return;
        }
        self.clause(keyword);
        for (i, expr) in parts.enumerate() {
            self.push(if i == 0 { " " } else { sep });
            expr.write_to(self);
        }
    }

    /// `KEYWORD a, b`, skipped when the list is empty.
    pub(crate) fn name_list(&mut self, keyword: &str, names: &[String]) {
        if names.is_empty() {
            return;
        }
        self.clause(keyword);
        self.push(" ");
        self.push(&names.join(", "));
    }

    pub(crate) fn limit_offset(&mut self, limit: Option<u64>, offset: Option<u64>) {
        if let Some(limit) = limit {
            self.clause(&format!("LIMIT {limit}"));
        }
        if let Some(offset) = offset {
            self.clause(&format!("OFFSET {offset}"));
        }
    }

    pub(crate) fn finish(self, dialect: Dialect) -> (String, Vec<RowValues>) {
        let sql = if dialect.is_postgres() {
            translate_placeholders(&self.sql, Dialect::Postgres).into_owned()
        } else {
            self.sql
        };
        (sql, self.args)
    }
}
