//! Predicates and SQL fragments with positional arguments.

use crate::types::{Dialect, RowValues};

use super::SqlWriter;

/// A SQL fragment that renders to text plus its positional arguments.
///
/// Every variant renders with `?` placeholders; statements switch to `$n` at the end
/// when the target dialect asks for it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Raw SQL with `?` placeholders, e.g. `Expr::sql("id = ?", [2])`.
    Raw { sql: String, args: Vec<RowValues> },
    /// `column op ?`
    Compare {
        column: String,
        op: &'static str,
        value: RowValues,
    },
    /// `column IS NULL` / `column IS NOT NULL`
    NullCheck { column: String, is_null: bool },
    /// `column IN (...)` / `column NOT IN (...)`
    InList {
        column: String,
        values: Vec<RowValues>,
        negated: bool,
    },
    /// Parenthesized conjunction; `(1=1)` when empty.
    And(Vec<Expr>),
    /// Parenthesized disjunction; `(1=0)` when empty.
    Or(Vec<Expr>),
}

impl Expr {
    /// Raw SQL with positional arguments.
    pub fn sql<I, V>(sql: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        Expr::Raw {
            sql: sql.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A single bound value, rendered as `?`.
    pub fn value(value: impl Into<RowValues>) -> Self {
        Expr::Raw {
            sql: "?".to_string(),
            args: vec![value.into()],
        }
    }

    /// `column = ?`, or `column IS NULL` for a NULL value.
    pub fn eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare_or_null(column.into(), "=", value.into(), true)
    }

    /// `column <> ?`, or `column IS NOT NULL` for a NULL value.
    pub fn not_eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare_or_null(column.into(), "<>", value.into(), false)
    }

    /// `column IN (?, ...)`; an empty list matches nothing.
    pub fn eq_any<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `column NOT IN (?, ...)`; an empty list matches everything.
    pub fn not_eq_any<I, V>(column: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<RowValues>,
    {
        Expr::InList {
            column: column.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    pub fn lt(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, "<", value)
    }

    pub fn lt_eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, "<=", value)
    }

    pub fn gt(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, ">", value)
    }

    pub fn gt_eq(column: impl Into<String>, value: impl Into<RowValues>) -> Self {
        Self::compare(column, ">=", value)
    }

    pub fn like(column: impl Into<String>, pattern: impl Into<RowValues>) -> Self {
        Self::compare(column, "LIKE", pattern)
    }

    pub fn not_like(column: impl Into<String>, pattern: impl Into<RowValues>) -> Self {
        Self::compare(column, "NOT LIKE", pattern)
    }

    pub fn and(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::And(exprs.into_iter().collect())
    }

    pub fn or(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Expr::Or(exprs.into_iter().collect())
    }

    fn compare(column: impl Into<String>, op: &'static str, value: impl Into<RowValues>) -> Self {
        Expr::Compare {
            column: column.into(),
            op,
            value: value.into(),
        }
    }

    fn compare_or_null(column: String, op: &'static str, value: RowValues, is_null: bool) -> Self {
        if value.is_null() {
            Expr::NullCheck { column, is_null }
        } else {
            Expr::Compare { column, op, value }
        }
    }

    /// Whether this fragment renders to nothing (a blank raw predicate).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        matches!(self, Expr::Raw { sql, .. } if sql.trim().is_empty())
    }

    /// Flatten into raw SQL text and its arguments.
    pub(crate) fn into_raw(self) -> (String, Vec<RowValues>) {
        match self {
            Expr::Raw { sql, args } => (sql, args),
            other => {
                let mut w = SqlWriter::default();
                other.write_to(&mut w);
                w.finish(Dialect::Standard)
            }
        }
    }

    /// Prepend a keyword, e.g. `LEFT JOIN` in front of `u ON u.id = t.u_id`.
    pub(crate) fn with_keyword(self, keyword: &str) -> Expr {
        let (sql, args) = self.into_raw();
        Expr::Raw {
            sql: format!("{keyword} {sql}"),
            args,
        }
    }

    pub(crate) fn write_to(&self, w: &mut SqlWriter) {
        match self {
            Expr::Raw { sql, args } => {
                w.push(sql);
                w.bind_all(args);
            }
            Expr::Compare { column, op, value } => {
                w.push(column);
                w.push(" ");
                w.push(op);
                w.push(" ?");
                w.bind(value.clone());
            }
            Expr::NullCheck { column, is_null } => {
                w.push(column);
                w.push(if *is_null { " IS NULL" } else { " IS NOT NULL" });
            }
            Expr::InList {
                column,
                values,
                negated,
            } => {
                if values.is_empty() {
                    w.push(if *negated { "(1=1)" } else { "(1=0)" });
                    return;
                }
                w.push(column);
                w.push(if *negated { " NOT IN (" } else { " IN (" });
                for (i, value) in values.iter().enumerate() {
                    if i > 0 {
                        w.push(", ");
                    }
                    w.push("?");
                    w.bind(value.clone());
                }
                w.push(")");
            }
            Expr::And(exprs) => write_group(w, exprs, " AND ", "(1=1)"),
            Expr::Or(exprs) => write_group(w, exprs, " OR ", "(1=0)"),
        }
    }
}

fn write_group(w: &mut SqlWriter, exprs: &[Expr], sep: &str, when_empty: &str) {
    let mut parts = exprs.iter().filter(|e| !e.is_empty()).peekable();
    if parts.peek().is_none() {
        w.push(when_empty);
        return;
    }
    w.push("(");
    for (i, expr) in parts.enumerate() {
        if i > 0 {
            w.push(sep);
        }
        expr.write_to(w);
    }
    w.push(")");
}

impl From<&str> for Expr {
    fn from(sql: &str) -> Self {
        Expr::Raw {
            sql: sql.to_string(),
            args: Vec::new(),
        }
    }
}

impl From<String> for Expr {
    fn from(sql: String) -> Self {
        Expr::Raw {
            sql,
            args: Vec::new(),
        }
    }
}

/// `(sql, args)` pairs read like a raw predicate: `.filter(("id = ?", 2))`.
impl<S, V> From<(S, V)> for Expr
where
    S: Into<String>,
    V: Into<RowValues>,
{
    fn from((sql, arg): (S, V)) -> Self {
        Expr::Raw {
            sql: sql.into(),
            args: vec![arg.into()],
        }
    }
}
