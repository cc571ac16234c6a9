//! Fluent, value-semantic statement builders with runner-backed terminals.
//!
//! Every mutator consumes the builder and hands back the updated value. Builders are
//! `Clone`, so a partially built query can serve as a template:
//! ```rust
//! use tablekit::prelude::*;
//!
//! let base = select::<DbRow>(["id", "title"]).from("todos");
//! let open = base.clone().filter(Expr::eq("done", false));
//! let recent = base.order_by(["id DESC"]).limit(5);
//!
//! assert_eq!(open.to_sql(Dialect::Postgres)?.0, "SELECT id, title FROM todos WHERE done = $1");
//! assert_eq!(recent.to_sql(Dialect::Standard)?.0, "SELECT id, title FROM todos ORDER BY id DESC LIMIT 5");
//! # Ok::<(), TableKitError>(())
//! ```

mod delete;
mod insert;
mod select;
mod update;

pub use delete::DeleteBuilder;
pub use insert::InsertBuilder;
pub use select::SelectBuilder;
pub use update::UpdateBuilder;

use crate::results::DbRow;
use crate::row::FromRow;

/// A SELECT of `columns`, mapped into `T`.
pub fn select<T: FromRow>(columns: impl IntoIterator<Item = impl Into<String>>) -> SelectBuilder<T> {
    SelectBuilder::new(columns)
}

/// An untyped SELECT returning [`DbRow`]s.
pub fn select_rows(columns: impl IntoIterator<Item = impl Into<String>>) -> SelectBuilder<DbRow> {
    SelectBuilder::new(columns)
}

/// An INSERT into `table`.
pub fn insert(table: impl Into<String>) -> InsertBuilder {
    InsertBuilder::new(table)
}

/// An UPDATE of `table`.
pub fn update(table: impl Into<String>) -> UpdateBuilder {
    UpdateBuilder::new(table)
}

/// A DELETE from `table`.
pub fn delete(table: impl Into<String>) -> DeleteBuilder {
    DeleteBuilder::new(table)
}
