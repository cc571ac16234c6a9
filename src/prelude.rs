//! Convenient imports for common functionality.
//!
//! This module re-exports the most commonly used types and functions
//! to make it easier to get started with the library.

pub use crate::config::ConnectOptions;
pub use crate::error::TableKitError;
pub use crate::pool::{ConfigAndPool, Connection, Idle, InTx, MiddlewarePool, PoolTuning};
pub use crate::query_builder::{
    DeleteBuilder, InsertBuilder, SelectBuilder, UpdateBuilder, delete, insert, select,
    select_rows, update,
};
pub use crate::results::{DbRow, ExecOutcome, ResultSet};
pub use crate::row::{FromRow, FromValue};
pub use crate::runner::Runner;
pub use crate::sql_args;
pub use crate::statement::{
    DeleteStatement, Expr, FromSource, InsertStatement, SelectStatement, UpdateStatement,
};
pub use crate::table::{Table, prefix_columns};
pub use crate::translation::translate_placeholders;
pub use crate::tx::commit_transaction;
pub use crate::types::{DatabaseType, Dialect, RowValues};
pub use crate::view::View;

#[cfg(feature = "postgres")]
pub use crate::postgres::{PgManager, PostgresOptions, PostgresOptionsBuilder};

#[cfg(feature = "sqlite")]
pub use crate::sqlite::{SqliteManager, SqliteOptions, SqliteOptionsBuilder};
