//! Typed tables, views and fluent statement builders over pooled `PostgreSQL` and
//! `SQLite` connections.
//!
//! * [`Table`] binds a row type to a table name and its columns and hands out
//!   pre-scoped SELECT/INSERT/UPDATE/DELETE builders.
//! * [`View`] does the same for rows assembled by a custom (joined) query.
//! * [`query_builder`] has the builders themselves; every terminal takes any [`Runner`],
//!   so the same code runs on an auto-commit connection or inside a transaction.
//! * [`commit_transaction`] scopes a transaction to an async closure.
//!
//! ```rust,no_run
//! use tablekit::prelude::*;
//!
//! # async fn demo() -> Result<(), TableKitError> {
//! let cap = ConfigAndPool::sqlite_builder("todos.db".to_string()).build().await?;
//! let mut conn = cap.get_connection().await?;
//!
//! let todos: Table = Table::new("todos", ["id", "title"])
//!     .with_schema("id INTEGER PRIMARY KEY, title TEXT NOT NULL");
//! todos.create_if_not_exists(&mut conn).await?;
//!
//! let id = todos.insert().set_map([("title", "write docs")]).run(&mut conn).await?;
//! let row = todos.get_by_id(&mut conn, id).await?;
//! assert_eq!(row.get("title"), Some(&RowValues::Text("write docs".into())));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod pool;
#[cfg(feature = "postgres")]
pub mod postgres;
pub mod prelude;
pub mod query_builder;
pub mod results;
pub mod row;
pub mod runner;
#[cfg(feature = "sqlite")]
pub mod sqlite;
pub mod statement;
pub mod table;
pub mod translation;
pub mod tx;
pub mod types;
pub mod view;

pub use config::ConnectOptions;
pub use error::TableKitError;
pub use pool::{ConfigAndPool, Connection, Idle, InTx, MiddlewarePool, PoolTuning};
pub use results::{DbRow, ExecOutcome, ResultSet};
pub use row::{FromRow, FromValue};
pub use runner::Runner;
pub use table::{Table, prefix_columns};
pub use translation::translate_placeholders;
pub use tx::commit_transaction;
pub use types::{DatabaseType, Dialect, RowValues};
pub use view::View;
