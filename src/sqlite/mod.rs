//! `SQLite` backend on top of `rusqlite`.
//!
//! `rusqlite` is synchronous; every call hops onto tokio's blocking pool while holding
//! the connection's mutex.

pub mod config;
pub mod manager;
pub mod params;
pub mod query;

pub use config::{SqliteOptions, SqliteOptionsBuilder};
pub use manager::{SharedSqliteConnection, SqliteManager};
