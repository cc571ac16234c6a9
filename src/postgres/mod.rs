//! `PostgreSQL` backend on top of `tokio-postgres`.

pub mod config;
pub mod manager;
pub mod params;
pub mod query;

pub use config::{PostgresOptions, PostgresOptionsBuilder};
pub use manager::PgManager;
