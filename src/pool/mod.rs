//! Pools, pooled connections and the transaction typestate.

mod connection;

use std::time::Duration;

#[cfg(feature = "postgres")]
use crate::postgres::PgManager;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteManager;
use crate::error::TableKitError;
use crate::types::{DatabaseType, Dialect};

pub use connection::{Connection, Idle, InTx};
pub(crate) use connection::BackendConnection;

/// Pool sizing shared by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolTuning {
    /// Maximum number of open connections.
    pub max_size: u32,
    /// Connections kept open while idle.
    pub min_idle: Option<u32>,
    /// Connections older than this are closed when returned to the pool.
    pub max_lifetime: Option<Duration>,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            max_size: 10,
            min_idle: None,
            max_lifetime: Some(Duration::from_secs(30 * 60)),
        }
    }
}

impl PoolTuning {
    fn effective_max_size(&self) -> u32 {
        self.max_size.max(1)
    }

    fn effective_min_idle(&self) -> Option<u32> {
        self.min_idle.map(|idle| idle.min(self.effective_max_size()))
    }

    pub(crate) fn apply<M: bb8::ManageConnection>(self, builder: bb8::Builder<M>) -> bb8::Builder<M> {
        builder
            .max_size(self.effective_max_size())
            .min_idle(self.effective_min_idle())
            .max_lifetime(self.max_lifetime)
    }
}

/// A bb8 pool for one of the supported backends.
#[derive(Clone)]
pub enum MiddlewarePool {
    #[cfg(feature = "postgres")]
    Postgres(bb8::Pool<PgManager>),
    #[cfg(feature = "sqlite")]
    Sqlite(bb8::Pool<SqliteManager>),
}

impl std::fmt::Debug for MiddlewarePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => f.debug_tuple("Postgres").field(&pool.state()).finish(),
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => f.debug_tuple("Sqlite").field(&pool.state()).finish(),
        }
    }
}

/// A pool plus the defaults every connection checked out of it inherits.
#[derive(Debug, Clone)]
pub struct ConfigAndPool {
    pub pool: MiddlewarePool,
    pub db_type: DatabaseType,
    /// Dialect reported by connections from this pool.
    pub dialect: Dialect,
}

impl ConfigAndPool {
    /// Check a connection out of the pool.
    ///
    /// # Errors
    /// Returns the pool error when no connection could be acquired.
    pub async fn get_connection(&self) -> Result<Connection<Idle>, TableKitError> {
        let backend = match &self.pool {
            #[cfg(feature = "postgres")]
            MiddlewarePool::Postgres(pool) => BackendConnection::Postgres(pool.get_owned().await?),
            #[cfg(feature = "sqlite")]
            MiddlewarePool::Sqlite(pool) => BackendConnection::Sqlite(pool.get_owned().await?),
        };
        Ok(Connection::new(backend, self.dialect, false))
    }
}
