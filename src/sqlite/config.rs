use bb8::Pool;
use tracing::debug;

use super::manager::{SqliteManager, run_blocking};
use crate::error::TableKitError;
use crate::pool::{ConfigAndPool, MiddlewarePool, PoolTuning};
use crate::types::{DatabaseType, Dialect};

/// Options for configuring a `SQLite` pool.
#[derive(Debug, Clone)]
pub struct SqliteOptions {
    pub db_path: String,
    pub tuning: PoolTuning,
    /// Dialect override; `SQLite` defaults to `Dialect::Standard`.
    pub dialect: Option<Dialect>,
}

impl SqliteOptions {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            db_path,
            tuning: PoolTuning::default(),
            dialect: None,
        }
    }

    #[must_use]
    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }
}

/// Fluent builder for `SQLite` options.
#[derive(Debug, Clone)]
pub struct SqliteOptionsBuilder {
    opts: SqliteOptions,
}

impl SqliteOptionsBuilder {
    #[must_use]
    pub fn new(db_path: String) -> Self {
        Self {
            opts: SqliteOptions::new(db_path),
        }
    }

    #[must_use]
    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.opts.dialect = Some(dialect);
        self
    }

    #[must_use]
    pub fn max_size(mut self, max_size: u32) -> Self {
        self.opts.tuning.max_size = max_size;
        self
    }

    #[must_use]
    pub fn tuning(mut self, tuning: PoolTuning) -> Self {
        self.opts.tuning = tuning;
        self
    }

    #[must_use]
    pub fn finish(self) -> SqliteOptions {
        self.opts
    }

    /// Build a `ConfigAndPool` for `SQLite`.
    ///
    /// # Errors
    ///
    /// Returns `TableKitError` if pool creation or the initial smoke test fails.
    pub async fn build(self) -> Result<ConfigAndPool, TableKitError> {
        ConfigAndPool::new_sqlite(self.finish()).await
    }
}

impl ConfigAndPool {
    #[must_use]
    pub fn sqlite_builder(db_path: String) -> SqliteOptionsBuilder {
        SqliteOptionsBuilder::new(db_path)
    }

    /// Asynchronous initializer for `ConfigAndPool` with `SQLite`.
    ///
    /// Opens the pool and switches the database to WAL journaling.
    ///
    /// # Errors
    /// Returns `TableKitError::ConnectionError` if pool creation fails, or the driver error
    /// if the first connection cannot be used.
    pub async fn new_sqlite(opts: SqliteOptions) -> Result<Self, TableKitError> {
        let manager = SqliteManager::new(&opts.db_path);
        let pool = opts
            .tuning
            .apply(Pool::builder())
            .build(manager)
            .await
            .map_err(|e| TableKitError::ConnectionError(format!("sqlite pool error: {e}")))?;

        {
            let conn = pool.get().await?;
            run_blocking(std::sync::Arc::clone(&*conn), |guard| {
                guard
                    .execute_batch("PRAGMA journal_mode = WAL;")
                    .map_err(TableKitError::SqliteError)
            })
            .await?;
        }
        debug!(path = %opts.db_path, "sqlite pool ready");

        Ok(ConfigAndPool {
            pool: MiddlewarePool::Sqlite(pool),
            db_type: DatabaseType::Sqlite,
            dialect: Dialect::resolve(opts.dialect, DatabaseType::Sqlite.default_dialect()),
        })
    }
}
