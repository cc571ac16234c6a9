use bb8::Pool;
use tracing::debug;

use super::manager::PgManager;
use crate::error::TableKitError;
use crate::pool::{ConfigAndPool, MiddlewarePool, PoolTuning};
use crate::types::{DatabaseType, Dialect};

/// Options for configuring a Postgres pool.
#[derive(Debug, Clone)]
pub struct PostgresOptions {
    pub config: tokio_postgres::Config,
    pub tuning: PoolTuning,
    /// Dialect override; Postgres defaults to `Dialect::Postgres`.
    pub dialect: Option<Dialect>,
}

impl PostgresOptions {
    #[must_use]
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self {
            config,
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

/// Fluent builder for Postgres options.
#[derive(Debug, Clone)]
pub struct PostgresOptionsBuilder {
    opts: PostgresOptions,
}

impl PostgresOptionsBuilder {
    #[must_use]
    pub fn new(config: tokio_postgres::Config) -> Self {
        Self {
            opts: PostgresOptions::new(config),
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
    pub fn finish(self) -> PostgresOptions {
        self.opts
    }

    /// Build a `ConfigAndPool` for Postgres.
    ///
    /// # Errors
    /// Returns `TableKitError` if validation or pool creation fails.
    pub async fn build(self) -> Result<ConfigAndPool, TableKitError> {
        ConfigAndPool::new_postgres(self.finish()).await
    }
}

impl ConfigAndPool {
    #[must_use]
    pub fn postgres_builder(config: tokio_postgres::Config) -> PostgresOptionsBuilder {
        PostgresOptionsBuilder::new(config)
    }

    /// Asynchronous initializer for `ConfigAndPool` with Postgres.
    ///
    /// # Errors
    /// Returns `TableKitError::ConfigError` if host, dbname or user is missing, or
    /// `TableKitError::ConnectionError` if pool creation fails.
    pub async fn new_postgres(opts: PostgresOptions) -> Result<Self, TableKitError> {
        let cfg = &opts.config;
        if cfg.get_hosts().is_empty() {
            return Err(TableKitError::ConfigError("host is required".to_string()));
        }
        if cfg.get_dbname().is_none() {
            return Err(TableKitError::ConfigError("dbname is required".to_string()));
        }
        if cfg.get_user().is_none() {
            return Err(TableKitError::ConfigError("user is required".to_string()));
        }

        let pool = opts
            .tuning
            .apply(Pool::builder())
            .build(PgManager::new(opts.config.clone()))
            .await
            .map_err(|e| TableKitError::ConnectionError(format!("postgres pool error: {e}")))?;
        debug!(db = ?opts.config.get_dbname(), "postgres pool ready");

        Ok(ConfigAndPool {
            pool: MiddlewarePool::Postgres(pool),
            db_type: DatabaseType::Postgres,
            dialect: Dialect::resolve(opts.dialect, DatabaseType::Postgres.default_dialect()),
        })
    }
}
