//! Connection settings expressed as DSN components plus pool tuning.

use std::time::Duration;

use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::error::TableKitError;
use crate::pool::{ConfigAndPool, PoolTuning};
#[cfg(feature = "postgres")]
use crate::postgres::PostgresOptions;
#[cfg(feature = "sqlite")]
use crate::sqlite::SqliteOptions;
use crate::types::{DatabaseType, Dialect};

/// Everything needed to open a pool.
///
/// Deserializes with defaults for every field except `db_type` and `database`:
/// ```rust
/// use tablekit::prelude::*;
///
/// let opts: ConnectOptions = serde_json::from_str(r#"{"db_type": "sqlite", "database": "app.db"}"#)?;
/// assert_eq!(opts.username, "root");
/// assert_eq!(opts.dsn(), "root:@tcp(localhost:3306)/app.db?charset=utf8mb4&parseTime=true");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConnectOptions {
    pub db_type: DatabaseType,
    #[serde(default = "default_username")]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Database name for Postgres, file path for `SQLite`.
    #[serde(default)]
    pub database: String,
    /// Extra `key=value&...` parameters. Only rendered into [`dsn`](Self::dsn).
    #[serde(default = "default_params")]
    pub params: String,
    #[serde(default = "default_max_open")]
    pub max_open: u32,
    /// Connections bb8 keeps open while idle (its `min_idle`), capped at `max_open`.
    ///
    /// bb8 has no upper bound on idle connections, so this is a floor, not a ceiling:
    /// the pool opens this many connections up front and replaces them as they expire.
    /// Set it to `0` for a lazily filled pool.
    #[serde(default = "default_max_idle")]
    pub max_idle: u32,
    /// Whole seconds when deserialized.
    #[serde(default = "default_max_lifetime", deserialize_with = "duration_from_secs")]
    pub max_lifetime: Duration,
    /// Overrides the backend's default dialect.
    #[serde(default)]
    pub dialect: Option<Dialect>,
}

fn default_username() -> String {
    "root".to_string()
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_params() -> String {
    "charset=utf8mb4&parseTime=true".to_string()
}

fn default_max_open() -> u32 {
    10
}

fn default_max_idle() -> u32 {
    2
}

fn default_max_lifetime() -> Duration {
    Duration::from_secs(30 * 60)
}

fn duration_from_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl ConnectOptions {
    /// Options for `db_type`/`database` with every other field at its default.
    #[must_use]
    pub fn new(db_type: DatabaseType, database: impl Into<String>) -> Self {
        Self {
            db_type,
            username: default_username(),
            password: String::new(),
            host: default_host(),
            port: default_port(),
            database: database.into(),
            params: default_params(),
            max_open: default_max_open(),
            max_idle: default_max_idle(),
            max_lifetime: default_max_lifetime(),
            dialect: None,
        }
    }

    /// Render `user:password@tcp(host:port)/dbname?params`; the `?params` part is
    /// omitted when there are no parameters.
    #[must_use]
    pub fn dsn(&self) -> String {
        let mut dsn = format!(
            "{}:{}@tcp({}:{})/{}",
            self.username, self.password, self.host, self.port, self.database
        );
        if !self.params.is_empty() {
            dsn.push('?');
            dsn.push_str(&self.params);
        }
        dsn
    }

    /// Pool sizing derived from `max_open`, `max_idle` and `max_lifetime`.
    #[must_use]
    pub fn pool_tuning(&self) -> PoolTuning {
        PoolTuning {
            max_size: self.max_open,
            min_idle: Some(self.max_idle.min(self.max_open)),
            max_lifetime: Some(self.max_lifetime),
        }
    }
}

impl ConfigAndPool {
    /// Open a pool for whichever backend `opts.db_type` names.
    ///
    /// # Errors
    /// Returns `TableKitError::ConfigError` when `database` is empty, otherwise whatever the
    /// backend constructor returns.
    pub async fn connect(opts: &ConnectOptions) -> Result<Self, TableKitError> {
        if opts.database.is_empty() {
            return Err(TableKitError::ConfigError("database is required".to_string()));
        }
        info!(db_type = ?opts.db_type, host = %opts.host, database = %opts.database, "connecting");

        match opts.db_type {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => {
                let mut cfg = tokio_postgres::Config::new();
                cfg.host(&opts.host)
                    .port(opts.port)
                    .user(&opts.username)
                    .dbname(&opts.database);
                if !opts.password.is_empty() {
                    cfg.password(&opts.password);
                }
                let mut pg = PostgresOptions::new(cfg);
                pg.tuning = opts.pool_tuning();
                pg.dialect = opts.dialect;
                Self::new_postgres(pg).await
            }
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => {
                let mut sqlite = SqliteOptions::new(opts.database.clone());
                sqlite.tuning = opts.pool_tuning();
                sqlite.dialect = opts.dialect;
                Self::new_sqlite(sqlite).await
            }
        }
    }
}
