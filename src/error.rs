use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableKitError {
    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[cfg(feature = "sqlite")]
    #[error(transparent)]
    SqliteError(#[from] rusqlite::Error),

    #[cfg(feature = "postgres")]
    #[error(transparent)]
    PoolErrorPostgres(#[from] bb8::RunError<tokio_postgres::Error>),

    /// The builder state could not be rendered into SQL.
    #[error("SQL build error: {0}")]
    BuildError(String),

    /// A single-row fetch matched no rows.
    #[error("no rows found")]
    NotFound,

    /// A single-row fetch matched more than one row.
    #[error("expected exactly one row, found {0}")]
    Ambiguous(usize),

    /// A column value could not be mapped into the requested Rust type.
    #[error("Row decode error: {0}")]
    DecodeError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parameter conversion error: {0}")]
    ParameterError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Other database error: {0}")]
    Other(String),
}

#[cfg(feature = "sqlite")]
impl From<bb8::RunError<TableKitError>> for TableKitError {
    fn from(err: bb8::RunError<TableKitError>) -> Self {
        match err {
            bb8::RunError::User(inner) => inner,
            bb8::RunError::TimedOut => {
                TableKitError::ConnectionError("SQLite pool checkout timed out".to_string())
            }
        }
    }
}
