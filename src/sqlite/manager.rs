use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use bb8::ManageConnection;
use tracing::debug;

use crate::error::TableKitError;

/// How long a connection waits on a locked database before failing.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A `rusqlite` connection shared between the pool and blocking tasks.
pub type SharedSqliteConnection = Arc<Mutex<rusqlite::Connection>>;

/// bb8 manager that opens one `SQLite` connection per pooled slot.
///
/// `":memory:"` gives every slot its own private database; use a file path when the
/// pool holds more than one connection.
#[derive(Debug, Clone)]
pub struct SqliteManager {
    path: PathBuf,
}

impl SqliteManager {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ManageConnection for SqliteManager {
    type Connection = SharedSqliteConnection;
    type Error = TableKitError;

    #[allow(clippy::manual_async_fn)]
    fn connect(&self) -> impl Future<Output = Result<Self::Connection, Self::Error>> + Send {
        let path = self.path.clone();
        async move {
            debug!(path = %path.display(), "opening sqlite connection");
            let conn = tokio::task::spawn_blocking(move || {
                let conn = rusqlite::Connection::open(path)?;
                conn.busy_timeout(BUSY_TIMEOUT)?;
                Ok::<_, rusqlite::Error>(conn)
            })
            .await
            .map_err(|e| TableKitError::ConnectionError(format!("sqlite open join error: {e}")))??;
            Ok(Arc::new(Mutex::new(conn)))
        }
    }

    #[allow(clippy::manual_async_fn)]
    fn is_valid(
        &self,
        conn: &mut Self::Connection,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let handle = Arc::clone(conn);
        async move {
            run_blocking(handle, |guard| {
                guard
                    .execute_batch("SELECT 1")
                    .map_err(TableKitError::SqliteError)
            })
            .await
        }
    }

    fn has_broken(&self, _conn: &mut Self::Connection) -> bool {
        false
    }
}

/// Lock the connection, recovering it when a previous holder panicked.
pub(crate) fn lock_connection(conn: &SharedSqliteConnection) -> MutexGuard<'_, rusqlite::Connection> {
    conn.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Run `func` against the connection on tokio's blocking pool.
///
/// # Errors
/// Returns whatever `func` returns, or `ExecutionError` if the blocking task fails to join.
pub(crate) async fn run_blocking<F, R>(
    conn: SharedSqliteConnection,
    func: F,
) -> Result<R, TableKitError>
where
    F: FnOnce(&mut rusqlite::Connection) -> Result<R, TableKitError> + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let mut guard = lock_connection(&conn);
        func(&mut guard)
    })
    .await
    .map_err(|e| TableKitError::ExecutionError(format!("sqlite spawn_blocking join error: {e}")))?
}
