use std::fmt;
use std::future::Future;
use std::marker::PhantomData;

use bb8::PooledConnection;
#[cfg(feature = "postgres")]
use tokio::runtime::Handle;
use tracing::{debug, warn};

#[cfg(feature = "postgres")]
use crate::postgres::{self, PgManager};
#[cfg(feature = "sqlite")]
use crate::sqlite::{self, SqliteManager, manager::lock_connection};
use crate::error::TableKitError;
use crate::results::{ExecOutcome, ResultSet};
use crate::runner::Runner;
use crate::types::{DatabaseType, Dialect, RowValues};

/// Marker types for typestate
pub enum Idle {}
pub enum InTx {}

/// A pooled driver connection.
pub(crate) enum BackendConnection {
    #[cfg(feature = "postgres")]
    Postgres(PooledConnection<'static, PgManager>),
    #[cfg(feature = "sqlite")]
    Sqlite(PooledConnection<'static, SqliteManager>),
}

impl BackendConnection {
    fn db_type(&self) -> DatabaseType {
        match self {
            #[cfg(feature = "postgres")]
            BackendConnection::Postgres(_) => DatabaseType::Postgres,
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    async fn select(&mut self, sql: &str, params: &[RowValues]) -> Result<ResultSet, TableKitError> {
        match self {
            #[cfg(feature = "postgres")]
            BackendConnection::Postgres(client) => postgres::query::select(client, sql, params).await,
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => {
                sqlite::query::select(std::sync::Arc::clone(&**conn), sql, params).await
            }
        }
    }

    async fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> Result<ExecOutcome, TableKitError> {
        match self {
            #[cfg(feature = "postgres")]
            BackendConnection::Postgres(client) => postgres::query::execute(client, sql, params).await,
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => {
                sqlite::query::execute(std::sync::Arc::clone(&**conn), sql, params).await
            }
        }
    }

    async fn execute_batch(&mut self, sql: &str) -> Result<(), TableKitError> {
        match self {
            #[cfg(feature = "postgres")]
            BackendConnection::Postgres(client) => postgres::query::execute_batch(client, sql).await,
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => {
                sqlite::query::execute_batch(std::sync::Arc::clone(&**conn), sql).await
            }
        }
    }
}

/// Typestate wrapper around a pooled connection.
///
/// `Connection<Idle>` runs every statement in auto-commit mode; [`begin`](Connection::begin)
/// turns it into a `Connection<InTx>`. Dropping a `Connection<InTx>` before
/// [`commit`](Connection::commit) or [`rollback`](Connection::rollback) completes rolls the
/// transaction back: synchronously for `SQLite`, via a spawned `ROLLBACK` for Postgres.
pub struct Connection<State> {
    backend: Option<BackendConnection>,
    dialect: Dialect,
    /// True when a transaction is in-flight and needs rollback if dropped.
    needs_rollback: bool,
    _state: PhantomData<State>,
}

impl<State> Connection<State> {
    pub(crate) fn new(backend: BackendConnection, dialect: Dialect, needs_rollback: bool) -> Self {
        Self {
            backend: Some(backend),
            dialect,
            needs_rollback,
            _state: PhantomData,
        }
    }

    /// Backend of the underlying connection, `None` once it has been released.
    #[must_use]
    pub fn db_type(&self) -> Option<DatabaseType> {
        self.backend.as_ref().map(BackendConnection::db_type)
    }

    fn backend_mut(&mut self) -> Result<&mut BackendConnection, TableKitError> {
        self.backend
            .as_mut()
            .ok_or_else(|| TableKitError::ConnectionError("connection already released".into()))
    }

    fn take_backend(&mut self) -> Result<BackendConnection, TableKitError> {
        self.backend
            .take()
            .ok_or_else(|| TableKitError::ConnectionError("connection already released".into()))
    }
}

impl Connection<Idle> {
    /// Begin an explicit transaction.
    ///
    /// # Errors
    /// Returns `TableKitError` if starting the transaction fails.
    pub async fn begin(mut self) -> Result<Connection<InTx>, TableKitError> {
        self.begin_in_place().await
    }

    /// Begin a transaction on the borrowed connection. On failure the connection is
    /// left in place, still idle.
    pub(crate) async fn begin_in_place(&mut self) -> Result<Connection<InTx>, TableKitError> {
        let mut backend = self.take_backend()?;
        match backend.execute_batch("BEGIN").await {
            Ok(()) => {
                debug!("transaction begin");
                Ok(Connection::new(backend, self.dialect, true))
            }
            Err(err) => {
                self.backend = Some(backend);
                Err(err)
            }
        }
    }

    /// Take back the connection of a finished transaction.
    ///
    /// Returns `false` and leaves `tx` to its drop-time rollback when the transaction is
    /// still open.
    pub(crate) fn restore(&mut self, mut tx: Connection<InTx>) -> bool {
        if tx.needs_rollback {
            return false;
        }
        self.backend = tx.backend.take();
        self.backend.is_some()
    }
}

impl Connection<InTx> {
    /// Commit and return to idle. A failed commit is followed by a best-effort rollback.
    ///
    /// # Errors
    /// Returns `TableKitError` if the commit fails.
    pub async fn commit(mut self) -> Result<Connection<Idle>, TableKitError> {
        match self.finish("COMMIT").await {
            Ok(()) => self.into_idle(),
            Err(err) => {
                self.rollback_logged().await;
                Err(err)
            }
        }
    }

    /// Rollback and return to idle.
    ///
    /// # Errors
    /// Returns `TableKitError` if the rollback fails.
    pub async fn rollback(mut self) -> Result<Connection<Idle>, TableKitError> {
        self.finish("ROLLBACK").await?;
        self.into_idle()
    }

    /// Run `COMMIT` or `ROLLBACK`; the connection counts as clean only on success.
    pub(crate) async fn finish(&mut self, sql: &'static str) -> Result<(), TableKitError> {
        self.backend_mut()?.execute_batch(sql).await?;
        self.needs_rollback = false;
        debug!(action = sql, "transaction finished");
        Ok(())
    }

    /// Roll back, logging instead of returning a failure.
    pub(crate) async fn rollback_logged(&mut self) {
        if let Err(err) = self.finish("ROLLBACK").await {
            warn!(error = %err, "transaction rollback failed");
        }
    }

    fn into_idle(mut self) -> Result<Connection<Idle>, TableKitError> {
        let backend = self.take_backend()?;
        Ok(Connection::new(backend, self.dialect, false))
    }
}

impl<State: Send> Runner for Connection<State> {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    #[allow(clippy::manual_async_fn)]
    fn select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> impl Future<Output = Result<ResultSet, TableKitError>> + Send {
        async move { self.backend_mut()?.select(sql, params).await }
    }

    #[allow(clippy::manual_async_fn)]
    fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> impl Future<Output = Result<ExecOutcome, TableKitError>> + Send {
        async move { self.backend_mut()?.execute(sql, params).await }
    }

    #[allow(clippy::manual_async_fn)]
    fn execute_batch(
        &mut self,
        sql: &str,
    ) -> impl Future<Output = Result<(), TableKitError>> + Send {
        async move { self.backend_mut()?.execute_batch(sql).await }
    }
}

impl<State> fmt::Debug for Connection<State> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("db_type", &self.db_type())
            .field("dialect", &self.dialect)
            .field("needs_rollback", &self.needs_rollback)
            .finish()
    }
}

impl<State> Drop for Connection<State> {
    fn drop(&mut self) {
        if !self.needs_rollback {
            return;
        }
        let Some(backend) = self.backend.take() else {
            return;
        };

        match backend {
            // Roll back before the connection returns to the pool so the next
            // checkout never sees the open transaction.
            #[cfg(feature = "sqlite")]
            BackendConnection::Sqlite(conn) => {
                let guard = lock_connection(&conn);
                if let Err(err) = guard.execute_batch("ROLLBACK") {
                    warn!(error = %err, "sqlite rollback on drop failed");
                }
                drop(guard);
            }
            #[cfg(feature = "postgres")]
            BackendConnection::Postgres(client) => {
                if let Ok(handle) = Handle::try_current() {
                    handle.spawn(async move {
                        if let Err(err) = client.batch_execute("ROLLBACK").await {
                            warn!(error = %err, "postgres rollback on drop failed");
                        }
                    });
                } else {
                    warn!("no tokio runtime to roll back a dropped postgres transaction");
                }
            }
        }
    }
}
