//! Closure-scoped transactions.

use std::panic::{self, AssertUnwindSafe};

use futures_util::FutureExt;
use tracing::{debug, warn};

use crate::error::TableKitError;
use crate::pool::{Connection, Idle, InTx};

/// Run `f` inside a transaction on `conn`.
///
/// The transaction commits when `f` returns `Ok`. It rolls back when `f` returns `Err`
/// (the error is handed back unchanged) or panics (the panic resumes after the
/// rollback). A failed `COMMIT` is followed by a rollback and surfaces as the commit
/// error. Either way `conn` is idle and usable again afterwards.
///
/// ```rust,no_run
/// use tablekit::prelude::*;
///
/// # async fn demo(conn: &mut Connection<Idle>) -> Result<(), TableKitError> {
/// let id = commit_transaction(conn, async |tx: &mut Connection<InTx>| {
///     insert("todos").set_map([("title", "write docs")]).run(tx).await
/// })
/// .await?;
/// # let _ = id;
/// # Ok(())
/// # }
/// ```
///
/// # Errors
/// Returns the error from `BEGIN`, from `f`, or from `COMMIT`.
pub async fn commit_transaction<T, E, F>(conn: &mut Connection<Idle>, f: F) -> Result<T, E>
where
    F: AsyncFnOnce(&mut Connection<InTx>) -> Result<T, E>,
    E: From<TableKitError>,
{
    let mut tx = conn.begin_in_place().await?;

    let outcome = AssertUnwindSafe(f(&mut tx)).catch_unwind().await;

    let result = match outcome {
        Err(payload) => {
            tx.rollback_logged().await;
            release(conn, tx);
            panic::resume_unwind(payload);
        }
        Ok(Err(err)) => {
            debug!("transaction body failed, rolling back");
            tx.rollback_logged().await;
            Err(err)
        }
        Ok(Ok(value)) => match tx.finish("COMMIT").await {
            Ok(()) => Ok(value),
            Err(err) => {
                tx.rollback_logged().await;
                Err(E::from(err))
            }
        },
    };

    release(conn, tx);
    result
}

fn release(conn: &mut Connection<Idle>, tx: Connection<InTx>) {
    if !conn.restore(tx) {
        warn!("transaction left open; connection dropped instead of reused");
    }
}

impl Connection<Idle> {
    /// Method form of [`commit_transaction`].
    ///
    /// # Errors
    /// Returns the error from `BEGIN`, from `f`, or from `COMMIT`.
    pub async fn transaction<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: AsyncFnOnce(&mut Connection<InTx>) -> Result<T, E>,
        E: From<TableKitError>,
    {
        commit_transaction(self, f).await
    }
}
