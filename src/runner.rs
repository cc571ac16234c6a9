//! The execution surface shared by pooled connections and open transactions.

use std::future::Future;

use crate::error::TableKitError;
use crate::results::{ExecOutcome, ResultSet};
use crate::row::FromRow;
use crate::types::{Dialect, RowValues};

/// Anything that can execute statements: an idle connection (auto-commit) or an open
/// transaction. Builders, tables and views only ever talk to this trait.
pub trait Runner: Send {
    /// Dialect used when neither the builder nor its table sets one.
    fn dialect(&self) -> Dialect;

    /// Run a row-returning statement.
    #[allow(clippy::manual_async_fn)]
    fn select(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> impl Future<Output = Result<ResultSet, TableKitError>> + Send;

    /// Run a statement that returns no rows.
    #[allow(clippy::manual_async_fn)]
    fn execute(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> impl Future<Output = Result<ExecOutcome, TableKitError>> + Send;

    /// Run one or more parameterless statements separated by `;`.
    #[allow(clippy::manual_async_fn)]
    fn execute_batch(&mut self, sql: &str)
    -> impl Future<Output = Result<(), TableKitError>> + Send;

    /// Run a query and map every row.
    #[allow(clippy::manual_async_fn)]
    fn select_into<T: FromRow>(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> impl Future<Output = Result<Vec<T>, TableKitError>> + Send {
        async move {
            let rs = self.select(sql, params).await?;
            rs.results.iter().map(T::from_row).collect()
        }
    }

    /// Run a query and map its first row; `NotFound` when there is none.
    #[allow(clippy::manual_async_fn)]
    fn get_one<T: FromRow>(
        &mut self,
        sql: &str,
        params: &[RowValues],
    ) -> impl Future<Output = Result<T, TableKitError>> + Send {
        async move {
            let rs = self.select(sql, params).await?;
            let row = rs.results.first().ok_or(TableKitError::NotFound)?;
            T::from_row(row)
        }
    }
}
