//! Read-only entities backed by a custom, possibly multi-table, query.

use std::fmt;

use crate::error::TableKitError;
use crate::query_builder::SelectBuilder;
use crate::results::DbRow;
use crate::row::FromRow;
use crate::runner::Runner;
use crate::statement::Expr;

/// An entity assembled by a query rather than read from one table.
///
/// When the query joins several tables that each have an `id` column, set `id_from` to
/// the table whose id identifies the entity; lookups then filter on `<id_from>.id`.
pub struct View<T = DbRow> {
    pub id_from: Option<String>,
    /// Builds a fresh query for every call.
    pub query: fn() -> SelectBuilder<T>,
}

impl<T: FromRow> View<T> {
    #[must_use]
    pub fn new(query: fn() -> SelectBuilder<T>) -> Self {
        Self {
            id_from: None,
            query,
        }
    }

    /// `id_from` accepts anything that displays as a table name, including a [`Table`](crate::Table).
    #[must_use]
    pub fn with_id_from(id_from: impl fmt::Display, query: fn() -> SelectBuilder<T>) -> Self {
        Self {
            id_from: Some(id_from.to_string()),
            query,
        }
    }

    /// Column the `get_by_id*` lookups filter on.
    #[must_use]
    pub fn id_column(&self) -> String {
        match self.id_from.as_deref() {
            Some(from) if !from.is_empty() => format!("{from}.id"),
            _ => "id".to_string(),
        }
    }

    /// # Errors
    /// Returns build, execution or row-mapping errors.
    pub async fn get_all<R: Runner>(&self, runner: &mut R) -> Result<Vec<T>, TableKitError> {
        (self.query)().all(runner).await
    }

    /// # Errors
    /// Returns `TableKitError::NotFound` or `TableKitError::Ambiguous` unless exactly one
    /// row matches.
    pub async fn get_by_id<R: Runner>(&self, runner: &mut R, id: i64) -> Result<T, TableKitError> {
        (self.query)()
            .filter(Expr::eq(self.id_column(), id))
            .only(runner)
            .await
    }

    /// # Errors
    /// Returns build, execution or row-mapping errors.
    pub async fn get_by_ids<R: Runner>(
        &self,
        runner: &mut R,
        ids: &[i64],
    ) -> Result<Vec<T>, TableKitError> {
        (self.query)()
            .filter(Expr::eq_any(self.id_column(), ids.iter().copied()))
            .all(runner)
            .await
    }
}

impl<T> Clone for View<T> {
    fn clone(&self) -> Self {
        Self {
            id_from: self.id_from.clone(),
            query: self.query,
        }
    }
}

impl<T> fmt::Debug for View<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("id_from", &self.id_from)
            .finish_non_exhaustive()
    }
}
