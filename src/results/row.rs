use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TableKitError;
use crate::row::FromValue;
use crate::types::RowValues;

/// A row from a database query result
///
/// Column names and the name-to-index map are shared by every row of a result set.
#[derive(Debug, Clone)]
pub struct DbRow {
    /// The column names for this row (shared across all rows in a result set)
    pub column_names: Arc<Vec<String>>,
    /// The values for this row
    pub values: Vec<RowValues>,
    column_index: Arc<HashMap<String, usize>>,
}

impl DbRow {
    /// Create a new database row, building its own column index.
    #[must_use]
    pub fn new(column_names: Arc<Vec<String>>, values: Vec<RowValues>) -> Self {
        let column_index = Arc::new(index_columns(&column_names));
        Self {
            column_names,
            values,
            column_index,
        }
    }

    pub(crate) fn with_index(
        column_names: Arc<Vec<String>>,
        column_index: Arc<HashMap<String, usize>>,
        values: Vec<RowValues>,
    ) -> Self {
        Self {
            column_names,
            values,
            column_index,
        }
    }

    /// Get the index of a column by name
    #[must_use]
    pub fn get_column_index(&self, column_name: &str) -> Option<usize> {
        if let Some(&idx) = self.column_index.get(column_name) {
            return Some(idx);
        }

        // Drivers may report `todos.id` as `id`; callers may still ask for the qualified name.
        // A join can yield the same bare name twice, and then the table is unknowable.
        let unqualified = column_name.rsplit('.').next()?;
        if unqualified == column_name {
            return None;
        }
        let mut matches = self
            .column_names
            .iter()
            .enumerate()
            .filter(|(_, name)| name.as_str() == unqualified);
        let (idx, _) = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(idx)
    }

    /// Get a value from the row by column name
    #[must_use]
    pub fn get(&self, column_name: &str) -> Option<&RowValues> {
        self.get_column_index(column_name)
            .and_then(|idx| self.values.get(idx))
    }

    /// Get a value from the row by column index
    #[must_use]
    pub fn get_by_index(&self, index: usize) -> Option<&RowValues> {
        self.values.get(index)
    }

    /// Decode a column into a Rust value.
    ///
    /// # Errors
    /// Returns `TableKitError::DecodeError` when the column is missing or its value does not
    /// convert into `V`.
    pub fn try_get<V: FromValue>(&self, column_name: &str) -> Result<V, TableKitError> {
        let value = self.get(column_name).ok_or_else(|| {
            TableKitError::DecodeError(format!("column `{column_name}` not found in row"))
        })?;
        V::from_value(value)
            .map_err(|e| TableKitError::DecodeError(format!("column `{column_name}`: {e}")))
    }

    /// Decode a column by position.
    ///
    /// # Errors
    /// Returns `TableKitError::DecodeError` when the index is out of bounds or the value does
    /// not convert into `V`.
    pub fn try_get_at<V: FromValue>(&self, index: usize) -> Result<V, TableKitError> {
        let value = self.get_by_index(index).ok_or_else(|| {
            TableKitError::DecodeError(format!("column index {index} out of bounds"))
        })?;
        V::from_value(value)
            .map_err(|e| TableKitError::DecodeError(format!("column {index}: {e}")))
    }
}

pub(crate) fn index_columns(column_names: &[String]) -> HashMap<String, usize> {
    let mut index = HashMap::with_capacity(column_names.len());
    for (i, name) in column_names.iter().enumerate() {
        // first occurrence wins for duplicated names from joins
        index.entry(name.clone()).or_insert(i);
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(names: &[&str], values: Vec<RowValues>) -> DbRow {
        DbRow::new(
            Arc::new(names.iter().map(ToString::to_string).collect()),
            values,
        )
    }

    #[test]
    fn qualified_name_falls_back_to_unique_bare_column() -> Result<(), TableKitError> {
        let r = row(&["id", "title"], vec![RowValues::Int(7), RowValues::Text("x".into())]);
        assert_eq!(r.try_get::<i64>("todos.id")?, 7);
        assert_eq!(r.get_column_index("title"), Some(1));
        assert_eq!(r.get_column_index("missing"), None);
        Ok(())
    }

    #[test]
    fn duplicated_bare_column_is_not_guessed() {
        let r = row(&["id", "id"], vec![RowValues::Int(10), RowValues::Int(1)]);
        assert_eq!(r.get_column_index("users.id"), None);
        assert!(matches!(
            r.try_get::<i64>("users.id"),
            Err(TableKitError::DecodeError(_))
        ));
        // the exact bare name still resolves to the first occurrence
        assert_eq!(r.try_get::<i64>("id").ok(), Some(10));
    }
}
