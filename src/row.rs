//! Mapping decoded rows into caller types.

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;

use crate::error::TableKitError;
use crate::results::DbRow;
use crate::types::RowValues;

/// Build a value of `Self` from one result row.
///
/// Tables, views and select builders are generic over a `FromRow` type; the default is
/// [`DbRow`] itself, which hands back the untyped row.
///
/// ```rust
/// use tablekit::prelude::*;
///
/// struct Todo {
///     id: i64,
///     title: String,
/// }
///
/// impl FromRow for Todo {
///     fn from_row(row: &DbRow) -> Result<Self, TableKitError> {
///         Ok(Todo {
///             id: row.try_get("id")?,
///             title: row.try_get("title")?,
///         })
///     }
/// }
/// ```
pub trait FromRow: Sized + Send {
    /// # Errors
    /// Returns `TableKitError::DecodeError` when a column is missing or has the wrong type.
    fn from_row(row: &DbRow) -> Result<Self, TableKitError>;
}

impl FromRow for DbRow {
    fn from_row(row: &DbRow) -> Result<Self, TableKitError> {
        Ok(row.clone())
    }
}

/// Convert a single column value into a Rust type.
pub trait FromValue: Sized {
    /// # Errors
    /// Returns `TableKitError::DecodeError` if the value has an incompatible type.
    fn from_value(value: &RowValues) -> Result<Self, TableKitError>;
}

fn mismatch(expected: &str, value: &RowValues) -> TableKitError {
    TableKitError::DecodeError(format!("expected {expected}, got {value:?}"))
}

impl FromValue for RowValues {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        Ok(value.clone())
    }
}

impl FromValue for i64 {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        value
            .as_int()
            .copied()
            .ok_or_else(|| mismatch("integer", value))
    }
}

impl FromValue for i32 {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        let wide = i64::from_value(value)?;
        i32::try_from(wide)
            .map_err(|e| TableKitError::DecodeError(format!("integer {wide} out of range: {e}")))
    }
}

impl FromValue for f64 {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        value.as_float().ok_or_else(|| mismatch("float", value))
    }
}

impl FromValue for bool {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        value
            .as_bool()
            .copied()
            .ok_or_else(|| mismatch("boolean", value))
    }
}

impl FromValue for String {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        value
            .as_text()
            .map(ToString::to_string)
            .ok_or_else(|| mismatch("text", value))
    }
}

impl FromValue for NaiveDateTime {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        value
            .as_timestamp()
            .ok_or_else(|| mismatch("timestamp", value))
    }
}

impl FromValue for Vec<u8> {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        match value {
            RowValues::Blob(bytes) => Ok(bytes.clone()),
            RowValues::Text(s) => Ok(s.as_bytes().to_vec()),
            other => Err(mismatch("blob", other)),
        }
    }
}

impl FromValue for JsonValue {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        match value {
            RowValues::JSON(json) => Ok(json.clone()),
            // SQLite stores JSON as text
            RowValues::Text(s) => serde_json::from_str(s)
                .map_err(|e| TableKitError::DecodeError(format!("invalid JSON text: {e}"))),
            RowValues::Null => Ok(JsonValue::Null),
            other => Err(mismatch("JSON", other)),
        }
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn from_value(value: &RowValues) -> Result<Self, TableKitError> {
        if value.is_null() {
            Ok(None)
        } else {
            T::from_value(value).map(Some)
        }
    }
}
