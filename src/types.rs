use chrono::NaiveDateTime;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::TableKitError;

/// Values that can be stored in a database row or used as query parameters.
///
/// The same enum is used for every backend, so builders and tables never branch on
/// driver types:
/// ```rust
/// use tablekit::prelude::*;
///
/// let params = vec![
///     RowValues::Int(1),
///     RowValues::Text("alice".into()),
///     RowValues::Bool(true),
/// ];
/// # let _ = params;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum RowValues {
    /// Integer value (64-bit)
    Int(i64),
    /// Floating point value (64-bit)
    Float(f64),
    /// Text/string value
    Text(String),
    /// Boolean value
    Bool(bool),
    /// Timestamp value
    Timestamp(NaiveDateTime),
    /// NULL value
    Null,
    /// JSON value
    JSON(JsonValue),
    /// Binary data
    Blob(Vec<u8>),
}

impl RowValues {
    /// Check if this value is NULL
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_int(&self) -> Option<&i64> {
        if let RowValues::Int(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        if let RowValues::Text(value) = self {
            Some(value)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<&bool> {
        if let RowValues::Bool(value) = self {
            return Some(value);
        } else if let Some(i) = self.as_int() {
            if *i == 1 {
                return Some(&true);
            } else if *i == 0 {
                return Some(&false);
            }
        }
        None
    }

    #[must_use]
    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        if let RowValues::Timestamp(value) = self {
            return Some(*value);
        } else if let Some(s) = self.as_text() {
            // SQLite hands timestamps back as text
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
                return Some(dt);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f") {
                return Some(dt);
            }
        }
        None
    }

    #[must_use]
    pub fn as_float(&self) -> Option<f64> {
        match self {
            RowValues::Float(value) => Some(*value),
            #[allow(clippy::cast_precision_loss)]
            RowValues::Int(value) => Some(*value as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_blob(&self) -> Option<&[u8]> {
        if let RowValues::Blob(bytes) = self {
            Some(bytes)
        } else {
            None
        }
    }

    #[must_use]
    pub fn as_json(&self) -> Option<&JsonValue> {
        if let RowValues::JSON(value) = self {
            Some(value)
        } else {
            None
        }
    }
}

impl From<i64> for RowValues {
    fn from(value: i64) -> Self {
        RowValues::Int(value)
    }
}

impl From<i32> for RowValues {
    fn from(value: i32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<i16> for RowValues {
    fn from(value: i16) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<u32> for RowValues {
    fn from(value: u32) -> Self {
        RowValues::Int(i64::from(value))
    }
}

impl From<f64> for RowValues {
    fn from(value: f64) -> Self {
        RowValues::Float(value)
    }
}

impl From<f32> for RowValues {
    fn from(value: f32) -> Self {
        RowValues::Float(f64::from(value))
    }
}

impl From<bool> for RowValues {
    fn from(value: bool) -> Self {
        RowValues::Bool(value)
    }
}

impl From<&str> for RowValues {
    fn from(value: &str) -> Self {
        RowValues::Text(value.to_string())
    }
}

impl From<String> for RowValues {
    fn from(value: String) -> Self {
        RowValues::Text(value)
    }
}

impl From<&String> for RowValues {
    fn from(value: &String) -> Self {
        RowValues::Text(value.clone())
    }
}

impl From<NaiveDateTime> for RowValues {
    fn from(value: NaiveDateTime) -> Self {
        RowValues::Timestamp(value)
    }
}

impl From<JsonValue> for RowValues {
    fn from(value: JsonValue) -> Self {
        RowValues::JSON(value)
    }
}

impl From<Vec<u8>> for RowValues {
    fn from(value: Vec<u8>) -> Self {
        RowValues::Blob(value)
    }
}

impl From<&RowValues> for RowValues {
    fn from(value: &RowValues) -> Self {
        value.clone()
    }
}

impl<T: Into<RowValues>> From<Option<T>> for RowValues {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValues::Null, Into::into)
    }
}

/// Build a `Vec<RowValues>` from heterogeneous values.
///
/// ```rust
/// use tablekit::prelude::*;
///
/// let args = sql_args!["assist Borat", 2, true];
/// assert_eq!(args[1], RowValues::Int(2));
/// ```
#[macro_export]
macro_rules! sql_args {
    () => {
        ::std::vec::Vec::<$crate::RowValues>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::RowValues::from($value)),+]
    };
}

/// The database type supported by this crate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseType {
    /// `PostgreSQL` database
    #[cfg(feature = "postgres")]
    Postgres,
    /// `SQLite` database
    #[cfg(feature = "sqlite")]
    Sqlite,
}

impl DatabaseType {
    /// Resolve a database type from its name (`"postgres"`, `"sqlite"`), ignoring case.
    ///
    /// # Errors
    /// Returns `TableKitError::ConfigError` for names that are unknown or whose backend
    /// feature is disabled.
    pub fn from_name(name: &str) -> Result<Self, TableKitError> {
        <DatabaseType as ValueEnum>::from_str(name.trim(), true)
            .map_err(|_| TableKitError::ConfigError(format!("unsupported database type: {name}")))
    }

    /// Dialect a connection of this type speaks unless configured otherwise.
    #[must_use]
    pub fn default_dialect(self) -> Dialect {
        match self {
            #[cfg(feature = "postgres")]
            DatabaseType::Postgres => Dialect::Postgres,
            #[cfg(feature = "sqlite")]
            DatabaseType::Sqlite => Dialect::Standard,
        }
    }
}

/// Placeholder syntax and last-insert-id strategy for generated statements.
///
/// `Standard` renders `?` placeholders and reads the driver's last insert id;
/// `Postgres` renders `$1..$n` and fetches ids through `RETURNING id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    Standard,
    Postgres,
}

impl Dialect {
    /// Pick the override when one is set, otherwise fall back to `default`.
    #[must_use]
    pub fn resolve(overridden: Option<Dialect>, default: Dialect) -> Dialect {
        overridden.unwrap_or(default)
    }

    #[must_use]
    pub fn is_postgres(self) -> bool {
        matches!(self, Dialect::Postgres)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn option_values_map_to_null() {
        let none: Option<i64> = None;
        assert_eq!(RowValues::from(none), RowValues::Null);
        assert_eq!(RowValues::from(Some("x")), RowValues::Text("x".into()));
    }

    #[test]
    fn sql_args_macro_converts_each_value() {
        let args = sql_args!["a", 1, 2.5, false];
        assert_eq!(
            args,
            vec![
                RowValues::Text("a".into()),
                RowValues::Int(1),
                RowValues::Float(2.5),
                RowValues::Bool(false),
            ]
        );
        assert!(sql_args![].is_empty());
    }

    #[test]
    fn dialect_override_wins() {
        assert_eq!(
            Dialect::resolve(Some(Dialect::Postgres), Dialect::Standard),
            Dialect::Postgres
        );
        assert_eq!(Dialect::resolve(None, Dialect::Postgres), Dialect::Postgres);
        assert_eq!(Dialect::resolve(None, Dialect::Standard), Dialect::Standard);
        assert!(Dialect::Postgres.is_postgres());
        assert!(!Dialect::default().is_postgres());
    }

    #[cfg(all(feature = "postgres", feature = "sqlite"))]
    #[test]
    fn database_type_from_name() {
        assert_eq!(DatabaseType::from_name("Postgres").unwrap(), DatabaseType::Postgres);
        assert_eq!(DatabaseType::from_name("sqlite").unwrap(), DatabaseType::Sqlite);
        assert!(matches!(
            DatabaseType::from_name("oracle"),
            Err(TableKitError::ConfigError(_))
        ));
        assert_eq!(DatabaseType::Sqlite.default_dialect(), Dialect::Standard);
        assert_eq!(DatabaseType::Postgres.default_dialect(), Dialect::Postgres);
    }
}
