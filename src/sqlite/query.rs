use std::sync::Arc;

use rusqlite::Statement;
use rusqlite::types::Value;
use tracing::debug;

use super::manager::{SharedSqliteConnection, run_blocking};
use super::params::Params;
use crate::error::TableKitError;
use crate::results::{ExecOutcome, ResultSet};
use crate::types::RowValues;

/// Extract a `RowValues` from a `SQLite` row.
///
/// # Errors
/// Returns `TableKitError::SqliteError` if the value cannot be read.
pub fn sqlite_extract_value_sync(
    row: &rusqlite::Row,
    idx: usize,
) -> Result<RowValues, TableKitError> {
    let value: Value = row.get(idx)?;
    Ok(match value {
        Value::Null => RowValues::Null,
        Value::Integer(i) => RowValues::Int(i),
        Value::Real(f) => RowValues::Float(f),
        Value::Text(s) => RowValues::Text(s),
        Value::Blob(b) => RowValues::Blob(b),
    })
}

/// Build a result set from a prepared `SQLite` statement.
///
/// # Errors
/// Returns `TableKitError::SqliteError` if execution or value extraction fails.
pub fn build_result_set(stmt: &mut Statement, params: &Params) -> Result<ResultSet, TableKitError> {
    let column_names: Vec<String> = stmt
        .column_names()
        .iter()
        .map(std::string::ToString::to_string)
        .collect();
    let col_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(10);
    result_set.set_column_names(Arc::new(column_names));

    let param_refs = params.as_refs();
    let mut rows_iter = stmt.query(&param_refs[..])?;
    while let Some(row) = rows_iter.next()? {
        let mut row_values = Vec::with_capacity(col_count);
        for i in 0..col_count {
            row_values.push(sqlite_extract_value_sync(row, i)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Run a row-returning statement.
///
/// # Errors
/// Returns `TableKitError` if preparing or running the statement fails.
pub async fn select(
    conn: SharedSqliteConnection,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, TableKitError> {
    debug!(backend = "sqlite", sql, params = params.len(), "select");
    let sql = sql.to_owned();
    let params = Params::convert(params);
    run_blocking(conn, move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        build_result_set(&mut stmt, &params)
    })
    .await
}

/// Run a statement that returns no rows, reporting the connection's last insert rowid.
///
/// # Errors
/// Returns `TableKitError` if preparing or running the statement fails.
pub async fn execute(
    conn: SharedSqliteConnection,
    sql: &str,
    params: &[RowValues],
) -> Result<ExecOutcome, TableKitError> {
    debug!(backend = "sqlite", sql, params = params.len(), "execute");
    let sql = sql.to_owned();
    let params = Params::convert(params);
    run_blocking(conn, move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let param_refs = params.as_refs();
        let rows = stmt.execute(&param_refs[..])?;
        Ok(ExecOutcome::new(rows as u64, Some(conn.last_insert_rowid())))
    })
    .await
}

/// Run parameterless statements separated by `;`.
///
/// # Errors
/// Returns `TableKitError::SqliteError` if any statement fails.
pub async fn execute_batch(conn: SharedSqliteConnection, sql: &str) -> Result<(), TableKitError> {
    debug!(backend = "sqlite", sql, "execute batch");
    let sql = sql.to_owned();
    run_blocking(conn, move |conn| {
        conn.execute_batch(&sql).map_err(TableKitError::SqliteError)
    })
    .await
}
