use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use tokio_postgres::Client;
use tokio_postgres::types::Type;
use tracing::debug;

use super::params::as_refs;
use crate::error::TableKitError;
use crate::results::{ExecOutcome, ResultSet};
use crate::types::RowValues;

/// Extracts a `RowValues` from a `tokio_postgres` Row at the given index.
///
/// `DATE` becomes a midnight timestamp. Other types must decode as a Rust `String`
/// (text-like types such as `VARCHAR`, `NAME` or enums); `NUMERIC`, `UUID` and the like
/// fail with a driver error, so cast them (`amount::text`) in the query.
///
/// # Errors
/// Returns `TableKitError::PostgresError` if the column cannot be retrieved.
pub fn postgres_extract_value(
    row: &tokio_postgres::Row,
    idx: usize,
) -> Result<RowValues, TableKitError> {
    let ty = row.columns()[idx].type_();

    let value = match *ty {
        Type::INT2 => row.try_get::<_, Option<i16>>(idx)?.map(|v| RowValues::Int(i64::from(v))),
        Type::INT4 => row.try_get::<_, Option<i32>>(idx)?.map(|v| RowValues::Int(i64::from(v))),
        Type::INT8 => row.try_get::<_, Option<i64>>(idx)?.map(RowValues::Int),
        Type::FLOAT4 => row
            .try_get::<_, Option<f32>>(idx)?
            .map(|v| RowValues::Float(f64::from(v))),
        Type::FLOAT8 => row.try_get::<_, Option<f64>>(idx)?.map(RowValues::Float),
        Type::BOOL => row.try_get::<_, Option<bool>>(idx)?.map(RowValues::Bool),
        Type::TIMESTAMP => row
            .try_get::<_, Option<NaiveDateTime>>(idx)?
            .map(RowValues::Timestamp),
        Type::TIMESTAMPTZ => row
            .try_get::<_, Option<chrono::DateTime<chrono::Utc>>>(idx)?
            .map(|v| RowValues::Timestamp(v.naive_utc())),
        Type::DATE => row
            .try_get::<_, Option<NaiveDate>>(idx)?
            .map(|d| RowValues::Timestamp(d.and_time(NaiveTime::MIN))),
        Type::JSON | Type::JSONB => row.try_get::<_, Option<Value>>(idx)?.map(RowValues::JSON),
        Type::BYTEA => row.try_get::<_, Option<Vec<u8>>>(idx)?.map(RowValues::Blob),
        _ => row.try_get::<_, Option<String>>(idx)?.map(RowValues::Text),
    };

    Ok(value.unwrap_or(RowValues::Null))
}

/// Run a row-returning statement. The statement is prepared first so column names
/// are known even when no rows come back.
///
/// # Errors
/// Returns `TableKitError::PostgresError` if preparing or running the statement fails.
pub async fn select(
    client: &Client,
    sql: &str,
    params: &[RowValues],
) -> Result<ResultSet, TableKitError> {
    debug!(backend = "postgres", sql, params = params.len(), "select");
    let stmt = client.prepare(sql).await?;
    let rows = client.query(&stmt, &as_refs(params)).await?;

    let column_names: Vec<String> = stmt
        .columns()
        .iter()
        .map(|col| col.name().to_string())
        .collect();
    let column_count = column_names.len();

    let mut result_set = ResultSet::with_capacity(rows.len());
    result_set.set_column_names(Arc::new(column_names));

    for row in &rows {
        let mut row_values = Vec::with_capacity(column_count);
        for idx in 0..column_count {
            row_values.push(postgres_extract_value(row, idx)?);
        }
        result_set.add_row_values(row_values);
    }

    Ok(result_set)
}

/// Run a statement that returns no rows. Postgres has no last-insert-id; use
/// `RETURNING` instead.
///
/// # Errors
/// Returns `TableKitError::PostgresError` if running the statement fails.
pub async fn execute(
    client: &Client,
    sql: &str,
    params: &[RowValues],
) -> Result<ExecOutcome, TableKitError> {
    debug!(backend = "postgres", sql, params = params.len(), "execute");
    let rows = client.execute(sql, &as_refs(params)).await?;
    Ok(ExecOutcome::new(rows, None))
}

/// Run parameterless statements separated by `;`.
///
/// # Errors
/// Returns `TableKitError::PostgresError` if any statement fails.
pub async fn execute_batch(client: &Client, sql: &str) -> Result<(), TableKitError> {
    debug!(backend = "postgres", sql, "execute batch");
    client.batch_execute(sql).await?;
    Ok(())
}
