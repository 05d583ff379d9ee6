//! Raw structured-query execution with rows materialized as mappings.

use argorag_core::error::{ArgoragError, Result};
use argorag_core::models::RowMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Column, PgPool, Row, TypeInfo};

/// Execute `sql` and materialize every result row as a column-name to
/// value mapping. Execution failures (malformed query, constraint
/// violation, connectivity loss mid-statement) map to `Execution`.
pub async fn fetch_rows(pool: &PgPool, sql: &str) -> Result<Vec<RowMap>> {
    let rows = sqlx::query(sql)
        .fetch_all(pool)
        .await
        .map_err(|e| ArgoragError::Execution { reason: e.to_string() })?;

    Ok(rows.iter().map(row_to_map).collect())
}

/// Decode one row into JSON values by column type. Types outside the
/// handled set decode as null rather than failing the whole result.
fn row_to_map(row: &PgRow) -> RowMap {
    let mut map = RowMap::new();

    for (index, column) in row.columns().iter().enumerate() {
        let value = match column.type_info().name() {
            "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => row
                .try_get::<Option<String>, _>(index)
                .map(|v| v.map_or(Value::Null, Value::String))
                .unwrap_or(Value::Null),
            "INT2" => decode_int(row.try_get::<Option<i16>, _>(index).map(|v| v.map(i64::from))),
            "INT4" => decode_int(row.try_get::<Option<i32>, _>(index).map(|v| v.map(i64::from))),
            "INT8" => decode_int(row.try_get::<Option<i64>, _>(index)),
            "FLOAT4" => {
                decode_float(row.try_get::<Option<f32>, _>(index).map(|v| v.map(f64::from)))
            }
            "FLOAT8" => decode_float(row.try_get::<Option<f64>, _>(index)),
            "BOOL" => row
                .try_get::<Option<bool>, _>(index)
                .map(|v| v.map_or(Value::Null, Value::Bool))
                .unwrap_or(Value::Null),
            "TIMESTAMPTZ" => row
                .try_get::<Option<DateTime<Utc>>, _>(index)
                .map(|v| v.map_or(Value::Null, |dt| Value::String(dt.to_rfc3339())))
                .unwrap_or(Value::Null),
            "TIMESTAMP" => row
                .try_get::<Option<NaiveDateTime>, _>(index)
                .map(|v| v.map_or(Value::Null, |dt| Value::String(dt.to_string())))
                .unwrap_or(Value::Null),
            "DATE" => row
                .try_get::<Option<NaiveDate>, _>(index)
                .map(|v| v.map_or(Value::Null, |d| Value::String(d.to_string())))
                .unwrap_or(Value::Null),
            "JSON" | "JSONB" => row
                .try_get::<Option<Value>, _>(index)
                .map(|v| v.unwrap_or(Value::Null))
                .unwrap_or(Value::Null),
            other => {
                tracing::debug!(column = column.name(), r#type = other, "undecoded column type");
                Value::Null
            }
        };

        map.insert(column.name().to_string(), value);
    }

    map
}

fn decode_int(value: std::result::Result<Option<i64>, sqlx::Error>) -> Value {
    value.map(|v| v.map_or(Value::Null, Value::from)).unwrap_or(Value::Null)
}

fn decode_float(value: std::result::Result<Option<f64>, sqlx::Error>) -> Value {
    value
        .map(|v| {
            v.and_then(|f| serde_json::Number::from_f64(f).map(Value::Number))
                .unwrap_or(Value::Null)
        })
        .unwrap_or(Value::Null)
}
