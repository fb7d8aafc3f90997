// ABOUTME: Conversion of SQLite result rows into JSON objects keyed by column name
// ABOUTME: Follows each value's runtime storage class; BLOBs are base64 encoded
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use crate::errors::{DatabaseError, DatabaseResult};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Number, Value};
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, Row as _, TypeInfo, ValueRef};

/// One result row, columns in select-list order
pub type Row = Map<String, Value>;

/// Convert a driver row into a [`Row`]
///
/// `SQLite` columns are dynamically typed, so each value is decoded by the
/// storage class it actually has rather than the declared column type.
/// Non-finite reals become `null`.
///
/// # Errors
///
/// Returns a decode error when a value cannot be read as its reported class
pub fn row_to_map(row: &SqliteRow) -> DatabaseResult<Row> {
    let mut map = Map::with_capacity(row.columns().len());
    for column in row.columns() {
        let name = column.name();
        let value = column_value(row, column.ordinal(), name)?;
        map.insert(name.to_owned(), value);
    }
    Ok(map)
}

fn column_value(row: &SqliteRow, index: usize, name: &str) -> DatabaseResult<Value> {
    let decode_err = |e: sqlx::Error| DatabaseError::Decode {
        column: name.to_owned(),
        message: e.to_string(),
    };

    let raw = row.try_get_raw(index).map_err(decode_err)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }
    let class = raw.type_info().name().to_ascii_uppercase();

    let value = match class.as_str() {
        "INTEGER" | "BOOLEAN" => {
            Value::from(row.try_get_unchecked::<i64, _>(index).map_err(decode_err)?)
        }
        "REAL" | "NUMERIC" => {
            let real = row.try_get_unchecked::<f64, _>(index).map_err(decode_err)?;
            Number::from_f64(real).map_or(Value::Null, Value::Number)
        }
        "BLOB" => {
            let bytes = row
                .try_get_unchecked::<Vec<u8>, _>(index)
                .map_err(decode_err)?;
            Value::String(STANDARD.encode(bytes))
        }
        _ => Value::String(
            row.try_get_unchecked::<String, _>(index)
                .map_err(decode_err)?,
        ),
    };
    Ok(value)
}
