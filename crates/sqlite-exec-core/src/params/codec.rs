// ABOUTME: Parameter codec turning (key, value) pairs into typed bound parameters
// ABOUTME: Infers storage type from the key prefix and coerces values accordingly
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use super::{ParamKey, ParamValue, ScalarKind};
use crate::constants::booleans;
use crate::errors::ParamError;
use serde::Serialize;

/// How a value is handed to the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageType {
    /// Text
    String,
    /// 64-bit integer
    Integer,
    /// Boolean
    Boolean,
    /// SQL NULL
    Null,
}

/// A value ready to bind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BoundValue {
    /// SQL NULL
    Null,
    /// Text
    Text(String),
    /// 64-bit integer
    Integer(i64),
    /// Boolean
    Boolean(bool),
}

/// A decoded parameter: placeholder name, storage type and value
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BoundParameter {
    /// Placeholder name without the `:` sigil
    pub name: String,
    /// Storage type chosen by the codec
    pub storage: StorageType,
    /// Value to bind
    pub value: BoundValue,
}

impl BoundParameter {
    fn text(name: &str, text: String) -> Self {
        Self {
            name: name.to_owned(),
            storage: StorageType::String,
            value: BoundValue::Text(text),
        }
    }
}

/// Decode a raw `[prefix-]name` key and its value
///
/// # Errors
///
/// Returns a `ParamError` if the key is malformed or the value does not fit
/// its declared kind
pub fn decode(key: &str, value: &ParamValue) -> Result<BoundParameter, ParamError> {
    decode_key(&ParamKey::parse(key)?, value)
}

/// Decode an already parsed key and its value
///
/// Array kinds decode their value as a single element of the element kind;
/// expansion into several placeholders happens before this step.
///
/// # Errors
///
/// - `ParamError::UnexpectedList` when a list reaches the codec
/// - `ParamError::InvalidBoolean` when a `b` value is not a recognized literal
pub fn decode_key(key: &ParamKey, value: &ParamValue) -> Result<BoundParameter, ParamError> {
    let name = key.name.as_str();

    if let ParamValue::List(_) = value {
        return Err(ParamError::UnexpectedList {
            name: name.to_owned(),
        });
    }

    let Some(kind) = key.kind else {
        // untyped keys pass through as text, a null stays null
        return Ok(BoundParameter {
            name: name.to_owned(),
            storage: StorageType::String,
            value: value.to_text().map_or(BoundValue::Null, BoundValue::Text),
        });
    };

    let Some(text) = value.to_text() else {
        return Ok(BoundParameter {
            name: name.to_owned(),
            storage: StorageType::Null,
            value: BoundValue::Null,
        });
    };

    match kind.scalar() {
        ScalarKind::Date | ScalarKind::Str | ScalarKind::Float => {
            Ok(BoundParameter::text(name, text))
        }
        ScalarKind::Int => Ok(decode_integer(name, value, text)),
        ScalarKind::Bool => decode_boolean(name, value, &text),
    }
}

fn decode_integer(name: &str, value: &ParamValue, text: String) -> BoundParameter {
    let integer = |n: i64| BoundParameter {
        name: name.to_owned(),
        storage: StorageType::Integer,
        value: BoundValue::Integer(n),
    };

    match value {
        ParamValue::Bool(b) => integer(i64::from(*b)),
        ParamValue::Integer(n) => {
            i64::try_from(*n).map_or_else(|_| BoundParameter::text(name, text), integer)
        }
        ParamValue::Float(f) if is_integral_i64(*f) => integer(*f as i64),
        ParamValue::Text(s) => match s.trim().parse::<i128>().map(i64::try_from) {
            Ok(Ok(n)) => integer(n),
            _ => BoundParameter::text(name, text),
        },
        _ => BoundParameter::text(name, text),
    }
}

/// Finite, no fractional part, and inside `[i64::MIN, i64::MAX]`
fn is_integral_i64(f: f64) -> bool {
    // 2^63 is exactly representable; i64::MAX is not
    const LIMIT: f64 = 9_223_372_036_854_775_808.0;
    f.is_finite() && f.fract() == 0.0 && (-LIMIT..LIMIT).contains(&f)
}

fn decode_boolean(
    name: &str,
    value: &ParamValue,
    text: &str,
) -> Result<BoundParameter, ParamError> {
    let parsed = match value {
        ParamValue::Bool(b) => Some(*b),
        ParamValue::Integer(0) => Some(false),
        ParamValue::Integer(1) => Some(true),
        ParamValue::Float(f) if f.abs() < f64::EPSILON => Some(false),
        ParamValue::Float(f) if (*f - 1.0).abs() < f64::EPSILON => Some(true),
        ParamValue::Text(s) => parse_boolean_literal(s),
        _ => None,
    };

    parsed
        .map(|b| BoundParameter {
            name: name.to_owned(),
            storage: StorageType::Boolean,
            value: BoundValue::Boolean(b),
        })
        .ok_or_else(|| ParamError::InvalidBoolean {
            name: name.to_owned(),
            value: text.to_owned(),
        })
}

fn parse_boolean_literal(raw: &str) -> Option<bool> {
    let normalized = raw.trim().to_lowercase();
    if booleans::TRUE_LITERALS.contains(&normalized.as_str()) {
        Some(true)
    } else if booleans::FALSE_LITERALS.contains(&normalized.as_str()) {
        Some(false)
    } else {
        None
    }
}
