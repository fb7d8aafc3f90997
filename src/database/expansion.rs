// ABOUTME: Array parameter expansion into one scalar placeholder per element
// ABOUTME: Rewrites SQL text and the parameter mapping before any value is bound
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use super::names::PlaceholderNames;
use super::placeholders::{named_placeholders, replace_named};
use crate::errors::{DatabaseError, DatabaseResult, ParamError};
use sqlite_exec_core::constants::{database::MAX_NAME_ATTEMPTS, keys};
use sqlite_exec_core::params::{ParamKey, ParamKind, Params};
use std::collections::HashSet;
use tracing::debug;

/// SQL text and parameters after array expansion
#[derive(Debug, Clone, PartialEq)]
pub struct ExpandedStatement {
    /// Rewritten SQL
    pub sql: String,
    /// Scalar-only parameter mapping
    pub params: Params,
}

/// Expand every array-prefixed parameter (`as`, `ai`, `ad`, `af`)
///
/// For `ai-ids = [4, 5]` and `... IN (:ids)` this yields `... IN (:ids_1,:ids_2)`
/// with `i-ids_1 = 4`, `i-ids_2 = 5`, and drops `ai-ids`. A scalar under an
/// array prefix expands to one placeholder; an empty list to none. Arrays are
/// expanded in insertion order and elements keep their order.
///
/// # Errors
///
/// - `ParamError::NestedList` when an element is itself a list
/// - a binding error when no fresh placeholder name can be generated
pub fn expand_arrays(
    sql: &str,
    mut params: Params,
    names: &mut dyn PlaceholderNames,
) -> DatabaseResult<ExpandedStatement> {
    names.reset();

    let arrays: Vec<(String, ParamKey)> = params
        .keys()
        .filter_map(|raw| {
            ParamKey::parse(raw)
                .ok()
                .filter(ParamKey::is_array)
                .map(|key| (raw.to_owned(), key))
        })
        .collect();

    if arrays.is_empty() {
        return Ok(ExpandedStatement {
            sql: sql.to_owned(),
            params,
        });
    }

    let mut taken: HashSet<String> = named_placeholders(sql)
        .into_iter()
        .map(str::to_owned)
        .chain(
            params
                .keys()
                .filter_map(|raw| ParamKey::parse(raw).ok().map(|key| key.name)),
        )
        .collect();

    let mut sql = sql.to_owned();
    for (raw, key) in arrays {
        let Some(value) = params.remove(&raw) else {
            continue;
        };
        let element_kind = key
            .kind
            .map_or(ParamKind::Str, |kind| ParamKind::from(kind.scalar()));

        let elements = value.into_elements();
        let mut placeholders = Vec::with_capacity(elements.len());
        for element in elements {
            if element.is_list() {
                return Err(ParamError::NestedList { name: key.name }.into());
            }
            let generated = fresh_name(&key.name, names, &mut taken, &sql)?;
            placeholders.push(format!("{}{generated}", keys::PLACEHOLDER_SIGIL));
            params.insert(ParamKey::new(element_kind, generated).to_string(), element);
        }

        debug!(
            param = %raw,
            elements = placeholders.len(),
            "Expanded array parameter"
        );
        sql = replace_named(&sql, &key.name, &placeholders.join(","));
    }

    Ok(ExpandedStatement { sql, params })
}

fn fresh_name(
    base: &str,
    names: &mut dyn PlaceholderNames,
    taken: &mut HashSet<String>,
    sql: &str,
) -> DatabaseResult<String> {
    for _ in 0..MAX_NAME_ATTEMPTS {
        let candidate = format!(
            "{base}{}{}",
            keys::GENERATED_NAME_SEPARATOR,
            names.next_token()
        );
        if taken.insert(candidate.clone()) {
            return Ok(candidate);
        }
    }
    Err(DatabaseError::binding(
        base,
        "could not generate a unique placeholder name",
        sql,
    ))
}
