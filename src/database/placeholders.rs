// ABOUTME: Named placeholder scanning and rewriting for SQL text
// ABOUTME: Finds `:name` markers outside literals and comments, expands them and compiles to `?NNN`
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

//! Named placeholders
//!
//! `sqlx`'s `SQLite` binder only understands numbered parameters, so SQL written
//! with `:name` placeholders is compiled to `?1`, `?2`, … before it is
//! prepared. The scanner skips string literals, quoted identifiers and
//! comments, and treats `::` as text.

use crate::errors::{DatabaseError, DatabaseResult};
use sqlite_exec_core::constants::keys::PLACEHOLDER_SIGIL;

/// A piece of scanned SQL
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Verbatim SQL text
    Text(&'a str),
    /// A `:name` placeholder, holding the name without the sigil
    Named(&'a str),
    /// A `?` or `?NNN` placeholder, holding the full token
    Positional(&'a str),
}

/// SQL with named placeholders replaced by numbered ones
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledSql {
    /// SQL text handed to the driver
    pub sql: String,
    /// Placeholder names; the name at index `i` binds to `?{i + 1}`
    pub names: Vec<String>,
}

const fn is_name_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Split SQL into text and placeholder segments
#[must_use]
pub fn scan(sql: &str) -> Vec<Segment<'_>> {
    let bytes = sql.as_bytes();
    let mut segments = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        let next = bytes.get(i + 1).copied();
        match bytes[i] {
            quote @ (b'\'' | b'"' | b'`') => i = skip_past(bytes, i + 1, quote),
            b'[' => i = skip_past(bytes, i + 1, b']'),
            b'-' if next == Some(b'-') => i = skip_past(bytes, i + 2, b'\n'),
            b'/' if next == Some(b'*') => i = skip_block_comment(bytes, i + 2),
            b':' if next == Some(b':') => i += 2,
            b':' if next.is_some_and(is_name_byte) => {
                let end = run_end(bytes, i + 1, is_name_byte);
                if text_start < i {
                    segments.push(Segment::Text(&sql[text_start..i]));
                }
                segments.push(Segment::Named(&sql[i + 1..end]));
                i = end;
                text_start = end;
            }
            b'?' => {
                let end = run_end(bytes, i + 1, |b| b.is_ascii_digit());
                if text_start < i {
                    segments.push(Segment::Text(&sql[text_start..i]));
                }
                segments.push(Segment::Positional(&sql[i..end]));
                i = end;
                text_start = end;
            }
            _ => i += 1,
        }
    }

    if text_start < bytes.len() {
        segments.push(Segment::Text(&sql[text_start..]));
    }
    segments
}

fn skip_past(bytes: &[u8], from: usize, close: u8) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| rest.iter().position(|&b| b == close))
        .map_or(bytes.len(), |offset| from + offset + 1)
}

fn skip_block_comment(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| rest.windows(2).position(|pair| pair == b"*/"))
        .map_or(bytes.len(), |offset| from + offset + 2)
}

fn run_end(bytes: &[u8], from: usize, accept: impl Fn(u8) -> bool) -> usize {
    bytes
        .get(from..)
        .and_then(|rest| rest.iter().position(|&b| !accept(b)))
        .map_or(bytes.len(), |offset| from + offset)
}

/// Distinct placeholder names in order of first appearance
#[must_use]
pub fn named_placeholders(sql: &str) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for segment in scan(sql) {
        if let Segment::Named(name) = segment {
            if !names.contains(&name) {
                names.push(name);
            }
        }
    }
    names
}

/// Replace every `:name` placeholder with `replacement`
///
/// Matching is by whole placeholder, so replacing `ids` leaves `:ids2` alone.
#[must_use]
pub fn replace_named(sql: &str, name: &str, replacement: &str) -> String {
    let mut out = String::with_capacity(sql.len() + replacement.len());
    for segment in scan(sql) {
        match segment {
            Segment::Named(found) if found == name => out.push_str(replacement),
            Segment::Named(found) => {
                out.push(PLACEHOLDER_SIGIL);
                out.push_str(found);
            }
            Segment::Text(text) | Segment::Positional(text) => out.push_str(text),
        }
    }
    out
}

/// Compile named placeholders to numbered `?NNN` parameters
///
/// Each distinct name gets one number; repeated occurrences share it.
///
/// # Errors
///
/// Returns a binding error if the SQL also contains `?` placeholders, whose
/// numbering would collide with the compiled ones
pub fn compile(sql: &str) -> DatabaseResult<CompiledSql> {
    let mut out = String::with_capacity(sql.len());
    let mut names: Vec<String> = Vec::new();

    for segment in scan(sql) {
        match segment {
            Segment::Text(text) => out.push_str(text),
            Segment::Named(name) => {
                let index = names.iter().position(|n| n == name).unwrap_or_else(|| {
                    names.push(name.to_owned());
                    names.len() - 1
                });
                out.push('?');
                out.push_str(&(index + 1).to_string());
            }
            Segment::Positional(token) => {
                return Err(DatabaseError::binding(
                    token,
                    "positional placeholders cannot be mixed with named parameters",
                    sql,
                ));
            }
        }
    }

    Ok(CompiledSql { sql: out, names })
}
