// ABOUTME: Core types for the sqlite-exec statement helper
// ABOUTME: Foundation crate with the parameter codec, statement classifier and error types
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

#![deny(unsafe_code)]

//! # sqlite-exec core
//!
//! Driver-independent pieces of the statement helper. Nothing in this crate
//! talks to a database; it only decides how caller-supplied parameters are
//! typed and what shape of result a statement produces.
//!
//! ## Modules
//!
//! - **errors**: `AppError`, `ErrorCode` and the domain errors `DatabaseError` / `ParamError`
//! - **params**: prefixed parameter keys, caller values and the decoding codec
//! - **statement**: leading-keyword classification into a `ResultShape`
//! - **constants**: prefix codes, environment variable names and defaults

/// Unified error handling with standard error codes
pub mod errors;

/// Prefixed parameter keys, values and the decoding codec
pub mod params;

/// Statement classification by leading keyword
pub mod statement;

/// Prefix codes, environment variable names and defaults
pub mod constants;
