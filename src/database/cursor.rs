// ABOUTME: Row cursor over a statement that produces rows, borrowing the connection
// ABOUTME: Pulls the first row on open so execution errors surface before iteration
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use super::rows::{row_to_map, Row};
use crate::errors::{execution_error, DatabaseResult};
use async_stream::stream;
use futures_util::stream::{BoxStream, StreamExt};
use sqlite_exec_core::statement::ResultShape;
use sqlx::sqlite::{SqliteArguments, SqliteConnection, SqliteRow};
use std::fmt;
use tracing::debug;

/// Rows of an executed statement
///
/// The cursor holds the executor's connection mutably for `'c`, so no other
/// statement can run until it is drained, closed or dropped.
pub struct RowCursor<'c> {
    rows: BoxStream<'c, Result<SqliteRow, sqlx::Error>>,
    peeked: Option<SqliteRow>,
    sql: String,
    rows_read: u64,
}

impl<'c> RowCursor<'c> {
    /// Execute `query` and buffer its first row
    ///
    /// `sql` is the statement as the caller sees it, used in errors and logs;
    /// `query` is the compiled text handed to the driver.
    pub(crate) async fn open(
        conn: &'c mut SqliteConnection,
        query: String,
        sql: String,
        arguments: SqliteArguments<'static>,
    ) -> DatabaseResult<Self> {
        let mut rows: BoxStream<'c, Result<SqliteRow, sqlx::Error>> = Box::pin(stream! {
            let mut fetched = sqlx::query_with(&query, arguments).fetch(conn);
            while let Some(row) = fetched.next().await {
                yield row;
            }
        });

        let peeked = rows
            .next()
            .await
            .transpose()
            .map_err(|e| execution_error(e, ResultShape::Rows, &sql))?;

        Ok(Self {
            rows,
            peeked,
            sql,
            rows_read: 0,
        })
    }

    /// Next driver row
    ///
    /// # Errors
    ///
    /// Returns an execution error if the driver fails mid-iteration
    pub async fn next_raw(&mut self) -> DatabaseResult<Option<SqliteRow>> {
        let row = match self.peeked.take() {
            Some(row) => Some(row),
            None => self
                .rows
                .next()
                .await
                .transpose()
                .map_err(|e| execution_error(e, ResultShape::Rows, &self.sql))?,
        };
        if row.is_some() {
            self.rows_read += 1;
        }
        Ok(row)
    }

    /// Next row as a column map, `None` once exhausted
    ///
    /// # Errors
    ///
    /// Returns an execution error if the driver fails, or a decode error if a
    /// value cannot be read
    pub async fn next_row(&mut self) -> DatabaseResult<Option<Row>> {
        self.next_raw()
            .await?
            .as_ref()
            .map(row_to_map)
            .transpose()
    }

    /// Drain the remaining rows
    ///
    /// # Errors
    ///
    /// Same as [`RowCursor::next_row`]
    pub async fn fetch_all(mut self) -> DatabaseResult<Vec<Row>> {
        let mut rows = Vec::new();
        while let Some(row) = self.next_row().await? {
            rows.push(row);
        }
        debug!(rows = rows.len(), "Fetched all rows");
        Ok(rows)
    }

    /// Stop iterating and release the connection
    pub fn close(self) {
        debug!(rows_read = self.rows_read, "Closed row cursor");
    }

    /// Statement text as sent to the driver
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Rows handed out so far
    #[must_use]
    pub const fn rows_read(&self) -> u64 {
        self.rows_read
    }
}

impl fmt::Debug for RowCursor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowCursor")
            .field("sql", &self.sql)
            .field("rows_read", &self.rows_read)
            .field("peeked", &self.peeked.is_some())
            .finish_non_exhaustive()
    }
}
