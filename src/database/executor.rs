// ABOUTME: Statement executor over a single lazily opened SQLite connection
// ABOUTME: Expands, classifies, binds and executes statements and shapes their results
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

use super::cursor::RowCursor;
use super::expansion::expand_arrays;
use super::names::{PlaceholderNames, SequentialNames};
use super::placeholders::{compile, CompiledSql};
use super::rows::Row;
use crate::config::DatabaseConfig;
use crate::errors::{connection_error, execution_error, DatabaseError, DatabaseResult};
use serde::ser::{Serialize, SerializeMap, Serializer};
use sqlite_exec_core::constants::database::MEMORY_URL;
use sqlite_exec_core::params::{decode, BoundParameter, BoundValue, Params};
use sqlite_exec_core::statement::{classify, leading_keyword, ResultShape};
use sqlx::sqlite::{SqliteArguments, SqliteConnectOptions, SqliteConnection};
use sqlx::{Arguments, ConnectOptions, Connection};
use std::borrow::Cow;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Result of [`SqlExecutor::open`]
#[derive(Debug)]
pub enum QueryOutcome<'c> {
    /// Cursor over the produced rows
    Rows(RowCursor<'c>),
    /// Rows changed by an `UPDATE`-family statement
    RowCount(u64),
    /// Rowid of the last inserted row after an `INSERT`-family statement
    LastInsertId(i64),
    /// Statement produces nothing
    Empty,
}

impl<'c> QueryOutcome<'c> {
    /// Shape this outcome was built for
    #[must_use]
    pub const fn shape(&self) -> ResultShape {
        match self {
            Self::Rows(_) => ResultShape::Rows,
            Self::RowCount(_) => ResultShape::RowCount,
            Self::LastInsertId(_) => ResultShape::InsertedId,
            Self::Empty => ResultShape::NoReturn,
        }
    }

    /// The cursor, if this is a row-producing outcome
    #[must_use]
    pub fn into_cursor(self) -> Option<RowCursor<'c>> {
        match self {
            Self::Rows(cursor) => Some(cursor),
            _ => None,
        }
    }

    /// Materialize into an owned [`ExecOutput`], draining any cursor
    ///
    /// # Errors
    ///
    /// Returns an error if reading the remaining rows fails
    pub async fn materialize(self) -> DatabaseResult<ExecOutput> {
        Ok(match self {
            Self::Rows(cursor) => ExecOutput::Rows(cursor.fetch_all().await?),
            Self::RowCount(count) => ExecOutput::RowCount(count),
            Self::LastInsertId(id) => ExecOutput::LastInsertId(id),
            Self::Empty => ExecOutput::Empty,
        })
    }
}

/// Owned result of [`SqlExecutor::exec`]
///
/// Serializes as `{"rows": [...]}`, `{"rowCount": n}`, `{"lastInsertId": n}`
/// or `{}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutput {
    /// All produced rows
    Rows(Vec<Row>),
    /// Rows changed
    RowCount(u64),
    /// Rowid of the last inserted row
    LastInsertId(i64),
    /// Nothing
    Empty,
}

impl Serialize for ExecOutput {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        match self {
            Self::Rows(rows) => map.serialize_entry("rows", rows)?,
            Self::RowCount(count) => map.serialize_entry("rowCount", count)?,
            Self::LastInsertId(id) => map.serialize_entry("lastInsertId", id)?,
            Self::Empty => {}
        }
        map.end()
    }
}

impl ExecOutput {
    /// Rows, if this is a row-producing result
    #[must_use]
    pub fn rows(&self) -> Option<&[Row]> {
        match self {
            Self::Rows(rows) => Some(rows),
            _ => None,
        }
    }

    /// Affected-row count, if any
    #[must_use]
    pub const fn row_count(&self) -> Option<u64> {
        match self {
            Self::RowCount(count) => Some(*count),
            _ => None,
        }
    }

    /// Last inserted rowid, if any
    #[must_use]
    pub const fn last_insert_id(&self) -> Option<i64> {
        match self {
            Self::LastInsertId(id) => Some(*id),
            _ => None,
        }
    }
}

/// Executes statements with prefix-typed named parameters on one connection
///
/// The connection opens on first use and is reused until [`SqlExecutor::close`].
/// There is no internal concurrency: every operation takes `&mut self`, and a
/// [`RowCursor`] returned by [`SqlExecutor::open`] keeps the executor borrowed
/// until it is dropped.
pub struct SqlExecutor {
    config: DatabaseConfig,
    conn: Option<SqliteConnection>,
    names: Box<dyn PlaceholderNames>,
    // Cleared by the connection's rollback hook, so implicit rollbacks are seen too
    in_transaction: Arc<AtomicBool>,
}

impl SqlExecutor {
    /// Executor generating sequential placeholder names
    #[must_use]
    pub fn new(config: DatabaseConfig) -> Self {
        Self::with_names(config, SequentialNames::new())
    }

    /// Executor with a custom placeholder name source
    #[must_use]
    pub fn with_names(config: DatabaseConfig, names: impl PlaceholderNames + 'static) -> Self {
        Self {
            config,
            conn: None,
            names: Box::new(names),
            in_transaction: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Connection configuration
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Whether a connection is open
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.conn.is_some()
    }

    /// Whether a transaction started through this executor is open
    ///
    /// Becomes `false` after `commit`, `rollback`, or any rollback `SQLite`
    /// performs on its own (`ON CONFLICT ROLLBACK`, `RAISE(ROLLBACK, ...)`).
    #[must_use]
    pub fn in_transaction(&self) -> bool {
        self.in_transaction.load(Ordering::Acquire)
    }

    fn set_in_transaction(&self, active: bool) {
        self.in_transaction.store(active, Ordering::Release);
    }

    fn connect_options(&self) -> DatabaseResult<SqliteConnectOptions> {
        let options = match &self.config.path {
            None => SqliteConnectOptions::from_str(MEMORY_URL)
                .map_err(|e| connection_error(e, MEMORY_URL))?,
            Some(path) => SqliteConnectOptions::new().filename(path),
        };
        let options = options
            .create_if_missing(self.config.create_if_missing)
            .busy_timeout(self.config.busy_timeout());

        Ok(match self.config.charset {
            Some(charset) => options.pragma("encoding", Cow::Borrowed(charset.pragma_value())),
            None => options,
        })
    }

    /// Open the connection if it is not open yet
    ///
    /// # Errors
    ///
    /// Returns a connection error if the database cannot be opened
    pub async fn connect(&mut self) -> DatabaseResult<()> {
        if self.conn.is_some() {
            return Ok(());
        }

        let target = self.config.connection_string();
        let mut conn = self
            .connect_options()?
            .connect()
            .await
            .map_err(|e| connection_error(e, &target))?;

        let flag = Arc::clone(&self.in_transaction);
        conn.lock_handle()
            .await
            .map_err(|e| connection_error(e, &target))?
            .set_rollback_hook(move || {
                if flag.swap(false, Ordering::AcqRel) {
                    debug!("Rollback hook cleared transaction state");
                }
            });

        info!(
            database = %target,
            charset = ?self.config.charset,
            "Opened SQLite connection"
        );
        self.conn = Some(conn);
        self.set_in_transaction(false);
        Ok(())
    }

    fn connection(&mut self) -> DatabaseResult<&mut SqliteConnection> {
        self.conn
            .as_mut()
            .ok_or_else(|| DatabaseError::connection("connection is not open"))
    }

    /// Execute a statement and shape its result by its leading keyword
    ///
    /// Steps, each of which may fail: connect if needed, expand array
    /// parameters, classify, decode parameters, bind, execute.
    ///
    /// # Errors
    ///
    /// - connection error if the database cannot be opened
    /// - unrecognized statement error, raised before anything is sent to the driver
    /// - parameter or binding error if a value cannot be decoded or bound
    /// - execution error carrying the driver code, message, shape and SQL
    #[instrument(skip(self, params), level = "debug")]
    pub async fn open(
        &mut self,
        sql: &str,
        params: impl Into<Params> + Send,
    ) -> DatabaseResult<QueryOutcome<'_>> {
        self.connect().await?;

        let expanded = expand_arrays(sql, params.into(), self.names.as_mut())?;
        let sql = expanded.sql;

        let shape = classify(&sql);
        if !shape.is_recognized() {
            return Err(DatabaseError::UnrecognizedStatement {
                keyword: leading_keyword(&sql).map(str::to_owned),
                sql,
            });
        }
        debug!(%shape, "Classified statement");

        let mut bound: HashMap<String, BoundParameter> =
            HashMap::with_capacity(expanded.params.len());
        for (key, value) in expanded.params.iter() {
            let parameter = decode(key, value)?;
            if let Some(previous) = bound.insert(parameter.name.clone(), parameter) {
                debug!(
                    name = %previous.name,
                    key,
                    "Parameter name supplied more than once, last value wins"
                );
            }
        }

        let compiled = compile(&sql)?;
        check_unused(&compiled, &bound, self.config.reject_unused_params, &sql)?;
        let arguments = bind_arguments(&compiled, &bound, &sql)?;

        let conn = self.connection()?;
        let outcome = match shape {
            ResultShape::Rows => {
                QueryOutcome::Rows(RowCursor::open(conn, compiled.sql, sql, arguments).await?)
            }
            ResultShape::RowCount => {
                let result = sqlx::query_with(&compiled.sql, arguments)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| execution_error(e, shape, &sql))?;
                QueryOutcome::RowCount(result.rows_affected())
            }
            ResultShape::InsertedId => {
                let result = sqlx::query_with(&compiled.sql, arguments)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| execution_error(e, shape, &sql))?;
                QueryOutcome::LastInsertId(result.last_insert_rowid())
            }
            ResultShape::NoReturn | ResultShape::Unrecognized => {
                sqlx::query_with(&compiled.sql, arguments)
                    .execute(&mut *conn)
                    .await
                    .map_err(|e| execution_error(e, shape, &sql))?;
                QueryOutcome::Empty
            }
        };

        debug!(%shape, "Executed statement");
        Ok(outcome)
    }

    /// Execute a statement and materialize its result
    ///
    /// Row-producing statements return every row; other shapes pass through.
    ///
    /// # Errors
    ///
    /// Same as [`SqlExecutor::open`], plus failures while reading rows
    pub async fn exec(
        &mut self,
        sql: &str,
        params: impl Into<Params> + Send,
    ) -> DatabaseResult<ExecOutput> {
        self.open(sql, params).await?.materialize().await
    }

    /// First row of a statement, `None` if it produced none
    ///
    /// # Errors
    ///
    /// Same as [`SqlExecutor::open`]; a statement that does not produce rows
    /// yields `None`
    pub async fn fetch_one(
        &mut self,
        sql: &str,
        params: impl Into<Params> + Send,
    ) -> DatabaseResult<Option<Row>> {
        match self.open(sql, params).await? {
            QueryOutcome::Rows(mut cursor) => cursor.next_row().await,
            _ => Ok(None),
        }
    }

    /// All rows of a statement; empty for statements that do not produce rows
    ///
    /// # Errors
    ///
    /// Same as [`SqlExecutor::open`]
    pub async fn fetch_all(
        &mut self,
        sql: &str,
        params: impl Into<Params> + Send,
    ) -> DatabaseResult<Vec<Row>> {
        match self.open(sql, params).await? {
            QueryOutcome::Rows(cursor) => cursor.fetch_all().await,
            _ => Ok(Vec::new()),
        }
    }

    /// Start a transaction, connecting first if needed
    ///
    /// # Errors
    ///
    /// Returns a connection error if the database cannot be opened, or an
    /// execution error if a transaction is already active
    pub async fn begin_transaction(&mut self) -> DatabaseResult<()> {
        self.connect().await?;
        self.run_control("BEGIN").await?;
        self.set_in_transaction(true);
        info!("Transaction started");
        Ok(())
    }

    /// Commit the active transaction
    ///
    /// # Errors
    ///
    /// Returns a connection error if no connection is open, or an execution
    /// error if no transaction is active
    pub async fn commit(&mut self) -> DatabaseResult<()> {
        self.run_control("COMMIT").await?;
        self.set_in_transaction(false);
        info!("Transaction committed");
        Ok(())
    }

    /// Roll back the active transaction
    ///
    /// # Errors
    ///
    /// Returns a connection error if no connection is open, or an execution
    /// error if no transaction is active
    pub async fn rollback(&mut self) -> DatabaseResult<()> {
        self.run_control("ROLLBACK").await?;
        self.set_in_transaction(false);
        info!("Transaction rolled back");
        Ok(())
    }

    async fn run_control(&mut self, statement: &str) -> DatabaseResult<()> {
        let conn = self.connection()?;
        sqlx::query(statement)
            .execute(&mut *conn)
            .await
            .map_err(|e| execution_error(e, ResultShape::NoReturn, statement))?;
        Ok(())
    }

    /// Close the connection; the next operation reconnects
    ///
    /// An open transaction is rolled back by `SQLite` when the connection closes.
    ///
    /// # Errors
    ///
    /// Returns a driver error if the connection does not shut down cleanly
    pub async fn close(&mut self) -> DatabaseResult<()> {
        let Some(conn) = self.conn.take() else {
            return Ok(());
        };
        if self.in_transaction.swap(false, Ordering::AcqRel) {
            warn!("Closing connection with an open transaction");
        }
        conn.close().await.map_err(crate::errors::driver_error)?;
        info!("Closed SQLite connection");
        Ok(())
    }
}

impl std::fmt::Debug for SqlExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqlExecutor")
            .field("config", &self.config)
            .field("connected", &self.conn.is_some())
            .field("in_transaction", &self.in_transaction())
            .finish_non_exhaustive()
    }
}

fn check_unused(
    compiled: &CompiledSql,
    bound: &HashMap<String, BoundParameter>,
    reject: bool,
    sql: &str,
) -> DatabaseResult<()> {
    let mut unused: Vec<&str> = bound
        .keys()
        .filter(|name| !compiled.names.contains(*name))
        .map(String::as_str)
        .collect();
    if unused.is_empty() {
        return Ok(());
    }
    unused.sort_unstable();

    if reject {
        return Err(DatabaseError::binding(
            unused.join(", "),
            "parameter is not referenced by the statement",
            sql,
        ));
    }
    debug!(unused = ?unused, "Ignoring parameters the statement does not reference");
    Ok(())
}

fn bind_arguments(
    compiled: &CompiledSql,
    bound: &HashMap<String, BoundParameter>,
    sql: &str,
) -> DatabaseResult<SqliteArguments<'static>> {
    let mut arguments = SqliteArguments::default();
    for name in &compiled.names {
        let parameter = bound
            .get(name)
            .ok_or_else(|| DatabaseError::binding(name, "no value supplied", sql))?;

        let added = match &parameter.value {
            BoundValue::Null => arguments.add(None::<String>),
            BoundValue::Text(text) => arguments.add(text.clone()),
            BoundValue::Integer(n) => arguments.add(*n),
            BoundValue::Boolean(b) => arguments.add(*b),
        };
        added.map_err(|e| DatabaseError::binding(name, e.to_string(), sql))?;
    }
    Ok(arguments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlite_exec_core::params::StorageType;

    fn bound_map(entries: &[(&str, &str)]) -> HashMap<String, BoundParameter> {
        entries
            .iter()
            .map(|(key, value)| {
                let parameter = decode(key, &(*value).into()).unwrap();
                (parameter.name.clone(), parameter)
            })
            .collect()
    }

    #[test]
    fn test_exec_output_serializes_camel_case() {
        assert_eq!(
            serde_json::to_string(&ExecOutput::RowCount(3)).unwrap(),
            r#"{"rowCount":3}"#
        );
        assert_eq!(
            serde_json::to_string(&ExecOutput::LastInsertId(7)).unwrap(),
            r#"{"lastInsertId":7}"#
        );
        assert_eq!(serde_json::to_string(&ExecOutput::Empty).unwrap(), "{}");
        assert_eq!(
            serde_json::to_string(&ExecOutput::Rows(Vec::new())).unwrap(),
            r#"{"rows":[]}"#
        );
    }

    #[test]
    fn test_missing_value_is_binding_error() {
        let compiled = compile("SELECT :a, :b").unwrap();
        let bound = bound_map(&[("s-a", "x")]);
        let err = bind_arguments(&compiled, &bound, "SELECT :a, :b").unwrap_err();
        assert!(matches!(err, DatabaseError::Binding { placeholder, .. } if placeholder == "b"));
    }

    #[test]
    fn test_unused_policy() {
        let compiled = compile("SELECT :a").unwrap();
        let bound = bound_map(&[("s-a", "x"), ("i-extra", "1")]);
        assert_eq!(bound["extra"].storage, StorageType::Integer);
        assert!(check_unused(&compiled, &bound, false, "SELECT :a").is_ok());
        let err = check_unused(&compiled, &bound, true, "SELECT :a").unwrap_err();
        assert!(matches!(err, DatabaseError::Binding { placeholder, .. } if placeholder == "extra"));
    }

    #[tokio::test]
    async fn test_lazy_connect_on_first_statement() {
        let mut executor = SqlExecutor::new(DatabaseConfig::memory());
        assert!(!executor.is_connected());
        let output = executor.exec("SELECT 1 AS one", Params::new()).await.unwrap();
        assert!(executor.is_connected());
        assert_eq!(output.rows().map(<[Row]>::len), Some(1));
    }

    #[tokio::test]
    async fn test_commit_without_connection_is_connection_error() {
        let mut executor = SqlExecutor::new(DatabaseConfig::memory());
        let err = executor.commit().await.unwrap_err();
        assert!(matches!(err, DatabaseError::Connection { .. }));
    }
}
