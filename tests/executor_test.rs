// ABOUTME: Integration tests for the statement executor against in-memory and file databases
// ABOUTME: Covers result shaping, binding, array parameters, transactions and error context
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 sqlite-exec contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use common::{executor_with_table, memory_executor, seed};
use serde_json::json;
use sqlite_exec::database::RandomNames;
use sqlite_exec::errors::{DatabaseError, ParamError};
use sqlite_exec::{
    Charset, DatabaseConfig, ExecOutput, ParamValue, Params, QueryOutcome, ResultShape,
    SqlExecutor,
};

#[tokio::test]
async fn test_insert_returns_last_insert_id() {
    let mut db = executor_with_table().await.unwrap();
    let output = db
        .exec("INSERT INTO t (x) VALUES (:x)", [("s-x", "hi")])
        .await
        .unwrap();
    assert_eq!(output, ExecOutput::LastInsertId(1));
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({"lastInsertId": 1})
    );
}

#[tokio::test]
async fn test_update_returns_row_count() {
    let mut db = executor_with_table().await.unwrap();
    seed(&mut db, &["hi"]).await.unwrap();

    let params = Params::new().with("s-x", "bye").with("i-id", 1);
    let output = db
        .exec("UPDATE t SET x = :x WHERE id = :id", params)
        .await
        .unwrap();
    assert_eq!(output.row_count(), Some(1));

    let output = db
        .exec("DELETE FROM t WHERE id = :id", [("i-id", 99)])
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({"rowCount": 0})
    );
}

#[tokio::test]
async fn test_no_return_statement_yields_empty() {
    let mut db = memory_executor();
    let output = db
        .exec("CREATE TABLE e (v TEXT)", Params::new())
        .await
        .unwrap();
    assert_eq!(output, ExecOutput::Empty);
    assert_eq!(serde_json::to_string(&output).unwrap(), "{}");
}

#[tokio::test]
async fn test_select_with_integer_array() {
    let mut db = executor_with_table().await.unwrap();
    seed(&mut db, &["a", "b", "c"]).await.unwrap();

    let rows = db
        .fetch_all(
            "SELECT * FROM t WHERE id IN (:ids) ORDER BY id",
            [("ai-ids", vec![1, 3])],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["x"], json!("a"));
    assert_eq!(rows[1]["x"], json!("c"));

    let rows = db
        .fetch_all(
            "SELECT * FROM t WHERE id IN (:ids)",
            [("ai-ids", vec![1, 2, 3])],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 3);

    let rows = db
        .fetch_all("SELECT * FROM t WHERE id IN (:ids)", [("ai-ids", 2)])
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_array_and_scalar_parameters_together() {
    let mut db = executor_with_table().await.unwrap();
    seed(&mut db, &["a", "b", "c"]).await.unwrap();

    let params = Params::new()
        .with("as-xs", vec!["a", "b", "c"])
        .with("i-min", 2);
    let rows = db
        .fetch_all(
            "SELECT id FROM t WHERE x IN (:xs) AND id >= :min ORDER BY id",
            params,
        )
        .await
        .unwrap();
    let ids: Vec<i64> = rows.iter().map(|r| r["id"].as_i64().unwrap()).collect();
    assert_eq!(ids, [2, 3]);
}

#[tokio::test]
async fn test_random_placeholder_names() {
    init();
    let mut db = SqlExecutor::with_names(DatabaseConfig::memory(), RandomNames);
    let rows = db
        .fetch_all(
            "SELECT value FROM json_each('[1,2,3,4]') WHERE value IN (:vs)",
            [("ai-vs", vec![2, 4])],
        )
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

fn init() {
    common::init_test_logging();
}

#[tokio::test]
async fn test_exec_materializes_rows_as_json() {
    let mut db = executor_with_table().await.unwrap();
    seed(&mut db, &["a"]).await.unwrap();

    let output = db.exec("SELECT id, x FROM t", Params::new()).await.unwrap();
    assert_eq!(
        serde_json::to_value(&output).unwrap(),
        json!({"rows": [{"id": 1, "x": "a"}]})
    );
}

#[tokio::test]
async fn test_values_bind_by_declared_prefix() {
    let mut db = memory_executor();
    let params = Params::new()
        .with("i-big", 1_i128 << 70)
        .with("i-small", 42)
        .with("f-ratio", 1.5)
        .with("b-flag", "YES")
        .with("d-day", "2024-02-29")
        .with("i-none", None::<i64>)
        .with("plain", 7);
    let row = db
        .fetch_one(
            "SELECT :big AS big, :small AS small, :ratio AS ratio, :flag AS flag, \
             :day AS day, :none AS none, :plain AS plain",
            params,
        )
        .await
        .unwrap()
        .unwrap();

    assert_eq!(row["big"], json!("1180591620717411303424"));
    assert_eq!(row["small"], json!(42));
    assert_eq!(row["ratio"], json!("1.5"));
    assert_eq!(row["flag"], json!(1));
    assert_eq!(row["day"], json!("2024-02-29"));
    assert_eq!(row["none"], json!(null));
    assert_eq!(row["plain"], json!("7"));
}

#[tokio::test]
async fn test_repeated_placeholder_binds_once() {
    let mut db = memory_executor();
    let row = db
        .fetch_one("SELECT :a AS one, :a || :a AS two", [("s-a", "x")])
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row["one"], json!("x"));
    assert_eq!(row["two"], json!("xx"));
}

#[tokio::test]
async fn test_unrecognized_statement_never_executes() {
    let mut db = memory_executor();
    let err = db
        .exec("PRAGMA user_version = 5", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(
        &err,
        DatabaseError::UnrecognizedStatement { keyword: Some(k), .. } if k == "PRAGMA"
    ));

    let row = db
        .fetch_one("SELECT user_version FROM pragma_user_version", Params::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row["user_version"], json!(0));

    let err = db.exec("FOO BAR", Params::new()).await.unwrap_err();
    assert!(err.to_string().contains("FOO BAR"));
}

#[tokio::test]
async fn test_missing_parameter_is_binding_error() {
    let mut db = executor_with_table().await.unwrap();
    let err = db
        .exec("INSERT INTO t (x) VALUES (:x)", Params::new())
        .await
        .unwrap_err();
    match err {
        DatabaseError::Binding {
            placeholder, sql, ..
        } => {
            assert_eq!(placeholder, "x");
            assert_eq!(sql, "INSERT INTO t (x) VALUES (:x)");
        }
        other => panic!("expected binding error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unused_parameters_policy() {
    let mut db = executor_with_table().await.unwrap();
    let params = Params::new().with("s-x", "hi").with("i-unused", 1);
    let output = db
        .exec("INSERT INTO t (x) VALUES (:x)", params.clone())
        .await
        .unwrap();
    assert_eq!(output.last_insert_id(), Some(1));

    init();
    let mut strict = SqlExecutor::new(DatabaseConfig::memory().with_reject_unused_params(true));
    let err = strict
        .exec("SELECT :x AS x", params)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Binding { placeholder, .. } if placeholder == "unused"
    ));
}

#[tokio::test]
async fn test_invalid_boolean_is_rejected() {
    let mut db = memory_executor();
    let err = db
        .exec("SELECT :flag AS flag", [("b-flag", "maybe")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Parameter(ParamError::InvalidBoolean { .. })
    ));
}

#[tokio::test]
async fn test_execution_error_carries_context() {
    let mut db = memory_executor();
    let err = db
        .exec("INSERT INTO missing (x) VALUES (:x)", [("s-x", "hi")])
        .await
        .unwrap_err();
    match &err {
        DatabaseError::Execution {
            code,
            message,
            shape,
            sql,
        } => {
            assert!(code.is_some());
            assert!(message.contains("no such table"));
            assert_eq!(*shape, ResultShape::InsertedId);
            assert_eq!(sql, "INSERT INTO missing (x) VALUES (:x)");
        }
        other => panic!("expected execution error, got {other:?}"),
    }

    let err = db
        .exec("SELECT * FROM missing", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Execution {
            shape: ResultShape::Rows,
            ..
        }
    ));
}

#[tokio::test]
async fn test_cursor_iterates_rows() {
    let mut db = executor_with_table().await.unwrap();
    seed(&mut db, &["a", "b", "c"]).await.unwrap();

    let outcome = db
        .open("SELECT x FROM t ORDER BY id", Params::new())
        .await
        .unwrap();
    assert_eq!(outcome.shape(), ResultShape::Rows);
    let mut cursor = outcome.into_cursor().unwrap();

    let first = cursor.next_row().await.unwrap().unwrap();
    assert_eq!(first["x"], json!("a"));
    assert_eq!(cursor.rows_read(), 1);

    let rest = cursor.fetch_all().await.unwrap();
    assert_eq!(rest.len(), 2);
    assert_eq!(rest[1]["x"], json!("c"));

    let count = db
        .fetch_one("SELECT COUNT(*) AS n FROM t", Params::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(count["n"], json!(3));
}

#[tokio::test]
async fn test_closing_cursor_early_releases_connection() {
    let mut db = executor_with_table().await.unwrap();
    seed(&mut db, &["a", "b"]).await.unwrap();

    match db.open("SELECT x FROM t", Params::new()).await.unwrap() {
        QueryOutcome::Rows(cursor) => {
            assert_eq!(cursor.sql(), "SELECT x FROM t");
            cursor.close();
        }
        other => panic!("expected rows, got {other:?}"),
    }

    let output = db
        .exec("INSERT INTO t (x) VALUES (:x)", [("s-x", "c")])
        .await
        .unwrap();
    assert_eq!(output.last_insert_id(), Some(3));
}

#[tokio::test]
async fn test_empty_result_set() {
    let mut db = executor_with_table().await.unwrap();
    let row = db
        .fetch_one("SELECT * FROM t WHERE id = :id", [("i-id", 1)])
        .await
        .unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn test_transaction_rollback_and_commit() {
    let mut db = memory_executor();
    db.begin_transaction().await.unwrap();
    assert!(db.is_connected());
    assert!(db.in_transaction());
    db.exec("CREATE TABLE t (x TEXT)", Params::new())
        .await
        .unwrap();
    db.rollback().await.unwrap();
    assert!(!db.in_transaction());

    let err = db
        .exec("SELECT * FROM t", Params::new())
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Execution { .. }));

    db.exec("CREATE TABLE t (x TEXT)", Params::new())
        .await
        .unwrap();
    db.begin_transaction().await.unwrap();
    db.exec("INSERT INTO t (x) VALUES (:x)", [("s-x", "kept")])
        .await
        .unwrap();
    db.commit().await.unwrap();

    let rows = db.fetch_all("SELECT x FROM t", Params::new()).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_commit_without_transaction_fails() {
    let mut db = memory_executor();
    let err = db.rollback().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Connection { .. }));

    db.connect().await.unwrap();
    let err = db.commit().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Execution { .. }));
}

#[tokio::test]
async fn test_conflict_rollback_clears_transaction_state() {
    let mut db = memory_executor();
    db.exec(
        "CREATE TABLE u (x INTEGER UNIQUE ON CONFLICT ROLLBACK)",
        Params::new(),
    )
    .await
    .unwrap();

    db.begin_transaction().await.unwrap();
    db.exec("INSERT INTO u (x) VALUES (:x)", [("i-x", 1)])
        .await
        .unwrap();
    let err = db
        .exec("INSERT INTO u (x) VALUES (:x)", [("i-x", 1)])
        .await
        .unwrap_err();
    assert!(matches!(err, DatabaseError::Execution { .. }));
    assert!(!db.in_transaction());

    let err = db.commit().await.unwrap_err();
    assert!(matches!(err, DatabaseError::Execution { .. }));

    let rows = db.fetch_all("SELECT x FROM u", Params::new()).await.unwrap();
    assert!(rows.is_empty());

    db.begin_transaction().await.unwrap();
    assert!(db.in_transaction());
    db.commit().await.unwrap();
    assert!(!db.in_transaction());
}

#[tokio::test]
async fn test_trigger_raise_rollback_clears_transaction_state() {
    let mut db = executor_with_table().await.unwrap();
    db.exec(
        "CREATE TRIGGER no_blocked BEFORE INSERT ON t WHEN NEW.x = 'blocked' \
         BEGIN SELECT RAISE(ROLLBACK, 'blocked value'); END",
        Params::new(),
    )
    .await
    .unwrap();

    db.begin_transaction().await.unwrap();
    db.exec("INSERT INTO t (x) VALUES (:x)", [("s-x", "ok")])
        .await
        .unwrap();
    let err = db
        .exec("INSERT INTO t (x) VALUES (:x)", [("s-x", "blocked")])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("blocked value"));
    assert!(!db.in_transaction());

    let rows = db.fetch_all("SELECT x FROM t", Params::new()).await.unwrap();
    assert!(rows.is_empty());
    db.close().await.unwrap();
}

#[tokio::test]
async fn test_statement_abort_keeps_transaction_open() {
    let mut db = memory_executor();
    db.exec("CREATE TABLE v (x INTEGER UNIQUE)", Params::new())
        .await
        .unwrap();

    db.begin_transaction().await.unwrap();
    db.exec("INSERT INTO v (x) VALUES (:x)", [("i-x", 1)])
        .await
        .unwrap();
    db.exec("INSERT INTO v (x) VALUES (:x)", [("i-x", 1)])
        .await
        .unwrap_err();
    assert!(db.in_transaction());

    db.commit().await.unwrap();
    let rows = db.fetch_all("SELECT x FROM v", Params::new()).await.unwrap();
    assert_eq!(rows.len(), 1);
}

#[tokio::test]
async fn test_prefixed_placeholder_spelling_is_not_bound() {
    let mut db = executor_with_table().await.unwrap();

    let err = db
        .exec("INSERT INTO t (x) VALUES (:s-x)", [("s-x", "hi")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Binding { ref placeholder, .. } if placeholder == "s"
    ));

    let err = db
        .fetch_all(
            "SELECT * FROM t WHERE id IN (:ai-ids)",
            [("ai-ids", vec![1, 2])],
        )
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        DatabaseError::Binding { ref placeholder, .. } if placeholder == "ai"
    ));

    let output = db
        .exec("INSERT INTO t (x) VALUES (:x)", [("s-x", "hi")])
        .await
        .unwrap();
    assert_eq!(output.last_insert_id(), Some(1));
}

#[tokio::test]
async fn test_close_then_reconnect() {
    let mut db = executor_with_table().await.unwrap();
    db.close().await.unwrap();
    assert!(!db.is_connected());

    let output = db.exec("SELECT 1 AS one", Params::new()).await.unwrap();
    assert!(db.is_connected());
    assert_eq!(output.rows().unwrap()[0]["one"], json!(1));
}

#[tokio::test]
async fn test_file_database_persists_across_connections() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exec.db");
    let config = DatabaseConfig::file(&path).with_charset(Charset::Utf8);

    let mut db = SqlExecutor::new(config.clone());
    db.exec("CREATE TABLE notes (body TEXT)", Params::new())
        .await
        .unwrap();
    db.exec(
        "INSERT INTO notes (body) VALUES (:body)",
        [("s-body", ParamValue::from("persisted"))],
    )
    .await
    .unwrap();
    db.close().await.unwrap();

    let mut reopened = SqlExecutor::new(config);
    let row = reopened
        .fetch_one("SELECT body FROM notes", Params::new())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row["body"], json!("persisted"));
    assert!(path.exists());
}

#[tokio::test]
async fn test_missing_file_without_create_is_connection_error() {
    init();
    let dir = tempfile::tempdir().unwrap();
    let mut config = DatabaseConfig::file(dir.path().join("absent.db"));
    config.create_if_missing = false;

    let mut db = SqlExecutor::new(config);
    let err = db.exec("SELECT 1", Params::new()).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Connection { .. }));
    assert!(!db.is_connected());
}
