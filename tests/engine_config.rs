//! Engine Configuration Tests
//!
//! Tests for configuration and engine-level counters:
//! - Config files load with defaults for omitted keys
//! - max_result_rows fails oversized results
//! - Metrics count successes and failures per engine

use std::io::Write;

use livequery::config::EngineConfig;
use livequery::executor::{ExecutorErrorCode, QueryExecutor};
use livequery::planner::{Expr, SelectStatement};
use livequery::table::{StaticTable, TableRegistry};
use serde_json::json;
use tempfile::NamedTempFile;

fn registry() -> TableRegistry {
    let rows = json!([
        {"name": "cron", "status": "running"},
        {"name": "sshd", "status": "running"},
        {"name": "cups", "status": "stopped"}
    ]);
    TableRegistry::new()
        .with_table("services", StaticTable::from_json(&rows).unwrap())
        .unwrap()
}

/// A config file drives the executor.
#[test]
fn test_config_file_limits_results() {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, r#"{{"max_result_rows": 2}}"#).unwrap();

    let config = EngineConfig::load(file.path()).unwrap();
    assert!(!config.log_queries);
    assert_eq!(config.slow_query_threshold_ms, 1000);

    let executor = QueryExecutor::with_config(registry(), config);

    let err = executor
        .execute_statement(&SelectStatement::new("services"))
        .unwrap_err();
    assert_eq!(err.code(), ExecutorErrorCode::ResultLimit);

    let running = SelectStatement::new("services")
        .filter(Expr::column("status").eq(Expr::lit("running")));
    assert_eq!(executor.execute_statement(&running).unwrap().len(), 2);
}

/// Metrics belong to one executor and track every outcome.
#[test]
fn test_metrics_per_executor() {
    let first = QueryExecutor::new(registry());
    let second = QueryExecutor::new(registry());

    first
        .execute_statement(&SelectStatement::new("services"))
        .unwrap();
    first
        .execute_statement(&SelectStatement::new("services").limit(1))
        .unwrap();
    assert!(first
        .execute_statement(&SelectStatement::new("users"))
        .is_err());

    let snapshot = first.metrics().snapshot();
    assert_eq!(snapshot.queries_executed, 2);
    assert_eq!(snapshot.queries_failed, 1);
    assert_eq!(snapshot.rows_generated, 6);
    assert_eq!(snapshot.rows_returned, 4);

    assert_eq!(second.metrics().queries_executed(), 0);
}

/// Stats carry a fresh query id per execution.
#[test]
fn test_stats_query_ids_unique() {
    let executor = QueryExecutor::new(registry());
    let stmt = SelectStatement::new("services");
    let a = executor.execute_with_stats("services", &stmt).unwrap();
    let b = executor.execute_with_stats("services", &stmt).unwrap();

    assert_ne!(a.stats.query_id, b.stats.query_id);
    assert_eq!(a.stats.table, "services");
    assert_eq!(a.stats.rows_returned, 3);
    assert!(!a.stats.limit_applied);

    let encoded = serde_json::to_value(&a).unwrap();
    assert_eq!(encoded["result_set"]["columns"], json!(["name", "status"]));
    assert_eq!(encoded["stats"]["rows_generated"], json!(3));
}
