//! Query executor for livequery
//!
//! Execution flow (strict order):
//! 1. Resolve the table to a registered generator
//! 2. Extract aggregates, validate the SELECT list and LIMIT/OFFSET
//! 3. Build the execution context
//! 4. Invoke the row generator with the context
//! 5. Filter rows with WHERE
//! 6. Aggregate (only if the SELECT list has aggregate calls)
//! 7. Apply ORDER BY, then OFFSET/LIMIT
//! 8. Project and alias columns
//!
//! Every stage consumes its whole input before the next one runs. Any
//! failure aborts the query with the originating error.

use uuid::Uuid;

use crate::config::EngineConfig;
use crate::observability::{EngineMetrics, QueryScope};
use crate::planner::{ExecutionContext, SelectStatement};
use crate::table::TableRegistry;

use super::aggregator::Aggregator;
use super::errors::{ExecutorError, ExecutorResult};
use super::filters::PredicateFilter;
use super::projection::Projection;
use super::result::{ExecutionResult, ExecutionStats, ResultSet};
use super::sorter::{ResultSorter, RowWindow, SortKey};

/// Executes single-table SELECT statements against registered generators.
///
/// Holds no per-query state; concurrent callers each get an independent
/// execution.
#[derive(Debug)]
pub struct QueryExecutor {
    registry: TableRegistry,
    config: EngineConfig,
    metrics: EngineMetrics,
}

impl QueryExecutor {
    /// Creates an executor with the default configuration
    pub fn new(registry: TableRegistry) -> Self {
        Self::with_config(registry, EngineConfig::default())
    }

    pub fn with_config(registry: TableRegistry, config: EngineConfig) -> Self {
        Self {
            registry,
            config,
            metrics: EngineMetrics::new(),
        }
    }

    pub fn registry(&self) -> &TableRegistry {
        &self.registry
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &EngineMetrics {
        &self.metrics
    }

    /// Runs `stmt` against `table` and returns the result set
    pub fn execute(&self, table: &str, stmt: &SelectStatement) -> ExecutorResult<ResultSet> {
        self.execute_with_stats(table, stmt)
            .map(|result| result.result_set)
    }

    /// Runs `stmt` against the table named in its FROM clause
    pub fn execute_statement(&self, stmt: &SelectStatement) -> ExecutorResult<ResultSet> {
        self.execute(&stmt.from, stmt)
    }

    /// Runs `stmt` against `table` and returns the result with statistics
    pub fn execute_with_stats(
        &self,
        table: &str,
        stmt: &SelectStatement,
    ) -> ExecutorResult<ExecutionResult> {
        let query_id = Uuid::new_v4();
        let scope = self
            .config
            .log_queries
            .then(|| QueryScope::begin(query_id.to_string(), table));

        let outcome = self
            .run(query_id, table, stmt)
            .map_err(|e| e.with_table(table));

        match &outcome {
            Ok(result) => {
                let stats = &result.stats;
                self.metrics
                    .record_success(stats.rows_generated, stats.rows_returned);
                if let Some(scope) = scope {
                    let generated = stats.rows_generated.to_string();
                    let matched = stats.rows_matched.to_string();
                    let returned = stats.rows_returned.to_string();
                    scope.complete(
                        &[
                            ("rows_generated", generated.as_str()),
                            ("rows_matched", matched.as_str()),
                            ("rows_returned", returned.as_str()),
                        ],
                        self.config.slow_query_threshold_ms,
                    );
                }
            }
            Err(err) => {
                self.metrics.record_failure();
                if let Some(scope) = scope {
                    scope.fail(err.code().code(), err.message());
                }
            }
        }

        outcome
    }

    fn run(
        &self,
        query_id: Uuid,
        table: &str,
        stmt: &SelectStatement,
    ) -> ExecutorResult<ExecutionResult> {
        let started = std::time::Instant::now();
        let mut stats = ExecutionStats::new(query_id, table);

        // Step 1: resolve before anything touches the generator
        let generator = self
            .registry
            .lookup(table)
            .ok_or_else(|| ExecutorError::unsupported_table(table))?;

        // Step 2: reject unsupported statements up front
        let aggregates = Aggregator::extract(&stmt.projection)?;
        let projection = Projection::new(&stmt.projection, &aggregates)?;
        let window = RowWindow::from_literals(stmt.limit.as_ref(), stmt.offset.as_ref())?;

        // Steps 3-4
        let context = ExecutionContext::new(table, stmt);
        let rows = generator
            .generate(&context)
            .map_err(|e| ExecutorError::generator_failed(table, e))?;
        stats.rows_generated = rows.len();

        // Step 5
        let rows = PredicateFilter::apply(rows, stmt.selection.as_ref())?;
        stats.rows_matched = rows.len();

        // Step 6
        let mut rows = if aggregates.is_empty() {
            rows
        } else {
            Aggregator::aggregate(&rows, &stmt.group_by, &aggregates)?
        };

        // Step 7
        let keys: Vec<SortKey> = stmt
            .order_by
            .iter()
            .map(|o| SortKey::new(projection.resolve_sort_column(&o.column), o.direction))
            .collect();
        ResultSorter::sort(&mut rows, &keys);

        let before_window = rows.len();
        let rows = window.apply(rows);
        stats.limit_applied = rows.len() < before_window;

        // Step 8
        let result_set = projection.apply(rows);
        if let Some(max) = self.config.max_result_rows {
            if result_set.len() > max {
                return Err(ExecutorError::result_limit(result_set.len(), max));
            }
        }

        stats.rows_returned = result_set.len();
        stats.elapsed_ms = started.elapsed().as_millis() as u64;
        Ok(ExecutionResult { result_set, stats })
    }
}
