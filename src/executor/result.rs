//! Result types for query execution

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::value::{Row, Value};

/// Ordered rows plus the column list used for output ordering
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl ResultSet {
    /// Creates a result set with an explicit column list
    pub fn new(columns: Vec<String>, rows: Vec<Row>) -> Self {
        Self { columns, rows }
    }

    /// Creates a result set whose columns are inferred from the first row
    pub fn from_rows(rows: Vec<Row>) -> Self {
        let columns = rows
            .first()
            .map(|row| row.column_names().map(str::to_string).collect())
            .unwrap_or_default();
        Self { columns, rows }
    }

    /// Creates an empty result
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    /// Returns true if no rows matched
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter()
    }

    /// Values of one column, top to bottom. Rows lacking it yield `None`.
    pub fn column_values(&self, column: &str) -> Vec<Option<&Value>> {
        self.rows.iter().map(|row| row.get(column)).collect()
    }
}

impl IntoIterator for ResultSet {
    type Item = Row;
    type IntoIter = std::vec::IntoIter<Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

/// Counters describing one query execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionStats {
    pub query_id: Uuid,
    pub table: String,
    pub executed_at: DateTime<Utc>,
    /// Rows returned by the generator
    pub rows_generated: usize,
    /// Rows that passed WHERE
    pub rows_matched: usize,
    /// Rows in the final result
    pub rows_returned: usize,
    /// Whether OFFSET/LIMIT dropped rows
    pub limit_applied: bool,
    pub elapsed_ms: u64,
}

impl ExecutionStats {
    pub fn new(query_id: Uuid, table: impl Into<String>) -> Self {
        Self {
            query_id,
            table: table.into(),
            executed_at: Utc::now(),
            rows_generated: 0,
            rows_matched: 0,
            rows_returned: 0,
            limit_applied: false,
            elapsed_ms: 0,
        }
    }
}

/// Result of query execution together with its statistics
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    pub result_set: ResultSet,
    pub stats: ExecutionStats,
}
