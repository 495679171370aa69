//! Row generator contract and a fixed-rows implementation

use crate::planner::ExecutionContext;
use crate::value::Row;

use super::errors::{GeneratorError, GeneratorResult};

/// Produces the raw rows for one table.
///
/// Implementations may consult [`ExecutionContext::is_column_used`] and the
/// pushed-down constants to skip expensive work. They must not rely on the
/// constants to filter: the executor re-checks every WHERE condition, but a
/// row dropped here can never come back.
pub trait RowGenerator: Send + Sync {
    fn generate(&self, context: &ExecutionContext) -> GeneratorResult<Vec<Row>>;
}

impl<F> RowGenerator for F
where
    F: Fn(&ExecutionContext) -> GeneratorResult<Vec<Row>> + Send + Sync,
{
    fn generate(&self, context: &ExecutionContext) -> GeneratorResult<Vec<Row>> {
        self(context)
    }
}

/// A table whose rows are fixed at construction
#[derive(Debug, Clone, Default)]
pub struct StaticTable {
    rows: Vec<Row>,
}

impl StaticTable {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    /// Builds a table from a JSON array of objects
    pub fn from_json(json: &serde_json::Value) -> GeneratorResult<Self> {
        let items = json
            .as_array()
            .ok_or_else(|| GeneratorError::Failed("expected a JSON array of objects".into()))?;
        let rows = items
            .iter()
            .enumerate()
            .map(|(i, item)| {
                Row::from_json(item).ok_or_else(|| {
                    GeneratorError::Failed(format!("element {} is not a JSON object", i))
                })
            })
            .collect::<GeneratorResult<Vec<_>>>()?;
        Ok(Self { rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl RowGenerator for StaticTable {
    fn generate(&self, _context: &ExecutionContext) -> GeneratorResult<Vec<Row>> {
        Ok(self.rows.clone())
    }
}
