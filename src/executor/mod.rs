//! Query executor subsystem for livequery
//!
//! The executor runs a single-table SELECT against a registered row
//! generator and produces an ordered, projected result set.
//!
//! # Execution Flow (strict order)
//!
//! 1. Resolve the table and validate the statement
//! 2. Build the execution context and invoke the generator
//! 3. Filter rows strictly according to WHERE
//! 4. Aggregate (if specified)
//! 5. Apply sort (if specified)
//! 6. Apply offset and limit
//! 7. Project and alias columns
//!
//! # Invariants
//!
//! - Stages run in the order above, each on the full output of the last
//! - Sorting is stable: equal rows keep generator order
//! - Pushed-down hints never change the result

mod aggregator;
mod errors;
mod executor;
mod filters;
mod projection;
mod result;
mod sorter;

pub use aggregator::{AggregateKind, AggregateSpec, Aggregator};
pub use errors::{ExecutorError, ExecutorErrorCode, ExecutorResult, Severity};
pub use executor::QueryExecutor;
pub use filters::PredicateFilter;
pub use projection::Projection;
pub use result::{ExecutionResult, ExecutionStats, ResultSet};
pub use sorter::{ResultSorter, RowWindow, SortKey};
