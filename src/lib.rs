//! livequery - SQL SELECT execution over virtual tables
//!
//! Tables are backed by row generators that produce rows on demand. A
//! statement is filtered, aggregated, sorted, windowed and projected
//! entirely in memory.

pub mod config;
pub mod executor;
pub mod observability;
pub mod planner;
pub mod table;
pub mod value;

pub use config::EngineConfig;
pub use executor::{ExecutorError, ExecutorErrorCode, QueryExecutor, ResultSet};
pub use planner::{ExecutionContext, Expr, SelectItem, SelectStatement};
pub use table::{RowGenerator, StaticTable, TableRegistry};
pub use value::{Row, Value};
