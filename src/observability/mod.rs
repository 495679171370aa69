//! Observability for query execution
//!
//! - Structured logging (JSON lines)
//! - Per-engine counters
//! - Query lifecycle scopes
//!
//! Observability is read-only: it never changes a result and a logging
//! failure never fails a query. Logging is off unless
//! [`EngineConfig::log_queries`](crate::config::EngineConfig) is set.

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::QueryEvent;
pub use logger::{Logger, Severity};
pub use metrics::{EngineMetrics, MetricsSnapshot};
pub use scope::QueryScope;
