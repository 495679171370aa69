//! Engine metrics
//!
//! - Counters only, monotonic
//! - Owned by one engine instance, never global
//! - Thread-safe, Relaxed ordering

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Operational counters for one engine
#[derive(Debug, Default)]
pub struct EngineMetrics {
    queries_executed: AtomicU64,
    queries_failed: AtomicU64,
    rows_generated: AtomicU64,
    rows_returned: AtomicU64,
}

impl EngineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful query
    pub fn record_success(&self, rows_generated: usize, rows_returned: usize) {
        self.queries_executed.fetch_add(1, Ordering::Relaxed);
        self.rows_generated
            .fetch_add(rows_generated as u64, Ordering::Relaxed);
        self.rows_returned
            .fetch_add(rows_returned as u64, Ordering::Relaxed);
    }

    /// Record a failed query
    pub fn record_failure(&self) {
        self.queries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn queries_executed(&self) -> u64 {
        self.queries_executed.load(Ordering::Relaxed)
    }

    pub fn queries_failed(&self) -> u64 {
        self.queries_failed.load(Ordering::Relaxed)
    }

    /// Point-in-time copy of every counter
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            queries_executed: self.queries_executed(),
            queries_failed: self.queries_failed(),
            rows_generated: self.rows_generated.load(Ordering::Relaxed),
            rows_returned: self.rows_returned.load(Ordering::Relaxed),
        }
    }
}

/// Serializable copy of [`EngineMetrics`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub queries_executed: u64,
    pub queries_failed: u64,
    pub rows_generated: u64,
    pub rows_returned: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = EngineMetrics::new();
        metrics.record_success(10, 3);
        metrics.record_success(5, 5);
        metrics.record_failure();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.queries_executed, 2);
        assert_eq!(snapshot.queries_failed, 1);
        assert_eq!(snapshot.rows_generated, 15);
        assert_eq!(snapshot.rows_returned, 8);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_value(EngineMetrics::new().snapshot()).unwrap();
        assert_eq!(json["queries_executed"], 0);
    }
}
