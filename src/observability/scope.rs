//! QueryScope for automatic begin/complete logging
//!
//! - Logs QUERY_BEGIN on creation
//! - Logs QUERY_COMPLETE or QUERY_FAILED when closed explicitly
//! - Logs QUERY_INCOMPLETE on drop if never closed

use std::io::Write;
use std::time::Instant;

use super::events::QueryEvent;
use super::logger::Logger;

/// Logging scope around one query execution
pub struct QueryScope {
    query_id: String,
    table: String,
    started: Instant,
    closed: bool,
    /// Destination for log lines; stdout/stderr when unset
    writer: Option<Box<dyn Write + Send>>,
}

impl QueryScope {
    /// Open a scope, logging QUERY_BEGIN
    pub fn begin(query_id: impl Into<String>, table: impl Into<String>) -> Self {
        Self::open(query_id.into(), table.into(), None)
    }

    /// Open a scope that writes its log lines to `writer`
    pub fn begin_with_writer(
        query_id: impl Into<String>,
        table: impl Into<String>,
        writer: Box<dyn Write + Send>,
    ) -> Self {
        Self::open(query_id.into(), table.into(), Some(writer))
    }

    fn open(query_id: String, table: String, writer: Option<Box<dyn Write + Send>>) -> Self {
        let mut scope = Self {
            query_id,
            table,
            started: Instant::now(),
            closed: false,
            writer,
        };
        scope.emit(QueryEvent::Begin, &[]);
        scope
    }

    /// Milliseconds since the scope was opened
    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    /// Close successfully, logging QUERY_COMPLETE with `fields`, and
    /// QUERY_SLOW as well if the query ran past `slow_threshold_ms`.
    pub fn complete(mut self, fields: &[(&str, &str)], slow_threshold_ms: u64) {
        self.closed = true;
        let elapsed_ms = self.elapsed_ms();
        let elapsed = elapsed_ms.to_string();
        let mut all: Vec<(&str, &str)> = fields.to_vec();
        all.push(("elapsed_ms", elapsed.as_str()));
        self.emit(QueryEvent::Complete, &all);

        if elapsed_ms > slow_threshold_ms {
            let threshold = slow_threshold_ms.to_string();
            self.emit(
                QueryEvent::Slow,
                &[("elapsed_ms", elapsed.as_str()), ("threshold_ms", threshold.as_str())],
            );
        }
    }

    /// Close with an error, logging QUERY_FAILED
    pub fn fail(mut self, code: &str, reason: &str) {
        self.closed = true;
        self.emit(QueryEvent::Failed, &[("code", code), ("reason", reason)]);
    }

    fn emit(&mut self, event: QueryEvent, extra: &[(&str, &str)]) {
        let mut fields: Vec<(&str, &str)> = vec![
            ("query_id", self.query_id.as_str()),
            ("table", self.table.as_str()),
        ];
        fields.extend_from_slice(extra);
        match self.writer.as_mut() {
            Some(writer) => Logger::log_to_writer(event.severity(), event.as_str(), &fields, writer),
            None => Logger::log(event.severity(), event.as_str(), &fields),
        }
    }
}

impl Drop for QueryScope {
    fn drop(&mut self) {
        if !self.closed {
            self.emit(
                QueryEvent::Incomplete,
                &[("reason", "scope dropped without completion")],
            );
        }
    }
}
