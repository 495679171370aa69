//! Query lifecycle events

use std::fmt;

use super::logger::Severity;

/// Observable events emitted around query execution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryEvent {
    /// Query accepted, generator about to run
    Begin,
    /// Query produced a result
    Complete,
    /// Query aborted with an error
    Failed,
    /// Query took longer than the configured threshold
    Slow,
    /// Scope dropped without completing or failing
    Incomplete,
}

impl QueryEvent {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryEvent::Begin => "QUERY_BEGIN",
            QueryEvent::Complete => "QUERY_COMPLETE",
            QueryEvent::Failed => "QUERY_FAILED",
            QueryEvent::Slow => "QUERY_SLOW",
            QueryEvent::Incomplete => "QUERY_INCOMPLETE",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            QueryEvent::Begin | QueryEvent::Complete => Severity::Info,
            QueryEvent::Slow | QueryEvent::Incomplete => Severity::Warn,
            QueryEvent::Failed => Severity::Error,
        }
    }
}

impl fmt::Display for QueryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(QueryEvent::Begin.as_str(), "QUERY_BEGIN");
        assert_eq!(QueryEvent::Failed.to_string(), "QUERY_FAILED");
    }

    #[test]
    fn test_event_severity() {
        assert_eq!(QueryEvent::Complete.severity(), Severity::Info);
        assert_eq!(QueryEvent::Slow.severity(), Severity::Warn);
        assert_eq!(QueryEvent::Failed.severity(), Severity::Error);
    }
}
