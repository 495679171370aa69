//! Executor error types
//!
//! Every failure aborts the whole query; there is no partial result.
//!
//! Error codes:
//! - LQ_UNSUPPORTED_TABLE (REJECT)
//! - LQ_UNSUPPORTED_EXPRESSION (REJECT)
//! - LQ_INVALID_LIMIT (REJECT)
//! - LQ_TYPE_ERROR (ERROR)
//! - LQ_MISSING_GROUP_COLUMN (ERROR)
//! - LQ_GENERATOR_FAILED (ERROR)
//! - LQ_RESULT_LIMIT (ERROR)

use std::fmt;

use crate::table::GeneratorError;

/// Severity levels for executor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The statement itself cannot be executed
    Reject,
    /// Execution started and failed on the data
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

/// Executor error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutorErrorCode {
    /// Table name has no registered generator
    UnsupportedTable,
    /// AST shape the engine cannot evaluate
    UnsupportedExpression,
    /// LIMIT or OFFSET is not an integer literal
    InvalidLimit,
    /// Numeric aggregate over a non-numeric value
    TypeError,
    /// GROUP BY column absent from every row
    MissingGroupColumn,
    /// Row generator returned an error
    GeneratorFailed,
    /// Result larger than the configured maximum
    ResultLimit,
}

impl ExecutorErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ExecutorErrorCode::UnsupportedTable => "LQ_UNSUPPORTED_TABLE",
            ExecutorErrorCode::UnsupportedExpression => "LQ_UNSUPPORTED_EXPRESSION",
            ExecutorErrorCode::InvalidLimit => "LQ_INVALID_LIMIT",
            ExecutorErrorCode::TypeError => "LQ_TYPE_ERROR",
            ExecutorErrorCode::MissingGroupColumn => "LQ_MISSING_GROUP_COLUMN",
            ExecutorErrorCode::GeneratorFailed => "LQ_GENERATOR_FAILED",
            ExecutorErrorCode::ResultLimit => "LQ_RESULT_LIMIT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            ExecutorErrorCode::UnsupportedTable
            | ExecutorErrorCode::UnsupportedExpression
            | ExecutorErrorCode::InvalidLimit => Severity::Reject,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for ExecutorErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Executor error type with full context
#[derive(Debug)]
pub struct ExecutorError {
    code: ExecutorErrorCode,
    message: String,
    table: Option<String>,
    source: Option<GeneratorError>,
}

impl ExecutorError {
    fn new(code: ExecutorErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            table: None,
            source: None,
        }
    }

    /// Create an unsupported table error
    pub fn unsupported_table(table: impl Into<String>) -> Self {
        let table = table.into();
        Self {
            table: Some(table.clone()),
            ..Self::new(
                ExecutorErrorCode::UnsupportedTable,
                format!("unsupported table '{}'", table),
            )
        }
    }

    /// Create an unsupported expression error
    pub fn unsupported_expression(what: impl Into<String>) -> Self {
        Self::new(
            ExecutorErrorCode::UnsupportedExpression,
            format!("unsupported expression: {}", what.into()),
        )
    }

    /// Create an invalid LIMIT/OFFSET error
    pub fn invalid_limit(clause: &str, literal: impl fmt::Debug) -> Self {
        Self::new(
            ExecutorErrorCode::InvalidLimit,
            format!("{} must be an integer literal, got {:?}", clause, literal),
        )
    }

    /// Create a type error naming the offending value
    pub fn type_error(function: &str, column: &str, value: impl fmt::Display) -> Self {
        Self::new(
            ExecutorErrorCode::TypeError,
            format!(
                "{}({}) requires numeric values, got '{}'",
                function, column, value
            ),
        )
    }

    /// Create a missing GROUP BY column error
    pub fn missing_group_column(column: impl Into<String>) -> Self {
        Self::new(
            ExecutorErrorCode::MissingGroupColumn,
            format!("GROUP BY column '{}' not present in any row", column.into()),
        )
    }

    /// Wrap a row generator failure with the table name
    pub fn generator_failed(table: impl Into<String>, source: GeneratorError) -> Self {
        let table = table.into();
        Self {
            code: ExecutorErrorCode::GeneratorFailed,
            message: format!("generator for table '{}' failed: {}", table, source),
            table: Some(table),
            source: Some(source),
        }
    }

    /// Create a result limit error
    pub fn result_limit(rows: usize, max: usize) -> Self {
        Self::new(
            ExecutorErrorCode::ResultLimit,
            format!("result has {} rows, maximum is {}", rows, max),
        )
    }

    /// Attach the table the failing query ran against
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        if self.table.is_none() {
            self.table = Some(table.into());
        }
        self
    }

    /// Returns the error code
    pub fn code(&self) -> ExecutorErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the table name if known
    pub fn table(&self) -> Option<&str> {
        self.table.as_deref()
    }
}

impl fmt::Display for ExecutorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for ExecutorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for executor operations
pub type ExecutorResult<T> = Result<T, ExecutorError>;
