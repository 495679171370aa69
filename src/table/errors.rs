//! # Table Errors

use thiserror::Error;

/// Result type for row generators
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Failure reported by a row generator while collecting rows
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Source unavailable: {0}")]
    Unavailable(String),

    #[error("Generation failed: {0}")]
    Failed(String),
}

/// Registry construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Table already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Invalid table name: {0:?}")]
    InvalidName(String),
}
