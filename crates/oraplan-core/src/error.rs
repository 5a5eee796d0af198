//! Error types for oraplan

use thiserror::Error;

/// Core error type for oraplan operations
#[derive(Error, Debug)]
pub enum OraplanError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Query text is empty")]
    EmptyQuery,

    #[error("Unexpected plan format: {0}")]
    PlanFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OraplanError {
    /// Returns true if the error happened before a session was available
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Configuration(_))
    }
}

/// Result type alias for oraplan operations
pub type Result<T> = std::result::Result<T, OraplanError>;
