//! Error types for the attention monitoring library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid input parameters provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Frame geometry contract violation
    #[error("Invalid frame geometry: {0}")]
    Geometry(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Session replay error
    #[error("Replay error: {0}")]
    Replay(String),
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
