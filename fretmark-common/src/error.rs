//! Common error types for Fretmark

use thiserror::Error;

/// Common result type for Fretmark operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across Fretmark crates
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level failure reaching the analysis server
    #[error("Network error: {0}")]
    Network(String),

    /// Non-success HTTP status from the analysis server
    #[error("Server error {0}: {1}")]
    Api(u16, String),

    /// Response body that could not be decoded into the expected shape
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Track operation attempted while the track cannot accept it
    #[error("Unsupported track state: {0}")]
    UnsupportedTrackState(String),

    /// Session operation attempted in the wrong phase
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other errors
    #[error("Internal error: {0}")]
    Internal(String),
}
