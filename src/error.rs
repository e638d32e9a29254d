//! Error types for the caching layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the caching layer.
///
/// Store failures are surfaced unmodified to the immediate caller; nothing in
/// this crate retries them.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The underlying store could not be reached or rejected the command
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Operation against a key holding the wrong kind of value
    #[error("Wrong type: {0}")]
    WrongType(String),

    /// Increment of a value that is not a decimal integer
    #[error("Value is not an integer: {0}")]
    NotAnInteger(String),

    /// Replay requested for an operation with no recorded calls
    #[error("No history recorded for {0}")]
    NoHistory(String),

    /// Stored bytes are not valid UTF-8 text
    #[error("Invalid text at key: {0}")]
    InvalidText(String),

    /// Call arguments or results could not be rendered for history
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The remote fetch failed
    #[error("Fetch failed: {0}")]
    Fetch(String),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::StoreUnavailable(err.to_string())
    }
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

// == Result Type Alias ==
/// Convenience Result type for the caching layer.
pub type Result<T> = std::result::Result<T, CacheError>;
