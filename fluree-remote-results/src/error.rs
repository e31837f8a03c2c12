//! Error types for result decoding

use std::io;

/// Error type for decoding a query result document
#[derive(Debug, thiserror::Error)]
pub enum ResultsError {
    /// Malformed JSON, unexpected document shape, missing section or arity
    /// mismatch
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The underlying byte source failed
    #[error("transport error: {0}")]
    Transport(#[from] io::Error),
}

/// Result type for result decoding
pub type Result<T> = std::result::Result<T, ResultsError>;

impl ResultsError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}
