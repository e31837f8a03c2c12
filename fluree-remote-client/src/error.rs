//! Error taxonomy for query execution

use fluree_remote_results::ResultsError;

/// Error type for remote query operations.
///
/// None of these are retried by the client.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Unexpected wire shape or an unmatched response content type
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Connection failure, timeout, or I/O failure while streaming
    #[error("transport error: {0}")]
    Transport(String),

    /// Status >= 400, or any success/redirect status other than 200
    #[error("HTTP {status}: {message}")]
    HttpStatus { status: u16, message: String },

    /// A bound parameter name lacks the `$` sigil or is empty after it
    #[error("invalid parameter name '{0}': must start with '$' followed by a name")]
    InvalidParameter(String),

    /// Client configuration could not be used
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for remote query operations
pub type Result<T> = std::result::Result<T, QueryError>;

impl QueryError {
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<ResultsError> for QueryError {
    fn from(e: ResultsError) -> Self {
        match e {
            ResultsError::Protocol(msg) => Self::Protocol(msg),
            ResultsError::Transport(io) => Self::Transport(io.to_string()),
        }
    }
}

impl From<reqwest::Error> for QueryError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            Self::Transport(format!("connection failed: {e}"))
        } else if e.is_builder() {
            Self::Config(e.to_string())
        } else {
            Self::Transport(e.to_string())
        }
    }
}

impl From<std::io::Error> for QueryError {
    fn from(e: std::io::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_results_errors_keep_their_category() {
        let e: QueryError = ResultsError::protocol("bad shape").into();
        assert!(matches!(e, QueryError::Protocol(ref m) if m == "bad shape"));

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let e: QueryError = ResultsError::Transport(io).into();
        assert!(matches!(e, QueryError::Transport(ref m) if m.contains("reset")));
    }

    #[test]
    fn test_status_display() {
        let e = QueryError::HttpStatus {
            status: 400,
            message: "bad query".into(),
        };
        assert_eq!(e.to_string(), "HTTP 400: bad query");
        assert_eq!(e.status(), Some(400));
        assert_eq!(QueryError::protocol("x").status(), None);
    }
}
