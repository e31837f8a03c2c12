use colored::Colorize;
use fluree_remote_client::QueryError;
use std::fmt;
use std::process;

pub const EXIT_ERROR: i32 = 1;
pub const EXIT_USAGE: i32 = 2;

/// Unified error type for the command
pub enum CliError {
    /// Query failed at the client, transport or server
    Query(QueryError),
    /// Unreadable input or a malformed term
    Input(String),
    /// Argument / usage errors
    Usage(String),
    /// Writing output failed
    Output(String),
}

pub type CliResult<T> = std::result::Result<T, CliError>;

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = "error:".red().bold();
        match self {
            CliError::Query(QueryError::HttpStatus { status, message }) => write!(
                f,
                "{label} server rejected the query ({status}): {message}"
            ),
            CliError::Query(e) => write!(f, "{label} {e}"),
            CliError::Input(msg) => write!(f, "{label} {msg}"),
            CliError::Usage(msg) => write!(
                f,
                "{label} {msg}\n  {} run with --help for usage",
                "help:".cyan().bold()
            ),
            CliError::Output(msg) => write!(f, "{label} {msg}"),
        }
    }
}

impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::InvalidParameter(_) | QueryError::Config(_) => {
                CliError::Usage(e.to_string())
            }
            other => CliError::Query(other),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Output(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(format!("JSON encoding error: {e}"))
    }
}

/// Print error and exit with the appropriate code.
pub fn exit_with_error(err: CliError) -> ! {
    eprintln!("{err}");
    let code = match &err {
        CliError::Usage(_) => EXIT_USAGE,
        _ => EXIT_ERROR,
    };
    process::exit(code)
}
