use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Result rendering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned table, column types in the header
    #[default]
    Table,
    /// One JSON document with columns and rows
    Json,
    /// Comma-separated values, streamed row by row
    Csv,
}

/// Run one query against a remote Fluree endpoint
#[derive(Parser, Debug)]
#[command(name = "fluree-remote-query", version, about)]
pub struct Cli {
    /// Query text, or @path to read it from a file; stdin when omitted
    pub query: Option<String>,

    /// Read the query from a file
    #[arg(short = 'f', long = "file", conflicts_with = "query")]
    pub file: Option<PathBuf>,

    /// Query endpoint URL
    #[arg(long, env = "FLUREE_REMOTE_ENDPOINT")]
    pub endpoint: String,

    /// Bearer token (or @filepath to read from file)
    #[arg(long, env = "FLUREE_REMOTE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Query timeout in seconds (capped by the client)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Connect timeout in seconds
    #[arg(long)]
    pub connect_timeout: Option<u64>,

    /// Bind a parameter (repeatable): name=<iri> | name=_:label | name="lex"@lang |
    /// name="lex"^^<datatype> | name=plain text
    #[arg(short = 'p', long = "param", value_name = "NAME=TERM")]
    pub params: Vec<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,

    /// Bytes of each response kept in memory before spilling to disk
    #[arg(long)]
    pub memory_limit: Option<usize>,

    /// Directory for spill files
    #[arg(long)]
    pub spill_dir: Option<PathBuf>,

    /// Show client logs (honours RUST_LOG)
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Suppress all logs
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored error output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    /// Validate argument combinations clap cannot express
    pub fn validate(&self) -> Result<(), String> {
        if self.timeout == Some(0) {
            return Err("--timeout must be > 0".to_string());
        }
        if self.memory_limit == Some(0) {
            return Err("--memory-limit must be > 0".to_string());
        }
        if let Some(p) = self.params.iter().find(|p| !p.contains('=')) {
            return Err(format!("--param '{p}' must have the form NAME=TERM"));
        }
        Ok(())
    }

    /// Load the bearer token, resolving @filepath if needed
    pub fn load_token(&self) -> Result<Option<String>, std::io::Error> {
        match &self.token {
            Some(token) if token.starts_with('@') => {
                let content = std::fs::read_to_string(&token[1..])?;
                Ok(Some(content.trim().to_string()))
            }
            Some(token) => Ok(Some(token.clone())),
            None => Ok(None),
        }
    }
}
