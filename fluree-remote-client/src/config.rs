//! Client configuration and validation

use crate::error::{QueryError, Result};
use fluree_spill::SpillConfig;
use serde::Deserialize;
use std::time::Duration;

pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const MAX_CONNECT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 60;
pub const MAX_QUERY_TIMEOUT_SECS: u64 = 600;
pub const DEFAULT_SPILL_THREADS: usize = 2;

/// Configuration for a [`QueryClient`](crate::QueryClient)
#[derive(Clone, Debug, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ClientConfig {
    /// Query endpoint URL (e.g. `http://localhost:8090/fluree/query`)
    pub endpoint: String,
    /// Bearer credential attached to every request
    pub auth_token: Option<String>,
    pub user_agent: String,
    /// Capped at [`MAX_CONNECT_TIMEOUT_SECS`]
    pub connect_timeout_secs: Option<u64>,
    /// Used when a query does not ask for a timeout; capped at
    /// [`MAX_QUERY_TIMEOUT_SECS`]
    pub default_query_timeout_secs: Option<u64>,
    pub spill: SpillConfig,
    /// Workers copying oversized responses to disk
    pub spill_threads: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            auth_token: None,
            user_agent: format!("fluree-remote-client/{}", env!("CARGO_PKG_VERSION")),
            connect_timeout_secs: None,
            default_query_timeout_secs: None,
            spill: SpillConfig::default(),
            spill_threads: DEFAULT_SPILL_THREADS,
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Self::default()
        }
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_spill(mut self, spill: SpillConfig) -> Self {
        self.spill = spill;
        self
    }

    pub fn with_default_query_timeout(mut self, secs: u64) -> Self {
        self.default_query_timeout_secs = Some(secs);
        self
    }

    /// Validate the configuration before building a client
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.is_empty() {
            return Err(QueryError::Config("endpoint is required".to_string()));
        }
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(QueryError::Config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.spill.memory_limit == 0 {
            return Err(QueryError::Config("spill.memory_limit must be > 0".to_string()));
        }
        if self.spill.chunk_size == 0 {
            return Err(QueryError::Config("spill.chunk_size must be > 0".to_string()));
        }
        if self.spill_threads == 0 {
            return Err(QueryError::Config("spill_threads must be > 0".to_string()));
        }
        Ok(())
    }

    /// Connect timeout after defaulting and capping
    pub fn connect_timeout(&self) -> Duration {
        let secs = self
            .connect_timeout_secs
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_CONNECT_TIMEOUT_SECS);
        Duration::from_secs(secs.min(MAX_CONNECT_TIMEOUT_SECS))
    }

    /// Read timeout for one query. Zero or `None` means "not specified".
    pub fn query_timeout(&self, requested_secs: Option<u64>) -> Duration {
        let secs = requested_secs
            .filter(|s| *s > 0)
            .or(self.default_query_timeout_secs.filter(|s| *s > 0))
            .unwrap_or(DEFAULT_QUERY_TIMEOUT_SECS);
        Duration::from_secs(secs.min(MAX_QUERY_TIMEOUT_SECS))
    }
}
