//! Blocking HTTP client for remote query execution

use crate::config::ClientConfig;
use crate::error::{QueryError, Result};
use crate::params::form_fields;
use flate2::read::MultiGzDecoder;
use fluree_remote_results::negotiate::Source;
use fluree_remote_results::{accept_header, builder_for, decode_error_message, Response};
use fluree_remote_term::{Converter, Node, TypeRegistry};
use fluree_spill::{spill_pool, SpillStream};
use reqwest::blocking::{Client, Response as HttpResponse};
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONTENT_ENCODING, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::StatusCode;
use std::borrow::Borrow;
use std::fmt;
use std::io::{BufReader, Read};
use std::sync::Arc;

/// Upper bound on how much of an error body is read for its message
const MAX_ERROR_BODY: u64 = 64 * 1024;

/// Runs queries against one remote endpoint.
///
/// All calls block the calling thread. The client is cheap to share behind
/// an `Arc`; every [`Response`] it returns owns its own decoder and stream.
pub struct QueryClient {
    http: Client,
    config: ClientConfig,
    accept: String,
    registry: Arc<TypeRegistry>,
    pool: Arc<rayon::ThreadPool>,
}

impl fmt::Debug for QueryClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryClient")
            .field("endpoint", &self.config.endpoint)
            .field("has_token", &self.config.auth_token.is_some())
            .field("registry_len", &self.registry.len())
            .finish()
    }
}

impl QueryClient {
    /// Build a client with the standard type registry
    pub fn new(config: ClientConfig) -> Result<Self> {
        let registry =
            TypeRegistry::with_defaults().map_err(|e| QueryError::Config(e.to_string()))?;
        Self::with_registry(config, Arc::new(registry))
    }

    /// Build a client sharing an existing registry
    pub fn with_registry(config: ClientConfig, registry: Arc<TypeRegistry>) -> Result<Self> {
        config.validate()?;
        let http = Client::builder()
            .connect_timeout(config.connect_timeout())
            .user_agent(config.user_agent.clone())
            .redirect(Policy::none())
            .build()?;
        let pool = spill_pool(config.spill_threads)
            .map_err(|e| QueryError::Config(format!("failed to start spill workers: {e}")))?;
        Ok(Self {
            http,
            config,
            accept: accept_header(),
            registry,
            pool: Arc::new(pool),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Converter over this client's registry, for reading cell values
    pub fn converter(&self) -> Converter<'_> {
        Converter::new(&self.registry)
    }

    /// Execute a query and return its lazily decoded result.
    ///
    /// Parameter names must start with `$`; each value is sent as its
    /// N-Triples text. `timeout_secs` of `None` (or zero) uses the configured
    /// default; every value is capped.
    pub fn execute_query<I, K, V>(
        &self,
        text: &str,
        params: I,
        timeout_secs: Option<u64>,
    ) -> Result<Response>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Borrow<Node>,
    {
        let fields = form_fields(text, params)?;
        let timeout = self.config.query_timeout(timeout_secs);
        tracing::debug!(
            endpoint = %self.config.endpoint,
            params = fields.len() - 1,
            timeout_secs = timeout.as_secs(),
            "dispatching query"
        );

        let mut request = self
            .http
            .post(&self.config.endpoint)
            .header(ACCEPT, self.accept.as_str())
            .header(ACCEPT_ENCODING, "gzip")
            .timeout(timeout)
            .form(&fields);
        if let Some(token) = &self.config.auth_token {
            request = request.bearer_auth(token);
        }
        let resp = request.send()?;

        let status = resp.status();
        if status.as_u16() >= 400 {
            return Err(Self::map_error(resp));
        }
        if status != StatusCode::OK {
            return Err(QueryError::HttpStatus {
                status: status.as_u16(),
                message: format!("unexpected status {status}"),
            });
        }

        let content_type = header_str(&resp, CONTENT_TYPE).unwrap_or_default();
        let build = builder_for(&content_type).ok_or_else(|| {
            QueryError::protocol(format!(
                "unsupported response content type '{content_type}'"
            ))
        })?;
        let gzip = header_str(&resp, CONTENT_ENCODING)
            .map(|v| v.trim().eq_ignore_ascii_case("gzip"))
            .unwrap_or(false);
        tracing::debug!(
            status = status.as_u16(),
            content_type = %content_type,
            gzip,
            "query response received"
        );

        let stream = SpillStream::new(Box::new(resp), &self.config.spill, &self.pool)?;
        let body: Box<dyn Read + Send> = if gzip {
            Box::new(MultiGzDecoder::new(stream))
        } else {
            Box::new(stream)
        };
        let source: Source = Box::new(BufReader::new(body));
        Ok(build(source)?)
    }

    /// Map a status >= 400 response to an error, reading a bounded prefix of
    /// the body for its message. The body is closed on return.
    fn map_error(resp: HttpResponse) -> QueryError {
        let status = resp.status();
        let content_type = header_str(&resp, CONTENT_TYPE);
        let reason = status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| format!("status {}", status.as_u16()));

        let mut body = Vec::new();
        if let Err(e) = resp.take(MAX_ERROR_BODY).read_to_end(&mut body) {
            tracing::debug!(status = status.as_u16(), error = %e, "failed to read error body");
        }
        let message = decode_error_message(content_type.as_deref(), &body, &reason);
        tracing::debug!(status = status.as_u16(), message = %message, "query rejected");
        QueryError::HttpStatus {
            status: status.as_u16(),
            message,
        }
    }
}

fn header_str(resp: &HttpResponse, name: reqwest::header::HeaderName) -> Option<String> {
    resp.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
