//! Remote query client for Fluree
//!
//! Posts a query to a remote endpoint and returns a [`Response`] whose rows
//! are decoded lazily from the HTTP body. Large bodies are buffered through a
//! [`SpillStream`](fluree_spill::SpillStream), so a slow consumer never forces
//! the whole result into memory.
//!
//! ```no_run
//! use fluree_remote_client::{ClientConfig, Node, QueryClient};
//!
//! let client = QueryClient::new(ClientConfig::new("http://localhost:8090/fluree/query"))?;
//! let mut response = client.execute_query(
//!     "SELECT ?name WHERE { $person <http://schema.org/name> ?name }",
//!     [("$person", Node::iri("http://example.org/alice"))],
//!     Some(30),
//! )?;
//! while let Some(row) = response.next_row()? {
//!     println!("{:?}", row);
//! }
//! # Ok::<(), fluree_remote_client::QueryError>(())
//! ```

mod client;
pub mod config;
mod error;
pub mod params;

pub use client::QueryClient;
pub use config::ClientConfig;
pub use error::{QueryError, Result};

pub use fluree_remote_results::{Column, Response, Row};
pub use fluree_remote_term::{Converter, NativeType, NativeValue, Node, TypeRegistry, WireType};
pub use fluree_spill::SpillConfig;
