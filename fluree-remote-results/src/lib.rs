//! Streaming decoders for Fluree remote query results
//!
//! Two wire formats are understood:
//!
//! - **Tabular results** (`application/sparql-results+json`): `head.vars`,
//!   optional column `metadata`, then `results.bindings` or `boolean`
//! - **Triples documents** (`application/rdf+json`): subject -> predicate ->
//!   array of object terms
//!
//! Both are decoded incrementally from a [`BufRead`](std::io::BufRead): the
//! builder reads only the document header and the returned [`Response`]
//! pulls one row at a time, so memory use does not grow with the result.
//!
//! # Example
//!
//! ```
//! use fluree_remote_results::build_tabular;
//!
//! let json = br#"{"head": {"vars": ["s"]},
//!                 "results": {"bindings": [{"s": {"type": "uri", "value": "http://example.org/a"}}]}}"#;
//! let mut response = build_tabular(&json[..]).unwrap();
//! assert_eq!(response.columns()[0].name, "s");
//! let row = response.next_row().unwrap().unwrap();
//! assert_eq!(row[0].as_ref().and_then(|n| n.as_iri()), Some("http://example.org/a"));
//! ```

mod builder;
pub mod decode;
mod error;
mod error_body;
pub mod lex;
pub mod negotiate;
mod response;
pub mod walk;

pub use builder::{build_tabular, build_triples};
pub use decode::Column;
pub use error::{Result, ResultsError};
pub use error_body::decode_error_message;
pub use negotiate::{accept_header, builder_for, BuildFn, ACCEPT_ORDER};
pub use response::{Response, Row, RowDecoder};
