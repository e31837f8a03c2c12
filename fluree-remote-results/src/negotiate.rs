//! Content negotiation
//!
//! Maps a response media type to the builder that decodes it. The ordered
//! list exists only to build the `Accept` header.

use crate::builder::{build_tabular, build_triples};
use crate::error::Result;
use crate::response::Response;
use fluree_vocab::media_types;
use std::io::BufRead;

/// Byte source handed to a builder
pub type Source = Box<dyn BufRead + Send>;

/// Builds a [`Response`] from a response body
pub type BuildFn = fn(Source) -> Result<Response>;

/// Media types in preference order: triples first, tabular second
pub const ACCEPT_ORDER: [&str; 2] = [media_types::RDF_JSON, media_types::SPARQL_RESULTS_JSON];

/// Value of the `Accept` header sent with every query
pub fn accept_header() -> String {
    ACCEPT_ORDER.join(", ")
}

/// The builder for a `Content-Type` value; parameters are ignored
pub fn builder_for(content_type: &str) -> Option<BuildFn> {
    match media_types::essence(content_type).as_str() {
        media_types::RDF_JSON => Some(build_triples::<Source>),
        media_types::SPARQL_RESULTS_JSON => Some(build_tabular::<Source>),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_accept_header_order() {
        assert_eq!(
            accept_header(),
            "application/rdf+json, application/sparql-results+json"
        );
    }

    #[test]
    fn test_builder_lookup() {
        assert!(builder_for("application/rdf+json").is_some());
        assert!(builder_for("application/sparql-results+json; charset=UTF-8").is_some());
        assert!(builder_for("application/json").is_none());
        assert!(builder_for("text/html").is_none());
        assert!(builder_for("").is_none());
    }

    #[test]
    fn test_builder_decodes_matching_format() {
        let build = builder_for("application/sparql-results+json").unwrap();
        let source: Source = Box::new(Cursor::new(br#"{"boolean": true}"#.to_vec()));
        assert_eq!(build(source).unwrap().boolean_result(), Some(true));
    }
}
