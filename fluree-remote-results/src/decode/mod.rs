//! Streaming row decoders
//!
//! - [`columns`]: the optional column-descriptor array of a tabular result
//! - [`term`]: a single `{type, value, ...}` term object
//! - [`bindings`]: rows of a tabular result, one binding object at a time
//! - [`triples`]: rows of a triples document, one triple at a time

pub mod bindings;
pub mod columns;
pub mod term;
pub mod triples;

pub use bindings::BindingsDecoder;
pub use columns::{decode_columns, Column};
pub use term::{decode_term, TermSyntax};
pub use triples::TriplesDecoder;
