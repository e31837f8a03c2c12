//! Error types for the term crate

use thiserror::Error;

/// A single cell could not be coerced to the requested type.
///
/// Scoped to that cell: raising it never invalidates the row iterator the
/// cell came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot convert {datatype} to {target}: {detail}")]
pub struct TypeConversionError {
    /// Datatype (or term kind) of the source value
    pub datatype: String,
    /// Requested target type
    pub target: String,
    pub detail: String,
}

impl TypeConversionError {
    pub fn new(
        datatype: impl Into<String>,
        target: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            datatype: datatype.into(),
            target: target.into(),
            detail: detail.into(),
        }
    }
}

/// Registry construction errors (fatal at startup)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Two mappings claimed the same datatype, or two standard mappings
    /// claimed the same wire type
    #[error("duplicate type mapping: {0}")]
    Duplicate(String),

    /// A custom mapping points at a wire type with no standard mapping
    #[error("custom mapping for {datatype} targets unmapped wire type {wire_type}")]
    UnmappedWireType { datatype: String, wire_type: String },
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, TypeConversionError>;
