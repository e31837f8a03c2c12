//! RDF vocabulary constants for the Fluree remote query client
//!
//! This crate provides a centralized location for the vocabulary IRIs and
//! media types shared by the term model, the result decoders and the HTTP
//! client.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `xsd` - XSD vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `media_types` - Content types exchanged with the query endpoint

/// RDF vocabulary constants
pub mod rdf {
    /// rdf:langString IRI (language-tagged strings)
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";
}

/// XSD (XML Schema Datatypes) vocabulary constants
pub mod xsd {

    /// xsd:string
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:boolean
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:integer (unbounded)
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long (64-bit signed)
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:int (32-bit signed)
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:short (16-bit signed)
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";

    /// xsd:byte (8-bit signed)
    pub const BYTE: &str = "http://www.w3.org/2001/XMLSchema#byte";

    pub const UNSIGNED_LONG: &str = "http://www.w3.org/2001/XMLSchema#unsignedLong";
    pub const UNSIGNED_INT: &str = "http://www.w3.org/2001/XMLSchema#unsignedInt";
    pub const UNSIGNED_SHORT: &str = "http://www.w3.org/2001/XMLSchema#unsignedShort";
    pub const UNSIGNED_BYTE: &str = "http://www.w3.org/2001/XMLSchema#unsignedByte";
    pub const NON_NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonNegativeInteger";
    pub const POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#positiveInteger";
    pub const NON_POSITIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#nonPositiveInteger";
    pub const NEGATIVE_INTEGER: &str = "http://www.w3.org/2001/XMLSchema#negativeInteger";

    /// xsd:decimal (arbitrary precision)
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:float (32-bit IEEE)
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    /// xsd:double (64-bit IEEE)
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:dateTime (zone optional)
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:dateTimeStamp (zone required)
    pub const DATE_TIME_STAMP: &str = "http://www.w3.org/2001/XMLSchema#dateTimeStamp";

    /// xsd:date
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:time
    pub const TIME: &str = "http://www.w3.org/2001/XMLSchema#time";

    pub const G_YEAR: &str = "http://www.w3.org/2001/XMLSchema#gYear";
    pub const G_YEAR_MONTH: &str = "http://www.w3.org/2001/XMLSchema#gYearMonth";
    pub const G_MONTH: &str = "http://www.w3.org/2001/XMLSchema#gMonth";
    pub const G_MONTH_DAY: &str = "http://www.w3.org/2001/XMLSchema#gMonthDay";
    pub const G_DAY: &str = "http://www.w3.org/2001/XMLSchema#gDay";

    pub const DURATION: &str = "http://www.w3.org/2001/XMLSchema#duration";
    pub const DAY_TIME_DURATION: &str = "http://www.w3.org/2001/XMLSchema#dayTimeDuration";
    pub const YEAR_MONTH_DURATION: &str = "http://www.w3.org/2001/XMLSchema#yearMonthDuration";

    /// xsd:anyURI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    pub const NORMALIZED_STRING: &str = "http://www.w3.org/2001/XMLSchema#normalizedString";
    pub const TOKEN: &str = "http://www.w3.org/2001/XMLSchema#token";
    pub const LANGUAGE: &str = "http://www.w3.org/2001/XMLSchema#language";

    /// Get the local name portion of a datatype IRI (e.g., "integer" from xsd:integer)
    #[inline]
    pub fn datatype_local_name(datatype_iri: &str) -> Option<&str> {
        datatype_iri.rsplit_once('#').map(|(_, local)| local)
    }
}

/// Media types negotiated with the query endpoint
pub mod media_types {
    /// RDF/JSON triples document (subject -> predicate -> objects)
    pub const RDF_JSON: &str = "application/rdf+json";

    /// SPARQL 1.1 Query Results JSON
    pub const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";

    /// HTML (error pages from proxies; never parsed)
    pub const HTML: &str = "text/html";

    /// Extract the lowercase essence (`type/subtype`) of a Content-Type value,
    /// dropping any parameters such as `charset`.
    pub fn essence(content_type: &str) -> String {
        content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    }
}
