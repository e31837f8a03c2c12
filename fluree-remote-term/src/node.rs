//! RDF term types: IRI, blank node, and literal
//!
//! A [`Node`] is a single cell of a result row. A node can be:
//! - An IRI (always expanded, never prefixed)
//! - A blank node (opaque label, without the `_:` prefix)
//! - A literal (lexical form + explicit datatype + optional language tag)
//!
//! Literals keep their lexical form exactly as received from the wire;
//! interpretation into native values happens on demand in [`crate::convert`].

use fluree_vocab::xsd;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// An expanded IRI
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Iri(Arc<str>);

impl Iri {
    pub fn new(iri: impl AsRef<str>) -> Self {
        Self(Arc::from(iri.as_ref()))
    }

    /// xsd:string - datatype of plain and language-tagged literals
    pub fn xsd_string() -> Self {
        Self::new(xsd::STRING)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_xsd_string(&self) -> bool {
        self.as_str() == xsd::STRING
    }
}

impl AsRef<str> for Iri {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Blank node identifier
///
/// Labels are only meaningful within a single response.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label
    ///
    /// The label should NOT include the `_:` prefix.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// Get the label (without `_:` prefix)
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// An RDF literal
///
/// # Invariants
///
/// - The datatype is always present; literals built without one use `xsd:string`.
/// - A language tag is only carried by `xsd:string` literals.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "LiteralRepr")]
pub struct Literal {
    lexical: Arc<str>,
    datatype: Iri,
    language: Option<Arc<str>>,
}

impl Literal {
    /// Create a literal; a missing datatype defaults to `xsd:string`
    pub fn new(lexical: impl AsRef<str>, datatype: Option<Iri>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: datatype.unwrap_or_else(Iri::xsd_string),
            language: None,
        }
    }

    /// Create a language-tagged string literal
    pub fn lang_string(lexical: impl AsRef<str>, language: impl AsRef<str>) -> Self {
        Self {
            lexical: Arc::from(lexical.as_ref()),
            datatype: Iri::xsd_string(),
            language: Some(Arc::from(language.as_ref())),
        }
    }

    pub fn lexical_form(&self) -> &str {
        &self.lexical
    }

    pub fn datatype(&self) -> &Iri {
        &self.datatype
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }
}

/// Serialized shape of a [`Literal`], checked on the way in
#[derive(Deserialize)]
struct LiteralRepr {
    lexical: String,
    datatype: Option<Iri>,
    language: Option<String>,
}

impl TryFrom<LiteralRepr> for Literal {
    type Error = String;

    fn try_from(repr: LiteralRepr) -> Result<Self, Self::Error> {
        let Some(language) = repr.language else {
            return Ok(Literal::new(repr.lexical, repr.datatype));
        };
        if language.is_empty() {
            return Err("language tag is empty".to_string());
        }
        match repr.datatype {
            Some(dt) if !dt.is_xsd_string() => Err(format!(
                "language-tagged literal must have datatype {}, got {}",
                xsd::STRING,
                dt
            )),
            _ => Ok(Literal::lang_string(repr.lexical, language)),
        }
    }
}

/// An RDF term (one cell of a result row)
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Node {
    /// Full expanded IRI (e.g., "http://schema.org/Person")
    Iri(Iri),

    /// Literal value with explicit datatype
    Literal(Literal),

    /// Blank node with response-local label
    Blank(BlankId),
}

impl Node {
    /// Create an IRI term from an expanded IRI string
    pub fn iri(iri: impl AsRef<str>) -> Self {
        Node::Iri(Iri::new(iri))
    }

    /// Create a blank node term
    pub fn blank(label: impl AsRef<str>) -> Self {
        Node::Blank(BlankId::new(label))
    }

    /// Create a plain string literal (xsd:string)
    pub fn string(value: impl AsRef<str>) -> Self {
        Node::Literal(Literal::new(value, None))
    }

    /// Create a language-tagged string literal
    pub fn lang_string(value: impl AsRef<str>, lang: impl AsRef<str>) -> Self {
        Node::Literal(Literal::lang_string(value, lang))
    }

    /// Create a typed literal from a lexical form and datatype IRI
    pub fn typed(lexical: impl AsRef<str>, datatype: impl AsRef<str>) -> Self {
        Node::Literal(Literal::new(lexical, Some(Iri::new(datatype))))
    }

    pub fn is_iri(&self) -> bool {
        matches!(self, Node::Iri(_))
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, Node::Blank(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Node::Literal(_))
    }

    /// Try to get as IRI string
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            Node::Iri(iri) => Some(iri.as_str()),
            _ => None,
        }
    }

    /// Try to get as blank node ID
    pub fn as_blank(&self) -> Option<&BlankId> {
        match self {
            Node::Blank(id) => Some(id),
            _ => None,
        }
    }

    /// Try to get as literal
    pub fn as_literal(&self) -> Option<&Literal> {
        match self {
            Node::Literal(lit) => Some(lit),
            _ => None,
        }
    }

    /// Short description of the node's type, used in conversion errors
    pub fn type_label(&self) -> &str {
        match self {
            Node::Iri(_) => "IRI",
            Node::Blank(_) => "blank node",
            Node::Literal(lit) => lit.datatype().as_str(),
        }
    }
}

/// Escape a lexical form for N-Triples output
fn write_escaped(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

/// N-Triples term syntax; this is also the parameter text sent to the endpoint.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Iri(iri) => write!(f, "<{}>", iri),
            Node::Blank(id) => write!(f, "{}", id),
            Node::Literal(lit) => {
                f.write_str("\"")?;
                write_escaped(f, lit.lexical_form())?;
                f.write_str("\"")?;
                if let Some(lang) = lit.language() {
                    write!(f, "@{}", lang)
                } else if !lit.datatype().is_xsd_string() {
                    write!(f, "^^<{}>", lit.datatype())
                } else {
                    Ok(())
                }
            }
        }
    }
}

impl From<Literal> for Node {
    fn from(lit: Literal) -> Self {
        Node::Literal(lit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_id() {
        let id = BlankId::new("b0");
        assert_eq!(id.as_str(), "b0");
        assert_eq!(format!("{}", id), "_:b0");
    }

    #[test]
    fn test_literal_defaults_to_xsd_string() {
        let lit = Literal::new("hello", None);
        assert!(lit.datatype().is_xsd_string());
        assert_eq!(lit.language(), None);

        let lang = Literal::lang_string("bonjour", "fr");
        assert!(lang.datatype().is_xsd_string());
        assert_eq!(lang.language(), Some("fr"));
    }

    #[test]
    fn test_literal_deserialize_checks_language() {
        let lit = Literal::lang_string("chat", "fr");
        let json = serde_json::to_string(&lit).unwrap();
        assert_eq!(serde_json::from_str::<Literal>(&json).unwrap(), lit);

        let plain: Literal = serde_json::from_str(r#"{"lexical": "x", "datatype": null, "language": null}"#).unwrap();
        assert!(plain.datatype().is_xsd_string());

        let tagged_int = format!(
            r#"{{"lexical": "5", "datatype": "{}", "language": "en"}}"#,
            xsd::INT
        );
        assert!(serde_json::from_str::<Literal>(&tagged_int).is_err());
        assert!(serde_json::from_str::<Literal>(r#"{"lexical": "x", "datatype": null, "language": ""}"#).is_err());
    }

    #[test]
    fn test_node_constructors() {
        let iri = Node::iri("http://example.org/foo");
        assert!(iri.is_iri());
        assert_eq!(iri.as_iri(), Some("http://example.org/foo"));

        let blank = Node::blank("b0");
        assert!(blank.is_blank());
        assert_eq!(blank.as_blank().map(BlankId::as_str), Some("b0"));

        let typed = Node::typed("42", xsd::INT);
        let lit = typed.as_literal().unwrap();
        assert_eq!(lit.lexical_form(), "42");
        assert_eq!(lit.datatype().as_str(), xsd::INT);
        assert_eq!(typed.type_label(), xsd::INT);
    }

    #[test]
    fn test_node_display() {
        assert_eq!(
            format!("{}", Node::iri("http://example.org")),
            "<http://example.org>"
        );
        assert_eq!(format!("{}", Node::blank("b0")), "_:b0");
        assert_eq!(format!("{}", Node::string("hello")), "\"hello\"");
        assert_eq!(
            format!("{}", Node::lang_string("bonjour", "fr")),
            "\"bonjour\"@fr"
        );
        assert_eq!(
            format!("{}", Node::typed("42", xsd::INTEGER)),
            "\"42\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
    }

    #[test]
    fn test_display_escapes_lexical_form() {
        let node = Node::string("say \"hi\"\nback\\slash");
        assert_eq!(format!("{}", node), r#""say \"hi\"\nback\\slash""#);
    }
}
