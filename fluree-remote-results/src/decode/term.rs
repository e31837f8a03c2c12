//! Single-term decoder

use crate::error::Result;
use crate::lex::{JsonReader, JsonToken};
use crate::walk::walk_object;
use fluree_remote_term::{Iri, Literal, Node};
use std::io::BufRead;

/// Which wire format a term object comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TermSyntax {
    /// Tabular results: language under `xml:lang`, blank labels bare
    Bindings,
    /// Triples documents: language under `lang`, blank labels prefixed `_:`
    Triples,
}

impl TermSyntax {
    fn language_key(self) -> &'static str {
        match self {
            TermSyntax::Bindings => "xml:lang",
            TermSyntax::Triples => "lang",
        }
    }
}

/// Decode one term object whose first token is `first`.
///
/// Returns `None` for `null` and for term types this client does not know;
/// new types are ignored rather than failing the row.
pub fn decode_term<R: BufRead>(
    reader: &mut JsonReader<R>,
    first: &JsonToken,
    syntax: TermSyntax,
) -> Result<Option<Node>> {
    if *first == JsonToken::Null {
        return Ok(None);
    }

    let mut kind = None;
    let mut value = None;
    let mut datatype = None;
    let mut language = None;
    let lang_key = syntax.language_key();

    walk_object(reader, first, |_, name, token| {
        if let JsonToken::String(s) = token {
            match name.as_str() {
                "type" => kind = Some(s),
                "value" => value = Some(s),
                "datatype" => datatype = Some(s),
                key if key == lang_key => language = Some(s),
                _ => {}
            }
        }
        Ok(())
    })?;

    let (Some(kind), Some(value)) = (kind, value) else {
        tracing::trace!("term object without type or value ignored");
        return Ok(None);
    };

    let node = match kind.as_str() {
        "uri" => Node::Iri(Iri::new(value)),
        "literal" | "typed-literal" => match language {
            Some(lang) if !lang.is_empty() => Node::Literal(Literal::lang_string(value, lang)),
            _ => Node::Literal(Literal::new(value, datatype.map(Iri::new))),
        },
        "bnode" => match syntax {
            TermSyntax::Triples => Node::blank(value.strip_prefix("_:").unwrap_or(&value)),
            TermSyntax::Bindings => Node::blank(value),
        },
        other => {
            tracing::trace!(term_type = other, "unknown term type ignored");
            return Ok(None);
        }
    };
    Ok(Some(node))
}

/// Subject/predicate keys of a triples document: `_:label`, or an IRI that
/// may be written bare or in angle brackets
pub(crate) fn node_from_key(key: &str) -> Node {
    if let Some(label) = key.strip_prefix("_:") {
        return Node::blank(label);
    }
    let iri = key
        .strip_prefix('<')
        .and_then(|k| k.strip_suffix('>'))
        .unwrap_or(key);
    Node::iri(iri)
}
