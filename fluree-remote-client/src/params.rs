//! Form body construction

use crate::error::{QueryError, Result};
use fluree_remote_term::Node;
use std::borrow::Borrow;

/// Prefix every parameter name must carry
pub const PARAM_SIGIL: char = '$';

/// Form field holding the query text
pub const QUERY_FIELD: &str = "query";

/// Check a parameter name: the sigil followed by at least one character
pub fn validate_param_name(name: &str) -> Result<()> {
    match name.strip_prefix(PARAM_SIGIL) {
        Some(rest) if !rest.is_empty() => Ok(()),
        _ => Err(QueryError::InvalidParameter(name.to_string())),
    }
}

/// Form fields for a query: `query=<text>` then one `$name=<term>` per
/// parameter, in the order given. Terms are sent in N-Triples syntax.
pub fn form_fields<I, K, V>(query: &str, params: I) -> Result<Vec<(String, String)>>
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: Borrow<Node>,
{
    let mut fields = vec![(QUERY_FIELD.to_string(), query.to_string())];
    for (name, value) in params {
        let name = name.as_ref();
        validate_param_name(name)?;
        fields.push((name.to_string(), value.borrow().to_string()));
    }
    Ok(fields)
}
