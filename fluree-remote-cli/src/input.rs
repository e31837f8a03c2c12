use crate::error::{CliError, CliResult};
use fluree_remote_client::Node;
use std::io::{self, IsTerminal, Read};
use std::path::Path;

/// Resolve the query text: `-f` file > positional (`@path` reads a file) > stdin
pub fn read_query(positional: Option<&str>, file: Option<&Path>) -> CliResult<String> {
    let text = if let Some(path) = file {
        read_file(path)?
    } else if let Some(q) = positional {
        match q.strip_prefix('@') {
            Some(path) => read_file(Path::new(path))?,
            None => q.to_string(),
        }
    } else if !io::stdin().is_terminal() {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::Input(format!("failed to read stdin: {e}")))?;
        buf
    } else {
        return Err(CliError::Usage(
            "no query provided: pass it inline, use -f for a file, or pipe via stdin".to_string(),
        ));
    };

    if text.trim().is_empty() {
        return Err(CliError::Input("query text is empty".to_string()));
    }
    Ok(text)
}

fn read_file(path: &Path) -> CliResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| CliError::Input(format!("failed to read {}: {e}", path.display())))
}

/// Split `name=term` and parse the term; a missing `$` sigil is added
pub fn parse_param(arg: &str) -> CliResult<(String, Node)> {
    let (name, term) = arg
        .split_once('=')
        .ok_or_else(|| CliError::Usage(format!("--param '{arg}' must have the form NAME=TERM")))?;
    let name = if name.starts_with('$') {
        name.to_string()
    } else {
        format!("${name}")
    };
    Ok((name, parse_term(term)?))
}

/// Parse the N-Triples-like term syntax accepted on the command line.
///
/// Anything that is not `<iri>`, `_:label` or a quoted literal is taken as a
/// plain string.
pub fn parse_term(text: &str) -> CliResult<Node> {
    if let Some(iri) = text.strip_prefix('<').and_then(|t| t.strip_suffix('>')) {
        return Ok(Node::iri(iri));
    }
    if let Some(label) = text.strip_prefix("_:") {
        if label.is_empty() {
            return Err(CliError::Input("blank node label is empty".to_string()));
        }
        return Ok(Node::blank(label));
    }
    if let Some(rest) = text.strip_prefix('"') {
        let (lexical, suffix) = split_quoted(rest)
            .ok_or_else(|| CliError::Input(format!("unterminated literal: {text}")))?;
        if suffix.is_empty() {
            return Ok(Node::string(lexical));
        }
        if let Some(lang) = suffix.strip_prefix('@') {
            if lang.is_empty() {
                return Err(CliError::Input(format!("empty language tag: {text}")));
            }
            return Ok(Node::lang_string(lexical, lang));
        }
        if let Some(dt) = suffix
            .strip_prefix("^^<")
            .and_then(|d| d.strip_suffix('>'))
        {
            return Ok(Node::typed(lexical, dt));
        }
        return Err(CliError::Input(format!("unexpected text after literal: {suffix}")));
    }
    Ok(Node::string(text))
}

/// Unescape up to the closing quote; returns the lexical form and the rest
fn split_quoted(s: &str) -> Option<(String, &str)> {
    let mut out = String::new();
    let mut chars = s.char_indices();
    while let Some((i, c)) = chars.next() {
        match c {
            '"' => return Some((out, &s[i + 1..])),
            '\\' => {
                let (_, esc) = chars.next()?;
                out.push(match esc {
                    'n' => '\n',
                    't' => '\t',
                    'r' => '\r',
                    other => other,
                });
            }
            c => out.push(c),
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluree_vocab::xsd;

    #[test]
    fn test_parse_term_forms() {
        assert_eq!(parse_term("<http://ex.org/a>").ok(), Some(Node::iri("http://ex.org/a")));
        assert_eq!(parse_term("_:b1").ok(), Some(Node::blank("b1")));
        assert_eq!(parse_term("hello world").ok(), Some(Node::string("hello world")));
        assert_eq!(parse_term(r#""chat"@fr"#).ok(), Some(Node::lang_string("chat", "fr")));
        assert_eq!(
            parse_term(&format!("\"42\"^^<{}>", xsd::INT)).ok(),
            Some(Node::typed("42", xsd::INT))
        );
        assert_eq!(parse_term(r#""say \"hi\"""#).ok(), Some(Node::string("say \"hi\"")));
    }

    #[test]
    fn test_parse_term_errors() {
        assert!(parse_term("_:").is_err());
        assert!(parse_term(r#""open"#).is_err());
        assert!(parse_term(r#""x"@"#).is_err());
        assert!(parse_term(r#""x"junk"#).is_err());
    }

    #[test]
    fn test_parse_param_adds_sigil() {
        let (name, node) = parse_param("s=<http://a>").ok().unwrap();
        assert_eq!(name, "$s");
        assert_eq!(node, Node::iri("http://a"));

        let (name, node) = parse_param("$q=a=b").ok().unwrap();
        assert_eq!(name, "$q");
        assert_eq!(node, Node::string("a=b"));
    }

    #[test]
    fn test_read_query_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("q.rq");
        std::fs::write(&path, "ASK { ?s ?p ?o }").unwrap();
        let arg = format!("@{}", path.display());
        assert_eq!(read_query(Some(&arg), None).ok().as_deref(), Some("ASK { ?s ?p ?o }"));
        assert_eq!(read_query(None, Some(&path)).ok().as_deref(), Some("ASK { ?s ?p ?o }"));
        assert!(read_query(Some("   "), None).is_err());
    }
}
