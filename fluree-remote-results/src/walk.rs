//! Array/object walking primitives
//!
//! Every decoder is built from these two routines. The callback receives
//! the element (or member value) token it is responsible for; whatever part
//! of a nested element the callback leaves unread is skipped before the next
//! element, so unknown fields and newer nested structures are tolerated.

use crate::error::{Result, ResultsError};
use crate::lex::{JsonReader, JsonToken};
use std::io::BufRead;

/// Walk the elements of an array whose `[` token is `first`.
///
/// Stops after the matching `]`.
pub fn walk_array<R, F>(reader: &mut JsonReader<R>, first: &JsonToken, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&mut JsonReader<R>, JsonToken) -> Result<()>,
{
    if *first != JsonToken::BeginArray {
        return Err(ResultsError::protocol(format!(
            "expected an array, found {}",
            first.describe()
        )));
    }
    let depth = reader.depth();
    loop {
        let token = reader.expect_token()?;
        if token == JsonToken::EndArray {
            return Ok(());
        }
        f(reader, token)?;
        if reader.depth() < depth {
            // The callback consumed the closing bracket
            return Ok(());
        }
        reader.skip_to_depth(depth)?;
    }
}

/// Walk the members of an object whose `{` token is `first`.
///
/// The callback gets each member's name and the first token of its value.
/// Stops after the matching `}`.
pub fn walk_object<R, F>(reader: &mut JsonReader<R>, first: &JsonToken, mut f: F) -> Result<()>
where
    R: BufRead,
    F: FnMut(&mut JsonReader<R>, String, JsonToken) -> Result<()>,
{
    if *first != JsonToken::BeginObject {
        return Err(ResultsError::protocol(format!(
            "expected an object, found {}",
            first.describe()
        )));
    }
    let depth = reader.depth();
    loop {
        let name = match reader.expect_token()? {
            JsonToken::EndObject => return Ok(()),
            JsonToken::FieldName(name) => name,
            other => {
                return Err(ResultsError::protocol(format!(
                    "expected a field name, found {}",
                    other.describe()
                )))
            }
        };
        let value = reader.expect_token()?;
        f(reader, name, value)?;
        if reader.depth() < depth {
            return Ok(());
        }
        reader.skip_to_depth(depth)?;
    }
}

/// Skip a value whose first token has already been read
pub fn skip_value<R: BufRead>(reader: &mut JsonReader<R>, first: &JsonToken) -> Result<()> {
    if first.is_begin() {
        reader.skip_children()?;
    }
    Ok(())
}

/// Read an array of strings (e.g. `head.vars`)
pub fn read_string_array<R: BufRead>(
    reader: &mut JsonReader<R>,
    first: &JsonToken,
) -> Result<Vec<String>> {
    let mut out = Vec::new();
    walk_array(reader, first, |_, token| match token {
        JsonToken::String(s) => {
            out.push(s);
            Ok(())
        }
        other => Err(ResultsError::protocol(format!(
            "expected a string element, found {}",
            other.describe()
        ))),
    })?;
    Ok(out)
}
