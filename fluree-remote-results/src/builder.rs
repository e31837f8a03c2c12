//! Response builders
//!
//! A builder reads a document's header sections and hands the reader, now
//! positioned at the first row, to the matching row decoder.

use crate::decode::{decode_columns, BindingsDecoder, Column, TriplesDecoder};
use crate::error::{Result, ResultsError};
use crate::lex::{JsonReader, JsonToken};
use crate::response::Response;
use crate::walk::{read_string_array, skip_value, walk_object};
use std::collections::{HashMap, HashSet};
use std::io::BufRead;

/// Build a response from a tabular results document.
///
/// Top-level members may come in any order:
/// - `metadata`: optional column descriptors
/// - `head.vars`: required before `results.bindings`
/// - `boolean`: an ASK result; the rest of the document is drained and a
///   boolean response returned
/// - `results.bindings`: the row array; decoding stops here and rows are
///   read lazily
pub fn build_tabular<R>(source: R) -> Result<Response>
where
    R: BufRead + Send + 'static,
{
    let mut reader = JsonReader::new(source);
    let root = reader.expect_token()?;
    if root != JsonToken::BeginObject {
        return Err(ResultsError::protocol(format!(
            "expected a results object, found {}",
            root.describe()
        )));
    }

    let mut metadata: Option<Vec<Column>> = None;
    let mut vars: Option<Vec<String>> = None;

    loop {
        let name = match reader.expect_token()? {
            JsonToken::EndObject => {
                return Err(ResultsError::protocol(
                    "results document has neither 'boolean' nor 'results.bindings'",
                ))
            }
            JsonToken::FieldName(name) => name,
            other => {
                return Err(ResultsError::protocol(format!(
                    "expected a field name, found {}",
                    other.describe()
                )))
            }
        };
        let value = reader.expect_token()?;

        match name.as_str() {
            "metadata" => metadata = Some(decode_columns(&mut reader, &value)?),
            "head" => {
                walk_object(&mut reader, &value, |reader, field, token| {
                    if field == "vars" {
                        vars = Some(read_string_array(reader, &token)?);
                    }
                    Ok(())
                })?;
            }
            "boolean" => {
                let JsonToken::Bool(answer) = value else {
                    return Err(ResultsError::protocol(format!(
                        "expected a boolean, found {}",
                        value.describe()
                    )));
                };
                reader.skip_to_depth(0)?;
                tracing::debug!(answer, "boolean result");
                return Ok(Response::boolean(answer));
            }
            "results" => {
                if value != JsonToken::BeginObject {
                    return Err(ResultsError::protocol(format!(
                        "expected 'results' to be an object, found {}",
                        value.describe()
                    )));
                }
                if find_bindings(&mut reader)? {
                    let vars = vars.take().ok_or_else(|| {
                        ResultsError::protocol("'results.bindings' appeared without 'head.vars'")
                    })?;
                    let columns = build_columns(metadata.take(), &vars)?;
                    let index: HashMap<String, usize> = vars
                        .into_iter()
                        .enumerate()
                        .map(|(i, v)| (v, i))
                        .collect();
                    tracing::debug!(columns = columns.len(), "tabular result header decoded");
                    let width = columns.len();
                    let decoder = BindingsDecoder::new(reader, index, width);
                    return Ok(Response::rows(columns, Box::new(decoder)));
                }
            }
            _ => skip_value(&mut reader, &value)?,
        }
    }
}

/// Scan the members of `results` for `bindings`.
///
/// Returns `true` with the reader just inside the bindings array, or
/// `false` after consuming a `results` object that has none.
fn find_bindings<R: BufRead>(reader: &mut JsonReader<R>) -> Result<bool> {
    loop {
        match reader.expect_token()? {
            JsonToken::EndObject => return Ok(false),
            JsonToken::FieldName(name) => {
                let value = reader.expect_token()?;
                if name == "bindings" {
                    if value != JsonToken::BeginArray {
                        return Err(ResultsError::protocol(format!(
                            "expected 'bindings' to be an array, found {}",
                            value.describe()
                        )));
                    }
                    return Ok(true);
                }
                skip_value(reader, &value)?;
            }
            other => {
                return Err(ResultsError::protocol(format!(
                    "expected a field name, found {}",
                    other.describe()
                )))
            }
        }
    }
}

/// Columns from `metadata` when present (arity must match `vars`), otherwise
/// one plain column per variable. Names must be unique.
fn build_columns(metadata: Option<Vec<Column>>, vars: &[String]) -> Result<Vec<Column>> {
    let columns = match metadata {
        Some(columns) => {
            if columns.len() != vars.len() {
                return Err(ResultsError::protocol(format!(
                    "metadata describes {} columns but head.vars names {}",
                    columns.len(),
                    vars.len()
                )));
            }
            columns
        }
        None => vars
            .iter()
            .enumerate()
            .map(|(i, v)| Column::named(i, v.as_str()))
            .collect(),
    };

    let mut seen = HashSet::new();
    if let Some(dup) = vars.iter().find(|v| !seen.insert(v.as_str())) {
        return Err(ResultsError::protocol(format!("duplicate variable '{}'", dup)));
    }
    let mut names = HashSet::new();
    for column in &columns {
        if !names.insert(column.name.as_str()) {
            return Err(ResultsError::protocol(format!(
                "duplicate column name '{}'",
                column.name
            )));
        }
    }
    Ok(columns)
}

/// Build a response from a triples document: always the three required
/// columns `subject`, `predicate`, `object`.
pub fn build_triples<R>(source: R) -> Result<Response>
where
    R: BufRead + Send + 'static,
{
    let mut reader = JsonReader::new(source);
    let root = reader.expect_token()?;
    if root != JsonToken::BeginObject {
        return Err(ResultsError::protocol(format!(
            "expected a triples object, found {}",
            root.describe()
        )));
    }
    let columns = ["subject", "predicate", "object"]
        .into_iter()
        .enumerate()
        .map(|(i, name)| Column::named(i, name).with_required(true))
        .collect();
    Ok(Response::rows(columns, Box::new(TriplesDecoder::new(reader))))
}
