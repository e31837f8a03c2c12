//! Column descriptors

use crate::error::{Result, ResultsError};
use crate::lex::{JsonReader, JsonToken};
use crate::walk::{walk_array, walk_object};
use serde::Serialize;
use std::io::BufRead;

/// One result column
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    /// Zero-based position in each row
    pub index: usize,
    /// Unique within a response
    pub name: String,
    pub description: Option<String>,
    pub datatype_iri: Option<String>,
    pub format_string: Option<String>,
    pub units: Option<String>,
    pub scaling_factor: Option<f64>,
    pub required: bool,
}

impl Column {
    pub fn named(index: usize, name: impl Into<String>) -> Self {
        Self {
            index,
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

/// Decode a `metadata` array of column descriptor objects.
///
/// Every entry needs a `name`; unknown fields are ignored.
pub fn decode_columns<R: BufRead>(
    reader: &mut JsonReader<R>,
    first: &JsonToken,
) -> Result<Vec<Column>> {
    let mut columns = Vec::new();
    walk_array(reader, first, |reader, token| {
        let index = columns.len();
        let mut column = Column {
            index,
            ..Default::default()
        };
        let mut name = None;
        walk_object(reader, &token, |_, field, value| {
            match (field.as_str(), value) {
                ("name", JsonToken::String(s)) => name = Some(s),
                ("description", JsonToken::String(s)) => column.description = Some(s),
                ("type" | "datatype", JsonToken::String(s)) => column.datatype_iri = Some(s),
                ("formatString", JsonToken::String(s)) => column.format_string = Some(s),
                ("units", JsonToken::String(s)) => column.units = Some(s),
                ("scalingFactor", JsonToken::Number(n) | JsonToken::String(n)) => {
                    let factor = n.parse::<f64>().map_err(|_| {
                        ResultsError::protocol(format!("invalid scalingFactor '{}'", n))
                    })?;
                    column.scaling_factor = Some(factor);
                }
                ("required", JsonToken::Bool(b)) => column.required = b,
                _ => {}
            }
            Ok(())
        })?;
        column.name = name.ok_or_else(|| {
            ResultsError::protocol(format!("column descriptor {} has no name", index))
        })?;
        columns.push(column);
        Ok(())
    })?;
    Ok(columns)
}
