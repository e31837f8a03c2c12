//! Tabular (bindings) row decoder

use super::term::{decode_term, TermSyntax};
use crate::error::{Result, ResultsError};
use crate::lex::{JsonReader, JsonToken};
use crate::response::{Row, RowDecoder};
use crate::walk::walk_object;
use std::collections::HashMap;
use std::io::BufRead;

/// Upper bound on tokens read after the bindings array closes
const DRAIN_LIMIT: usize = 16;

/// Decodes one binding object per call into a row indexed by column position
pub struct BindingsDecoder<R> {
    reader: JsonReader<R>,
    /// Variable name -> column index
    columns: HashMap<String, usize>,
    width: usize,
    done: bool,
}

impl<R: BufRead> BindingsDecoder<R> {
    /// `reader` must be positioned just after the `[` of the bindings array
    pub fn new(reader: JsonReader<R>, columns: HashMap<String, usize>, width: usize) -> Self {
        Self {
            reader,
            columns,
            width,
            done: false,
        }
    }

    /// Read whatever closing tokens follow the bindings array, up to a bound.
    ///
    /// Lets a keep-alive connection be returned clean in the common case
    /// without ever blocking on an unbounded tail.
    fn drain(&mut self) {
        for _ in 0..DRAIN_LIMIT {
            if self.reader.is_finished() {
                break;
            }
            match self.reader.next_token() {
                Ok(Some(tok)) if tok.is_end() => {}
                Ok(_) => break,
                Err(e) => {
                    tracing::trace!(error = %e, "ignoring error while draining result tail");
                    break;
                }
            }
        }
    }
}

impl<R: BufRead + Send> RowDecoder for BindingsDecoder<R> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        if self.done {
            return Ok(None);
        }
        let token = self.reader.expect_token()?;
        match token {
            JsonToken::EndArray => {
                self.done = true;
                self.drain();
                Ok(None)
            }
            JsonToken::BeginObject => {
                let mut row: Row = vec![None; self.width];
                let columns = &self.columns;
                walk_object(&mut self.reader, &token, |reader, var, value| {
                    match columns.get(&var) {
                        Some(&idx) => row[idx] = decode_term(reader, &value, TermSyntax::Bindings)?,
                        None => tracing::trace!(var = %var, "binding for undeclared variable ignored"),
                    }
                    Ok(())
                })?;
                Ok(Some(row))
            }
            other => Err(ResultsError::protocol(format!(
                "expected a binding object, found {}",
                other.describe()
            ))),
        }
    }
}
