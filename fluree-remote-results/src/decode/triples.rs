//! Triples-document row decoder
//!
//! The document nests three levels:
//!
//! ```text
//! { "<subject>": { "<predicate>": [ {term}, {term}, ... ], ... }, ... }
//! ```
//!
//! Each call yields exactly one `[subject, predicate, object]` row. The
//! decoder is a small resumable state machine: the subject and predicate
//! currently open are carried in the state, so the next call picks up at the
//! next object term without re-reading anything.

use super::term::{decode_term, node_from_key, TermSyntax};
use crate::error::{Result, ResultsError};
use crate::lex::{JsonReader, JsonToken};
use crate::response::{Row, RowDecoder};
use fluree_remote_term::Node;
use std::io::BufRead;

#[derive(Debug)]
enum State {
    /// Inside the root object, before a subject key
    AwaitSubject,
    /// Inside a subject's predicate map
    AwaitPredicate { subject: Node },
    /// Inside a predicate's object array
    AwaitObject { subject: Node, predicate: Node },
    End,
}

pub struct TriplesDecoder<R> {
    reader: JsonReader<R>,
    state: State,
}

impl<R: BufRead> TriplesDecoder<R> {
    /// `reader` must be positioned just after the root `{`
    pub fn new(reader: JsonReader<R>) -> Self {
        Self {
            reader,
            state: State::AwaitSubject,
        }
    }

    fn expect_open(&mut self, expected: JsonToken, what: &str) -> Result<()> {
        let token = self.reader.expect_token()?;
        if token != expected {
            return Err(ResultsError::protocol(format!(
                "expected {} for {}, found {}",
                expected.describe(),
                what,
                token.describe()
            )));
        }
        Ok(())
    }
}

impl<R: BufRead + Send> RowDecoder for TriplesDecoder<R> {
    fn next_row(&mut self) -> Result<Option<Row>> {
        loop {
            match std::mem::replace(&mut self.state, State::End) {
                State::End => return Ok(None),
                State::AwaitSubject => match self.reader.expect_token()? {
                    JsonToken::EndObject => return Ok(None),
                    JsonToken::FieldName(key) => {
                        self.expect_open(JsonToken::BeginObject, "a predicate map")?;
                        self.state = State::AwaitPredicate {
                            subject: node_from_key(&key),
                        };
                    }
                    other => return Err(unexpected(&other, "a subject")),
                },
                State::AwaitPredicate { subject } => match self.reader.expect_token()? {
                    JsonToken::EndObject => self.state = State::AwaitSubject,
                    JsonToken::FieldName(key) => {
                        self.expect_open(JsonToken::BeginArray, "an object list")?;
                        self.state = State::AwaitObject {
                            subject,
                            predicate: node_from_key(&key),
                        };
                    }
                    other => return Err(unexpected(&other, "a predicate")),
                },
                State::AwaitObject { subject, predicate } => {
                    let token = self.reader.expect_token()?;
                    if token == JsonToken::EndArray {
                        self.state = State::AwaitPredicate { subject };
                        continue;
                    }
                    let object = decode_term(&mut self.reader, &token, TermSyntax::Triples)?;
                    let row = object.map(|o| vec![Some(subject.clone()), Some(predicate.clone()), Some(o)]);
                    self.state = State::AwaitObject { subject, predicate };
                    if row.is_some() {
                        return Ok(row);
                    }
                }
            }
        }
    }
}

fn unexpected(token: &JsonToken, what: &str) -> ResultsError {
    ResultsError::protocol(format!("expected {}, found {}", what, token.describe()))
}
