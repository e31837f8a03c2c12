//! JSON pull reader
//!
//! Reads one token at a time from a [`BufRead`] source. The reader tracks the
//! nesting context itself, so callers can suspend between any two tokens and
//! resume later without re-parsing.
//!
//! The reader never consumes bytes beyond the closing token of the root
//! value; a connection can be reused for the next request once the document
//! has been read to its end.

use super::token::JsonToken;
use crate::error::{Result, ResultsError};
use std::io::BufRead;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ObjectState {
    /// Just after `{`
    KeyOrEnd,
    /// After `,`
    Key,
    /// After `name:`
    Value,
    /// After a member value
    CommaOrEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ArrayState {
    /// Just after `[`
    ValueOrEnd,
    /// After `,`
    Value,
    /// After an element
    CommaOrEnd,
}

#[derive(Clone, Copy, Debug)]
enum Frame {
    Object(ObjectState),
    Array(ArrayState),
}

/// Streaming JSON tokenizer
pub struct JsonReader<R> {
    inner: R,
    stack: Vec<Frame>,
    /// Bytes consumed so far (for error messages)
    position: u64,
    /// The root value has been fully read
    finished: bool,
}

impl<R: BufRead> JsonReader<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            stack: Vec::with_capacity(8),
            position: 0,
            finished: false,
        }
    }

    /// Current nesting depth (0 outside the root value)
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Byte offset of the next unread byte
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the root value has been read completely
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Recover the underlying source
    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Pull the next token.
    ///
    /// Returns `Ok(None)` once the root value has been closed. Running out
    /// of input before that is a protocol error.
    pub fn next_token(&mut self) -> Result<Option<JsonToken>> {
        if self.finished {
            return Ok(None);
        }
        loop {
            self.skip_whitespace()?;
            let frame = match self.stack.last().copied() {
                None => return self.read_value().map(Some),
                Some(frame) => frame,
            };
            match frame {
                Frame::Object(ObjectState::KeyOrEnd) => {
                    if self.peek_byte()? == Some(b'}') {
                        return self.close(b'}', JsonToken::EndObject).map(Some);
                    }
                    return self.read_field_name().map(Some);
                }
                Frame::Object(ObjectState::Key) => return self.read_field_name().map(Some),
                Frame::Object(ObjectState::Value) => return self.read_value().map(Some),
                Frame::Object(ObjectState::CommaOrEnd) => match self.peek_byte()? {
                    Some(b',') => {
                        self.bump();
                        self.set_top(Frame::Object(ObjectState::Key));
                    }
                    Some(b'}') => return self.close(b'}', JsonToken::EndObject).map(Some),
                    other => return Err(self.unexpected(other, "',' or '}'")),
                },
                Frame::Array(ArrayState::ValueOrEnd) => {
                    if self.peek_byte()? == Some(b']') {
                        return self.close(b']', JsonToken::EndArray).map(Some);
                    }
                    return self.read_value().map(Some);
                }
                Frame::Array(ArrayState::Value) => return self.read_value().map(Some),
                Frame::Array(ArrayState::CommaOrEnd) => match self.peek_byte()? {
                    Some(b',') => {
                        self.bump();
                        self.set_top(Frame::Array(ArrayState::Value));
                    }
                    Some(b']') => return self.close(b']', JsonToken::EndArray).map(Some),
                    other => return Err(self.unexpected(other, "',' or ']'")),
                },
            }
        }
    }

    /// Pull the next token, treating the end of the document as an error
    pub fn expect_token(&mut self) -> Result<JsonToken> {
        self.next_token()?
            .ok_or_else(|| ResultsError::protocol("unexpected end of JSON document"))
    }

    /// Read tokens until the depth drops to `depth` or the document ends
    pub fn skip_to_depth(&mut self, depth: usize) -> Result<()> {
        while self.depth() > depth {
            if self.next_token()?.is_none() {
                break;
            }
        }
        Ok(())
    }

    /// Skip the remainder of a structure whose opening token was just read
    pub fn skip_children(&mut self) -> Result<()> {
        let depth = self.depth().saturating_sub(1);
        self.skip_to_depth(depth)
    }

    // =========================================================================
    // Values
    // =========================================================================

    fn read_value(&mut self) -> Result<JsonToken> {
        let b = match self.peek_byte()? {
            Some(b) => b,
            None => return Err(self.unexpected(None, "a value")),
        };
        match b {
            b'{' => {
                self.bump();
                self.value_started();
                self.stack.push(Frame::Object(ObjectState::KeyOrEnd));
                Ok(JsonToken::BeginObject)
            }
            b'[' => {
                self.bump();
                self.value_started();
                self.stack.push(Frame::Array(ArrayState::ValueOrEnd));
                Ok(JsonToken::BeginArray)
            }
            b'"' => {
                self.bump();
                let s = self.read_string_body()?;
                self.scalar_done();
                Ok(JsonToken::String(s))
            }
            b'-' | b'0'..=b'9' => {
                let n = self.read_number()?;
                self.scalar_done();
                Ok(JsonToken::Number(n))
            }
            b't' => {
                self.expect_literal(b"true")?;
                self.scalar_done();
                Ok(JsonToken::Bool(true))
            }
            b'f' => {
                self.expect_literal(b"false")?;
                self.scalar_done();
                Ok(JsonToken::Bool(false))
            }
            b'n' => {
                self.expect_literal(b"null")?;
                self.scalar_done();
                Ok(JsonToken::Null)
            }
            other => Err(self.unexpected(Some(other), "a value")),
        }
    }

    fn read_field_name(&mut self) -> Result<JsonToken> {
        match self.peek_byte()? {
            Some(b'"') => self.bump(),
            other => return Err(self.unexpected(other, "a field name")),
        }
        let name = self.read_string_body()?;
        self.skip_whitespace()?;
        match self.peek_byte()? {
            Some(b':') => self.bump(),
            other => return Err(self.unexpected(other, "':'")),
        }
        self.set_top(Frame::Object(ObjectState::Value));
        Ok(JsonToken::FieldName(name))
    }

    fn close(&mut self, byte: u8, token: JsonToken) -> Result<JsonToken> {
        debug_assert_eq!(self.peek_byte().ok().flatten(), Some(byte));
        self.bump();
        self.stack.pop();
        if self.stack.is_empty() {
            self.finished = true;
        }
        Ok(token)
    }

    /// A value now occupies the current slot of the enclosing container
    fn value_started(&mut self) {
        match self.stack.last_mut() {
            Some(Frame::Object(state)) => *state = ObjectState::CommaOrEnd,
            Some(Frame::Array(state)) => *state = ArrayState::CommaOrEnd,
            None => {}
        }
    }

    fn scalar_done(&mut self) {
        if self.stack.is_empty() {
            self.finished = true;
        } else {
            self.value_started();
        }
    }

    fn set_top(&mut self, frame: Frame) {
        if let Some(top) = self.stack.last_mut() {
            *top = frame;
        }
    }

    // =========================================================================
    // Lexical pieces
    // =========================================================================

    /// Read a string body; the opening quote has already been consumed
    fn read_string_body(&mut self) -> Result<String> {
        let mut out = Vec::new();
        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                return Err(ResultsError::protocol(format!(
                    "unterminated string at byte {}",
                    self.position
                )));
            }
            match buf.iter().position(|&b| b == b'"' || b == b'\\' || b < 0x20) {
                Some(i) => {
                    let stop = buf[i];
                    out.extend_from_slice(&buf[..i]);
                    self.inner.consume(i + 1);
                    self.position += (i + 1) as u64;
                    match stop {
                        b'"' => break,
                        b'\\' => self.read_escape(&mut out)?,
                        _ => {
                            return Err(ResultsError::protocol(format!(
                                "unescaped control character in string at byte {}",
                                self.position - 1
                            )))
                        }
                    }
                }
                None => {
                    let n = buf.len();
                    out.extend_from_slice(buf);
                    self.inner.consume(n);
                    self.position += n as u64;
                }
            }
        }
        String::from_utf8(out).map_err(|_| {
            ResultsError::protocol(format!("invalid UTF-8 in string before byte {}", self.position))
        })
    }

    /// Decode one escape sequence; the backslash has already been consumed
    fn read_escape(&mut self, out: &mut Vec<u8>) -> Result<()> {
        let b = self.next_byte()?;
        let c = match b {
            Some(b'"') => '"',
            Some(b'\\') => '\\',
            Some(b'/') => '/',
            Some(b'b') => '\u{0008}',
            Some(b'f') => '\u{000C}',
            Some(b'n') => '\n',
            Some(b'r') => '\r',
            Some(b't') => '\t',
            Some(b'u') => {
                let hi = self.read_hex4()?;
                if (0xD800..0xDC00).contains(&hi) {
                    // High surrogate; a low surrogate must follow
                    if self.next_byte()? != Some(b'\\') || self.next_byte()? != Some(b'u') {
                        return Err(self.bad_escape("unpaired surrogate"));
                    }
                    let lo = self.read_hex4()?;
                    if !(0xDC00..0xE000).contains(&lo) {
                        return Err(self.bad_escape("invalid low surrogate"));
                    }
                    let code = 0x10000 + ((hi - 0xD800) << 10) + (lo - 0xDC00);
                    char::from_u32(code).ok_or_else(|| self.bad_escape("invalid code point"))?
                } else {
                    char::from_u32(hi).ok_or_else(|| self.bad_escape("unpaired surrogate"))?
                }
            }
            _ => return Err(self.bad_escape("unknown escape")),
        };
        let mut utf8 = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut value = 0u32;
        for _ in 0..4 {
            let digit = self
                .next_byte()?
                .and_then(|b| (b as char).to_digit(16))
                .ok_or_else(|| self.bad_escape("expected 4 hex digits"))?;
            value = value * 16 + digit;
        }
        Ok(value)
    }

    fn read_number(&mut self) -> Result<String> {
        let start = self.position;
        let mut text = String::new();
        while let Some(b) = self.peek_byte()? {
            if b.is_ascii_digit() || matches!(b, b'-' | b'+' | b'.' | b'e' | b'E') {
                text.push(b as char);
                self.bump();
            } else {
                break;
            }
        }
        if !is_json_number(&text) {
            return Err(ResultsError::protocol(format!(
                "invalid number '{}' at byte {}",
                text, start
            )));
        }
        Ok(text)
    }

    fn expect_literal(&mut self, word: &'static [u8]) -> Result<()> {
        for &expected in word {
            let b = self.next_byte()?;
            if b != Some(expected) {
                return Err(self.unexpected(b, std::str::from_utf8(word).unwrap_or("literal")));
            }
        }
        Ok(())
    }

    fn skip_whitespace(&mut self) -> Result<()> {
        loop {
            let buf = self.inner.fill_buf()?;
            let n = buf
                .iter()
                .take_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'))
                .count();
            let exhausted = n == buf.len() && n > 0;
            self.inner.consume(n);
            self.position += n as u64;
            if !exhausted {
                return Ok(());
            }
        }
    }

    // =========================================================================
    // Bytes
    // =========================================================================

    fn peek_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.inner.fill_buf()?.first().copied())
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let b = self.peek_byte()?;
        if b.is_some() {
            self.bump();
        }
        Ok(b)
    }

    /// Consume one byte previously seen through `peek_byte`
    fn bump(&mut self) {
        self.inner.consume(1);
        self.position += 1;
    }

    fn unexpected(&self, found: Option<u8>, expected: &str) -> ResultsError {
        match found {
            Some(b) => ResultsError::protocol(format!(
                "expected {} at byte {}, found {:?}",
                expected, self.position, b as char
            )),
            None => ResultsError::protocol(format!(
                "expected {} at byte {}, found end of input",
                expected, self.position
            )),
        }
    }

    fn bad_escape(&self, detail: &str) -> ResultsError {
        ResultsError::protocol(format!("{} at byte {}", detail, self.position))
    }
}

/// JSON number grammar: `-? int frac? exp?`
fn is_json_number(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if b.get(i) == Some(&b'-') {
        i += 1;
    }
    match b.get(i) {
        Some(b'0') => i += 1,
        Some(d) if d.is_ascii_digit() => {
            while b.get(i).is_some_and(u8::is_ascii_digit) {
                i += 1;
            }
        }
        _ => return false,
    }
    if b.get(i) == Some(&b'.') {
        i += 1;
        let start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == start {
            return false;
        }
    }
    i == b.len()
}
