//! JSON token types

/// One token pulled from a JSON document
#[derive(Clone, Debug, PartialEq)]
pub enum JsonToken {
    BeginObject,
    EndObject,
    BeginArray,
    EndArray,
    /// Object member name (unescaped)
    FieldName(String),
    /// String value (unescaped)
    String(String),
    /// Number value, kept as its source text to preserve precision
    Number(String),
    Bool(bool),
    Null,
}

impl JsonToken {
    /// Short description for error messages
    pub fn describe(&self) -> &'static str {
        match self {
            JsonToken::BeginObject => "'{'",
            JsonToken::EndObject => "'}'",
            JsonToken::BeginArray => "'['",
            JsonToken::EndArray => "']'",
            JsonToken::FieldName(_) => "field name",
            JsonToken::String(_) => "string",
            JsonToken::Number(_) => "number",
            JsonToken::Bool(_) => "boolean",
            JsonToken::Null => "null",
        }
    }

    /// Whether the token opens a nested structure
    pub fn is_begin(&self) -> bool {
        matches!(self, JsonToken::BeginObject | JsonToken::BeginArray)
    }

    /// Whether the token closes a nested structure
    pub fn is_end(&self) -> bool {
        matches!(self, JsonToken::EndObject | JsonToken::EndArray)
    }

    /// String payload of a `String` token
    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonToken::String(s) => Some(s),
            _ => None,
        }
    }
}
