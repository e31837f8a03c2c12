//! Pull tokenizer for streamed JSON documents

mod reader;
mod token;

pub use reader::JsonReader;
pub use token::JsonToken;
