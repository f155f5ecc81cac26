// src/lexer/tokens.rs
use serde::Serialize;

/// Tag given to single-char punctuation taken by the delimiter fast path.
pub const DELIMITER_TAG: &str = "DELIMITER";

/// Delimiters recognized before any rule DFA runs.
pub const DEFAULT_DELIMITERS: &str = ";,(){}";

/// An emitted token. `start` and `len` are char offsets into the source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub tag: String,
    pub text: String,
    pub start: usize,
    pub len: usize,
}

impl Token {
    /// `(tag, text)` view, handy for comparing against expected streams.
    pub fn pair(&self) -> (&str, &str) {
        (&self.tag, &self.text)
    }
}
