// src/lexer/error.rs
use thiserror::Error;

/// A rule pattern that the Thompson compiler could not parse.
/// Positions are char offsets into the full pattern text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("unmatched parenthesis at {position}")]
    UnmatchedParen { position: usize },

    #[error("unterminated character class starting at {position}")]
    UnterminatedClass { position: usize },

    #[error("empty character class at {position}")]
    EmptyClass { position: usize },

    #[error("invalid escape sequence at {position}: {}", describe_escape(.found))]
    InvalidEscape {
        position: usize,
        found: Option<char>,
    },

    #[error("quantifier `{quantifier}` at {position} has no preceding fragment")]
    DanglingQuantifier { position: usize, quantifier: char },

    #[error("anchor `{anchor}` at {position} is only allowed at the pattern edges")]
    MisplacedAnchor { position: usize, anchor: char },

    #[error("unexpected character {ch:?} at {position}")]
    UnexpectedChar { position: usize, ch: char },

    #[error("empty pattern or alternative at {position}")]
    EmptyPattern { position: usize },
}

fn describe_escape(found: &Option<char>) -> String {
    match found {
        Some(c) => format!("`\\{c}`"),
        None => "trailing `\\`".to_string(),
    }
}

impl PatternError {
    pub fn position(&self) -> usize {
        match *self {
            PatternError::UnmatchedParen { position }
            | PatternError::UnterminatedClass { position }
            | PatternError::EmptyClass { position }
            | PatternError::InvalidEscape { position, .. }
            | PatternError::DanglingQuantifier { position, .. }
            | PatternError::MisplacedAnchor { position, .. }
            | PatternError::UnexpectedChar { position, .. }
            | PatternError::EmptyPattern { position } => position,
        }
    }
}

/// No delimiter and no rule matched at `offset` (a char offset).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("lexical error at offset {offset}: unexpected character {ch:?}")]
pub struct LexicalError {
    pub offset: usize,
    pub ch: char,
}

#[derive(Debug, Error)]
pub enum LexerError {
    #[error("rule `{tag}` has a malformed pattern {pattern:?}")]
    Pattern {
        tag: String,
        pattern: String,
        #[source]
        source: PatternError,
    },

    #[error("invalid lexer configuration: {0}")]
    Config(String),

    #[error("failed to parse rule configuration")]
    Json(#[from] serde_json::Error),

    #[error("failed to read rule configuration")]
    Io(#[from] std::io::Error),
}
