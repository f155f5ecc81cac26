// src/lexer/mod.rs
pub mod automata;
pub mod error;
pub mod rules;
pub mod scan;
pub mod symbols;
pub mod tokens;

pub use error::{LexerError, LexicalError, PatternError};
pub use rules::{CompiledRule, LexerConfig, RuleSpec, standard_rules};
pub use scan::Lexer;
pub use symbols::{SymbolEntry, SymbolTable};
pub use tokens::{DELIMITER_TAG, Token};
