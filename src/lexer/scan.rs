// src/lexer/scan.rs
// Longest-match tokenizer over one minimized DFA per rule.

use super::{
    automata::MatchResult,
    error::{LexerError, LexicalError},
    rules::{CompiledRule, LexerConfig, compile_rules},
    symbols::SymbolTable,
    tokens::{DELIMITER_TAG, Token},
};

pub struct Lexer {
    rules: Vec<CompiledRule>,
    delimiters: Vec<char>,
    symbols: SymbolTable,
}

impl Lexer {
    pub fn new(config: &LexerConfig) -> Result<Self, LexerError> {
        config.validate()?;
        let rules = compile_rules(&config.rules, config.minimize)?;
        Ok(Self {
            rules,
            delimiters: config.delimiters.chars().collect(),
            symbols: SymbolTable::new(),
        })
    }

    /// Lexer over [`standard_rules`](super::rules::standard_rules).
    pub fn standard() -> Result<Self, LexerError> {
        Self::new(&LexerConfig::default())
    }

    pub fn rules(&self) -> &[CompiledRule] {
        &self.rules
    }

    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    pub fn symbols_mut(&mut self) -> &mut SymbolTable {
        &mut self.symbols
    }

    pub fn is_delimiter(&self, c: char) -> bool {
        self.delimiters.contains(&c)
    }

    /// Runs every rule at `pos` and returns the winner: the strictly longest
    /// match, earliest rule on ties. `None` if no rule consumes anything.
    pub fn match_at(&self, chars: &[char], pos: usize) -> Option<(usize, MatchResult)> {
        let rest = &chars[pos..];
        let mut best: Option<(usize, MatchResult)> = None;
        for (i, rule) in self.rules.iter().enumerate() {
            let m = rule.dfa.longest_match(rest.iter().copied());
            if !m.matched {
                continue;
            }
            if best.is_none_or(|(_, b)| m.length > b.length) {
                best = Some((i, m));
            }
        }
        best
    }

    /// Tokenizes `src`, skipping whitespace. Stops at the first position where
    /// neither a delimiter nor any rule matches.
    pub fn tokenize(&mut self, src: &str) -> Result<Vec<Token>, LexicalError> {
        let chars: Vec<char> = src.chars().collect();
        let mut out = Vec::new();
        let mut pos = 0;

        while pos < chars.len() {
            let c = chars[pos];
            if c.is_whitespace() {
                pos += 1;
                continue;
            }

            if self.is_delimiter(c) {
                let text = c.to_string();
                self.symbols.insert(&text, DELIMITER_TAG);
                out.push(Token {
                    tag: DELIMITER_TAG.to_string(),
                    text,
                    start: pos,
                    len: 1,
                });
                pos += 1;
                continue;
            }

            let Some((rule_idx, m)) = self.match_at(&chars, pos) else {
                return Err(LexicalError { offset: pos, ch: c });
            };
            let rule = &self.rules[rule_idx];
            let text: String = chars[pos..pos + m.length].iter().collect();
            if !rule.spec.comment {
                self.symbols.insert(&text, rule.tag());
            }
            log::trace!("[scan] {pos}: {} {:?}", rule.tag(), text);
            out.push(Token {
                tag: rule.tag().to_string(),
                text,
                start: pos,
                len: m.length,
            });
            pos += m.length;
        }

        Ok(out)
    }
}
