// src/lexer/rules.rs
use std::{fs, path::Path, time::Instant};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{
    automata::{Dfa, Nfa, Refinement, compile, determinize},
    error::LexerError,
    tokens::DEFAULT_DELIMITERS,
};

/// One `(pattern, tag)` pair. Declaration order is tie-break priority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    pub pattern: String,
    pub tag: String,
    /// Comment kinds are tokenized but never recorded in the symbol table.
    #[serde(default)]
    pub comment: bool,
}

impl RuleSpec {
    pub fn new(pattern: &str, tag: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            tag: tag.to_string(),
            comment: false,
        }
    }

    pub fn comment(pattern: &str, tag: &str) -> Self {
        Self {
            comment: true,
            ..Self::new(pattern, tag)
        }
    }
}

/// The standard C-like rule set.
pub fn standard_rules() -> Vec<RuleSpec> {
    vec![
        RuleSpec::new(r"^(int|float|char|bool)$", "DATATYPE"),
        RuleSpec::new(r"^(true|false)$", "BOOLEAN_LITERAL"),
        RuleSpec::new(r"^[a-z]+$", "IDENTIFIER"),
        RuleSpec::new(r"^'.'$", "CHARACTER"),
        RuleSpec::new(r"^[0-9]+$", "NUMBER"),
        RuleSpec::new(r"^[0-9]+(\.[0-9]+)?$", "DECIMAL"),
        RuleSpec::new(r"^[=+\-*/%^]$", "OPERATOR"),
        RuleSpec::comment(r"^//.*$", "COMMENT"),
        RuleSpec::comment(r"/\*.*?\*/", "MULTI_COMMENT"),
    ]
}

fn default_delimiters() -> String {
    DEFAULT_DELIMITERS.to_string()
}

fn default_minimize() -> Option<Refinement> {
    Some(Refinement::Partition)
}

/// Everything a [`Lexer`](super::scan::Lexer) is built from.
///
/// JSON shape:
/// `{"rules":[{"pattern":"^[a-z]+$","tag":"IDENTIFIER"}], "delimiters":";,", "minimize":"partition"}`
/// where `delimiters` and `minimize` are optional (`"minimize": null` skips
/// minimization).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexerConfig {
    pub rules: Vec<RuleSpec>,
    #[serde(default = "default_delimiters")]
    pub delimiters: String,
    #[serde(default = "default_minimize")]
    pub minimize: Option<Refinement>,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            rules: standard_rules(),
            delimiters: default_delimiters(),
            minimize: default_minimize(),
        }
    }
}

impl LexerConfig {
    pub fn from_json_str(s: &str) -> Result<Self, LexerError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_path(path: &Path) -> Result<Self, LexerError> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }

    /// Same rules, different minimization setting.
    pub fn with_minimize(mut self, minimize: Option<Refinement>) -> Self {
        self.minimize = minimize;
        self
    }

    pub fn validate(&self) -> Result<(), LexerError> {
        if let Some(i) = self.rules.iter().position(|r| r.tag.trim().is_empty()) {
            return Err(LexerError::Config(format!("rule #{i} has an empty tag")));
        }
        if let Some(c) = self.delimiters.chars().find(|c| c.is_whitespace()) {
            return Err(LexerError::Config(format!(
                "whitespace {c:?} cannot be a delimiter"
            )));
        }
        Ok(())
    }
}

/// A rule with its compiled automaton.
#[derive(Debug, Clone)]
pub struct CompiledRule {
    pub spec: RuleSpec,
    pub dfa: Dfa,
}

impl CompiledRule {
    pub fn compile(spec: &RuleSpec, minimize: Option<Refinement>) -> Result<Self, LexerError> {
        let t0 = Instant::now();
        let nfa = compile_nfa(spec)?;
        let raw = determinize(&nfa);
        let raw_len = raw.len();
        let dfa = match minimize {
            Some(refinement) => raw.minimize(refinement),
            None => raw,
        };

        log::debug!(
            "[rules] {}: nfa={} dfa={} min={} final={} ({:?})",
            spec.tag,
            nfa.len(),
            raw_len,
            dfa.len(),
            dfa.final_count(),
            t0.elapsed()
        );
        if dfa.state(dfa.start).is_final {
            log::warn!(
                "rule `{}` accepts the empty string; empty matches never produce a token",
                spec.tag
            );
        }

        Ok(Self {
            spec: spec.clone(),
            dfa,
        })
    }

    pub fn tag(&self) -> &str {
        &self.spec.tag
    }
}

pub fn compile_nfa(spec: &RuleSpec) -> Result<Nfa, LexerError> {
    compile(&spec.pattern, &spec.tag).map_err(|source| LexerError::Pattern {
        tag: spec.tag.clone(),
        pattern: spec.pattern.clone(),
        source,
    })
}

/// Compiles every rule independently on the rayon pool. Output order follows
/// `specs`; on failure the earliest bad rule is reported.
pub fn compile_rules(
    specs: &[RuleSpec],
    minimize: Option<Refinement>,
) -> Result<Vec<CompiledRule>, LexerError> {
    let results: Vec<Result<CompiledRule, LexerError>> = specs
        .par_iter()
        .map(|spec| CompiledRule::compile(spec, minimize))
        .collect();
    results.into_iter().collect()
}
