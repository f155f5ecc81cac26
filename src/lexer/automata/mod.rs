// src/lexer/automata/mod.rs
//! Automaton pipeline: pattern → Thompson NFA → subset DFA → minimized DFA.

pub mod dfa;
pub mod graph;
pub mod io;
pub mod minimize;
pub mod nfa;
pub mod subset;
pub mod thompson;

pub use dfa::{Dfa, DfaState, MatchResult};
pub use graph::{State, StateGraph, StateId, Symbol};
pub use minimize::Refinement;
pub use nfa::{Nfa, epsilon_closure};
pub use subset::determinize;
pub use thompson::{Builder, Fragment, compile};

use crate::lexer::error::PatternError;

/// Runs the whole pipeline for one pattern.
pub fn compile_dfa(pattern: &str, tag: &str, refinement: Refinement) -> Result<Dfa, PatternError> {
    let nfa = compile(pattern, tag)?;
    Ok(determinize(&nfa).minimize(refinement))
}
