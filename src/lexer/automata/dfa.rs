// src/lexer/automata/dfa.rs
use std::collections::BTreeMap;

use super::graph::StateId;

/// A DFA node. Determinism is structural: one target per symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DfaState {
    pub id: StateId,
    pub transitions: BTreeMap<char, StateId>,
    pub is_final: bool,
}

impl DfaState {
    pub fn new(id: StateId, is_final: bool) -> Self {
        Self {
            id,
            transitions: BTreeMap::new(),
            is_final,
        }
    }

    #[inline]
    pub fn next(&self, c: char) -> Option<StateId> {
        self.transitions.get(&c).copied()
    }
}

/// A deterministic automaton for one rule.
///
/// `subsets[i]` is the canonical NFA-state set behind state `i` when the DFA
/// came straight out of subset construction; it is empty after minimization.
#[derive(Debug, Clone)]
pub struct Dfa {
    pub states: Vec<DfaState>,
    pub start: StateId,
    pub tag: String,
    pub subsets: Vec<Vec<StateId>>,
}

/// Outcome of a longest-prefix scan. `length` counts chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MatchResult {
    pub matched: bool,
    pub length: usize,
}

impl MatchResult {
    pub fn new(length: usize) -> Self {
        Self {
            matched: length > 0,
            length,
        }
    }
}

impl Dfa {
    pub fn state(&self, id: StateId) -> &DfaState {
        &self.states[id as usize]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn final_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_final).count()
    }

    /// Every edge points at an existing state and every state id matches its
    /// slot. One-target-per-symbol is guaranteed by the map type itself.
    pub fn is_well_formed(&self) -> bool {
        let n = self.states.len() as StateId;
        self.start < n
            && self.states.iter().enumerate().all(|(i, s)| {
                s.id == i as StateId && s.transitions.values().all(|&t| t < n)
            })
    }

    /// Greedy longest match: walks until input ends or a symbol has no edge,
    /// remembering the last position at which a final state was entered.
    pub fn longest_match<I>(&self, input: I) -> MatchResult
    where
        I: IntoIterator<Item = char>,
    {
        let mut state = self.state(self.start);
        let mut matched_length = 0;
        for (consumed, c) in input.into_iter().enumerate() {
            let Some(next) = state.next(c) else {
                break;
            };
            state = self.state(next);
            if state.is_final {
                matched_length = consumed + 1;
            }
        }
        MatchResult::new(matched_length)
    }

    /// Whole-input acceptance.
    pub fn accepts(&self, input: &str) -> bool {
        let mut state = self.state(self.start);
        for c in input.chars() {
            match state.next(c) {
                Some(next) => state = self.state(next),
                None => return false,
            }
        }
        state.is_final
    }

    /// Every char that labels at least one edge, in order.
    pub fn alphabet(&self) -> Vec<char> {
        let mut chars: Vec<char> = self
            .states
            .iter()
            .flat_map(|s| s.transitions.keys().copied())
            .collect();
        chars.sort_unstable();
        chars.dedup();
        chars
    }
}
