// src/lexer/automata/nfa.rs
use super::graph::{State, StateId, Symbol};

/// A compiled Thompson NFA for one rule.
///
/// `states` holds exactly the nodes reachable from `start` (ids `0..n`);
/// `accept` is the single node with `is_final` set.
#[derive(Debug, Clone)]
pub struct Nfa {
    pub states: Vec<State>,
    pub start: StateId,
    pub accept: StateId,
    pub tag: String,
}

impl Nfa {
    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Straight NFA simulation over the whole input; used to cross-check DFAs.
    pub fn accepts(&self, input: &str) -> bool {
        let mut current = epsilon_closure(self, &[self.start]);
        for c in input.chars() {
            let next: Vec<StateId> = current
                .iter()
                .filter_map(|&s| self.state(s).transitions.get(&Symbol::Char(c)))
                .flatten()
                .copied()
                .collect();
            if next.is_empty() {
                return false;
            }
            current = epsilon_closure(self, &next);
        }
        current.iter().any(|&s| self.state(s).is_final)
    }
}

/// Epsilon-closure of `seeds`: the seeds plus everything reachable over
/// epsilon edges only. Returned sorted and deduplicated so it can key a map.
pub fn epsilon_closure(nfa: &Nfa, seeds: &[StateId]) -> Vec<StateId> {
    let mut in_set = vec![false; nfa.states.len()];
    let mut closure = Vec::with_capacity(seeds.len());
    let mut stack: Vec<StateId> = Vec::with_capacity(seeds.len());

    for &s in seeds {
        if !in_set[s as usize] {
            in_set[s as usize] = true;
            closure.push(s);
            stack.push(s);
        }
    }

    while let Some(s) = stack.pop() {
        for &t in nfa.state(s).epsilon_targets() {
            if !in_set[t as usize] {
                in_set[t as usize] = true;
                closure.push(t);
                stack.push(t);
            }
        }
    }

    closure.sort_unstable();
    closure
}
