// src/lexer/automata/subset.rs
//! Subset construction: NFA → DFA.
//!
//! 1. The epsilon-closure of the NFA start becomes the DFA start.
//! 2. Subsets are processed breadth-first; for each labelled symbol leaving
//!    the subset, the union of the successors' closures is the target subset.
//! 3. A DFA state is final iff its subset holds a final NFA state.
//!
//! Subsets are keyed by their sorted, deduplicated member list, so equal sets
//! reached along different paths land on the same DFA state.

use std::collections::{BTreeMap, VecDeque};

use hashbrown::HashMap;

use super::{
    dfa::{Dfa, DfaState},
    graph::StateId,
    nfa::{Nfa, epsilon_closure},
};

pub fn determinize(nfa: &Nfa) -> Dfa {
    let mut dfa = Dfa {
        states: Vec::new(),
        start: 0,
        tag: nfa.tag.clone(),
        subsets: Vec::new(),
    };
    let mut memo: HashMap<Vec<StateId>, StateId> = HashMap::new();
    let mut queue: VecDeque<StateId> = VecDeque::new();

    let start_set = epsilon_closure(nfa, &[nfa.start]);
    dfa.start = state_for_set(nfa, &mut dfa, &mut memo, &mut queue, start_set);

    while let Some(current) = queue.pop_front() {
        // symbol -> raw successors across every member of the subset
        let mut moves: BTreeMap<char, Vec<StateId>> = BTreeMap::new();
        for &member in &dfa.subsets[current as usize] {
            for (c, targets) in nfa.state(member).char_transitions() {
                moves.entry(c).or_default().extend_from_slice(targets);
            }
        }

        for (c, targets) in moves {
            let target_set = epsilon_closure(nfa, &targets);
            let target = state_for_set(nfa, &mut dfa, &mut memo, &mut queue, target_set);
            dfa.states[current as usize].transitions.insert(c, target);
        }
    }

    debug_assert!(dfa.is_well_formed());
    dfa
}

/// Looks up the DFA state for a canonical subset, creating and enqueueing it
/// on first sight.
fn state_for_set(
    nfa: &Nfa,
    dfa: &mut Dfa,
    memo: &mut HashMap<Vec<StateId>, StateId>,
    queue: &mut VecDeque<StateId>,
    set: Vec<StateId>,
) -> StateId {
    if let Some(&id) = memo.get(&set) {
        return id;
    }
    let id = dfa.states.len() as StateId;
    let is_final = set.iter().any(|&s| nfa.state(s).is_final);
    dfa.states.push(DfaState::new(id, is_final));
    dfa.subsets.push(set.clone());
    memo.insert(set, id);
    queue.push_back(id);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::automata::thompson::compile;

    #[test]
    fn shared_prefix_alternatives_become_deterministic() {
        let nfa = compile("(ab|ac)", "T").unwrap();
        let dfa = determinize(&nfa);
        let start = dfa.state(dfa.start);
        assert_eq!(start.transitions.len(), 1);
        let after_a = dfa.state(start.next('a').unwrap());
        assert_eq!(after_a.transitions.len(), 2);
        assert!(dfa.accepts("ab") && dfa.accepts("ac"));
        assert!(!dfa.accepts("a"));
    }

    #[test]
    fn subsets_are_canonical_and_unique() {
        let nfa = compile("[0-9]+", "N").unwrap();
        let dfa = determinize(&nfa);
        let mut seen = dfa.subsets.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), dfa.subsets.len());
        for set in &dfa.subsets {
            assert!(set.windows(2).all(|w| w[0] < w[1]));
            assert!(!set.is_empty());
        }
    }
}
