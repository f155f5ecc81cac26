// src/lexer/automata/graph.rs
use std::{collections::BTreeMap, fmt};

/// Index of a node inside one automaton's arena.
pub type StateId = u32;

/// Edge label. `Epsilon` sorts before every character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
    Epsilon,
    Char(char),
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => f.write_str("ε"),
            Symbol::Char(c) => write!(f, "{c}"),
        }
    }
}

/// A node of the state graph. Successor lists keep insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct State {
    pub id: StateId,
    pub transitions: BTreeMap<Symbol, Vec<StateId>>,
    pub is_final: bool,
}

impl State {
    pub fn new(id: StateId) -> Self {
        Self {
            id,
            transitions: BTreeMap::new(),
            is_final: false,
        }
    }

    /// Adds `symbol -> to`. Parallel duplicate edges are ignored.
    pub fn add_transition(&mut self, symbol: Symbol, to: StateId) {
        let targets = self.transitions.entry(symbol).or_default();
        if !targets.contains(&to) {
            targets.push(to);
        }
    }

    pub fn epsilon_targets(&self) -> &[StateId] {
        self.transitions
            .get(&Symbol::Epsilon)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Labeled (non-epsilon) edges in symbol order.
    pub fn char_transitions(&self) -> impl Iterator<Item = (char, &[StateId])> {
        self.transitions.iter().filter_map(|(sym, targets)| match sym {
            Symbol::Char(c) => Some((*c, targets.as_slice())),
            Symbol::Epsilon => None,
        })
    }

    fn successors(&self) -> impl Iterator<Item = StateId> + '_ {
        self.transitions.values().flatten().copied()
    }
}

/// Arena of states addressed by [`StateId`]. Doubles as the id allocator
/// threaded through one compilation.
#[derive(Debug, Clone, Default)]
pub struct StateGraph {
    states: Vec<State>,
}

impl StateGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_state(&mut self) -> StateId {
        let id = self.states.len() as StateId;
        self.states.push(State::new(id));
        id
    }

    pub fn add_transition(&mut self, from: StateId, symbol: Symbol, to: StateId) {
        self.states[from as usize].add_transition(symbol, to);
    }

    pub fn add_epsilon(&mut self, from: StateId, to: StateId) {
        self.add_transition(from, Symbol::Epsilon, to);
    }

    pub fn set_final(&mut self, id: StateId, is_final: bool) {
        self.states[id as usize].is_final = is_final;
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id as usize]
    }

    /// States reachable from `root` over every edge kind, in DFS discovery order.
    pub fn reachable_from(&self, root: StateId) -> Vec<StateId> {
        let mut seen = vec![false; self.states.len()];
        let mut order = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if std::mem::replace(&mut seen[id as usize], true) {
                continue;
            }
            order.push(id);
            // Reverse so lower-labelled edges are visited first.
            let succ: Vec<StateId> = self.states[id as usize].successors().collect();
            stack.extend(succ.into_iter().rev().filter(|s| !seen[*s as usize]));
        }
        order
    }

    /// Keeps only the states reachable from `root`, renumbered `0..n` in
    /// discovery order. Returns the compacted states and the old -> new map.
    pub fn compact(self, root: StateId) -> (Vec<State>, Vec<Option<StateId>>) {
        let order = self.reachable_from(root);
        let mut remap: Vec<Option<StateId>> = vec![None; self.states.len()];
        for (new_id, &old) in order.iter().enumerate() {
            remap[old as usize] = Some(new_id as StateId);
        }

        let mut old_states: Vec<Option<State>> = self.states.into_iter().map(Some).collect();
        let mut out = Vec::with_capacity(order.len());
        for &old in &order {
            let Some(state) = old_states[old as usize].take() else {
                continue;
            };
            let transitions = state
                .transitions
                .into_iter()
                .map(|(sym, targets)| {
                    let targets = targets
                        .into_iter()
                        .filter_map(|t| remap[t as usize])
                        .collect();
                    (sym, targets)
                })
                .collect();
            out.push(State {
                id: out.len() as StateId,
                transitions,
                is_final: state.is_final,
            });
        }
        (out, remap)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compact_drops_unreachable_and_renumbers() {
        let mut g = StateGraph::new();
        let orphan = g.add_state();
        let a = g.add_state();
        let b = g.add_state();
        g.add_transition(a, Symbol::Char('x'), b);
        g.add_epsilon(b, a);
        g.set_final(b, true);

        let (states, remap) = g.compact(a);
        assert_eq!(states.len(), 2);
        assert_eq!(remap[orphan as usize], None);
        assert_eq!(remap[a as usize], Some(0));
        assert_eq!(states[0].transitions[&Symbol::Char('x')], vec![1]);
        assert_eq!(states[1].epsilon_targets(), &[0]);
        assert!(states[1].is_final);
    }

    #[test]
    fn duplicate_edges_are_collapsed() {
        let mut s = State::new(0);
        s.add_transition(Symbol::Char('a'), 3);
        s.add_transition(Symbol::Char('a'), 3);
        s.add_transition(Symbol::Char('a'), 4);
        assert_eq!(s.transitions[&Symbol::Char('a')], vec![3, 4]);
    }
}
