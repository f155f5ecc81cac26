// src/lexer/automata/minimize.rs
//! Partition-refinement minimization.
//!
//! Start from {final, non-final} (empty blocks dropped) and split every block
//! by transition signature until a full pass splits nothing. Each block then
//! collapses to its lowest-numbered member.
//!
//! Two signature rules are available. [`Refinement::Partition`] is Moore's
//! rule: a state's signature maps each symbol to the *block* of its target,
//! and a missing edge is part of the signature. [`Refinement::TargetIdentity`]
//! compares raw target ids instead; it only merges states with literally
//! identical edges, so it never changes the language but can leave
//! equivalent states apart.

use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

use super::{
    dfa::{Dfa, DfaState},
    graph::StateId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Refinement {
    /// Signature = symbol → current block of the target.
    #[default]
    Partition,
    /// Signature = symbol → raw target state.
    TargetIdentity,
}

type Signature = Vec<(char, usize)>;

/// Refines the states of `dfa` into blocks of indistinguishable states.
/// Members of each block are listed in ascending id order.
pub fn refine(dfa: &Dfa, refinement: Refinement) -> Vec<Vec<StateId>> {
    let (finals, non_finals): (Vec<StateId>, Vec<StateId>) = (0..dfa.len() as StateId)
        .partition(|&s| dfa.state(s).is_final);
    let mut blocks: Vec<Vec<StateId>> = [finals, non_finals]
        .into_iter()
        .filter(|b| !b.is_empty())
        .collect();
    let mut block_of = block_index(dfa.len(), &blocks);

    loop {
        let mut changed = false;
        let mut next_blocks: Vec<Vec<StateId>> = Vec::with_capacity(blocks.len());

        for block in &blocks {
            let mut groups: HashMap<Signature, usize> = HashMap::new();
            let first_group = next_blocks.len();
            for &s in block {
                let sig = signature(dfa.state(s), &block_of, refinement);
                let slot = *groups.entry(sig).or_insert_with(|| {
                    next_blocks.push(Vec::new());
                    next_blocks.len() - 1
                });
                next_blocks[slot].push(s);
            }
            if next_blocks.len() - first_group > 1 {
                changed = true;
            }
        }

        blocks = next_blocks;
        block_of = block_index(dfa.len(), &blocks);
        if !changed {
            return blocks;
        }
    }
}

fn signature(state: &DfaState, block_of: &[usize], refinement: Refinement) -> Signature {
    state
        .transitions
        .iter()
        .map(|(&c, &t)| match refinement {
            Refinement::Partition => (c, block_of[t as usize]),
            Refinement::TargetIdentity => (c, t as usize),
        })
        .collect()
}

fn block_index(n: usize, blocks: &[Vec<StateId>]) -> Vec<usize> {
    let mut block_of = vec![0; n];
    for (b, members) in blocks.iter().enumerate() {
        for &s in members {
            block_of[s as usize] = b;
        }
    }
    block_of
}

impl Dfa {
    /// Returns an equivalent DFA with each refined block collapsed to one
    /// state. The start state's block becomes state 0; the remaining blocks
    /// follow in order of their representative's id.
    pub fn minimize(&self, refinement: Refinement) -> Dfa {
        if self.is_empty() {
            return self.clone();
        }

        let blocks = refine(self, refinement);
        let block_of = block_index(self.len(), &blocks);

        // Representative = lowest member; blocks are already ascending.
        let start_block = block_of[self.start as usize];
        let mut order: Vec<usize> = (0..blocks.len()).filter(|&b| b != start_block).collect();
        order.sort_by_key(|&b| blocks[b][0]);
        order.insert(0, start_block);

        let mut new_id = vec![0 as StateId; blocks.len()];
        for (i, &b) in order.iter().enumerate() {
            new_id[b] = i as StateId;
        }

        let states = order
            .iter()
            .enumerate()
            .map(|(i, &b)| {
                let rep = self.state(blocks[b][0]);
                DfaState {
                    id: i as StateId,
                    transitions: rep
                        .transitions
                        .iter()
                        .map(|(&c, &t)| (c, new_id[block_of[t as usize]]))
                        .collect(),
                    is_final: rep.is_final,
                }
            })
            .collect();

        let out = Dfa {
            states,
            start: 0,
            tag: self.tag.clone(),
            subsets: Vec::new(),
        };
        debug_assert!(out.is_well_formed());
        out
    }
}
