// src/lexer/automata/io.rs
//! Transition-table views for inspection (`dump_dfa`).
//! These are write-only; compiled automata are always rebuilt from rules.

use std::{collections::BTreeMap, fmt};

use serde::Serialize;
use serde_with::{DisplayFromStr, serde_as};

use super::{
    dfa::Dfa,
    graph::{StateId, Symbol},
    nfa::Nfa,
};

#[serde_as]
#[derive(Debug, Clone, Serialize)]
pub struct StateRow {
    pub id: StateId,
    #[serde(rename = "final")]
    pub is_final: bool,
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub edges: BTreeMap<Symbol, Vec<StateId>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransitionTable {
    pub tag: String,
    pub kind: &'static str,
    pub start: StateId,
    pub states: Vec<StateRow>,
}

impl TransitionTable {
    pub fn of_nfa(nfa: &Nfa) -> Self {
        Self {
            tag: nfa.tag.clone(),
            kind: "nfa",
            start: nfa.start,
            states: nfa
                .states
                .iter()
                .map(|s| StateRow {
                    id: s.id,
                    is_final: s.is_final,
                    edges: s.transitions.clone(),
                })
                .collect(),
        }
    }

    pub fn of_dfa(dfa: &Dfa) -> Self {
        Self {
            tag: dfa.tag.clone(),
            kind: "dfa",
            start: dfa.start,
            states: dfa
                .states
                .iter()
                .map(|s| StateRow {
                    id: s.id,
                    is_final: s.is_final,
                    edges: s
                        .transitions
                        .iter()
                        .map(|(&c, &t)| (Symbol::Char(c), vec![t]))
                        .collect(),
                })
                .collect(),
        }
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Text form. Edges into the same target are folded into one line with
/// consecutive chars shown as ranges, so `.` does not print 95 lines.
impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let finals: Vec<String> = self
            .states
            .iter()
            .filter(|s| s.is_final)
            .map(|s| s.id.to_string())
            .collect();
        writeln!(f, "{} [{}] {} states", self.tag, self.kind, self.states.len())?;
        writeln!(f, "  start: {}", self.start)?;
        writeln!(f, "  final: {}", finals.join(" "))?;
        for row in &self.states {
            let mut by_target: BTreeMap<StateId, Vec<Symbol>> = BTreeMap::new();
            for (sym, targets) in &row.edges {
                for &t in targets {
                    by_target.entry(t).or_default().push(*sym);
                }
            }
            for (target, symbols) in by_target {
                writeln!(
                    f,
                    "  {} --[{}]--> {}",
                    row.id,
                    fold_ranges(&symbols),
                    target
                )?;
            }
        }
        Ok(())
    }
}

fn fold_ranges(symbols: &[Symbol]) -> String {
    let mut parts: Vec<String> = Vec::new();
    let mut run: Option<(char, char)> = None;
    let flush = |run: Option<(char, char)>, parts: &mut Vec<String>| match run {
        Some((lo, hi)) if lo == hi => parts.push(format!("{lo:?}")),
        Some((lo, hi)) => parts.push(format!("{lo:?}-{hi:?}")),
        None => {}
    };
    for sym in symbols {
        match *sym {
            Symbol::Epsilon => {
                flush(run.take(), &mut parts);
                parts.push("ε".to_string());
            }
            Symbol::Char(c) => match run {
                Some((lo, hi)) if u32::from(hi) + 1 == u32::from(c) => run = Some((lo, c)),
                _ => {
                    flush(run.take(), &mut parts);
                    run = Some((c, c));
                }
            },
        }
    }
    flush(run, &mut parts);
    parts.join(" ")
}
