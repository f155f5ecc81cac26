// src/bin/dump_dfa.rs
// Print the compiled automaton of every rule.
// Usage:
//   cargo run --bin dump_dfa                      # minimized DFAs, standard rules
//   cargo run --bin dump_dfa -- --nfa             # Thompson NFAs instead
//   cargo run --bin dump_dfa -- --raw --json      # unminimized DFAs as JSON
//   cargo run --bin dump_dfa -- --rules rules.json

use std::{env, path::PathBuf};

use anyhow::{Context, Result, anyhow};
use relex::lexer::{
    LexerConfig,
    automata::{Refinement, determinize, io::TransitionTable},
    rules::compile_nfa,
};

#[derive(Clone, Copy, PartialEq, Eq)]
enum Stage {
    Nfa,
    Raw,
    Minimized(Refinement),
}

fn main() -> Result<()> {
    let mut stage = Stage::Minimized(Refinement::Partition);
    let mut json = false;
    let mut rules: Option<PathBuf> = None;

    let mut it = env::args().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--nfa" => stage = Stage::Nfa,
            "--raw" => stage = Stage::Raw,
            "--target-identity" => stage = Stage::Minimized(Refinement::TargetIdentity),
            "--json" => json = true,
            "--rules" => {
                rules = Some(PathBuf::from(
                    it.next().ok_or_else(|| anyhow!("--rules needs a path"))?,
                ))
            }
            other => return Err(anyhow!("unknown argument {other}")),
        }
    }

    let config = match &rules {
        Some(p) => LexerConfig::from_json_path(p)
            .with_context(|| format!("loading rules from {}", p.display()))?,
        None => LexerConfig::default(),
    };

    let mut tables = Vec::with_capacity(config.rules.len());
    for spec in &config.rules {
        let nfa = compile_nfa(spec)?;
        let table = match stage {
            Stage::Nfa => TransitionTable::of_nfa(&nfa),
            Stage::Raw => TransitionTable::of_dfa(&determinize(&nfa)),
            Stage::Minimized(r) => TransitionTable::of_dfa(&determinize(&nfa).minimize(r)),
        };
        if !json {
            eprintln!(
                "[dump] {:<16} {:?} -> {} states",
                spec.tag,
                spec.pattern,
                table.states.len()
            );
        }
        tables.push(table);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
    } else {
        for t in &tables {
            println!("{t}");
        }
    }
    Ok(())
}
