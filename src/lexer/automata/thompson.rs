// src/lexer/automata/thompson.rs
//! Thompson construction for the restricted rule-pattern grammar.
//!
//! Grammar, scanned left to right over a stack of fragments:
//!
//! ```text
//!   x          literal (alphanumerics and non-meta punctuation, including a bare `*`)
//!   '  \'      literal single quote
//!   \c         escaped metacharacter, one of  . * + ? ( ) [ ] { } | \ ' - / ^ $
//!   .          any printable ASCII char (0x20..=0x7E); `.*` is its Kleene closure
//!   [...]      class; `a-z` expands when both bounds are alphanumeric and ascending
//!   (a|b|..)   group; alternatives compile recursively and are unioned left to right
//!   A+  A?     one-or-more / optional of the fragment immediately before
//!   ^...$      anchors, outermost pattern only
//! ```
//!
//! Adjacent fragments concatenate in source order once the scan finishes.

use super::graph::{StateGraph, StateId, Symbol};
use super::nfa::Nfa;
use crate::lexer::error::PatternError;

/// Characters that may follow a backslash (inside or outside a class).
const ESCAPABLE: &str = ".*+?()[]{}|\\'-/^$";

/// Printable ASCII range matched by `.`.
pub const ANY_PRINTABLE: std::ops::RangeInclusive<char> = ' '..='~';

/// A partially built automaton: entry and exit node inside a [`Builder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment {
    pub start: StateId,
    pub end: StateId,
}

/// Per-compilation arena and id allocator. Every composition primitive
/// allocates from here; nothing is global.
#[derive(Debug, Default)]
pub struct Builder {
    graph: StateGraph,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    fn pair(&mut self) -> Fragment {
        let start = self.graph.add_state();
        let end = self.graph.add_state();
        Fragment { start, end }
    }

    pub fn literal(&mut self, c: char) -> Fragment {
        let f = self.pair();
        self.graph.add_transition(f.start, Symbol::Char(c), f.end);
        f
    }

    pub fn any_printable(&mut self) -> Fragment {
        self.class(ANY_PRINTABLE)
    }

    /// One direct edge per member from the class start to the class end.
    pub fn class<I: IntoIterator<Item = char>>(&mut self, members: I) -> Fragment {
        let f = self.pair();
        for c in members {
            self.graph.add_transition(f.start, Symbol::Char(c), f.end);
        }
        f
    }

    /// `ab`: splice `a.end -ε-> b.start`.
    pub fn concat(&mut self, a: Fragment, b: Fragment) -> Fragment {
        self.graph.add_epsilon(a.end, b.start);
        Fragment {
            start: a.start,
            end: b.end,
        }
    }

    /// `a|b`: fresh start and end with epsilon branches to and from both.
    pub fn union(&mut self, a: Fragment, b: Fragment) -> Fragment {
        let f = self.pair();
        self.graph.add_epsilon(f.start, a.start);
        self.graph.add_epsilon(f.start, b.start);
        self.graph.add_epsilon(a.end, f.end);
        self.graph.add_epsilon(b.end, f.end);
        f
    }

    /// `a*`: epsilon bypass plus epsilon loop-back.
    pub fn star(&mut self, a: Fragment) -> Fragment {
        let f = self.pair();
        self.graph.add_epsilon(f.start, a.start);
        self.graph.add_epsilon(f.start, f.end);
        self.graph.add_epsilon(a.end, a.start);
        self.graph.add_epsilon(a.end, f.end);
        f
    }

    /// `a+ = a·a*`, with the star wrapping the same nodes as `a`.
    pub fn plus(&mut self, a: Fragment) -> Fragment {
        let starred = self.star(a);
        self.concat(a, starred)
    }

    /// `a?`: epsilon bypass only.
    pub fn optional(&mut self, a: Fragment) -> Fragment {
        let f = self.pair();
        self.graph.add_epsilon(f.start, a.start);
        self.graph.add_epsilon(f.start, f.end);
        self.graph.add_epsilon(a.end, f.end);
        f
    }

    /// `^`: new start node guarded by an epsilon edge.
    pub fn anchor_start(&mut self, a: Fragment) -> Fragment {
        let start = self.graph.add_state();
        self.graph.add_epsilon(start, a.start);
        Fragment { start, end: a.end }
    }

    /// Marks `f.end` as the sole accepting state and keeps only what is
    /// reachable from `f.start`. `f` must have been built by this builder.
    pub fn finish(self, f: Fragment, tag: &str) -> Nfa {
        let mut graph = self.graph;
        graph.set_final(f.end, true);
        let (states, remap) = graph.compact(f.start);
        let accept = remap[f.end as usize].expect("fragment end is reachable from its start");
        Nfa {
            states,
            start: 0,
            accept,
            tag: tag.to_string(),
        }
    }
}

/// Compiles `pattern` into an NFA tagged with `tag`.
pub fn compile(pattern: &str, tag: &str) -> Result<Nfa, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let anchored_start = chars.first() == Some(&'^');
    let anchored_end = ends_with_unescaped_dollar(&chars);

    let lo = usize::from(anchored_start);
    let hi = if anchored_end && chars.len() > lo {
        chars.len() - 1
    } else {
        chars.len()
    };

    let mut builder = Builder::new();
    let mut frag = compile_seq(&mut builder, &chars[lo..hi], lo)?;
    if anchored_start {
        frag = builder.anchor_start(frag);
    }
    // `$` needs no rewiring: `finish` leaves `frag.end` as the only final node.
    Ok(builder.finish(frag, tag))
}

fn ends_with_unescaped_dollar(chars: &[char]) -> bool {
    if chars.last() != Some(&'$') {
        return false;
    }
    let backslashes = chars[..chars.len() - 1]
        .iter()
        .rev()
        .take_while(|&&c| c == '\\')
        .count();
    backslashes % 2 == 0
}

/// Compiles a concatenation of atoms. `offset` is the position of `pat[0]`
/// within the outermost pattern, for error reporting.
fn compile_seq(b: &mut Builder, pat: &[char], offset: usize) -> Result<Fragment, PatternError> {
    let mut stack: Vec<Fragment> = Vec::new();
    let mut i = 0;

    while i < pat.len() {
        let c = pat[i];
        let position = offset + i;
        match c {
            '(' => {
                let close =
                    matching_paren(pat, i).ok_or(PatternError::UnmatchedParen { position })?;
                let group = compile_group(b, &pat[i + 1..close], position + 1)?;
                stack.push(group);
                i = close + 1;
            }
            ')' => return Err(PatternError::UnmatchedParen { position }),
            '[' => {
                let (members, next) = parse_class(pat, i, offset)?;
                stack.push(b.class(members));
                i = next;
            }
            '.' => {
                let any = b.any_printable();
                if pat.get(i + 1) == Some(&'*') {
                    stack.push(b.star(any));
                    i += 2;
                } else {
                    stack.push(any);
                    i += 1;
                }
            }
            '+' | '?' => {
                let top = stack.pop().ok_or(PatternError::DanglingQuantifier {
                    position,
                    quantifier: c,
                })?;
                stack.push(if c == '+' { b.plus(top) } else { b.optional(top) });
                i += 1;
            }
            '\\' => {
                let escaped = unescape(pat, i, offset)?;
                stack.push(b.literal(escaped));
                i += 2;
            }
            '^' | '$' => {
                return Err(PatternError::MisplacedAnchor {
                    position,
                    anchor: c,
                });
            }
            '|' | ']' => return Err(PatternError::UnexpectedChar { position, ch: c }),
            c if c.is_control() => return Err(PatternError::UnexpectedChar { position, ch: c }),
            c => {
                stack.push(b.literal(c));
                i += 1;
            }
        }
    }

    let mut frags = stack.into_iter();
    let first = frags
        .next()
        .ok_or(PatternError::EmptyPattern { position: offset })?;
    Ok(frags.fold(first, |acc, next| b.concat(acc, next)))
}

/// Splits a group body on depth-0 `|` and unions the alternatives in order.
fn compile_group(b: &mut Builder, body: &[char], offset: usize) -> Result<Fragment, PatternError> {
    let mut group: Option<Fragment> = None;
    for (start, alt) in split_alternatives(body) {
        let frag = compile_seq(b, alt, offset + start)?;
        group = Some(match group {
            Some(g) => b.union(g, frag),
            None => frag,
        });
    }
    group.ok_or(PatternError::EmptyPattern { position: offset })
}

fn unescape(pat: &[char], at: usize, offset: usize) -> Result<char, PatternError> {
    match pat.get(at + 1) {
        Some(&e) if ESCAPABLE.contains(e) => Ok(e),
        found => Err(PatternError::InvalidEscape {
            position: offset + at,
            found: found.copied(),
        }),
    }
}

/// Index of the first unescaped `]` after the `[` at `open`.
fn class_end(pat: &[char], open: usize) -> Option<usize> {
    let mut i = open + 1;
    while i < pat.len() {
        match pat[i] {
            '\\' => i += 2,
            ']' => return Some(i),
            _ => i += 1,
        }
    }
    None
}

/// Index of the `)` closing the `(` at `open`, found with a depth counter.
/// Escaped characters and class bodies do not count.
fn matching_paren(pat: &[char], open: usize) -> Option<usize> {
    let mut depth = 0usize;
    let mut i = open;
    while i < pat.len() {
        match pat[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(pat, i) {
                    i = end;
                }
            }
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

/// Splits on `|` at nesting depth 0, returning each piece with its offset.
fn split_alternatives(body: &[char]) -> Vec<(usize, &[char])> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut piece_start = 0;
    let mut i = 0;
    while i < body.len() {
        match body[i] {
            '\\' => i += 1,
            '[' => {
                if let Some(end) = class_end(body, i) {
                    i = end;
                }
            }
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            '|' if depth == 0 => {
                out.push((piece_start, &body[piece_start..i]));
                piece_start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    out.push((piece_start, &body[piece_start..]));
    out
}

/// Parses the class opening at `open`; returns its members and the index
/// just past the closing `]`.
fn parse_class(
    pat: &[char],
    open: usize,
    offset: usize,
) -> Result<(Vec<char>, usize), PatternError> {
    let end = class_end(pat, open).ok_or(PatternError::UnterminatedClass {
        position: offset + open,
    })?;
    let body = &pat[open + 1..end];
    if body.is_empty() {
        return Err(PatternError::EmptyClass {
            position: offset + open,
        });
    }

    let mut members = Vec::new();
    let mut i = 0;
    while i < body.len() {
        let c = body[i];
        if c == '\\' {
            members.push(unescape(body, i, offset + open + 1)?);
            i += 2;
            continue;
        }
        if c == '-' && i > 0 && i + 1 < body.len() {
            let (lo, hi) = (body[i - 1], body[i + 1]);
            if lo.is_alphanumeric() && hi.is_alphanumeric() && lo < hi {
                // `lo` is already a member; `hi` is consumed here.
                members.extend((lo..=hi).skip(1));
                i += 2;
                continue;
            }
        }
        members.push(c);
        i += 1;
    }
    Ok((members, end + 1))
}
