// src/lexer/symbols.rs
use std::fmt;

use hashbrown::HashMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// Records the first type seen for each distinct lexeme. Later inserts of a
/// known name are ignored. Iteration follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    entries: Vec<SymbolEntry>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `name` was not present before.
    pub fn insert(&mut self, name: &str, ty: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(SymbolEntry {
            name: name.to_string(),
            ty: ty.to_string(),
        });
        true
    }

    pub fn lookup(&self, name: &str) -> Option<&SymbolEntry> {
        self.index.get(name).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.entries.iter()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }
}

impl fmt::Display for SymbolTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const RULE: &str = "----------------------------------";
        writeln!(f, "{RULE}")?;
        writeln!(f, "        Symbol Table")?;
        writeln!(f, "{RULE}")?;
        writeln!(f, "{:<15} {:<15}", "Identifier", "Type")?;
        writeln!(f, "{RULE}")?;
        for e in &self.entries {
            writeln!(f, "{:<15} {:<15}", e.name, e.ty)?;
        }
        writeln!(f, "{RULE}")
    }
}
