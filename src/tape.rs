//! This module defines the sparse, bi-infinite tape. Only non-blank cells are stored; every
//! other position implicitly holds the blank symbol.

use crate::types::Symbol;
use std::collections::HashMap;

/// A bi-infinite tape stored sparsely. Positions without an entry hold the blank symbol, and
/// writing blank removes the entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tape {
    cells: HashMap<i64, Symbol>,
}

impl Tape {
    /// Creates an empty (all blank) tape.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `input` left-to-right starting at position 0, one symbol per character.
    pub fn from_input(input: &str) -> Self {
        let mut tape = Self::new();
        for (pos, c) in (0..).zip(input.chars()) {
            tape.write(pos, Symbol::from(c));
        }
        tape
    }

    /// Returns the symbol at `pos`, or blank if nothing is stored there.
    pub fn read(&self, pos: i64) -> Symbol {
        self.cells.get(&pos).cloned().unwrap_or_default()
    }

    /// Writes `symbol` at `pos`. Writing blank erases the cell.
    pub fn write(&mut self, pos: i64, symbol: Symbol) {
        if symbol.is_blank() {
            self.cells.remove(&pos);
        } else {
            self.cells.insert(pos, symbol);
        }
    }

    /// Returns the lowest and highest positions holding a non-blank symbol, or `None` if the
    /// tape is entirely blank.
    pub fn occupied_bounds(&self) -> Option<(i64, i64)> {
        let min = self.cells.keys().min()?;
        let max = self.cells.keys().max()?;
        Some((*min, *max))
    }

    /// Number of non-blank cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
