//! This module defines `Configuration`, the growable, offset-indexed symbol
//! sequence backing both a cellular automaton's cell array and a Turing
//! machine's tape. The sequence is conceptually infinite: cells outside the
//! materialized window read as the blank symbol, and writing outside the
//! window grows it transparently.

use crate::types::Symbol;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A one-dimensional configuration of cells.
///
/// The backing vector covers logical positions `offset .. offset + len`;
/// every other position holds the blank symbol. `offset` moves when the
/// window grows to the left, so logical indices stay valid across growth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Configuration {
    cells: Vec<Symbol>,
    blank: Symbol,
    offset: i64,
}

impl Configuration {
    /// Creates a configuration whose first cell sits at logical position 0.
    pub fn new(cells: Vec<Symbol>, blank: Symbol) -> Self {
        Self {
            cells,
            blank,
            offset: 0,
        }
    }

    /// Creates a configuration with no materialized cells.
    pub fn empty(blank: Symbol) -> Self {
        Self::new(Vec::new(), blank)
    }

    /// Returns the blank symbol cells outside the window read as.
    pub fn blank(&self) -> &Symbol {
        &self.blank
    }

    /// Returns the logical position of the first materialized cell.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Returns the number of materialized cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Checks whether no cell has been materialized yet.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the logical bounds `(start, end)` of the materialized window,
    /// with `end` exclusive.
    pub fn bounds(&self) -> (i64, i64) {
        (self.offset, self.offset + self.cells.len() as i64)
    }

    /// Returns the symbol at the given logical position.
    ///
    /// Positions outside the materialized window read as the blank symbol,
    /// so any integer index is valid.
    pub fn get(&self, index: i64) -> &Symbol {
        let i = index - self.offset;
        if i >= 0 && (i as usize) < self.cells.len() {
            &self.cells[i as usize]
        } else {
            &self.blank
        }
    }

    /// Writes a symbol at the given logical position, growing the window
    /// left or right as needed.
    ///
    /// Newly materialized cells are filled with the blank symbol, except the
    /// one being written; previously set cells keep their values.
    pub fn set(&mut self, index: i64, value: Symbol) {
        let mut i = index - self.offset;

        if i < 0 {
            let grow = (-i) as usize;
            let mut grown = vec![self.blank.clone(); grow];
            grown.append(&mut self.cells);
            self.cells = grown;
            self.offset += i;
            i = 0;
        } else if i as usize >= self.cells.len() {
            self.cells.resize(i as usize + 1, self.blank.clone());
        }

        self.cells[i as usize] = value;
    }

    /// Renders the materialized cells in logical left-to-right order, with
    /// no separators. Used for display; the equality implementation is the
    /// authority for stability checks.
    pub fn render(&self) -> String {
        self.cells.iter().map(|cell| cell.as_str()).collect()
    }
}

/// Equality on the full logical content: two configurations compare equal
/// when they share a blank symbol and every logical position reads the same
/// through [`Configuration::get`]. Growth that only materializes blanks does
/// not affect equality.
impl PartialEq for Configuration {
    fn eq(&self, other: &Self) -> bool {
        if self.blank != other.blank {
            return false;
        }

        let (self_start, self_end) = self.bounds();
        let (other_start, other_end) = other.bounds();
        let start = self_start.min(other_start);
        let end = self_end.max(other_end);

        (start..end).all(|i| self.get(i) == other.get(i))
    }
}

impl Eq for Configuration {}

impl fmt::Display for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(text: &str) -> Vec<Symbol> {
        text.chars().map(Symbol::from).collect()
    }

    #[test]
    fn test_get_outside_window_reads_blank() {
        let config = Configuration::new(symbols("010"), Symbol::from('0'));

        assert_eq!(config.get(-1), &Symbol::from('0'));
        assert_eq!(config.get(0), &Symbol::from('0'));
        assert_eq!(config.get(1), &Symbol::from('1'));
        assert_eq!(config.get(3), &Symbol::from('0'));
        assert_eq!(config.get(100), &Symbol::from('0'));
    }

    #[test]
    fn test_set_grows_right() {
        let mut config = Configuration::new(symbols("1"), Symbol::from('0'));

        config.set(3, Symbol::from('1'));

        assert_eq!(config.len(), 4);
        assert_eq!(config.offset(), 0);
        assert_eq!(config.render(), "1001");
    }

    #[test]
    fn test_set_grows_left_and_adjusts_offset() {
        let mut config = Configuration::new(symbols("1"), Symbol::from('0'));

        config.set(-2, Symbol::from('1'));

        assert_eq!(config.offset(), -2);
        assert_eq!(config.render(), "1001");
        assert_eq!(config.get(-2), &Symbol::from('1'));
        assert_eq!(config.get(0), &Symbol::from('1'));
    }

    #[test]
    fn test_set_preserves_previous_values() {
        let mut config = Configuration::empty(Symbol::from('0'));

        config.set(2, Symbol::from('a'));
        config.set(-3, Symbol::from('b'));
        config.set(7, Symbol::from('c'));

        assert_eq!(config.get(2), &Symbol::from('a'));
        assert_eq!(config.get(-3), &Symbol::from('b'));
        assert_eq!(config.get(7), &Symbol::from('c'));
        assert_eq!(config.get(0), &Symbol::from('0'));
        assert_eq!(config.bounds(), (-3, 8));
    }

    #[test]
    fn test_set_then_get_roundtrips_at_any_index() {
        for index in [-10i64, -1, 0, 1, 5, 42] {
            let mut config = Configuration::new(symbols("01"), Symbol::from('0'));
            config.set(index, Symbol::from('x'));
            assert_eq!(config.get(index), &Symbol::from('x'));
        }
    }

    #[test]
    fn test_equality_ignores_materialized_blanks() {
        let narrow = Configuration::new(symbols("11"), Symbol::from('0'));
        let mut wide = Configuration::new(symbols("11"), Symbol::from('0'));
        wide.set(5, Symbol::from('0'));
        wide.set(-4, Symbol::from('0'));

        assert_eq!(narrow, wide);
        assert_ne!(narrow.render(), wide.render());
    }

    #[test]
    fn test_equality_respects_content_and_position() {
        let a = Configuration::new(symbols("11"), Symbol::from('0'));
        let mut shifted = Configuration::empty(Symbol::from('0'));
        shifted.set(1, Symbol::from('1'));
        shifted.set(2, Symbol::from('1'));

        assert_ne!(a, shifted);
    }

    #[test]
    fn test_render_concatenates_cells() {
        let config = Configuration::new(
            vec![Symbol::from('1'), Symbol::new("1_q0"), Symbol::from('□')],
            Symbol::from('□'),
        );

        assert_eq!(config.render(), "11_q0□");
        assert_eq!(config.to_string(), config.render());
    }

    #[test]
    fn test_serde_roundtrip() {
        let mut config = Configuration::new(symbols("01"), Symbol::from('0'));
        config.set(-1, Symbol::from('1'));

        let json = serde_json::to_string(&config).unwrap();
        let restored: Configuration = serde_json::from_str(&json).unwrap();

        assert_eq!(config, restored);
        assert_eq!(restored.offset(), -1);
    }
}
