//! This module defines the core data structures and types shared by the
//! cellular automaton engine, the Turing machine engine, and the compiler
//! between the two: symbols, directions, definitions, outcomes, and error
//! types.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use thiserror::Error;

use crate::Rule;

/// The default blank symbol used when a definition does not declare one.
pub const DEFAULT_BLANK_SYMBOL: &str = "□";
/// The wildcard token in automaton rule patterns, standing for any alphabet
/// symbol. Reserved: it may never appear in an alphabet or a compiled table.
pub const WILDCARD_SYMBOL: &str = "*";
/// Step bound applied by front ends when the caller does not supply one.
pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// An opaque, comparable token drawn from a finite alphabet.
///
/// A symbol is a short string: a plain character for hand-written alphabets,
/// or a compound token such as `1_q0` produced by the compiler to mark the
/// simulated head. The engines never look inside a symbol; they only compare
/// and clone them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a symbol from anything convertible to a string.
    pub fn new(value: impl Into<String>) -> Self {
        Symbol(value.into())
    }

    /// Returns the symbol's textual form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Checks whether this symbol is the reserved wildcard token.
    pub fn is_wildcard(&self) -> bool {
        self.0 == WILDCARD_SYMBOL
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(value: &str) -> Self {
        Symbol(value.to_string())
    }
}

impl From<String> for Symbol {
    fn from(value: String) -> Self {
        Symbol(value)
    }
}

impl From<char> for Symbol {
    fn from(value: char) -> Self {
        Symbol(value.to_string())
    }
}

/// A three-cell neighborhood `(left, center, right)`: the domain of a
/// cellular automaton's local rule.
pub type Neighborhood = (Symbol, Symbol, Symbol);

/// A fully explicit local transition table mapping neighborhoods to the new
/// center symbol. Wildcards are expanded away before a table is built.
pub type RuleTable = HashMap<Neighborhood, Symbol>;

/// Represents the possible directions a Turing machine head can move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// Move the head one position to the left.
    Left,
    /// Move the head one position to the right.
    Right,
}

/// The policy a cellular automaton applies to neighborhoods its table does
/// not define. The table is conceptually total: any undefined triple falls
/// back to this policy, so stepping can never fail.
///
/// `KeepCenter` is the default. The choice is carried on each automaton so
/// the contract is explicit per instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fallback {
    /// An undefined neighborhood leaves the center symbol unchanged.
    #[default]
    KeepCenter,
    /// An undefined neighborhood produces the blank symbol.
    Blank,
}

/// A cellular automaton definition: the immutable part of an automaton,
/// as read from a `.ca` file or produced by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutomatonDefinition {
    /// Human-readable name of the automaton.
    pub name: String,
    /// The complete cell alphabet: every symbol the table and the initial
    /// cells mention, plus the blank symbol.
    pub symbols: BTreeSet<Symbol>,
    /// Symbol standing in for every cell outside the materialized window.
    pub blank: Symbol,
    /// The initial cell contents, starting at logical position 0.
    pub cells: Vec<Symbol>,
    /// The explicit local transition table.
    pub rules: RuleTable,
}

/// A single transition rule of a Turing machine, grouped under its source
/// state in [`MachineDefinition::rules`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MachineRule {
    /// The symbol the head must read for this rule to fire.
    pub read: Symbol,
    /// The symbol written over the read symbol.
    pub write: Symbol,
    /// The direction the head moves after writing.
    pub direction: Direction,
    /// The state the machine transitions to.
    pub next_state: String,
}

/// A deterministic single-tape Turing machine definition.
///
/// The transition relation is partial: a `(state, read)` pair with no rule
/// halts the machine (rejection). Accepting states carry no outgoing rules;
/// acceptance is terminal, and the analyzer enforces it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineDefinition {
    /// Human-readable name of the machine.
    pub name: String,
    /// The finite state set.
    pub states: BTreeSet<String>,
    /// The tape alphabet, including the blank symbol.
    pub alphabet: BTreeSet<Symbol>,
    /// The distinguished blank symbol.
    pub blank: Symbol,
    /// The state the machine starts in.
    pub initial_state: String,
    /// The set of accepting states.
    pub accepting: BTreeSet<String>,
    /// Transition rules grouped by source state.
    pub rules: HashMap<String, Vec<MachineRule>>,
    /// The initial tape contents, starting at logical position 0.
    pub tape: Vec<Symbol>,
    /// The initial head position.
    pub head: i64,
}

impl MachineDefinition {
    /// Looks up the rule for `(state, read)`, if any.
    pub fn rule_for(&self, state: &str, read: &Symbol) -> Option<&MachineRule> {
        self.rules
            .get(state)?
            .iter()
            .find(|rule| rule.read == *read)
    }

    /// Returns the total number of transition rules across all states.
    pub fn rule_count(&self) -> usize {
        self.rules.values().map(|rules| rules.len()).sum()
    }
}

/// Represents the outcome of a single Turing machine step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The machine performed a step and can continue.
    Continue,
    /// No rule is defined for the current state and symbol; the machine has
    /// halted without mutating its configuration.
    Halt,
}

/// The terminal outcome of a Turing machine run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The machine reached an accepting state.
    Accepted,
    /// The machine halted on an undefined transition.
    Rejected,
    /// The caller-supplied step bound was exhausted first.
    StepLimit,
}

/// Why a cellular automaton run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// The configuration no longer changes from one step to the next.
    Stable,
    /// The requested neighborhood appeared in the previous configuration.
    TransitionSeen(Neighborhood),
    /// The step bound was exhausted.
    StepLimit,
}

/// Represents the errors that can occur while building, parsing, validating,
/// or compiling automata and machines.
///
/// Normal terminal outcomes (a machine rejecting, an automaton settling)
/// are not errors; they are [`Outcome`] and [`StopReason`] variants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomataError {
    /// No rule is defined for the given state and symbol. Surfaced by strict
    /// stepping; the engine's plain `step` signals this through
    /// [`Step::Halt`] instead, as rejection is a normal outcome.
    #[error("No rule defined for state {0} and symbol {1}")]
    UndefinedTransition(String, Symbol),
    /// A rule or tape references a symbol missing from the declared alphabet.
    #[error("Symbol {0} is not part of the declared alphabet")]
    UnknownSymbol(Symbol),
    /// A rule or definition references an undeclared state.
    #[error("State {0} is not part of the declared state set")]
    UnknownState(String),
    /// An accepting state has outgoing rules; acceptance must be terminal.
    #[error("Accepting state {0} has outgoing transitions")]
    NonTerminalAcceptingState(String),
    /// A generated compound symbol clashes with an existing alphabet entry.
    #[error("Compound symbol {0} collides with an existing alphabet entry")]
    SymbolCollision(Symbol),
    /// A configuration carries more than one head marker.
    #[error("Configuration carries head markers at positions {0} and {1}")]
    MultipleHeads(i64, i64),
    /// Indicates an error during the parsing of a definition file.
    #[error("Definition parsing error: {0}")]
    ParseError(#[from] Box<pest::error::Error<Rule>>),
    /// Indicates an error during the validation of a definition's structure.
    #[error("Definition validation error: {0}")]
    ValidationError(String),
    /// Indicates an error related to file system operations.
    #[error("File error: {0}")]
    FileError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_serialization() {
        let left = Direction::Left;
        let right = Direction::Right;

        let left_json = serde_json::to_string(&left).unwrap();
        let right_json = serde_json::to_string(&right).unwrap();

        assert_eq!(left_json, "\"Left\"");
        assert_eq!(right_json, "\"Right\"");

        let left_deserialized: Direction = serde_json::from_str(&left_json).unwrap();
        let right_deserialized: Direction = serde_json::from_str(&right_json).unwrap();

        assert_eq!(left, left_deserialized);
        assert_eq!(right, right_deserialized);
    }

    #[test]
    fn test_symbol_serialization_is_transparent() {
        let symbol = Symbol::new("1_q0");

        let json = serde_json::to_string(&symbol).unwrap();
        assert_eq!(json, "\"1_q0\"");

        let deserialized: Symbol = serde_json::from_str(&json).unwrap();
        assert_eq!(symbol, deserialized);
    }

    #[test]
    fn test_machine_rule_creation() {
        let rule = MachineRule {
            read: Symbol::from('1'),
            write: Symbol::from('0'),
            direction: Direction::Right,
            next_state: "q1".to_string(),
        };

        assert_eq!(rule.write, Symbol::from('0'));
        assert_eq!(rule.direction, Direction::Right);
        assert_eq!(rule.next_state, "q1");
    }

    #[test]
    fn test_rule_lookup_is_keyed_by_state_and_read() {
        let mut rules = HashMap::new();
        rules.insert(
            "q0".to_string(),
            vec![
                MachineRule {
                    read: Symbol::from('0'),
                    write: Symbol::from('1'),
                    direction: Direction::Right,
                    next_state: "q0".to_string(),
                },
                MachineRule {
                    read: Symbol::from('1'),
                    write: Symbol::from('0'),
                    direction: Direction::Left,
                    next_state: "q1".to_string(),
                },
            ],
        );

        let definition = MachineDefinition {
            name: "lookup".to_string(),
            states: ["q0".to_string(), "q1".to_string()].into(),
            alphabet: [Symbol::from('0'), Symbol::from('1'), Symbol::from('□')].into(),
            blank: Symbol::from('□'),
            initial_state: "q0".to_string(),
            accepting: BTreeSet::new(),
            rules,
            tape: vec![Symbol::from('0')],
            head: 0,
        };

        let rule = definition.rule_for("q0", &Symbol::from('1')).unwrap();
        assert_eq!(rule.next_state, "q1");
        assert!(definition.rule_for("q1", &Symbol::from('1')).is_none());
        assert_eq!(definition.rule_count(), 2);
    }

    #[test]
    fn test_error_display() {
        let error = AutomataError::UnknownSymbol(Symbol::from('x'));

        let error_msg = format!("{}", error);
        assert!(error_msg.contains("not part of the declared alphabet"));
        assert!(error_msg.contains('x'));
    }
}
