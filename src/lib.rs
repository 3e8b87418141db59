//! This crate provides engines for one-dimensional cellular automata and
//! deterministic single-tape Turing machines, and a compiler that embeds any
//! machine into an equivalent automaton: the machine's state and head
//! position are encoded into cell symbols so that automaton evolution
//! simulates machine execution step for step. It includes modules for
//! parsing definition files, validating them, and managing a collection of
//! embedded demo definitions.

pub mod analyzer;
pub mod automaton;
pub mod compiler;
pub mod configuration;
pub mod loader;
pub mod machine;
pub mod parser;
pub mod programs;
pub mod types;

/// Re-exports the `Rule` enum from the parser module, used by the `pest` grammar.
pub use crate::parser::Rule;
/// Re-exports the analysis entry points and `AnalysisError` from the analyzer module.
pub use analyzer::{analyze_automaton, analyze_machine, check_coverage, AnalysisError};
/// Re-exports the cellular automaton engine and its driver types.
pub use automaton::{CaRun, CellularAutomaton, RunOptions};
/// Re-exports the machine-to-automaton compiler.
pub use compiler::{compile, CompiledAutomaton, Projection};
/// Re-exports the shared configuration type.
pub use configuration::Configuration;
/// Re-exports the `ProgramLoader` struct from the loader module.
pub use loader::{LoadedDefinition, ProgramLoader};
/// Re-exports the Turing machine engine and its driver types.
pub use machine::{MachineConfiguration, MachineRun, TuringMachine};
/// Re-exports the parsing entry points from the parser module.
pub use parser::{parse_automaton, parse_machine};
/// Re-exports the embedded definition registry.
pub use programs::ProgramManager;
/// Re-exports various shared types for definitions and execution outcomes.
pub use types::{
    AutomataError, AutomatonDefinition, Direction, Fallback, MachineDefinition, MachineRule,
    Neighborhood, Outcome, RuleTable, Step, StopReason, Symbol, DEFAULT_BLANK_SYMBOL,
    DEFAULT_STEP_LIMIT, WILDCARD_SYMBOL,
};
