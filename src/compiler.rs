//! This module compiles a Turing machine into an equivalent cellular
//! automaton.
//!
//! The embedding encodes the machine into cell symbols: every tape symbol
//! `s` appears in the automaton's alphabet both bare ("the head is not
//! here") and as a compound symbol pairing it with a state `q` ("this cell
//! holds `s` and the head is here in state `q`"). Exactly one cell of any
//! reachable configuration carries a compound symbol; the generated rule
//! table preserves that invariant while moving the marker the way the
//! machine moves its head, so one automaton step mirrors one machine step.
//!
//! Accepting states are stabilized: a compound cell whose state is accepting
//! reverts to its bare symbol regardless of neighbors, which makes an
//! accepted configuration a fixed point and lets `stop_on_stable` detect the
//! halt. A machine that *rejects* (no applicable rule) is not stabilized by
//! any generated entry; its marker simply stops evolving under the
//! `KeepCenter` fallback, which also makes the configuration a fixed point,
//! with the marker left in place.

use crate::analyzer::analyze_machine;
use crate::automaton::CellularAutomaton;
use crate::configuration::Configuration;
use crate::types::{
    AutomataError, AutomatonDefinition, Direction, MachineDefinition, RuleTable, Symbol,
};
use std::collections::{BTreeSet, HashMap};

/// A compiled automaton, together with the symbol tables needed to read the
/// simulated machine back out of its configurations.
#[derive(Debug)]
pub struct CompiledAutomaton {
    automaton: CellularAutomaton,
    /// compound symbol -> (bare symbol, state)
    heads: HashMap<Symbol, (Symbol, String)>,
    /// (bare symbol, state) -> compound symbol
    compounds: HashMap<(Symbol, String), Symbol>,
}

/// The machine-level reading of a compiled automaton's configuration: the
/// bare tape, and the position and state encoded by the head marker, if one
/// is present.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The configuration with every compound symbol replaced by its bare
    /// component.
    pub tape: Configuration,
    /// The logical index carrying the head marker and the state it encodes.
    /// `None` once an accepting marker has been erased.
    pub head: Option<(i64, String)>,
}

impl CompiledAutomaton {
    /// Returns the underlying automaton.
    pub fn automaton(&self) -> &CellularAutomaton {
        &self.automaton
    }

    /// Returns the underlying automaton for stepping.
    pub fn automaton_mut(&mut self) -> &mut CellularAutomaton {
        &mut self.automaton
    }

    /// Consumes the wrapper and returns the bare automaton.
    pub fn into_automaton(self) -> CellularAutomaton {
        self.automaton
    }

    /// Returns the compound symbol encoding `(symbol, state)`, if the pair
    /// belongs to the compiled alphabet.
    pub fn compound(&self, symbol: &Symbol, state: &str) -> Option<&Symbol> {
        self.compounds.get(&(symbol.clone(), state.to_string()))
    }

    /// Decodes a compound symbol into its bare component and state.
    pub fn decode(&self, symbol: &Symbol) -> Option<(&Symbol, &str)> {
        self.heads
            .get(symbol)
            .map(|(bare, state)| (bare, state.as_str()))
    }

    /// Reads a configuration back as machine tape, head, and state.
    ///
    /// Errors with [`AutomataError::MultipleHeads`] if more than one compound
    /// symbol is present: a configuration no compiled automaton can reach,
    /// indicating the caller stepped a hand-modified configuration.
    pub fn project(&self, configuration: &Configuration) -> Result<Projection, AutomataError> {
        let mut tape = Configuration::empty(configuration.blank().clone());
        let mut head: Option<(i64, String)> = None;
        let (start, end) = configuration.bounds();

        for i in start..end {
            let symbol = configuration.get(i);
            match self.heads.get(symbol) {
                Some((bare, state)) => {
                    if let Some((seen, _)) = &head {
                        return Err(AutomataError::MultipleHeads(*seen, i));
                    }
                    head = Some((i, state.clone()));
                    tape.set(i, bare.clone());
                }
                None => tape.set(i, symbol.clone()),
            }
        }

        Ok(Projection { tape, head })
    }
}

/// Compiles a machine into an automaton whose evolution mirrors the
/// machine's evolution step for step.
///
/// The definition is validated first: rules referencing symbols or states
/// outside the declared sets are compile-time errors, as are accepting
/// states with outgoing rules. Compound symbols render as `symbol_state`; a
/// generated name clashing with any other alphabet entry is a
/// [`AutomataError::SymbolCollision`].
pub fn compile(definition: &MachineDefinition) -> Result<CompiledAutomaton, AutomataError> {
    analyze_machine(definition)?;

    // Alphabet: every tape symbol, bare and paired with every state.
    let mut symbols: BTreeSet<Symbol> = definition.alphabet.clone();
    let mut compounds: HashMap<(Symbol, String), Symbol> = HashMap::new();
    let mut heads: HashMap<Symbol, (Symbol, String)> = HashMap::new();

    for symbol in &definition.alphabet {
        for state in &definition.states {
            let compound = Symbol::new(format!("{}_{}", symbol, state));
            if !symbols.insert(compound.clone()) {
                return Err(AutomataError::SymbolCollision(compound));
            }
            compounds.insert((symbol.clone(), state.clone()), compound.clone());
            heads.insert(compound, (symbol.clone(), state.clone()));
        }
    }

    let bare: Vec<Symbol> = definition.alphabet.iter().cloned().collect();
    let full: Vec<Symbol> = symbols.iter().cloned().collect();
    let mut rules = RuleTable::new();

    // One machine rule becomes two families of table entries. The marked
    // center always reverts to the written symbol, whatever its neighbors:
    // the head has left that cell. The neighbor in the direction of motion
    // reads the marker next to it and takes over the head, pairing its own
    // symbol with the successor state. The far-side neighbor of those
    // entries ranges over bare symbols only: a triple with two markers is
    // unreachable, and skipping it keeps the table free of conflicting
    // entries no matter what order rules are emitted in.
    for state in &definition.states {
        let Some(state_rules) = definition.rules.get(state) else {
            continue;
        };

        for rule in state_rules {
            let marked = compounds[&(rule.read.clone(), state.clone())].clone();

            for left in &full {
                for right in &full {
                    rules.insert(
                        (left.clone(), marked.clone(), right.clone()),
                        rule.write.clone(),
                    );
                }
            }

            for neighbor in &bare {
                let takes_head = compounds[&(neighbor.clone(), rule.next_state.clone())].clone();
                for far in &bare {
                    let key = match rule.direction {
                        Direction::Right => (marked.clone(), neighbor.clone(), far.clone()),
                        Direction::Left => (far.clone(), neighbor.clone(), marked.clone()),
                    };
                    rules.insert(key, takes_head.clone());
                }
            }
        }
    }

    // Accepting markers are erased: the cell reverts to its bare symbol and
    // the configuration becomes a fixed point.
    for state in &definition.accepting {
        for symbol in &definition.alphabet {
            let marked = compounds[&(symbol.clone(), state.clone())].clone();
            for left in &full {
                for right in &full {
                    rules.insert(
                        (left.clone(), marked.clone(), right.clone()),
                        symbol.clone(),
                    );
                }
            }
        }
    }

    // Initial configuration: the bare tape with the marker on the head cell.
    let mut configuration =
        Configuration::new(definition.tape.clone(), definition.blank.clone());
    let under_head = configuration.get(definition.head).clone();
    let marked = compounds[&(under_head, definition.initial_state.clone())].clone();
    configuration.set(definition.head, marked);

    let automaton_definition = AutomatonDefinition {
        name: format!("{} (compiled)", definition.name),
        symbols,
        blank: definition.blank.clone(),
        cells: definition.tape.clone(),
        rules,
    };
    let automaton = CellularAutomaton::with_configuration(automaton_definition, configuration);

    Ok(CompiledAutomaton {
        automaton,
        heads,
        compounds,
    })
}
