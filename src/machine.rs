//! This module defines the `TuringMachine` engine, which executes a
//! deterministic single-tape machine over a lazily-grown tape, and the
//! simulation driver that runs it to acceptance or rejection.

use crate::configuration::Configuration;
use crate::types::{AutomataError, Direction, MachineDefinition, MachineRule, Outcome, Step, Symbol};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A snapshot of a running machine: tape, head position, and state.
///
/// Snapshots are owned values. Each step produces a fresh snapshot and
/// replaces the engine's slot, so configurations collected into a trace never
/// alias the engine's current tape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MachineConfiguration {
    /// The tape, unbounded in both directions through its blank symbol.
    pub tape: Configuration,
    /// The head position. May point outside the materialized tape window;
    /// the cell is materialized when it is first written or moved onto.
    pub head: i64,
    /// The machine's current state.
    pub state: String,
}

impl fmt::Display for MachineConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}  state={} head={}",
            self.tape.render(),
            self.state,
            self.head
        )
    }
}

/// The trace produced by [`TuringMachine::run`], together with the terminal
/// outcome.
#[derive(Debug, Clone)]
pub struct MachineRun {
    /// Every configuration in order, starting with the initial one. When the
    /// machine rejects, the last entry is the configuration that had no
    /// applicable rule; it is not appended twice.
    pub trace: Vec<MachineConfiguration>,
    /// How the run ended.
    pub outcome: Outcome,
}

/// A deterministic single-tape Turing machine.
pub struct TuringMachine {
    definition: MachineDefinition,
    configuration: MachineConfiguration,
    step_count: usize,
}

impl TuringMachine {
    /// Creates a machine positioned at its definition's initial tape, head,
    /// and state.
    pub fn new(definition: MachineDefinition) -> Self {
        let configuration = MachineConfiguration {
            tape: Configuration::new(definition.tape.clone(), definition.blank.clone()),
            head: definition.head,
            state: definition.initial_state.clone(),
        };

        Self {
            definition,
            configuration,
            step_count: 0,
        }
    }

    /// Returns the machine's definition.
    pub fn definition(&self) -> &MachineDefinition {
        &self.definition
    }

    /// Returns the current configuration.
    pub fn configuration(&self) -> &MachineConfiguration {
        &self.configuration
    }

    /// Returns the current state.
    pub fn state(&self) -> &str {
        &self.configuration.state
    }

    /// Returns the symbol under the head; the blank symbol if the head is
    /// outside the materialized tape window.
    pub fn read_symbol(&self) -> &Symbol {
        self.configuration.tape.get(self.configuration.head)
    }

    /// Returns the rule that applies to the current state and head symbol,
    /// if any.
    pub fn rule(&self) -> Option<&MachineRule> {
        self.definition
            .rule_for(&self.configuration.state, self.read_symbol())
    }

    /// Checks whether the machine currently sits in an accepting state.
    pub fn is_accepting(&self) -> bool {
        self.definition.accepting.contains(&self.configuration.state)
    }

    /// Returns the number of steps executed since construction or the last
    /// reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Resets the machine to its initial configuration.
    pub fn reset(&mut self) {
        self.configuration = MachineConfiguration {
            tape: Configuration::new(self.definition.tape.clone(), self.definition.blank.clone()),
            head: self.definition.head,
            state: self.definition.initial_state.clone(),
        };
        self.step_count = 0;
    }

    /// Executes a single step.
    ///
    /// Reads the symbol under the head (blank outside the tape window), looks
    /// up the rule for `(state, symbol)`, and either applies it (write, move,
    /// switch state) or returns [`Step::Halt`] without mutating anything.
    /// The engine never special-cases accepting states; checking acceptance
    /// is the driver's job.
    pub fn step(&mut self) -> Step {
        let read = self.read_symbol().clone();
        let rule = match self.definition.rule_for(&self.configuration.state, &read) {
            Some(rule) => rule.clone(),
            None => return Step::Halt,
        };

        let mut next = self.configuration.clone();
        next.tape.set(next.head, rule.write);
        next.head += match rule.direction {
            Direction::Left => -1,
            Direction::Right => 1,
        };
        // Materialize the cell under the moved head so the tape window keeps
        // covering the head.
        let under_head = next.tape.get(next.head).clone();
        next.tape.set(next.head, under_head);
        next.state = rule.next_state;

        self.configuration = next;
        self.step_count += 1;

        Step::Continue
    }

    /// Like [`TuringMachine::step`], but treats an undefined transition as
    /// an error instead of a halt signal. Useful while debugging a
    /// definition that is expected to keep moving until it explicitly
    /// accepts.
    pub fn try_step(&mut self) -> Result<(), AutomataError> {
        let read = self.read_symbol().clone();
        match self.step() {
            Step::Continue => Ok(()),
            Step::Halt => Err(AutomataError::UndefinedTransition(
                self.configuration.state.clone(),
                read,
            )),
        }
    }

    /// Runs the machine until it accepts, rejects, or exhausts `max_steps`,
    /// and returns the trace starting with the initial configuration.
    ///
    /// Acceptance is checked before each step, so an accepting configuration
    /// is always the last trace entry. With `max_steps: None` the run is
    /// unbounded; callers simulating machines that may not halt must supply a
    /// bound.
    pub fn run(&mut self, max_steps: Option<usize>) -> MachineRun {
        let mut trace = vec![self.configuration.clone()];
        let mut steps = 0usize;

        loop {
            if self.is_accepting() {
                return MachineRun {
                    trace,
                    outcome: Outcome::Accepted,
                };
            }

            if let Some(max) = max_steps {
                if steps >= max {
                    return MachineRun {
                        trace,
                        outcome: Outcome::StepLimit,
                    };
                }
            }

            match self.step() {
                Step::Halt => {
                    return MachineRun {
                        trace,
                        outcome: Outcome::Rejected,
                    }
                }
                Step::Continue => {
                    trace.push(self.configuration.clone());
                    steps += 1;
                }
            }
        }
    }
}
