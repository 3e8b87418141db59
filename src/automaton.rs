//! This module defines the `CellularAutomaton` engine, which evolves a
//! one-dimensional configuration under a local three-cell rule, and the
//! simulation driver that iterates it with the supported stop conditions.

use crate::configuration::Configuration;
use crate::types::{AutomatonDefinition, Fallback, Neighborhood, StopReason, Symbol};

/// A one-dimensional cellular automaton.
///
/// The automaton owns its definition (alphabet, transition table, blank
/// symbol) and a current [`Configuration`], which is replaced wholesale by
/// each step. The transition table is conceptually total: neighborhoods it
/// does not define fall back to the automaton's [`Fallback`] policy, so a
/// step can never fail.
#[derive(Debug)]
pub struct CellularAutomaton {
    definition: AutomatonDefinition,
    fallback: Fallback,
    initial: Configuration,
    configuration: Configuration,
    step_count: usize,
}

/// Stop conditions for [`CellularAutomaton::run`].
///
/// All conditions are optional; with none set the run never terminates on
/// its own, so production callers must supply `max_steps`.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stop after this many steps regardless of other conditions.
    pub max_steps: Option<usize>,
    /// Stop as soon as this neighborhood occurs anywhere in the previous
    /// configuration.
    pub stop_transition: Option<Neighborhood>,
    /// Stop once a step leaves the configuration's logical content
    /// unchanged.
    pub stop_on_stable: bool,
}

/// The trace produced by [`CellularAutomaton::run`], together with the
/// condition that ended it.
#[derive(Debug, Clone)]
pub struct CaRun {
    /// Every configuration in order, starting with the initial one.
    pub trace: Vec<Configuration>,
    /// The stop condition that ended the run.
    pub reason: StopReason,
}

impl CellularAutomaton {
    /// Creates an automaton whose initial configuration is the definition's
    /// `cells` window starting at logical position 0.
    pub fn new(definition: AutomatonDefinition) -> Self {
        let initial = Configuration::new(definition.cells.clone(), definition.blank.clone());
        Self {
            fallback: Fallback::default(),
            configuration: initial.clone(),
            initial,
            definition,
            step_count: 0,
        }
    }

    /// Creates an automaton seeded with an explicit configuration instead of
    /// the definition's `cells`. Used by the compiler, whose initial
    /// configuration carries the head marker and may extend past position 0.
    pub fn with_configuration(definition: AutomatonDefinition, configuration: Configuration) -> Self {
        Self {
            fallback: Fallback::default(),
            initial: configuration.clone(),
            configuration,
            definition,
            step_count: 0,
        }
    }

    /// Replaces the fallback policy for undefined neighborhoods.
    pub fn with_fallback(mut self, fallback: Fallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns the automaton's definition.
    pub fn definition(&self) -> &AutomatonDefinition {
        &self.definition
    }

    /// Returns the blank symbol.
    pub fn blank(&self) -> &Symbol {
        &self.definition.blank
    }

    /// Returns the fallback policy in effect.
    pub fn fallback(&self) -> Fallback {
        self.fallback
    }

    /// Returns the current configuration.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Replaces the current configuration, e.g. to seed an input word.
    pub fn set_configuration(&mut self, configuration: Configuration) {
        self.configuration = configuration;
    }

    /// Returns the number of steps computed since construction or the last
    /// reset.
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    /// Restores the configuration the automaton was constructed with.
    pub fn reset(&mut self) {
        self.configuration = self.initial.clone();
        self.step_count = 0;
    }

    /// Returns the new center symbol for a neighborhood.
    ///
    /// Undefined neighborhoods resolve through the automaton's [`Fallback`]
    /// policy, so the result is defined for any triple of symbols.
    pub fn next_symbol(&self, left: &Symbol, center: &Symbol, right: &Symbol) -> Symbol {
        let key = (left.clone(), center.clone(), right.clone());
        match self.definition.rules.get(&key) {
            Some(result) => result.clone(),
            None => match self.fallback {
                Fallback::KeepCenter => center.clone(),
                Fallback::Blank => self.definition.blank.clone(),
            },
        }
    }

    /// Computes one global step and replaces the current configuration.
    ///
    /// Every logical index in `[start - 1, end]` of the current window is
    /// rewritten into a fresh configuration, with one cell of slack on each
    /// side, so rules producing non-blank edge cells grow the window by at
    /// most one cell per side per step.
    pub fn step(&mut self) -> &Configuration {
        let previous = &self.configuration;
        let mut next = Configuration::empty(self.definition.blank.clone());
        let (start, end) = previous.bounds();

        for i in (start - 1)..=end {
            let value = self.next_symbol(previous.get(i - 1), previous.get(i), previous.get(i + 1));
            next.set(i, value);
        }

        self.configuration = next;
        self.step_count += 1;
        &self.configuration
    }

    /// Runs the automaton until a stop condition triggers and returns the
    /// trace, starting with the initial configuration.
    ///
    /// Both optional checks are evaluated every step, stability first, then
    /// the transition match; the transition scan covers every window of the
    /// configuration *preceding* the step. With `max_steps: None` and no
    /// other condition the loop never terminates; bounding such runs is the
    /// caller's responsibility, as the engine has no other guaranteed
    /// terminator.
    pub fn run(&mut self, options: &RunOptions) -> CaRun {
        let mut trace = vec![self.configuration.clone()];
        let mut steps = 0usize;

        loop {
            if let Some(max) = options.max_steps {
                if steps >= max {
                    return CaRun {
                        trace,
                        reason: StopReason::StepLimit,
                    };
                }
            }

            let previous = self.configuration.clone();
            let next = self.step().clone();
            trace.push(next.clone());
            steps += 1;

            if options.stop_on_stable && previous == next {
                return CaRun {
                    trace,
                    reason: StopReason::Stable,
                };
            }

            if let Some(target) = &options.stop_transition {
                let (start, end) = previous.bounds();
                for i in (start - 1)..=end {
                    if previous.get(i - 1) == &target.0
                        && previous.get(i) == &target.1
                        && previous.get(i + 1) == &target.2
                    {
                        return CaRun {
                            trace,
                            reason: StopReason::TransitionSeen(target.clone()),
                        };
                    }
                }
            }
        }
    }
}
