//! Embedded demo definitions and the registry exposing them by index and
//! name.

use crate::types::{AutomataError, AutomatonDefinition, MachineDefinition};

use std::sync::RwLock;

// Default embedded definitions
const AUTOMATON_TEXTS: [&str; 3] = [
    include_str!("../demos/glider.ca"),
    include_str!("../demos/rule110.ca"),
    include_str!("../demos/grow.ca"),
];

const MACHINE_TEXTS: [&str; 3] = [
    include_str!("../demos/successor.tm"),
    include_str!("../demos/bit-flipper.tm"),
    include_str!("../demos/busy-beaver-3.tm"),
];

lazy_static::lazy_static! {
    pub static ref AUTOMATA: RwLock<Vec<AutomatonDefinition>> = RwLock::new(Vec::new());
    pub static ref MACHINES: RwLock<Vec<MachineDefinition>> = RwLock::new(Vec::new());
}

pub struct ProgramManager;

impl ProgramManager {
    /// Parse the embedded definitions and fill the registry
    pub fn load() -> Result<(), AutomataError> {
        let mut automata = Vec::new();
        for text in AUTOMATON_TEXTS {
            automata.push(crate::parser::parse_automaton(text)?);
        }

        let mut machines = Vec::new();
        for text in MACHINE_TEXTS {
            machines.push(crate::parser::parse_machine(text)?);
        }

        let mut automata_guard = AUTOMATA.write().map_err(|_| {
            AutomataError::FileError("Failed to acquire write lock".to_string())
        })?;
        *automata_guard = automata;

        let mut machines_guard = MACHINES.write().map_err(|_| {
            AutomataError::FileError("Failed to acquire write lock".to_string())
        })?;
        *machines_guard = machines;

        Ok(())
    }

    /// Get the number of embedded automaton definitions
    pub fn automaton_count() -> usize {
        let _ = Self::load();

        AUTOMATA.read().map(|automata| automata.len()).unwrap_or(0)
    }

    /// Get the number of embedded machine definitions
    pub fn machine_count() -> usize {
        let _ = Self::load();

        MACHINES.read().map(|machines| machines.len()).unwrap_or(0)
    }

    /// Get an automaton definition by its index
    pub fn automaton_by_index(index: usize) -> Result<AutomatonDefinition, AutomataError> {
        let _ = Self::load();

        AUTOMATA
            .read()
            .map_err(|_| AutomataError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                AutomataError::ValidationError(format!("Automaton index {} out of range", index))
            })
    }

    /// Get a machine definition by its index
    pub fn machine_by_index(index: usize) -> Result<MachineDefinition, AutomataError> {
        let _ = Self::load();

        MACHINES
            .read()
            .map_err(|_| AutomataError::FileError("Failed to acquire read lock".to_string()))?
            .get(index)
            .cloned()
            .ok_or_else(|| {
                AutomataError::ValidationError(format!("Machine index {} out of range", index))
            })
    }

    /// Get an automaton definition by its name
    pub fn automaton_by_name(name: &str) -> Result<AutomatonDefinition, AutomataError> {
        let _ = Self::load();

        AUTOMATA
            .read()
            .map_err(|_| AutomataError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|definition| definition.name == name)
            .cloned()
            .ok_or_else(|| {
                AutomataError::ValidationError(format!("Automaton '{}' not found", name))
            })
    }

    /// Get a machine definition by its name
    pub fn machine_by_name(name: &str) -> Result<MachineDefinition, AutomataError> {
        let _ = Self::load();

        MACHINES
            .read()
            .map_err(|_| AutomataError::FileError("Failed to acquire read lock".to_string()))?
            .iter()
            .find(|definition| definition.name == name)
            .cloned()
            .ok_or_else(|| {
                AutomataError::ValidationError(format!("Machine '{}' not found", name))
            })
    }

    /// List all automaton names
    pub fn automaton_names() -> Vec<String> {
        let _ = Self::load();

        AUTOMATA
            .read()
            .map(|automata| {
                automata
                    .iter()
                    .map(|definition| definition.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }

    /// List all machine names
    pub fn machine_names() -> Vec<String> {
        let _ = Self::load();

        MACHINES
            .read()
            .map(|machines| {
                machines
                    .iter()
                    .map(|definition| definition.name.clone())
                    .collect()
            })
            .unwrap_or_else(|_| Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::{CellularAutomaton, RunOptions};
    use crate::compiler::compile;
    use crate::machine::TuringMachine;
    use crate::types::{Outcome, DEFAULT_STEP_LIMIT};

    #[test]
    fn test_registry_loads_all_embedded_definitions() {
        assert!(ProgramManager::load().is_ok());
        assert_eq!(ProgramManager::automaton_count(), 3);
        assert_eq!(ProgramManager::machine_count(), 3);
    }

    #[test]
    fn test_lookup_by_name_and_index() {
        let by_name = ProgramManager::automaton_by_name("Glider").unwrap();
        let by_index = ProgramManager::automaton_by_index(0).unwrap();
        assert_eq!(by_name, by_index);

        assert!(ProgramManager::machine_by_name("Successor").is_ok());
        assert!(ProgramManager::machine_by_index(999).is_err());
        assert!(ProgramManager::automaton_by_name("Nonexistent").is_err());
    }

    #[test]
    fn test_names_are_listed() {
        let automata = ProgramManager::automaton_names();
        assert!(automata.contains(&"Glider".to_string()));
        assert!(automata.contains(&"Rule 110".to_string()));
        assert!(automata.contains(&"Grow".to_string()));

        let machines = ProgramManager::machine_names();
        assert!(machines.contains(&"Successor".to_string()));
        assert!(machines.contains(&"Bit Flipper".to_string()));
        assert!(machines.contains(&"Busy Beaver 3".to_string()));
    }

    #[test]
    fn test_all_embedded_machines_halt_and_compile() {
        for index in 0..ProgramManager::machine_count() {
            let definition = ProgramManager::machine_by_index(index).unwrap();

            let mut machine = TuringMachine::new(definition.clone());
            let run = machine.run(Some(DEFAULT_STEP_LIMIT));
            assert_eq!(
                run.outcome,
                Outcome::Accepted,
                "machine '{}' did not accept",
                definition.name
            );

            assert!(
                compile(&definition).is_ok(),
                "machine '{}' did not compile",
                definition.name
            );
        }
    }

    #[test]
    fn test_glider_moves_right() {
        let definition = ProgramManager::automaton_by_name("Glider").unwrap();
        let mut automaton = CellularAutomaton::new(definition);

        let run = automaton.run(&RunOptions {
            max_steps: Some(3),
            ..Default::default()
        });

        let one = crate::types::Symbol::from('1');
        for (step, configuration) in run.trace.iter().enumerate() {
            assert_eq!(configuration.get(3 + step as i64), &one);
        }
    }

    #[test]
    fn test_busy_beaver_writes_six_ones() {
        let definition = ProgramManager::machine_by_name("Busy Beaver 3").unwrap();
        let mut machine = TuringMachine::new(definition);

        let run = machine.run(Some(DEFAULT_STEP_LIMIT));
        assert_eq!(run.outcome, Outcome::Accepted);

        let tape = &run.trace.last().unwrap().tape;
        let (start, end) = tape.bounds();
        let ones = (start..end)
            .filter(|&i| tape.get(i).as_str() == "1")
            .count();
        assert_eq!(ones, 6);
    }
}
