//! This module provides the `ProgramLoader` struct, responsible for loading
//! automaton and machine definitions from files, strings, and directories.

use crate::parser::{parse_automaton, parse_machine};
use crate::types::{AutomataError, AutomatonDefinition, MachineDefinition};
use std::fs;
use std::path::{Path, PathBuf};

/// Extension for automaton definition files.
pub const AUTOMATON_EXTENSION: &str = "ca";
/// Extension for machine definition files.
pub const MACHINE_EXTENSION: &str = "tm";

/// A definition loaded from disk, tagged by kind.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedDefinition {
    /// A cellular automaton definition from a `.ca` file.
    Automaton(AutomatonDefinition),
    /// A Turing machine definition from a `.tm` file.
    Machine(MachineDefinition),
}

/// `ProgramLoader` is a utility struct for loading definitions.
/// It provides methods to load definitions from individual files, from
/// string content, and to discover and load all definition files within a
/// directory.
pub struct ProgramLoader;

impl ProgramLoader {
    /// Loads an automaton definition from the specified file path.
    ///
    /// # Returns
    ///
    /// * `Ok(AutomatonDefinition)` if the file is successfully read and parsed.
    /// * `Err(AutomataError::FileError)` if the file cannot be read.
    /// * `Err(AutomataError::ParseError)` if the content is not a valid definition.
    pub fn load_automaton(path: &Path) -> Result<AutomatonDefinition, AutomataError> {
        parse_automaton(&read_file(path)?)
    }

    /// Loads a machine definition from the specified file path.
    pub fn load_machine(path: &Path) -> Result<MachineDefinition, AutomataError> {
        parse_machine(&read_file(path)?)
    }

    /// Loads a definition from a file, dispatching on its extension:
    /// `.ca` for automata, `.tm` for machines.
    pub fn load_definition(path: &Path) -> Result<LoadedDefinition, AutomataError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(AUTOMATON_EXTENSION) => {
                Self::load_automaton(path).map(LoadedDefinition::Automaton)
            }
            Some(MACHINE_EXTENSION) => Self::load_machine(path).map(LoadedDefinition::Machine),
            _ => Err(AutomataError::FileError(format!(
                "Unrecognized definition extension: {}",
                path.display()
            ))),
        }
    }

    /// Loads all definition files (`.ca` and `.tm`) from a directory.
    ///
    /// It iterates through the directory, attempts to load each definition
    /// file, and collects the results. Directories and files with other
    /// extensions are skipped.
    pub fn load_definitions(
        directory: &Path,
    ) -> Vec<Result<(PathBuf, LoadedDefinition), AutomataError>> {
        if !directory.exists() {
            return vec![Err(AutomataError::FileError(format!(
                "Directory {} does not exist",
                directory.display()
            )))];
        }

        let entries = match fs::read_dir(directory) {
            Ok(entries) => entries,
            Err(e) => {
                return vec![Err(AutomataError::FileError(format!(
                    "Failed to read directory {}: {}",
                    directory.display(),
                    e
                )))]
            }
        };

        entries
            .filter_map(|entry| {
                let entry = match entry {
                    Ok(entry) => entry,
                    Err(e) => {
                        return Some(Err(AutomataError::FileError(format!(
                            "Failed to read directory entry: {}",
                            e
                        ))))
                    }
                };

                let path = entry.path();

                // Skip directories and files with other extensions
                let known = path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| ext == AUTOMATON_EXTENSION || ext == MACHINE_EXTENSION);
                if path.is_dir() || !known {
                    return None;
                }

                match Self::load_definition(&path) {
                    Ok(definition) => Some(Ok((path, definition))),
                    Err(e) => Some(Err(AutomataError::FileError(format!(
                        "Failed to load definition from {}: {}",
                        path.display(),
                        e
                    )))),
                }
            })
            .collect()
    }
}

fn read_file(path: &Path) -> Result<String, AutomataError> {
    fs::read_to_string(path).map_err(|e| {
        AutomataError::FileError(format!("Failed to read file {}: {}", path.display(), e))
    })
}
