//! This module provides functions for analyzing machine and automaton
//! definitions to detect common errors before execution or compilation:
//! undeclared states and symbols, non-terminal accepting states, duplicate
//! rules, and misuse of the reserved wildcard token.

use crate::types::{
    AutomataError, AutomatonDefinition, MachineDefinition, Neighborhood, Symbol, WILDCARD_SYMBOL,
};
use std::collections::HashSet;

/// Represents the errors that can be found while analyzing a definition.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum AnalysisError {
    /// A definition references a state missing from its declared state set.
    UndeclaredState(String),
    /// A rule or tape references a symbol missing from the declared alphabet.
    UndeclaredSymbol(Symbol),
    /// The declared blank symbol is not part of the alphabet.
    BlankNotInAlphabet(Symbol),
    /// An accepting state has outgoing rules; acceptance must be terminal.
    AcceptingStateWithRules(String),
    /// A state has more than one rule reading the same symbol.
    DuplicateRead(String, Symbol),
    /// The reserved wildcard token appears where a concrete symbol is
    /// required.
    ReservedWildcard,
}

impl From<AnalysisError> for AutomataError {
    fn from(error: AnalysisError) -> Self {
        match error {
            AnalysisError::UndeclaredState(state) => AutomataError::UnknownState(state),
            AnalysisError::UndeclaredSymbol(symbol) => AutomataError::UnknownSymbol(symbol),
            AnalysisError::BlankNotInAlphabet(symbol) => AutomataError::ValidationError(format!(
                "Blank symbol {} is not part of the alphabet",
                symbol
            )),
            AnalysisError::AcceptingStateWithRules(state) => {
                AutomataError::NonTerminalAcceptingState(state)
            }
            AnalysisError::DuplicateRead(state, symbol) => AutomataError::ValidationError(format!(
                "State {} has more than one rule reading {}",
                state, symbol
            )),
            AnalysisError::ReservedWildcard => AutomataError::ValidationError(format!(
                "The wildcard token {} cannot be used as a symbol",
                WILDCARD_SYMBOL
            )),
        }
    }
}

/// Analyzes a machine definition for structural and logical errors.
///
/// Returns the first violation found; the checks cover everything the
/// engine and the compiler rely on, so a definition that passes can be
/// compiled without further symbol-level failures.
pub fn analyze_machine(definition: &MachineDefinition) -> Result<(), AutomataError> {
    let errors = [
        check_machine_wildcard,
        check_machine_blank,
        check_machine_states,
        check_machine_symbols,
        check_accepting_terminal,
        check_deterministic,
    ]
    .iter()
    .filter_map(|check| check(definition).err())
    .collect::<Vec<_>>();

    if let Some(first_error) = errors.first() {
        return Err(first_error.clone().into());
    }

    Ok(())
}

/// Analyzes an automaton definition: the blank, cells, and every table
/// entry must stay inside the declared alphabet, and the wildcard token may
/// not appear anywhere: tables are fully explicit by the time they exist.
pub fn analyze_automaton(definition: &AutomatonDefinition) -> Result<(), AutomataError> {
    let errors = [
        check_automaton_wildcard,
        check_automaton_blank,
        check_automaton_symbols,
    ]
    .iter()
    .filter_map(|check| check(definition).err())
    .collect::<Vec<_>>();

    if let Some(first_error) = errors.first() {
        return Err(first_error.clone().into());
    }

    Ok(())
}

/// Lists every neighborhood over the automaton's alphabet that its table
/// leaves undefined, in alphabet order.
///
/// The engine itself never needs totality, since undefined neighborhoods
/// resolve through the fallback policy, but callers wanting strict coverage
/// can validate it up front with this.
pub fn check_coverage(definition: &AutomatonDefinition) -> Vec<Neighborhood> {
    let mut missing = Vec::new();

    for left in &definition.symbols {
        for center in &definition.symbols {
            for right in &definition.symbols {
                let key = (left.clone(), center.clone(), right.clone());
                if !definition.rules.contains_key(&key) {
                    missing.push(key);
                }
            }
        }
    }

    missing
}

fn check_machine_wildcard(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    if definition
        .alphabet
        .contains(&Symbol::new(WILDCARD_SYMBOL))
    {
        return Err(AnalysisError::ReservedWildcard);
    }
    Ok(())
}

fn check_machine_blank(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    if !definition.alphabet.contains(&definition.blank) {
        return Err(AnalysisError::BlankNotInAlphabet(definition.blank.clone()));
    }
    Ok(())
}

fn check_machine_states(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    if !definition.states.contains(&definition.initial_state) {
        return Err(AnalysisError::UndeclaredState(
            definition.initial_state.clone(),
        ));
    }

    for state in &definition.accepting {
        if !definition.states.contains(state) {
            return Err(AnalysisError::UndeclaredState(state.clone()));
        }
    }

    for (state, rules) in &definition.rules {
        if !definition.states.contains(state) {
            return Err(AnalysisError::UndeclaredState(state.clone()));
        }
        for rule in rules {
            if !definition.states.contains(&rule.next_state) {
                return Err(AnalysisError::UndeclaredState(rule.next_state.clone()));
            }
        }
    }

    Ok(())
}

fn check_machine_symbols(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    for symbol in &definition.tape {
        if !definition.alphabet.contains(symbol) {
            return Err(AnalysisError::UndeclaredSymbol(symbol.clone()));
        }
    }

    for rules in definition.rules.values() {
        for rule in rules {
            if !definition.alphabet.contains(&rule.read) {
                return Err(AnalysisError::UndeclaredSymbol(rule.read.clone()));
            }
            if !definition.alphabet.contains(&rule.write) {
                return Err(AnalysisError::UndeclaredSymbol(rule.write.clone()));
            }
        }
    }

    Ok(())
}

fn check_accepting_terminal(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    for state in &definition.accepting {
        if definition
            .rules
            .get(state)
            .is_some_and(|rules| !rules.is_empty())
        {
            return Err(AnalysisError::AcceptingStateWithRules(state.clone()));
        }
    }
    Ok(())
}

fn check_deterministic(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    for (state, rules) in &definition.rules {
        let mut seen = HashSet::new();
        for rule in rules {
            if !seen.insert(&rule.read) {
                return Err(AnalysisError::DuplicateRead(
                    state.clone(),
                    rule.read.clone(),
                ));
            }
        }
    }
    Ok(())
}

fn check_automaton_wildcard(definition: &AutomatonDefinition) -> Result<(), AnalysisError> {
    if definition.symbols.contains(&Symbol::new(WILDCARD_SYMBOL)) {
        return Err(AnalysisError::ReservedWildcard);
    }
    Ok(())
}

fn check_automaton_blank(definition: &AutomatonDefinition) -> Result<(), AnalysisError> {
    if !definition.symbols.contains(&definition.blank) {
        return Err(AnalysisError::BlankNotInAlphabet(definition.blank.clone()));
    }
    Ok(())
}

fn check_automaton_symbols(definition: &AutomatonDefinition) -> Result<(), AnalysisError> {
    for symbol in &definition.cells {
        if !definition.symbols.contains(symbol) {
            return Err(AnalysisError::UndeclaredSymbol(symbol.clone()));
        }
    }

    for ((left, center, right), result) in &definition.rules {
        for symbol in [left, center, right, result] {
            if symbol.is_wildcard() {
                return Err(AnalysisError::ReservedWildcard);
            }
            if !definition.symbols.contains(symbol) {
                return Err(AnalysisError::UndeclaredSymbol(symbol.clone()));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Direction, MachineRule, RuleTable};
    use std::collections::HashMap;

    fn machine() -> MachineDefinition {
        let blank = Symbol::from('□');
        let mut rules = HashMap::new();
        rules.insert(
            "q0".to_string(),
            vec![MachineRule {
                read: Symbol::from('1'),
                write: Symbol::from('0'),
                direction: Direction::Right,
                next_state: "qf".to_string(),
            }],
        );

        MachineDefinition {
            name: "machine".to_string(),
            states: ["q0".to_string(), "qf".to_string()].into(),
            alphabet: [Symbol::from('0'), Symbol::from('1'), blank.clone()].into(),
            blank,
            initial_state: "q0".to_string(),
            accepting: ["qf".to_string()].into(),
            rules,
            tape: vec![Symbol::from('1')],
            head: 0,
        }
    }

    fn automaton() -> AutomatonDefinition {
        let mut rules = RuleTable::new();
        rules.insert(
            (Symbol::from('0'), Symbol::from('1'), Symbol::from('0')),
            Symbol::from('1'),
        );

        AutomatonDefinition {
            name: "automaton".to_string(),
            symbols: [Symbol::from('0'), Symbol::from('1')].into(),
            blank: Symbol::from('0'),
            cells: vec![Symbol::from('0'), Symbol::from('1'), Symbol::from('0')],
            rules,
        }
    }

    #[test]
    fn test_valid_definitions_pass() {
        assert!(analyze_machine(&machine()).is_ok());
        assert!(analyze_automaton(&automaton()).is_ok());
    }

    #[test]
    fn test_undeclared_initial_state() {
        let mut definition = machine();
        definition.initial_state = "missing".to_string();

        let error = analyze_machine(&definition).unwrap_err();
        assert_eq!(error, AutomataError::UnknownState("missing".to_string()));
    }

    #[test]
    fn test_undeclared_next_state() {
        let mut definition = machine();
        definition.rules.get_mut("q0").unwrap()[0].next_state = "missing".to_string();

        let error = analyze_machine(&definition).unwrap_err();
        assert_eq!(error, AutomataError::UnknownState("missing".to_string()));
    }

    #[test]
    fn test_undeclared_tape_symbol() {
        let mut definition = machine();
        definition.tape.push(Symbol::from('x'));

        let error = analyze_machine(&definition).unwrap_err();
        assert_eq!(error, AutomataError::UnknownSymbol(Symbol::from('x')));
    }

    #[test]
    fn test_blank_outside_alphabet() {
        let mut definition = machine();
        definition.blank = Symbol::from('x');

        let error = analyze_machine(&definition).unwrap_err();
        assert!(matches!(error, AutomataError::ValidationError(_)));
    }

    #[test]
    fn test_accepting_state_with_rules_is_rejected() {
        let mut definition = machine();
        definition.rules.insert(
            "qf".to_string(),
            vec![MachineRule {
                read: Symbol::from('0'),
                write: Symbol::from('0'),
                direction: Direction::Right,
                next_state: "qf".to_string(),
            }],
        );

        let error = analyze_machine(&definition).unwrap_err();
        assert_eq!(
            error,
            AutomataError::NonTerminalAcceptingState("qf".to_string())
        );
    }

    #[test]
    fn test_duplicate_read_is_rejected() {
        let mut definition = machine();
        let duplicate = definition.rules["q0"][0].clone();
        definition.rules.get_mut("q0").unwrap().push(duplicate);

        let error = analyze_machine(&definition).unwrap_err();
        assert!(matches!(error, AutomataError::ValidationError(_)));
    }

    #[test]
    fn test_wildcard_in_alphabet_is_rejected() {
        let mut definition = machine();
        definition.alphabet.insert(Symbol::new(WILDCARD_SYMBOL));

        let error = analyze_machine(&definition).unwrap_err();
        assert!(matches!(error, AutomataError::ValidationError(_)));

        let mut definition = automaton();
        definition.symbols.insert(Symbol::new(WILDCARD_SYMBOL));

        let error = analyze_automaton(&definition).unwrap_err();
        assert!(matches!(error, AutomataError::ValidationError(_)));
    }

    #[test]
    fn test_automaton_rule_symbols_must_be_declared() {
        let mut definition = automaton();
        definition.rules.insert(
            (Symbol::from('0'), Symbol::from('x'), Symbol::from('0')),
            Symbol::from('1'),
        );

        let error = analyze_automaton(&definition).unwrap_err();
        assert_eq!(error, AutomataError::UnknownSymbol(Symbol::from('x')));
    }

    #[test]
    fn test_coverage_lists_undefined_neighborhoods() {
        let definition = automaton();

        let missing = check_coverage(&definition);

        // 2^3 neighborhoods, one of which is defined.
        assert_eq!(missing.len(), 7);
        assert!(!missing.contains(&(
            Symbol::from('0'),
            Symbol::from('1'),
            Symbol::from('0')
        )));

        let mut covered = definition;
        for neighborhood in missing {
            let center = neighborhood.1.clone();
            covered.rules.insert(neighborhood, center);
        }
        assert!(check_coverage(&covered).is_empty());
    }
}
