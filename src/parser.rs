//! This module provides the parser for automaton (`.ca`) and machine (`.tm`)
//! definition texts, utilizing the `pest` crate. It also implements wildcard
//! expansion for automaton rule patterns: `*` stands for any alphabet symbol
//! and is expanded into explicit table entries at load time, against the
//! complete alphabet, so the resulting table never depends on the order in
//! which symbols are discovered.

use crate::{
    analyzer::{analyze_automaton, analyze_machine},
    types::{
        AutomataError, AutomatonDefinition, Direction, MachineDefinition, MachineRule,
        Neighborhood, RuleTable, Symbol, DEFAULT_BLANK_SYMBOL,
    },
};
use pest::{
    error::{Error, ErrorVariant},
    iterators::Pair,
    Parser as PestParser, Span,
};
use pest_derive::Parser as PestParser;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Derives a `PestParser` for the definition grammar in `grammar.pest`.
#[derive(PestParser)]
#[grammar = "grammar.pest"]
pub struct DefinitionParser;

/// A rule line as written in a `.ca` file: a three-symbol pattern, possibly
/// containing wildcards, and the resulting center symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRule {
    /// The `(left, center, right)` pattern; any slot may be the wildcard.
    pub pattern: [Symbol; 3],
    /// The new center symbol. Never a wildcard.
    pub result: Symbol,
}

impl PatternRule {
    /// Returns how many of the pattern's slots are wildcards.
    pub fn wildcard_count(&self) -> usize {
        self.pattern.iter().filter(|s| s.is_wildcard()).count()
    }
}

/// Expands a pattern into every neighborhood it covers, substituting each
/// wildcard slot with every alphabet symbol.
///
/// A pure function of the pattern and the complete alphabet: callers must
/// collect the full alphabet first (see [`build_rule_table`]) so expansion
/// cannot depend on discovery order.
pub fn expand_pattern(pattern: &[Symbol; 3], alphabet: &BTreeSet<Symbol>) -> Vec<Neighborhood> {
    let slot = |symbol: &Symbol| -> Vec<Symbol> {
        if symbol.is_wildcard() {
            alphabet.iter().cloned().collect()
        } else {
            vec![symbol.clone()]
        }
    };

    let lefts = slot(&pattern[0]);
    let centers = slot(&pattern[1]);
    let rights = slot(&pattern[2]);

    let mut expanded = Vec::with_capacity(lefts.len() * centers.len() * rights.len());
    for left in &lefts {
        for center in &centers {
            for right in &rights {
                expanded.push((left.clone(), center.clone(), right.clone()));
            }
        }
    }

    expanded
}

/// Builds an explicit rule table from pattern rules and the complete
/// alphabet.
///
/// Precedence: patterns with fewer wildcards override patterns with more,
/// and among equally specific patterns the later line wins. Expansion order
/// is otherwise irrelevant, so the same set of lines always produces the
/// same table.
pub fn build_rule_table(patterns: &[PatternRule], alphabet: &BTreeSet<Symbol>) -> RuleTable {
    let mut ordered: Vec<&PatternRule> = patterns.iter().collect();
    // Most general first, so more specific expansions overwrite them.
    ordered.sort_by(|a, b| b.wildcard_count().cmp(&a.wildcard_count()));

    let mut table = RuleTable::new();
    for rule in ordered {
        for neighborhood in expand_pattern(&rule.pattern, alphabet) {
            table.insert(neighborhood, rule.result.clone());
        }
    }

    table
}

/// Parses an automaton definition text into an [`AutomatonDefinition`].
///
/// The alphabet is collected in a first pass (declared symbols, cells, the
/// blank, and every concrete symbol in the rule lines) and wildcards are
/// expanded against it in a second pass. The parsed definition is validated
/// before being returned.
pub fn parse_automaton(input: &str) -> Result<AutomatonDefinition, AutomataError> {
    let root = DefinitionParser::parse(Rule::automaton_file, input.trim())
        .map_err(|e| AutomataError::ParseError(e.into()))?
        .next()
        .unwrap();

    let mut name: Option<String> = None;
    let mut blank: Option<Symbol> = None;
    let mut declared: BTreeSet<Symbol> = BTreeSet::new();
    let mut cells: Option<Vec<Symbol>> = None;
    let mut patterns: Vec<PatternRule> = Vec::new();
    let mut seen = HashSet::new();

    for pair in root.into_inner() {
        let span = pair.as_span();
        let rule = pair.as_rule();

        check_unique_section(rule, span, &mut seen)?;

        match rule {
            Rule::name_section => name = Some(parse_inner_string(pair)),
            Rule::blank_section => blank = Some(parse_symbol(&parse_inner_string(pair))),
            Rule::symbols_section => declared.extend(parse_symbol_list(pair)),
            Rule::cells_section => cells = Some(parse_symbol_list(pair)),
            Rule::ca_rule => patterns.push(parse_pattern_rule(pair)?),
            _ => {} // Skip rules_header and EOI
        }
    }

    let name = check_required_section(name, "name")?;
    let blank = blank.unwrap_or_else(|| Symbol::new(DEFAULT_BLANK_SYMBOL));
    let cells = cells.unwrap_or_default();

    // Pass one: the complete alphabet.
    let mut symbols = declared;
    symbols.insert(blank.clone());
    symbols.extend(cells.iter().cloned());
    for rule in &patterns {
        symbols.extend(
            rule.pattern
                .iter()
                .filter(|symbol| !symbol.is_wildcard())
                .cloned(),
        );
        symbols.insert(rule.result.clone());
    }

    // Pass two: expand every pattern against it.
    let rules = build_rule_table(&patterns, &symbols);

    let definition = AutomatonDefinition {
        name,
        symbols,
        blank,
        cells,
        rules,
    };

    analyze_automaton(&definition)?;

    Ok(definition)
}

/// Parses a machine definition text into a [`MachineDefinition`].
///
/// Transition rules are grouped under `state:` headers. The state set and
/// alphabet are derived from everything the definition mentions; `initial:`
/// defaults to the first state block. The parsed definition is validated
/// before being returned.
pub fn parse_machine(input: &str) -> Result<MachineDefinition, AutomataError> {
    let root = DefinitionParser::parse(Rule::machine_file, input.trim())
        .map_err(|e| AutomataError::ParseError(e.into()))?
        .next()
        .unwrap();

    let mut name: Option<String> = None;
    let mut blank: Option<Symbol> = None;
    let mut tape: Option<Vec<Symbol>> = None;
    let mut head: Option<i64> = None;
    let mut initial: Option<String> = None;
    let mut accepting: BTreeSet<String> = BTreeSet::new();
    let mut rules: HashMap<String, Vec<MachineRule>> = HashMap::new();
    let mut state_order: Vec<String> = Vec::new();
    let mut current_state: Option<String> = None;
    let mut seen = HashSet::new();

    for pair in root.into_inner() {
        let span = pair.as_span();
        let rule = pair.as_rule();

        check_unique_section(rule, span, &mut seen)?;

        match rule {
            Rule::name_section => name = Some(parse_inner_string(pair)),
            Rule::blank_section => blank = Some(parse_symbol(&parse_inner_string(pair))),
            Rule::tape_section => tape = Some(parse_symbol_list(pair)),
            Rule::head_section => {
                head = Some(parse_inner_string(pair).parse::<i64>().unwrap_or(0))
            }
            Rule::initial_section => initial = Some(parse_inner_string(pair)),
            Rule::accept_section => {
                accepting.extend(pair.into_inner().map(|p| p.as_str().to_string()))
            }
            Rule::state_header => {
                let state = parse_inner_string(pair);
                if rules.contains_key(&state) {
                    return Err(parse_error(
                        &format!("Duplicate state block: {state}"),
                        span,
                    ));
                }
                state_order.push(state.clone());
                rules.insert(state.clone(), Vec::new());
                current_state = Some(state);
            }
            Rule::tm_rule => {
                let state = current_state.clone().ok_or_else(|| {
                    parse_error("Transition rule appears before any state block", span)
                })?;
                let machine_rule = parse_machine_rule(pair)?;
                rules.get_mut(&state).unwrap().push(machine_rule);
            }
            _ => {} // Skip rules_header and EOI
        }
    }

    let name = check_required_section(name, "name")?;
    let blank = blank.unwrap_or_else(|| Symbol::new(DEFAULT_BLANK_SYMBOL));
    let tape = tape.unwrap_or_default();
    let head = head.unwrap_or(0);

    if state_order.is_empty() {
        return Err(AutomataError::ValidationError(
            "Missing 'rules' section".to_string(),
        ));
    }
    let initial_state = initial.unwrap_or_else(|| state_order[0].clone());

    // States: every block, every next state, the accepting set, and the
    // initial state.
    let mut states: BTreeSet<String> = state_order.into_iter().collect();
    states.insert(initial_state.clone());
    states.extend(accepting.iter().cloned());
    for state_rules in rules.values() {
        for rule in state_rules {
            states.insert(rule.next_state.clone());
        }
    }

    // Alphabet: the blank, the tape, and every symbol read or written.
    let mut alphabet: BTreeSet<Symbol> = tape.iter().cloned().collect();
    alphabet.insert(blank.clone());
    for state_rules in rules.values() {
        for rule in state_rules {
            alphabet.insert(rule.read.clone());
            alphabet.insert(rule.write.clone());
        }
    }

    let definition = MachineDefinition {
        name,
        states,
        alphabet,
        blank,
        initial_state,
        accepting,
        rules,
        tape,
        head,
    };

    analyze_machine(&definition)?;

    Ok(definition)
}

/// Parses a single `left center right -> result` line.
fn parse_pattern_rule(pair: Pair<Rule>) -> Result<PatternRule, AutomataError> {
    let span = pair.as_span();
    let mut symbols = pair.into_inner().map(|p| parse_symbol(p.as_str()));

    let pattern = [
        symbols.next().unwrap(),
        symbols.next().unwrap(),
        symbols.next().unwrap(),
    ];
    let result = symbols.next().unwrap();

    if result.is_wildcard() {
        return Err(parse_error(
            "The wildcard token cannot be used as a rule result",
            span,
        ));
    }

    Ok(PatternRule { pattern, result })
}

/// Parses a single `read -> write, direction, next_state` line.
fn parse_machine_rule(pair: Pair<Rule>) -> Result<MachineRule, AutomataError> {
    let span = pair.as_span();
    let mut inner = pair.into_inner();

    let read = parse_symbol(inner.next().unwrap().as_str());
    let write = parse_symbol(inner.next().unwrap().as_str());
    let direction = parse_direction(inner.next().unwrap())?;
    let next_state = inner.next().unwrap().as_str().to_string();

    if read.is_wildcard() || write.is_wildcard() {
        return Err(parse_error(
            "The wildcard token is reserved for automaton rule patterns",
            span,
        ));
    }

    Ok(MachineRule {
        read,
        write,
        direction,
        next_state,
    })
}

/// Parses a single direction token.
///
/// Supports '<' or 'L' for Left and '>' or 'R' for Right.
fn parse_direction(pair: Pair<Rule>) -> Result<Direction, AutomataError> {
    let span = pair.as_span();
    match pair.as_str() {
        "<" | "L" => Ok(Direction::Left),
        ">" | "R" => Ok(Direction::Right),
        _ => Err(parse_error(
            &format!("Unsupported direction: {}", pair.as_str()),
            span,
        )),
    }
}

/// Parses a symbol token, stripping single quotes from quoted symbols.
fn parse_symbol(input: &str) -> Symbol {
    Symbol::new(input.trim_matches('\''))
}

/// Collects every symbol token inside a section pair.
fn parse_symbol_list(pair: Pair<Rule>) -> Vec<Symbol> {
    pair.into_inner()
        .filter(|p| p.as_rule() == Rule::symbol)
        .map(|p| parse_symbol(p.as_str()))
        .collect()
}

/// Extracts the inner string content from a `Pair`.
fn parse_inner_string(pair: Pair<Rule>) -> String {
    pair.into_inner().next().unwrap().as_str().into()
}

/// Creates an `AutomataError::ParseError` from a message and a `Span`.
fn parse_error(msg: &str, span: Span) -> AutomataError {
    AutomataError::ParseError(Box::new(Error::new_from_span(
        ErrorVariant::CustomError {
            message: msg.to_string(),
        },
        span,
    )))
}

/// Checks that single-valued sections are declared at most once.
fn check_unique_section(
    rule: Rule,
    span: Span,
    seen: &mut HashSet<Rule>,
) -> Result<(), AutomataError> {
    if !matches!(
        rule,
        Rule::name_section
            | Rule::blank_section
            | Rule::symbols_section
            | Rule::cells_section
            | Rule::tape_section
            | Rule::head_section
            | Rule::initial_section
    ) {
        return Ok(());
    }

    if seen.contains(&rule) {
        return Err(parse_error(
            &format!("Duplicate \"{rule:?}\" declaration"),
            span,
        ));
    }

    seen.insert(rule);

    Ok(())
}

/// Checks that a required section is present.
fn check_required_section<T>(value: Option<T>, name: &str) -> Result<T, AutomataError> {
    value.ok_or_else(|| AutomataError::ValidationError(format!("Missing '{name}' section")))
}
