//! This module validates a machine definition before its transition table is built, and reports
//! non-fatal findings (lints) about rules that can never apply.

use crate::definition::MachineDefinition;
use crate::table::Mode;
use crate::types::Displacement;
use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;
use thiserror::Error;

/// Fatal problems found in a machine definition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// No states are declared.
    #[error("No states declared")]
    EmptyStateSet,
    /// A state label is declared more than once.
    #[error("State '{0}' is declared more than once")]
    DuplicateState(String),
    #[error("Initial state '{0}' is not declared")]
    UndeclaredInitialState(String),
    #[error("Final state '{0}' is not declared")]
    UndeclaredFinalState(String),
    /// The empty text is reserved for the blank symbol.
    #[error("The blank symbol cannot be declared in an alphabet")]
    BlankInAlphabet,
    #[error("Symbol '{0}' is declared more than once")]
    DuplicateSymbol(String),
    #[error("Input symbol '{0}' is not part of the tape alphabet")]
    AlphabetNotInTapeAlphabet(String),
    /// A rule references a state outside the declared state set.
    #[error("Rule {rule} references undeclared state '{state}'")]
    UndeclaredState { rule: usize, state: String },
    /// A rule references a symbol that is neither blank nor in the tape alphabet.
    #[error("Rule {rule} references undeclared symbol '{symbol}'")]
    UndeclaredSymbol { rule: usize, symbol: String },
    /// Two rules share the same (state, cache, read) key.
    #[error(
        "Rules {first} and {second} both apply to state '{state}' with cache '{cache}' reading '{read}'"
    )]
    AmbiguousTransition {
        first: usize,
        second: usize,
        state: String,
        cache: String,
        read: String,
    },
    #[error("Rule {rule} has an invalid displacement code '{code}'")]
    InvalidMove { rule: usize, code: String },
}

/// Non-fatal findings. A machine with lints still runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lint {
    /// Declared states that no sequence of rules reaches from the initial state.
    UnreachableStates(Vec<String>),
    /// No sequence of rules reaches the final state, so no input can be accepted.
    FinalStateUnreachable(String),
    /// Rules leaving the final state. They never apply because the machine halts on entry.
    DeadTransitions(Vec<usize>),
}

impl fmt::Display for Lint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lint::UnreachableStates(states) => write!(f, "Unreachable states: {:?}", states),
            Lint::FinalStateUnreachable(state) => {
                write!(f, "Final state '{}' is unreachable from the initial state", state)
            }
            Lint::DeadTransitions(rules) => write!(
                f,
                "Rules {:?} leave the final state and will never be applied",
                rules
            ),
        }
    }
}

/// Analyzes a machine definition for errors that make it unusable.
///
/// The checks run in a fixed order and the first failure is returned. Displacement codes are
/// only checked in [`Mode::Strict`].
pub fn analyze(definition: &MachineDefinition, mode: Mode) -> Result<(), AnalysisError> {
    let checks: [fn(&MachineDefinition) -> Result<(), AnalysisError>; 4] = [
        check_states,
        check_alphabets,
        check_rule_references,
        check_ambiguity,
    ];

    checks.iter().try_for_each(|check| check(definition))?;

    if mode == Mode::Strict {
        check_displacements(definition)?;
    }

    Ok(())
}

/// Collects lints for a definition that has already passed [`analyze`].
pub fn lint(definition: &MachineDefinition) -> Vec<Lint> {
    let mut lints = Vec::new();
    let final_state = &definition.q_states.final_state;
    let reachable = reachable_states(definition);

    let mut unreachable: Vec<String> = definition
        .q_states
        .states
        .iter()
        .filter(|state| *state != final_state && !reachable.contains(state.as_str()))
        .cloned()
        .collect();
    if !unreachable.is_empty() {
        unreachable.sort();
        lints.push(Lint::UnreachableStates(unreachable));
    }

    if !reachable.contains(final_state.as_str()) {
        lints.push(Lint::FinalStateUnreachable(final_state.clone()));
    }

    let dead: Vec<usize> = definition
        .delta
        .iter()
        .enumerate()
        .filter(|(_, record)| &record.params.state == final_state)
        .map(|(i, _)| i)
        .collect();
    if !dead.is_empty() {
        lints.push(Lint::DeadTransitions(dead));
    }

    lints
}

fn check_states(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    let states = &definition.q_states;
    if states.states.is_empty() {
        return Err(AnalysisError::EmptyStateSet);
    }

    let mut seen = HashSet::new();
    if let Some(duplicate) = states.states.iter().find(|s| !seen.insert(s.as_str())) {
        return Err(AnalysisError::DuplicateState(duplicate.clone()));
    }

    if !seen.contains(states.initial.as_str()) {
        return Err(AnalysisError::UndeclaredInitialState(states.initial.clone()));
    }
    if !seen.contains(states.final_state.as_str()) {
        return Err(AnalysisError::UndeclaredFinalState(
            states.final_state.clone(),
        ));
    }

    Ok(())
}

fn check_alphabets(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    let declares_blank = definition
        .alphabet
        .iter()
        .chain(&definition.tape_alphabet)
        .any(|s| s.is_empty());
    if declares_blank {
        return Err(AnalysisError::BlankInAlphabet);
    }

    for symbols in [&definition.alphabet, &definition.tape_alphabet] {
        let mut seen = HashSet::new();
        if let Some(duplicate) = symbols.iter().find(|s| !seen.insert(s.as_str())) {
            return Err(AnalysisError::DuplicateSymbol(duplicate.clone()));
        }
    }

    let tape_alphabet: HashSet<&str> = definition.tape_alphabet.iter().map(String::as_str).collect();
    definition
        .alphabet
        .iter()
        .find(|s| !tape_alphabet.contains(s.as_str()))
        .map_or(Ok(()), |s| {
            Err(AnalysisError::AlphabetNotInTapeAlphabet(s.clone()))
        })
}

/// Checks that every rule only references declared states and tape symbols. Blank is always
/// a valid cache or tape value.
fn check_rule_references(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    let states: HashSet<&str> = definition
        .q_states
        .states
        .iter()
        .map(String::as_str)
        .collect();
    let symbols: HashSet<&str> = definition
        .tape_alphabet
        .iter()
        .map(String::as_str)
        .collect();

    for (rule, record) in definition.delta.iter().enumerate() {
        for state in [&record.params.state, &record.output.state] {
            if !states.contains(state.as_str()) {
                return Err(AnalysisError::UndeclaredState {
                    rule,
                    state: state.clone(),
                });
            }
        }

        for symbol in [
            &record.params.cache,
            &record.params.read,
            &record.output.cache,
            &record.output.write,
        ] {
            if !symbol.is_empty() && !symbols.contains(symbol.as_str()) {
                return Err(AnalysisError::UndeclaredSymbol {
                    rule,
                    symbol: symbol.clone(),
                });
            }
        }
    }

    Ok(())
}

fn check_ambiguity(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    let mut keys: HashMap<(&str, &str, &str), usize> = HashMap::new();

    for (second, record) in definition.delta.iter().enumerate() {
        let params = &record.params;
        let key = (
            params.state.as_str(),
            params.cache.as_str(),
            params.read.as_str(),
        );
        if let Some(&first) = keys.get(&key) {
            return Err(AnalysisError::AmbiguousTransition {
                first,
                second,
                state: params.state.clone(),
                cache: params.cache.clone(),
                read: params.read.clone(),
            });
        }
        keys.insert(key, second);
    }

    Ok(())
}

fn check_displacements(definition: &MachineDefinition) -> Result<(), AnalysisError> {
    definition
        .delta
        .iter()
        .enumerate()
        .find_map(|(rule, record)| match Displacement::parse(&record.output.displacement) {
            Displacement::Unrecognized(code) => Some(AnalysisError::InvalidMove { rule, code }),
            Displacement::Direction(_) => None,
        })
        .map_or(Ok(()), Err)
}

/// Breadth-first search over the rules starting at the initial state. The final state is
/// never expanded since the machine halts as soon as it enters it.
fn reachable_states(definition: &MachineDefinition) -> HashSet<&str> {
    let final_state = definition.q_states.final_state.as_str();
    let mut visited = HashSet::new();
    let mut queue = VecDeque::from([definition.q_states.initial.as_str()]);

    while let Some(state) = queue.pop_front() {
        if !visited.insert(state) || state == final_state {
            continue;
        }

        for record in &definition.delta {
            if record.params.state == state && !visited.contains(record.output.state.as_str()) {
                queue.push_back(record.output.state.as_str());
            }
        }
    }

    visited
}
