//! This module defines the immutable transition table: the machine's partial transition
//! function keyed by (state, cache, read symbol), together with its declared states and
//! alphabets.

use crate::analyzer::{analyze, lint, Lint};
use crate::definition::{DeltaRecord, MachineDefinition};
use crate::types::{Displacement, MachineError, State, Symbol, Transition};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Controls how strictly displacement codes are validated when building a table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mode {
    /// Unrecognized displacement codes fail the build.
    #[default]
    Strict,
    /// Unrecognized displacement codes are kept, and abort any run that applies them.
    Lenient,
}

type Key = (State, Symbol, Symbol);

/// The full rule set of a machine. Built once, read-only afterwards, and safe to share
/// between concurrent simulations.
#[derive(Debug, Clone)]
pub struct TransitionTable {
    rules: HashMap<Key, Transition>,
    states: Vec<State>,
    initial_state: State,
    final_state: State,
    alphabet: HashSet<Symbol>,
    tape_alphabet: HashSet<Symbol>,
    lints: Vec<Lint>,
}

impl TransitionTable {
    /// Validates `definition` and builds its table.
    ///
    /// # Returns
    ///
    /// * `Ok(TransitionTable)` if the definition passes analysis.
    /// * `Err(MachineError::ValidationError)` on the first problem found, including rules that
    ///   share a lookup key.
    pub fn build(definition: &MachineDefinition, mode: Mode) -> Result<Self, MachineError> {
        analyze(definition, mode)?;

        let rules: HashMap<Key, Transition> = definition
            .delta
            .iter()
            .map(to_transition)
            .map(|transition| (transition.key(), transition))
            .collect();

        let table = Self {
            rules,
            states: definition.q_states.states.iter().map(State::new).collect(),
            initial_state: State::new(&definition.q_states.initial),
            final_state: State::new(&definition.q_states.final_state),
            alphabet: definition.alphabet.iter().map(Symbol::new).collect(),
            tape_alphabet: definition.tape_alphabet.iter().map(Symbol::new).collect(),
            lints: lint(definition),
        };

        tracing::debug!(
            rules = table.rules.len(),
            states = table.states.len(),
            initial = %table.initial_state,
            final_state = %table.final_state,
            ?mode,
            "transition table built"
        );

        Ok(table)
    }

    /// Returns the rule for the exact (state, cache, read) triple, if any.
    pub fn lookup(&self, state: &State, cache: &Symbol, read: &Symbol) -> Option<&Transition> {
        self.rules
            .get(&(state.clone(), cache.clone(), read.clone()))
    }

    pub fn initial_state(&self) -> &State {
        &self.initial_state
    }

    pub fn final_state(&self) -> &State {
        &self.final_state
    }

    /// The declared states, in declaration order.
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn alphabet(&self) -> &HashSet<Symbol> {
        &self.alphabet
    }

    pub fn tape_alphabet(&self) -> &HashSet<Symbol> {
        &self.tape_alphabet
    }

    /// Non-fatal findings collected while building the table.
    pub fn lints(&self) -> &[Lint] {
        &self.lints
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn to_transition(record: &DeltaRecord) -> Transition {
    Transition {
        from_state: State::new(&record.params.state),
        from_cache: Symbol::new(&record.params.cache),
        read: Symbol::new(&record.params.read),
        to_state: State::new(&record.output.state),
        to_cache: Symbol::new(&record.output.cache),
        write: Symbol::new(&record.output.write),
        displacement: Displacement::parse(&record.output.displacement),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::AnalysisError;
    use crate::types::Direction;

    fn cache_machine() -> MachineDefinition {
        MachineDefinition::new(&["q0", "q1", "qf"], "q0", "qf")
            .with_alphabet(&["a", "b"], &["a", "b"])
            .with_rule(("q0", "", "a"), ("q1", "a", "a", "R"))
            .with_rule(("q1", "a", ""), ("qf", "", "b", "L"))
    }

    #[test]
    fn test_build_and_lookup() {
        let table = TransitionTable::build(&cache_machine(), Mode::Strict).unwrap();

        assert_eq!(table.len(), 2);
        assert_eq!(table.initial_state(), &State::from("q0"));
        assert_eq!(table.final_state(), &State::from("qf"));
        assert_eq!(table.states().len(), 3);
        assert!(table.alphabet().contains(&Symbol::from("a")));

        let transition = table
            .lookup(&State::from("q1"), &Symbol::from("a"), &Symbol::blank())
            .unwrap();
        assert_eq!(transition.to_state, State::from("qf"));
        assert_eq!(transition.write, Symbol::from("b"));
        assert!(transition.to_cache.is_blank());
        assert_eq!(transition.displacement, Displacement::Direction(Direction::Left));
    }

    #[test]
    fn test_lookup_requires_exact_cache() {
        let table = TransitionTable::build(&cache_machine(), Mode::Strict).unwrap();

        assert!(table
            .lookup(&State::from("q1"), &Symbol::blank(), &Symbol::blank())
            .is_none());
        assert!(table
            .lookup(&State::from("q0"), &Symbol::from("a"), &Symbol::from("a"))
            .is_none());
    }

    #[test]
    fn test_duplicate_key_fails_build() {
        let definition = cache_machine().with_rule(("q0", "", "a"), ("qf", "", "a", "S"));
        let result = TransitionTable::build(&definition, Mode::Strict);

        assert!(matches!(
            result,
            Err(MachineError::ValidationError(
                AnalysisError::AmbiguousTransition { first: 0, second: 2, .. }
            ))
        ));
    }

    #[test]
    fn test_lenient_mode_keeps_unrecognized_moves() {
        let definition = cache_machine().with_rule(("q0", "", "b"), ("qf", "", "b", "jump"));

        assert!(TransitionTable::build(&definition, Mode::Strict).is_err());

        let table = TransitionTable::build(&definition, Mode::Lenient).unwrap();
        let transition = table
            .lookup(&State::from("q0"), &Symbol::blank(), &Symbol::from("b"))
            .unwrap();
        assert_eq!(
            transition.displacement,
            Displacement::Unrecognized("jump".to_string())
        );
    }

    #[test]
    fn test_table_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransitionTable>();
    }
}
