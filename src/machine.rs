//! This module defines the execution engine. A [`Machine`] holds one run's configuration and
//! applies transitions one at a time; a [`Simulator`] drives machines to a verdict and records
//! the trace of instantaneous descriptions.

use crate::description::InstantaneousDescription;
use crate::table::TransitionTable;
use crate::tape::Tape;
use crate::types::{Displacement, State, Symbol, DEFAULT_STEP_LIMIT};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a run was aborted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbortReason {
    /// More transitions than the configured limit were applied.
    StepLimitExceeded(usize),
    /// A transition carried an unrecognized displacement code.
    InvalidMove(String),
}

/// The terminal outcome of one simulation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The final state was reached.
    Accepted,
    /// No transition applies to the current configuration.
    Rejected,
    Aborted(AbortReason),
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Accepted => write!(f, "ACCEPTED"),
            Verdict::Rejected => write!(f, "REJECTED"),
            Verdict::Aborted(AbortReason::StepLimitExceeded(limit)) => {
                write!(f, "ABORTED (step limit of {} exceeded)", limit)
            }
            Verdict::Aborted(AbortReason::InvalidMove(code)) => {
                write!(f, "ABORTED (invalid displacement '{}')", code)
            }
        }
    }
}

/// Represents the outcome of a single machine step.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A transition was applied.
    Continue,
    /// The machine cannot make progress.
    Halt(Verdict),
}

/// One run's configuration: tape, head position, state, and cache register.
///
/// The step limit is enforced by [`Simulator`], not here; a bare `Machine` can be stepped
/// indefinitely.
pub struct Machine<'t> {
    table: &'t TransitionTable,
    tape: Tape,
    head: i64,
    state: State,
    cache: Symbol,
    step_count: usize,
}

impl<'t> Machine<'t> {
    /// Creates the initial configuration for `input`: the input on the tape from position 0,
    /// the head at 0, the initial state, and a blank cache.
    pub fn new(table: &'t TransitionTable, input: &str) -> Self {
        Self {
            table,
            tape: Tape::from_input(input),
            head: 0,
            state: table.initial_state().clone(),
            cache: Symbol::blank(),
            step_count: 0,
        }
    }

    /// Executes a single step.
    ///
    /// Acceptance is checked before lookup: once in the final state the machine halts, even
    /// if rules leave that state. An unrecognized displacement halts the machine without
    /// modifying the configuration.
    pub fn step(&mut self) -> Step {
        if self.is_accepting() {
            return Step::Halt(Verdict::Accepted);
        }

        let table = self.table;
        let read = self.tape.read(self.head);
        let Some(transition) = table.lookup(&self.state, &self.cache, &read) else {
            return Step::Halt(Verdict::Rejected);
        };

        let direction = match &transition.displacement {
            Displacement::Direction(direction) => *direction,
            Displacement::Unrecognized(code) => {
                return Step::Halt(Verdict::Aborted(AbortReason::InvalidMove(code.clone())));
            }
        };

        self.tape.write(self.head, transition.write.clone());
        self.cache = transition.to_cache.clone();
        self.head += direction.offset();
        self.state = transition.to_state.clone();
        self.step_count += 1;

        tracing::trace!(
            step = self.step_count,
            state = %self.state,
            head = self.head,
            cache = %self.cache,
            "transition applied"
        );

        Step::Continue
    }

    /// Renders the current configuration.
    pub fn describe(&self) -> InstantaneousDescription {
        InstantaneousDescription::capture(&self.tape, self.head, &self.state, &self.cache)
    }

    pub fn is_accepting(&self) -> bool {
        &self.state == self.table.final_state()
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn cache(&self) -> &Symbol {
        &self.cache
    }

    pub fn head(&self) -> i64 {
        self.head
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Number of transitions applied so far.
    pub fn step_count(&self) -> usize {
        self.step_count
    }
}

/// Settings for a [`Simulator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// A run is aborted once more than this many transitions have been applied.
    pub step_limit: usize,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            step_limit: DEFAULT_STEP_LIMIT,
        }
    }
}

/// The result of simulating one input string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Simulation {
    pub input: String,
    /// Rendered configurations, starting with the initial one. Always one entry longer than
    /// the number of transitions applied.
    pub trace: Vec<String>,
    pub verdict: Verdict,
    pub steps: usize,
}

impl Simulation {
    pub fn is_accepted(&self) -> bool {
        self.verdict == Verdict::Accepted
    }
}

/// Runs input strings against a shared transition table.
pub struct Simulator<'t> {
    table: &'t TransitionTable,
    config: SimulatorConfig,
}

impl<'t> Simulator<'t> {
    pub fn new(table: &'t TransitionTable, config: SimulatorConfig) -> Self {
        Self { table, config }
    }

    /// Simulates `input` on a fresh tape until a verdict is reached.
    ///
    /// Rejections and aborts are ordinary verdicts; the trace up to that point is always
    /// returned.
    pub fn run(&self, input: &str) -> Simulation {
        if let Some(c) = input
            .chars()
            .find(|c| !self.table.alphabet().contains(&Symbol::from(*c)))
        {
            tracing::warn!(input, symbol = %c, "input contains a symbol outside the alphabet");
        }

        let mut machine = Machine::new(self.table, input);
        let mut trace = vec![machine.describe().to_string()];

        let verdict = loop {
            match machine.step() {
                Step::Continue => {
                    trace.push(machine.describe().to_string());
                    if machine.step_count() > self.config.step_limit {
                        break Verdict::Aborted(AbortReason::StepLimitExceeded(
                            self.config.step_limit,
                        ));
                    }
                }
                Step::Halt(verdict) => break verdict,
            }
        };

        tracing::info!(input, %verdict, steps = machine.step_count(), "simulation finished");

        Simulation {
            input: input.to_string(),
            trace,
            verdict,
            steps: machine.step_count(),
        }
    }

    /// Simulates each input in order. One input's verdict never affects the others.
    pub fn run_all<S: AsRef<str>>(&self, inputs: &[S]) -> Vec<Simulation> {
        inputs.iter().map(|input| self.run(input.as_ref())).collect()
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }
}
