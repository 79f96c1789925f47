//! This crate provides the core logic for a Turing machine extended with a single cache
//! register. It includes modules for loading machine descriptions, validating them into an
//! immutable transition table, and running input strings to a verdict while recording every
//! instantaneous description.

pub mod analyzer;
pub mod definition;
pub mod description;
pub mod loader;
pub mod machine;
pub mod programs;
pub mod table;
pub mod tape;
pub mod types;

/// Re-exports the `analyze` and `lint` functions and their report types from the analyzer module.
pub use analyzer::{analyze, lint, AnalysisError, Lint};
/// Re-exports the machine description types from the definition module.
pub use definition::MachineDefinition;
/// Re-exports the `InstantaneousDescription` struct from the description module.
pub use description::InstantaneousDescription;
/// Re-exports the `MachineLoader` struct from the loader module.
pub use loader::{Format, MachineLoader};
/// Re-exports the execution engine from the machine module.
pub use machine::{AbortReason, Machine, Simulation, Simulator, SimulatorConfig, Step, Verdict};
/// Re-exports the `ProgramCatalog` struct from the programs module.
pub use programs::ProgramCatalog;
/// Re-exports the `TransitionTable` struct and its build `Mode`.
pub use table::{Mode, TransitionTable};
/// Re-exports the `Tape` struct from the tape module.
pub use tape::Tape;
/// Re-exports the core vocabulary from the types module.
pub use types::{
    Direction, Displacement, MachineError, State, Symbol, Transition, DEFAULT_STEP_LIMIT,
};
