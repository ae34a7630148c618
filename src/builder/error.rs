//! Build errors for state machine declarations.

use crate::core::MachineError;
use thiserror::Error;

/// A single problem found while validating declarations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigViolation {
    #[error("State '{state}' is declared more than once")]
    DuplicateState { state: String },

    #[error("State '{state}' names undeclared parent '{parent}'")]
    UnknownParent { state: String, parent: String },

    #[error("State '{state}' allows entry from undeclared state '{predecessor}'")]
    UnknownPredecessor { state: String, predecessor: String },

    #[error("State '{state}' is its own ancestor")]
    CyclicHierarchy { state: String },

    #[error("Initial state '{state}' is not declared")]
    UnknownInitialState { state: String },
}

/// Errors that can occur when building a state machine.
#[derive(Debug, Error)]
pub enum BuildError {
    /// Every violation found, not just the first.
    #[error("Invalid state machine definition: {}", summarize(.0))]
    Invalid(Vec<ConfigViolation>),

    #[error(transparent)]
    Machine(#[from] MachineError),
}

fn summarize(violations: &[ConfigViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
