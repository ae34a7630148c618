//! Errors raised by registration and transition requests.

use thiserror::Error;

/// Programmer errors surfaced by the registry and the machine.
///
/// A transition refused by an allow-list is not an error; it is reported
/// through the failure hook and [`TransitionOutcome::Rejected`].
///
/// [`TransitionOutcome::Rejected`]: crate::machine::TransitionOutcome::Rejected
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MachineError {
    #[error("State '{state}' is not registered")]
    UnknownState { state: String },

    #[error("Parent '{parent}' of state '{state}' is not registered")]
    UnknownParent { state: String, parent: String },

    #[error("State '{state}' is already registered")]
    DuplicateState { state: String },

    #[error("Making '{parent}' the parent of '{state}' would create a cycle")]
    CyclicParent { state: String, parent: String },

    #[error("Initial state already set (current: '{current}')")]
    AlreadyInitialized { current: String },

    #[error("No initial state has been set")]
    NotInitialized,

    #[error("State machine called re-entrantly from one of its own hooks")]
    Reentrant,

    #[error("State machine is poisoned: a hook panicked during an earlier call")]
    Poisoned,
}
