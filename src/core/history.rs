//! State transition history tracking.
//!
//! Provides immutable tracking of state machine transitions over time,
//! following functional programming principles.

use super::state::State;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How a recorded request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionOutcome {
    /// The machine moved to the target.
    Completed,
    /// The allow-list refused the move; the machine stayed put.
    Rejected,
}

/// Record of a single state change request.
///
/// `from` is `None` for the entry recorded by initialization.
///
/// # Example
///
/// ```rust
/// use nested_fsm::core::{StateTransition, TransitionOutcome};
/// use chrono::Utc;
///
/// let transition = StateTransition {
///     from: Some("closed"),
///     to: "open",
///     outcome: TransitionOutcome::Completed,
///     timestamp: Utc::now(),
/// };
/// assert!(transition.is_completed());
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize",
    deserialize = "S: Deserialize<'de>"
))]
pub struct StateTransition<S: State> {
    /// The state being transitioned from
    pub from: Option<S>,
    /// The requested target
    pub to: S,
    /// Whether the machine actually moved
    pub outcome: TransitionOutcome,
    /// When the request was handled
    pub timestamp: DateTime<Utc>,
}

impl<S: State> StateTransition<S> {
    pub fn is_completed(&self) -> bool {
        self.outcome == TransitionOutcome::Completed
    }
}

/// Ordered history of state transitions.
///
/// History is immutable - the `record` method returns a new history
/// with the transition added.
///
/// # Example
///
/// ```rust
/// use nested_fsm::core::{StateHistory, StateTransition, TransitionOutcome};
/// use chrono::Utc;
///
/// let history = StateHistory::new()
///     .record(StateTransition {
///         from: None,
///         to: "start",
///         outcome: TransitionOutcome::Completed,
///         timestamp: Utc::now(),
///     })
///     .record(StateTransition {
///         from: Some("start"),
///         to: "end",
///         outcome: TransitionOutcome::Completed,
///         timestamp: Utc::now(),
///     });
///
/// assert_eq!(history.get_path(), vec![&"start", &"end"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(bound(
    serialize = "S: Serialize",
    deserialize = "S: Deserialize<'de>"
))]
pub struct StateHistory<S: State> {
    transitions: Vec<StateTransition<S>>,
}

impl<S: State> Default for StateHistory<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: State> StateHistory<S> {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            transitions: Vec::new(),
        }
    }

    /// Record a transition, returning a new history.
    ///
    /// This is a pure function - it does not mutate the existing history
    /// but returns a new one with the transition added.
    pub fn record(&self, transition: StateTransition<S>) -> Self {
        let mut transitions = self.transitions.clone();
        transitions.push(transition);
        Self { transitions }
    }

    /// Keep only the newest `limit` entries.
    pub fn truncated(mut self, limit: Option<usize>) -> Self {
        if let Some(limit) = limit {
            let excess = self.transitions.len().saturating_sub(limit);
            self.transitions.drain(..excess);
        }
        self
    }

    /// Get the path of states actually visited.
    ///
    /// Starts with the `from` of the first completed transition (when it
    /// has one), followed by the `to` of every completed transition.
    /// Rejected requests are skipped.
    pub fn get_path(&self) -> Vec<&S> {
        let mut completed = self.transitions.iter().filter(|t| t.is_completed());
        let mut path = Vec::new();
        if let Some(first) = completed.next() {
            if let Some(from) = &first.from {
                path.push(from);
            }
            path.push(&first.to);
        }
        path.extend(completed.map(|t| &t.to));
        path
    }

    /// Calculate total duration from first to last transition.
    ///
    /// Returns `None` if there are no transitions.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.transitions.first(), self.transitions.last()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// Number of requests the allow-lists refused.
    pub fn rejected_count(&self) -> usize {
        self.transitions.iter().filter(|t| !t.is_completed()).count()
    }

    /// Get all transitions.
    pub fn transitions(&self) -> &[StateTransition<S>] {
        &self.transitions
    }
}
