//! Builder API for ergonomic state machine construction.
//!
//! This module provides fluent builders and macros for declaring
//! hierarchies with minimal boilerplate while keeping every declaration
//! checked before the machine is used.

pub mod error;
pub mod machine;
pub mod macros;
pub mod state;

pub use error::{BuildError, ConfigViolation};
pub use machine::StateMachineBuilder;
pub use state::StateBuilder;

use crate::core::State;

/// Declare a state that may be entered from each of `from`.
///
/// # Example
///
/// ```
/// use nested_fsm::builder::{reachable_from, StateMachineBuilder};
/// use nested_fsm::state_enum;
///
/// state_enum! {
///     enum Phase {
///         Idle,
///         Running,
///     }
/// }
///
/// let machine = StateMachineBuilder::new()
///     .state(reachable_from(Phase::Idle, [Phase::Running]))
///     .state(reachable_from(Phase::Running, [Phase::Idle]))
///     .initial(Phase::Idle)
///     .build()
///     .unwrap();
///
/// assert!(machine.can_transition(&Phase::Running).unwrap());
/// ```
pub fn reachable_from<T, I>(state: T, from: I) -> StateBuilder<T>
where
    T: State,
    I: IntoIterator<Item = T>,
{
    StateBuilder::new(state).from(from)
}

/// Declare a state nested under `parent`.
///
/// # Example
///
/// ```
/// use nested_fsm::builder::{nested_in, StateBuilder, StateMachineBuilder};
/// use nested_fsm::state_enum;
///
/// state_enum! {
///     enum Door {
///         Open,
///         Ajar,
///     }
/// }
///
/// let machine = StateMachineBuilder::new()
///     .state(StateBuilder::new(Door::Open))
///     .state(nested_in(Door::Ajar, Door::Open))
///     .initial(Door::Ajar)
///     .build()
///     .unwrap();
///
/// assert!(machine.is_in(&Door::Open));
/// ```
pub fn nested_in<T: State>(state: T, parent: T) -> StateBuilder<T> {
    StateBuilder::new(state).parent(parent)
}
