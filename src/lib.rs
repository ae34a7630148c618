//! Nested FSM: an embeddable hierarchical finite-state machine
//!
//! States are plain values (anything `Clone + Eq + Hash + Debug`). They are
//! organized into a tree of composite states, each state restricts which
//! states may move into it, and hooks fire on entering or leaving a state.
//! Exactly one leaf is active at a time; its ancestors are active with it.
//!
//! # Core Concepts
//!
//! - **Registry**: an arena of state nodes linked by parent handles
//! - **Allow-lists**: the predecessors a state may be entered from
//! - **Path resolution**: moving between two states exits up to their
//!   nearest common ancestor and enters back down to the target
//! - **Hooks**: `(from, to, current)` callbacks, dispatched innermost first
//!   on exit and outermost first on entry
//!
//! # Example
//!
//! ```rust
//! use nested_fsm::builder::{StateBuilder, StateMachineBuilder};
//! use nested_fsm::core::TransitionOutcome;
//! use nested_fsm::state_enum;
//!
//! state_enum! {
//!     enum Door {
//!         Initial,
//!         Open,
//!         OpenHalf,
//!         Close,
//!     }
//! }
//!
//! let mut door = StateMachineBuilder::new()
//!     .state(StateBuilder::new(Door::Initial))
//!     .state(StateBuilder::new(Door::Open).from([Door::Initial, Door::OpenHalf]))
//!     .state(StateBuilder::new(Door::OpenHalf).parent(Door::Open).from([Door::Initial]))
//!     .state(StateBuilder::new(Door::Close))
//!     .initial(Door::Initial)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(door.transition(&Door::OpenHalf).unwrap(), TransitionOutcome::Completed);
//! assert!(door.is_in(&Door::Open));
//!
//! // Close has an empty allow-list, so it can never be a transition target.
//! assert_eq!(door.transition(&Door::Close).unwrap(), TransitionOutcome::Rejected);
//! assert_eq!(door.current_state().unwrap(), &Door::OpenHalf);
//! ```

pub mod builder;
pub mod config;
pub mod core;
pub mod runtime;

// Re-export commonly used types
pub use builder::{BuildError, StateBuilder, StateMachineBuilder};
pub use config::MachineConfig;
pub use self::core::{MachineError, State, StateDefinition, StateHistory, TransitionOutcome};
pub use runtime::{SharedStateMachine, StateMachine};
