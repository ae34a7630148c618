//! The imperative shell around the pure core.
//!
//! [`StateMachine`] owns a registry, validates requests against the
//! allow-lists and dispatches hooks in nested order. [`SharedStateMachine`]
//! wraps one behind a lock for use across threads.
//!
//! # Example
//!
//! ```rust
//! use nested_fsm::core::{StateDefinition, TransitionOutcome};
//! use nested_fsm::runtime::StateMachine;
//!
//! let mut machine = StateMachine::new();
//! machine.add_state(StateDefinition::new("initial")).unwrap();
//!
//! let mut open = StateDefinition::new("open");
//! open.allowed_from.insert("initial");
//! machine.add_state(open).unwrap();
//!
//! machine.set_initial_state(&"initial").unwrap();
//! assert!(machine.can_transition(&"open").unwrap());
//! assert_eq!(machine.transition(&"open").unwrap(), TransitionOutcome::Completed);
//! assert_eq!(machine.current_state().unwrap(), &"open");
//! ```

mod machine;
mod shared;

pub use crate::core::{MachineError, TransitionOutcome};
pub use machine::StateMachine;
pub use shared::SharedStateMachine;
