//! Core hierarchy types and logic.
//!
//! This module contains the pure part of the engine:
//! - State identities via the `State` trait
//! - The node arena (`StateRegistry`) with parent/child links
//! - Nearest-common-ancestor path resolution
//! - Immutable history tracking
//!
//! Nothing here runs hooks on its own; dispatch lives in
//! [`machine`](crate::machine).

mod error;
mod history;
mod node;
mod path;
mod registry;
mod state;

pub use error::MachineError;
pub use history::{StateHistory, StateTransition, TransitionOutcome};
pub use node::{NodeId, StateHook, StateNode};
pub use path::{resolve_path, PathDepths, TransitionPath};
pub use registry::{Chain, DuplicatePolicy, StateDefinition, StateRegistry};
pub use state::State;

pub(crate) use state::describe;
