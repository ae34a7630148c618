//! Builder for a single state declaration.

use crate::core::{State, StateDefinition};
use std::sync::Arc;

/// Fluent construction of a [`StateDefinition`].
///
/// # Example
///
/// ```rust
/// use nested_fsm::builder::StateBuilder;
///
/// let half_open = StateBuilder::new("half_open")
///     .parent("open")
///     .from(["closed", "fully_open"])
///     .on_enter(|from, _to, _current| println!("entered from {from:?}"))
///     .build();
///
/// assert_eq!(half_open.parent, Some("open"));
/// assert_eq!(half_open.allowed_from.len(), 2);
/// ```
pub struct StateBuilder<T: State> {
    definition: StateDefinition<T>,
}

impl<T: State> StateBuilder<T> {
    pub fn new(identity: T) -> Self {
        Self {
            definition: StateDefinition::new(identity),
        }
    }

    /// Add predecessors from which this state may be entered.
    pub fn from<I>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        self.definition.allowed_from.extend(states);
        self
    }

    /// Add a single predecessor.
    pub fn allow_from(mut self, state: T) -> Self {
        self.definition.allowed_from.insert(state);
        self
    }

    /// Nest this state under `parent`.
    pub fn parent(mut self, parent: T) -> Self {
        self.definition.parent = Some(parent);
        self
    }

    pub fn on_enter<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&T>, &T, &T) + Send + Sync + 'static,
    {
        self.definition.on_enter = Some(Arc::new(hook));
        self
    }

    pub fn on_exit<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&T>, &T, &T) + Send + Sync + 'static,
    {
        self.definition.on_exit = Some(Arc::new(hook));
        self
    }

    pub fn identity(&self) -> &T {
        &self.definition.identity
    }

    pub fn build(self) -> StateDefinition<T> {
        self.definition
    }
}

impl<T: State> From<StateBuilder<T>> for StateDefinition<T> {
    fn from(builder: StateBuilder<T>) -> Self {
        builder.build()
    }
}
