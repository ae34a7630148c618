//! Per-state metadata records.

use super::state::State;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Callback fired around a state change.
///
/// Arguments are `(from, to, current)`: the state the machine is leaving
/// (`None` during initialization), the requested target, and the state
/// whose hook is running. For global hooks `current` is the state the
/// machine ends up in.
pub type StateHook<T> = Arc<dyn Fn(Option<&T>, &T, &T) + Send + Sync>;

/// Dense handle into a [`StateRegistry`](super::StateRegistry) arena.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of the node in registration order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Metadata for one declared state.
///
/// Parent and children are arena handles, never owning references, so
/// a hierarchy cannot leak through reference cycles.
pub struct StateNode<T: State> {
    pub(crate) identity: T,
    pub(crate) allowed_from: HashSet<T>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    pub(crate) on_enter: Option<StateHook<T>>,
    pub(crate) on_exit: Option<StateHook<T>>,
}

impl<T: State> StateNode<T> {
    pub(crate) fn new(identity: T, allowed_from: HashSet<T>) -> Self {
        Self {
            identity,
            allowed_from,
            parent: None,
            children: Vec::new(),
            on_enter: None,
            on_exit: None,
        }
    }

    pub fn identity(&self) -> &T {
        &self.identity
    }

    /// Predecessors from which a direct transition into this state is legal.
    pub fn allowed_from(&self) -> &HashSet<T> {
        &self.allowed_from
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Children in the order they were attached.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Whether a move from `from` into this state passes the allow-list.
    ///
    /// An empty allow-list admits nothing.
    pub fn admits(&self, from: &T) -> bool {
        !self.allowed_from.is_empty() && self.allowed_from.contains(from)
    }

    pub fn has_enter_hook(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_exit_hook(&self) -> bool {
        self.on_exit.is_some()
    }

    pub(crate) fn enter(&self, from: Option<&T>, to: &T) {
        if let Some(hook) = &self.on_enter {
            tracing::trace!(state = ?self.identity, ?from, ?to, "on_enter");
            hook(from, to, &self.identity);
        }
    }

    pub(crate) fn exit(&self, from: &T, to: &T) {
        if let Some(hook) = &self.on_exit {
            tracing::trace!(state = ?self.identity, ?from, ?to, "on_exit");
            hook(Some(from), to, &self.identity);
        }
    }
}

impl<T: State> fmt::Debug for StateNode<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateNode")
            .field("identity", &self.identity)
            .field("allowed_from", &self.allowed_from)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}
