//! Arena of state nodes for one machine.

use super::error::MachineError;
use super::node::{NodeId, StateHook, StateNode};
use super::state::{describe, State};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// What to do when a state identity is registered twice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Refuse the second registration with [`MachineError::DuplicateState`].
    #[default]
    Reject,

    /// Overwrite the existing node's metadata in place. Its children stay
    /// attached and it is moved under the new parent.
    Replace,
}

/// Everything needed to register one state.
///
/// Plain data; [`StateBuilder`](crate::builder::StateBuilder) offers a
/// fluent way to fill it in.
pub struct StateDefinition<T: State> {
    pub identity: T,
    pub allowed_from: HashSet<T>,
    pub parent: Option<T>,
    pub on_enter: Option<StateHook<T>>,
    pub on_exit: Option<StateHook<T>>,
}

impl<T: State> StateDefinition<T> {
    /// A root state with no predecessors and no hooks.
    pub fn new(identity: T) -> Self {
        Self {
            identity,
            allowed_from: HashSet::new(),
            parent: None,
            on_enter: None,
            on_exit: None,
        }
    }
}

impl<T: State> Clone for StateDefinition<T> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            allowed_from: self.allowed_from.clone(),
            parent: self.parent.clone(),
            on_enter: self.on_enter.clone(),
            on_exit: self.on_exit.clone(),
        }
    }
}

impl<T: State> fmt::Debug for StateDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateDefinition")
            .field("identity", &self.identity)
            .field("allowed_from", &self.allowed_from)
            .field("parent", &self.parent)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_exit", &self.on_exit.is_some())
            .finish()
    }
}

/// Owns every node of one machine, indexed by identity.
///
/// Nodes are never removed, so a [`NodeId`] handed out by a registry stays
/// valid for that registry's lifetime.
pub struct StateRegistry<T: State> {
    nodes: Vec<StateNode<T>>,
    index: HashMap<T, NodeId>,
    duplicate_policy: DuplicatePolicy,
}

impl<T: State> Default for StateRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: State> StateRegistry<T> {
    pub fn new() -> Self {
        Self::with_policy(DuplicatePolicy::default())
    }

    pub fn with_policy(duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            nodes: Vec::new(),
            index: HashMap::new(),
            duplicate_policy,
        }
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        self.duplicate_policy
    }

    /// Register a state, or replace it under [`DuplicatePolicy::Replace`].
    ///
    /// The parent, if any, must already be registered. On error the
    /// registry is unchanged.
    pub fn register(&mut self, definition: StateDefinition<T>) -> Result<NodeId, MachineError> {
        let StateDefinition {
            identity,
            allowed_from,
            parent,
            on_enter,
            on_exit,
        } = definition;

        let existing = self.index.get(&identity).copied();
        if existing.is_some() && self.duplicate_policy == DuplicatePolicy::Reject {
            return Err(MachineError::DuplicateState {
                state: describe(&identity),
            });
        }

        let parent_id = match &parent {
            Some(p) => Some(self.id_of(p).ok_or_else(|| MachineError::UnknownParent {
                state: describe(&identity),
                parent: describe(p),
            })?),
            None => None,
        };

        let id = match existing {
            Some(id) => {
                if let Some(p) = parent_id {
                    if self.chain(p).any(|ancestor| ancestor == id) {
                        return Err(MachineError::CyclicParent {
                            state: describe(&identity),
                            parent: parent.as_ref().map(describe).unwrap_or_default(),
                        });
                    }
                }

                tracing::warn!(state = ?identity, "replacing previously registered state");
                if let Some(old_parent) = self.nodes[id.0].parent.take() {
                    self.nodes[old_parent.0].children.retain(|child| *child != id);
                }
                let node = &mut self.nodes[id.0];
                node.allowed_from = allowed_from;
                node.on_enter = on_enter;
                node.on_exit = on_exit;
                id
            }
            None => {
                let id = NodeId(self.nodes.len());
                let mut node = StateNode::new(identity.clone(), allowed_from);
                node.on_enter = on_enter;
                node.on_exit = on_exit;
                self.nodes.push(node);
                self.index.insert(identity, id);
                id
            }
        };

        if let Some(p) = parent_id {
            self.nodes[id.0].parent = Some(p);
            self.nodes[p.0].children.push(id);
        }

        tracing::debug!(
            state = ?self.nodes[id.0].identity,
            parent = ?parent,
            "registered state"
        );
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, identity: &T) -> bool {
        self.index.contains_key(identity)
    }

    pub fn id_of(&self, identity: &T) -> Option<NodeId> {
        self.index.get(identity).copied()
    }

    /// Like [`id_of`](Self::id_of) but fails with `UnknownState`.
    pub fn require(&self, identity: &T) -> Result<NodeId, MachineError> {
        self.id_of(identity).ok_or_else(|| MachineError::UnknownState {
            state: describe(identity),
        })
    }

    pub fn node(&self, identity: &T) -> Option<&StateNode<T>> {
        self.id_of(identity).map(|id| &self.nodes[id.0])
    }

    pub fn node_by_id(&self, id: NodeId) -> Option<&StateNode<T>> {
        self.nodes.get(id.0)
    }

    pub(crate) fn at(&self, id: NodeId) -> &StateNode<T> {
        &self.nodes[id.0]
    }

    /// Registered identities in registration order.
    pub fn states(&self) -> impl Iterator<Item = &T> + '_ {
        self.nodes.iter().map(|node| &node.identity)
    }

    /// Walk from `id` up to its root, starting with `id` itself.
    pub fn chain(&self, id: NodeId) -> Chain<'_, T> {
        Chain {
            registry: self,
            next: Some(id),
        }
    }

    pub fn parent_of(&self, identity: &T) -> Option<&T> {
        let parent = self.node(identity)?.parent?;
        Some(&self.at(parent).identity)
    }

    /// Direct children in attachment order; empty for unknown identities.
    pub fn children_of(&self, identity: &T) -> Vec<&T> {
        self.node(identity)
            .map(|node| {
                node.children
                    .iter()
                    .map(|child| &self.at(*child).identity)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Ancestors nearest first, excluding the state itself.
    pub fn ancestors_of(&self, identity: &T) -> Vec<&T> {
        match self.id_of(identity) {
            Some(id) => self
                .chain(id)
                .skip(1)
                .map(|ancestor| &self.at(ancestor).identity)
                .collect(),
            None => Vec::new(),
        }
    }

    /// Outermost ancestor, or the state itself when it has no parent.
    pub fn root_of(&self, identity: &T) -> Option<&T> {
        let id = self.id_of(identity)?;
        self.chain(id).last().map(|root| &self.at(root).identity)
    }
}

impl<T: State> fmt::Debug for StateRegistry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateRegistry")
            .field("nodes", &self.nodes)
            .field("duplicate_policy", &self.duplicate_policy)
            .finish()
    }
}

/// Iterator over a node and its ancestors, innermost first.
pub struct Chain<'a, T: State> {
    registry: &'a StateRegistry<T>,
    next: Option<NodeId>,
}

impl<T: State> Iterator for Chain<'_, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.registry.at(current).parent;
        Some(current)
    }
}
