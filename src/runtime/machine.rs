//! State machine that dispatches nested enter/exit hooks.

use crate::config::MachineConfig;
use crate::core::{
    describe, MachineError, NodeId, State, StateDefinition, StateHistory, StateHook,
    StateRegistry, StateTransition, TransitionOutcome, TransitionPath,
};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;

/// Hierarchical state machine with a single active leaf.
///
/// Build the registry with [`add_state`](Self::add_state), enter the first
/// state once with [`set_initial_state`](Self::set_initial_state), then
/// drive it with [`transition`](Self::transition). All hooks run inline on
/// the caller's thread before the call returns.
///
/// Hooks only see the machine through their `(from, to, current)`
/// arguments; they cannot borrow the machine while it is dispatching. Use
/// [`SharedStateMachine`](super::SharedStateMachine) to share a machine
/// between threads or with its own hooks.
pub struct StateMachine<T: State> {
    registry: StateRegistry<T>,
    current: Option<NodeId>,
    on_transition_succeeded: Option<StateHook<T>>,
    on_transition_failed: Option<StateHook<T>>,
    history: StateHistory<T>,
    history_limit: Option<usize>,
}

impl<T: State> Default for StateMachine<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: State> StateMachine<T> {
    /// Create an empty, uninitialized machine with default configuration.
    pub fn new() -> Self {
        Self::with_config(&MachineConfig::default())
    }

    pub fn with_config(config: &MachineConfig) -> Self {
        Self {
            registry: StateRegistry::with_policy(config.duplicate_policy),
            current: None,
            on_transition_succeeded: None,
            on_transition_failed: None,
            history: StateHistory::new(),
            history_limit: config.history_limit,
        }
    }

    /// Register a state. The parent, if any, must be registered already.
    pub fn add_state(&mut self, definition: StateDefinition<T>) -> Result<(), MachineError> {
        self.registry.register(definition).map(|_| ())
    }

    /// Enter the first state.
    ///
    /// Ancestors are entered root first, then the state itself, each hook
    /// receiving `from = None`. The success hook fires last. Can only be
    /// called once.
    pub fn set_initial_state(&mut self, identity: &T) -> Result<(), MachineError> {
        if let Some(current) = self.current {
            return Err(MachineError::AlreadyInitialized {
                current: describe(&self.registry.at(current).identity),
            });
        }
        let target = self.registry.require(identity)?;

        tracing::debug!(state = ?identity, "setting initial state");
        self.current = Some(target);

        let path = TransitionPath::plan(&self.registry, None, target);
        for id in &path.enters {
            self.registry.at(*id).enter(None, identity);
        }

        if let Some(hook) = &self.on_transition_succeeded {
            hook(None, identity, identity);
        }
        self.record(None, identity.clone(), TransitionOutcome::Completed);
        Ok(())
    }

    /// Whether [`transition`](Self::transition) to `target` would complete.
    ///
    /// `false` when uninitialized, when `target` is the current state, or
    /// when the current state is not in `target`'s allow-list.
    pub fn can_transition(&self, target: &T) -> Result<bool, MachineError> {
        let to = self.registry.require(target)?;
        Ok(self.current.is_some_and(|from| self.is_legal(from, to)))
    }

    /// Move to `target`, firing hooks along the way.
    ///
    /// A move refused by the allow-list is not an error: it fires the
    /// failure hook, leaves the machine where it was and returns
    /// [`TransitionOutcome::Rejected`].
    ///
    /// On success exits run innermost first up to the nearest common
    /// ancestor, the current state is swapped, enters run outermost first
    /// down to the target, and finally the success hook fires.
    pub fn transition(&mut self, target: &T) -> Result<TransitionOutcome, MachineError> {
        let to = self.registry.require(target)?;
        let from = self.current.ok_or(MachineError::NotInitialized)?;
        let origin = self.registry.at(from).identity.clone();

        if !self.is_legal(from, to) {
            tracing::debug!(from = ?origin, to = ?target, "transition rejected");
            if let Some(hook) = &self.on_transition_failed {
                hook(Some(&origin), target, &origin);
            }
            self.record(Some(origin), target.clone(), TransitionOutcome::Rejected);
            return Ok(TransitionOutcome::Rejected);
        }

        let path = TransitionPath::plan(&self.registry, Some(from), to);
        tracing::debug!(
            from = ?origin,
            to = ?target,
            exits = path.exits.len(),
            enters = path.enters.len(),
            "transition"
        );

        for id in &path.exits {
            self.registry.at(*id).exit(&origin, target);
        }

        self.current = Some(to);

        for id in &path.enters {
            self.registry.at(*id).enter(Some(&origin), target);
        }

        if let Some(hook) = &self.on_transition_succeeded {
            hook(Some(&origin), target, target);
        }
        self.record(Some(origin), target.clone(), TransitionOutcome::Completed);
        Ok(TransitionOutcome::Completed)
    }

    /// The active leaf state.
    pub fn current_state(&self) -> Result<&T, MachineError> {
        self.current
            .map(|id| &self.registry.at(id).identity)
            .ok_or(MachineError::NotInitialized)
    }

    pub fn is_initialized(&self) -> bool {
        self.current.is_some()
    }

    /// Whether `identity` is the current state or one of its ancestors.
    pub fn is_in(&self, identity: &T) -> bool {
        match (self.current, self.registry.id_of(identity)) {
            (Some(current), Some(id)) => self.registry.chain(current).any(|node| node == id),
            _ => false,
        }
    }

    pub fn registry(&self) -> &StateRegistry<T> {
        &self.registry
    }

    pub fn history(&self) -> &StateHistory<T> {
        &self.history
    }

    /// Replace (or clear, with `None`) the hook fired after every completed
    /// transition and after initialization.
    pub fn set_on_transition_succeeded(&mut self, hook: Option<StateHook<T>>) {
        self.on_transition_succeeded = hook;
    }

    /// Replace (or clear, with `None`) the hook fired for rejected moves.
    pub fn set_on_transition_failed(&mut self, hook: Option<StateHook<T>>) {
        self.on_transition_failed = hook;
    }

    pub fn on_transition_succeeded<F>(&mut self, hook: F)
    where
        F: Fn(Option<&T>, &T, &T) + Send + Sync + 'static,
    {
        self.on_transition_succeeded = Some(Arc::new(hook));
    }

    pub fn on_transition_failed<F>(&mut self, hook: F)
    where
        F: Fn(Option<&T>, &T, &T) + Send + Sync + 'static,
    {
        self.on_transition_failed = Some(Arc::new(hook));
    }

    fn is_legal(&self, from: NodeId, to: NodeId) -> bool {
        from != to && self.registry.at(to).admits(&self.registry.at(from).identity)
    }

    fn record(&mut self, from: Option<T>, to: T, outcome: TransitionOutcome) {
        let entry = StateTransition {
            from,
            to,
            outcome,
            timestamp: Utc::now(),
        };
        self.history = self
            .history
            .record(entry)
            .truncated(self.history_limit);
    }
}

impl<T: State> fmt::Debug for StateMachine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateMachine")
            .field("current", &self.current_state().ok())
            .field("registry", &self.registry)
            .field("history_len", &self.history.transitions().len())
            .finish()
    }
}
