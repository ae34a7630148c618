//! Builder for constructing state machines.

use crate::builder::error::{BuildError, ConfigViolation};
use crate::config::MachineConfig;
use crate::core::{describe, DuplicatePolicy, State, StateDefinition, StateHook};
use crate::runtime::StateMachine;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

/// Builder for constructing state machines with a fluent API.
///
/// Declarations may come in any order: parents are registered before
/// their children when the machine is built. [`build`](Self::build)
/// reports every problem at once rather than stopping at the first.
///
/// # Example
///
/// ```rust
/// use nested_fsm::builder::{StateBuilder, StateMachineBuilder};
///
/// let machine = StateMachineBuilder::new()
///     .state(StateBuilder::new("half").parent("open").from(["closed"]))
///     .state(StateBuilder::new("open"))
///     .state(StateBuilder::new("closed"))
///     .initial("closed")
///     .build()
///     .unwrap();
///
/// assert_eq!(machine.current_state().unwrap(), &"closed");
/// assert!(machine.can_transition(&"half").unwrap());
/// ```
pub struct StateMachineBuilder<T: State> {
    config: MachineConfig,
    states: Vec<StateDefinition<T>>,
    initial: Option<T>,
    on_transition_succeeded: Option<StateHook<T>>,
    on_transition_failed: Option<StateHook<T>>,
}

impl<T: State> StateMachineBuilder<T> {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            config: MachineConfig::default(),
            states: Vec::new(),
            initial: None,
            on_transition_succeeded: None,
            on_transition_failed: None,
        }
    }

    pub fn config(mut self, config: MachineConfig) -> Self {
        self.config = config;
        self
    }

    /// Declare a state.
    pub fn state(mut self, state: impl Into<StateDefinition<T>>) -> Self {
        self.states.push(state.into());
        self
    }

    /// Declare several states at once.
    pub fn states<I, D>(mut self, states: I) -> Self
    where
        I: IntoIterator<Item = D>,
        D: Into<StateDefinition<T>>,
    {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    /// State entered by [`build`](Self::build). Optional; without it the
    /// machine is returned uninitialized.
    pub fn initial(mut self, state: T) -> Self {
        self.initial = Some(state);
        self
    }

    pub fn on_transition_succeeded<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&T>, &T, &T) + Send + Sync + 'static,
    {
        self.on_transition_succeeded = Some(Arc::new(hook));
        self
    }

    pub fn on_transition_failed<F>(mut self, hook: F) -> Self
    where
        F: Fn(Option<&T>, &T, &T) + Send + Sync + 'static,
    {
        self.on_transition_failed = Some(Arc::new(hook));
        self
    }

    /// Check every declaration, accumulating all violations.
    pub fn validate(&self) -> Validation<(), NonEmptyVec<ConfigViolation>> {
        let mut checks: Vec<Validation<(), NonEmptyVec<ConfigViolation>>> = Vec::new();
        let declared: HashSet<&T> = self.states.iter().map(|def| &def.identity).collect();

        if self.config.duplicate_policy == DuplicatePolicy::Reject {
            let mut seen = HashSet::new();
            for def in &self.states {
                if !seen.insert(&def.identity) {
                    checks.push(Validation::fail(ConfigViolation::DuplicateState {
                        state: describe(&def.identity),
                    }));
                }
            }
        }

        let effective = latest_declarations(&self.states);
        let parents: HashMap<&T, Option<&T>> = effective
            .iter()
            .map(|def| (&def.identity, def.parent.as_ref()))
            .collect();

        for def in &effective {
            if let Some(parent) = &def.parent {
                if !declared.contains(parent) {
                    checks.push(Validation::fail(ConfigViolation::UnknownParent {
                        state: describe(&def.identity),
                        parent: describe(parent),
                    }));
                }
            }

            for predecessor in &def.allowed_from {
                if !declared.contains(predecessor) {
                    checks.push(Validation::fail(ConfigViolation::UnknownPredecessor {
                        state: describe(&def.identity),
                        predecessor: describe(predecessor),
                    }));
                }
            }

            if is_own_ancestor(&parents, &def.identity) {
                checks.push(Validation::fail(ConfigViolation::CyclicHierarchy {
                    state: describe(&def.identity),
                }));
            }
        }

        if let Some(initial) = &self.initial {
            if !declared.contains(initial) {
                checks.push(Validation::fail(ConfigViolation::UnknownInitialState {
                    state: describe(initial),
                }));
            }
        }

        Validation::all_vec(checks).map(|_| ())
    }

    /// Build the state machine, entering the initial state if one was given.
    pub fn build(self) -> Result<StateMachine<T>, BuildError> {
        if let Validation::Failure(errors) = self.validate() {
            return Err(BuildError::Invalid(errors.iter().cloned().collect()));
        }

        let Self {
            config,
            states,
            initial,
            on_transition_succeeded,
            on_transition_failed,
        } = self;

        tracing::debug!(states = states.len(), "building state machine");
        let mut machine = StateMachine::with_config(&config);
        machine.set_on_transition_succeeded(on_transition_succeeded);
        machine.set_on_transition_failed(on_transition_failed);

        for definition in parents_first(collapse(states)) {
            machine.add_state(definition)?;
        }

        if let Some(initial) = initial {
            machine.set_initial_state(&initial)?;
        }

        Ok(machine)
    }
}

impl<T: State> Default for StateMachineBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// One reference per identity: the last declaration, at the position of
/// the first.
fn latest_declarations<T: State>(states: &[StateDefinition<T>]) -> Vec<&StateDefinition<T>> {
    let mut position: HashMap<&T, usize> = HashMap::new();
    let mut latest: Vec<&StateDefinition<T>> = Vec::new();
    for def in states {
        match position.get(&def.identity) {
            Some(&index) => latest[index] = def,
            None => {
                position.insert(&def.identity, latest.len());
                latest.push(def);
            }
        }
    }
    latest
}

/// Owned counterpart of [`latest_declarations`].
fn collapse<T: State>(states: Vec<StateDefinition<T>>) -> Vec<StateDefinition<T>> {
    let mut position: HashMap<T, usize> = HashMap::new();
    let mut latest: Vec<StateDefinition<T>> = Vec::new();
    for def in states {
        match position.get(&def.identity) {
            Some(&index) => latest[index] = def,
            None => {
                position.insert(def.identity.clone(), latest.len());
                latest.push(def);
            }
        }
    }
    latest
}

fn is_own_ancestor<T: State>(parents: &HashMap<&T, Option<&T>>, identity: &T) -> bool {
    let mut cursor = parents.get(identity).copied().flatten();
    for _ in 0..parents.len() {
        match cursor {
            None => return false,
            Some(ancestor) if ancestor == identity => return true,
            Some(ancestor) => cursor = parents.get(ancestor).copied().flatten(),
        }
    }
    false
}

/// Stable sort by nesting depth so every parent is registered first.
/// Assumes the hierarchy was validated as acyclic.
fn parents_first<T: State>(states: Vec<StateDefinition<T>>) -> Vec<StateDefinition<T>> {
    let parents: HashMap<T, Option<T>> = states
        .iter()
        .map(|def| (def.identity.clone(), def.parent.clone()))
        .collect();
    let depth = |identity: &T| {
        let mut depth = 0;
        let mut cursor = parents.get(identity).cloned().flatten();
        while let Some(ancestor) = cursor {
            depth += 1;
            cursor = parents.get(&ancestor).cloned().flatten();
        }
        depth
    };

    let mut keyed: Vec<(usize, StateDefinition<T>)> = states
        .into_iter()
        .map(|def| (depth(&def.identity), def))
        .collect();
    keyed.sort_by_key(|(depth, _)| *depth);
    keyed.into_iter().map(|(_, def)| def).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::StateBuilder;
    use crate::core::{MachineError, TransitionOutcome};
    use std::sync::Mutex;

    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
    enum TestState {
        Initial,
        Open,
        OpenHalf,
        OpenCompletely,
        Close,
    }

    fn violations(result: Result<StateMachine<TestState>, BuildError>) -> Vec<ConfigViolation> {
        match result {
            Err(BuildError::Invalid(violations)) => violations,
            Err(other) => panic!("Expected violations, got {other}"),
            Ok(_) => panic!("Expected violations, got a machine"),
        }
    }

    #[test]
    fn empty_builder_builds_uninitialized_machine() {
        let machine = StateMachineBuilder::<TestState>::new().build().unwrap();

        assert!(!machine.is_initialized());
        assert!(machine.registry().is_empty());
    }

    #[test]
    fn children_may_be_declared_before_parents() {
        let machine = StateMachineBuilder::new()
            .state(StateBuilder::new(TestState::OpenHalf).parent(TestState::Open))
            .state(
                StateBuilder::new(TestState::OpenCompletely)
                    .parent(TestState::Open)
                    .from([TestState::OpenHalf]),
            )
            .state(StateBuilder::new(TestState::Open))
            .initial(TestState::OpenHalf)
            .build()
            .unwrap();

        assert_eq!(
            machine.registry().children_of(&TestState::Open),
            vec![&TestState::OpenHalf, &TestState::OpenCompletely]
        );
        assert!(machine.is_in(&TestState::Open));
        assert_eq!(machine.can_transition(&TestState::OpenCompletely), Ok(true));
    }

    #[test]
    fn validation_accumulates_all_violations() {
        let result = StateMachineBuilder::new()
            .state(StateBuilder::new(TestState::Initial))
            .state(StateBuilder::new(TestState::Initial))
            .state(StateBuilder::new(TestState::OpenHalf).parent(TestState::Open))
            .state(StateBuilder::new(TestState::Close).from([TestState::OpenCompletely]))
            .initial(TestState::Open)
            .build();

        let violations = violations(result);
        assert_eq!(violations.len(), 4);
        assert!(violations.contains(&ConfigViolation::DuplicateState {
            state: "Initial".to_string()
        }));
        assert!(violations.contains(&ConfigViolation::UnknownParent {
            state: "OpenHalf".to_string(),
            parent: "Open".to_string(),
        }));
        assert!(violations.contains(&ConfigViolation::UnknownPredecessor {
            state: "Close".to_string(),
            predecessor: "OpenCompletely".to_string(),
        }));
        assert!(violations.contains(&ConfigViolation::UnknownInitialState {
            state: "Open".to_string()
        }));
    }

    #[test]
    fn parent_cycles_are_reported() {
        let result = StateMachineBuilder::new()
            .state(StateBuilder::new(TestState::Open).parent(TestState::OpenHalf))
            .state(StateBuilder::new(TestState::OpenHalf).parent(TestState::Open))
            .state(StateBuilder::new(TestState::Close).parent(TestState::Close))
            .build();

        let violations = violations(result);
        assert_eq!(violations.len(), 3);
        assert!(violations
            .iter()
            .all(|v| matches!(v, ConfigViolation::CyclicHierarchy { .. })));
    }

    #[test]
    fn replace_policy_keeps_last_declaration() {
        let config = MachineConfig::default().duplicate_policy(DuplicatePolicy::Replace);
        let machine = StateMachineBuilder::new()
            .config(config)
            .state(StateBuilder::new(TestState::Initial))
            .state(StateBuilder::new(TestState::Open))
            .state(StateBuilder::new(TestState::Open).from([TestState::Initial]))
            .initial(TestState::Initial)
            .build()
            .unwrap();

        assert_eq!(machine.registry().len(), 2);
        assert_eq!(machine.can_transition(&TestState::Open), Ok(true));
    }

    #[test]
    fn hooks_are_installed_before_initial_state() {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        let failures = Arc::new(Mutex::new(0));
        let failed = Arc::clone(&failures);

        let mut machine = StateMachineBuilder::new()
            .states([
                StateBuilder::new(TestState::Initial),
                StateBuilder::new(TestState::Close),
            ])
            .on_transition_succeeded(move |from, to, current| {
                sink.lock().unwrap().push((from.copied(), *to, *current));
            })
            .on_transition_failed(move |_, _, _| {
                *failed.lock().unwrap() += 1;
            })
            .initial(TestState::Initial)
            .build()
            .unwrap();

        assert_eq!(
            *calls.lock().unwrap(),
            vec![(None, TestState::Initial, TestState::Initial)]
        );
        assert_eq!(
            machine.transition(&TestState::Close),
            Ok(TransitionOutcome::Rejected)
        );
        assert_eq!(*failures.lock().unwrap(), 1);
    }

    #[test]
    fn built_machine_without_initial_state_refuses_transitions() {
        let result = StateMachineBuilder::<TestState>::new()
            .state(StateBuilder::new(TestState::Initial))
            .build()
            .map(|mut machine| machine.transition(&TestState::Initial));

        assert_eq!(result.unwrap(), Err(MachineError::NotInitialized));
    }

    #[test]
    fn validate_succeeds_for_consistent_declarations() {
        let builder = StateMachineBuilder::new()
            .state(StateBuilder::new(TestState::Initial))
            .state(StateBuilder::new(TestState::Open).from([TestState::Initial]));

        assert!(builder.validate().is_success());
    }
}
