//! Thread-safe handle around a [`StateMachine`].

use super::machine::StateMachine;
use crate::core::{MachineError, State, StateDefinition, StateHistory, TransitionOutcome};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, ThreadId};

/// Cloneable, lockable handle to one machine.
///
/// Every call takes an exclusive lock for its whole duration, hooks
/// included, so registration and transitions from several threads are
/// serialized. A hook that calls back into the same machine on its own
/// thread gets [`MachineError::Reentrant`] instead of a deadlock. If a
/// hook panics the machine is poisoned and every later call returns
/// [`MachineError::Poisoned`].
pub struct SharedStateMachine<T: State> {
    inner: Arc<Inner<T>>,
}

struct Inner<T: State> {
    machine: Mutex<StateMachine<T>>,
    owner: Mutex<Option<ThreadId>>,
}

impl<T: State> Clone for SharedStateMachine<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: State> Default for SharedStateMachine<T> {
    fn default() -> Self {
        Self::new(StateMachine::new())
    }
}

impl<T: State> From<StateMachine<T>> for SharedStateMachine<T> {
    fn from(machine: StateMachine<T>) -> Self {
        Self::new(machine)
    }
}

/// Clears the owner slot on drop, including while unwinding from a hook.
struct OwnerGuard<'a> {
    owner: &'a Mutex<Option<ThreadId>>,
}

impl Drop for OwnerGuard<'_> {
    fn drop(&mut self) {
        *self.owner.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl<T: State> SharedStateMachine<T> {
    pub fn new(machine: StateMachine<T>) -> Self {
        Self {
            inner: Arc::new(Inner {
                machine: Mutex::new(machine),
                owner: Mutex::new(None),
            }),
        }
    }

    /// Run `f` with exclusive access to the machine.
    pub fn with_machine<R, F>(&self, f: F) -> Result<R, MachineError>
    where
        F: FnOnce(&mut StateMachine<T>) -> Result<R, MachineError>,
    {
        let me = thread::current().id();
        if *self
            .inner
            .owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            == Some(me)
        {
            tracing::warn!("re-entrant call into state machine rejected");
            return Err(MachineError::Reentrant);
        }

        let mut machine = self
            .inner
            .machine
            .lock()
            .map_err(|_| MachineError::Poisoned)?;
        *self
            .inner
            .owner
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(me);
        let _guard = OwnerGuard {
            owner: &self.inner.owner,
        };

        f(&mut machine)
    }

    pub fn add_state(&self, definition: StateDefinition<T>) -> Result<(), MachineError> {
        self.with_machine(|machine| machine.add_state(definition))
    }

    pub fn set_initial_state(&self, identity: &T) -> Result<(), MachineError> {
        self.with_machine(|machine| machine.set_initial_state(identity))
    }

    pub fn can_transition(&self, target: &T) -> Result<bool, MachineError> {
        self.with_machine(|machine| machine.can_transition(target))
    }

    pub fn transition(&self, target: &T) -> Result<TransitionOutcome, MachineError> {
        self.with_machine(|machine| machine.transition(target))
    }

    /// A copy of the current state.
    pub fn current_state(&self) -> Result<T, MachineError> {
        self.with_machine(|machine| machine.current_state().cloned())
    }

    pub fn is_in(&self, identity: &T) -> Result<bool, MachineError> {
        self.with_machine(|machine| Ok(machine.is_in(identity)))
    }

    /// A snapshot of the history.
    pub fn history(&self) -> Result<StateHistory<T>, MachineError> {
        self.with_machine(|machine| Ok(machine.history().clone()))
    }
}
