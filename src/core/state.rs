//! State identity trait.
//!
//! Any value that can be compared, hashed and cloned can name a state.
//! Enums are the usual choice, but strings or integers work as well.

use std::fmt::Debug;
use std::hash::Hash;

/// Trait for state identities.
///
/// Identities are keys: the machine never inspects them beyond equality
/// and hashing. `Debug` is used for logging and error messages.
///
/// The trait is implemented automatically for every type satisfying the
/// bounds, so there is nothing to implement by hand.
///
/// # Example
///
/// ```rust
/// use nested_fsm::core::State;
///
/// #[derive(Clone, PartialEq, Eq, Hash, Debug)]
/// enum Door {
///     Open,
///     Closed,
/// }
///
/// fn assert_state<T: State>() {}
/// assert_state::<Door>();
/// assert_state::<&'static str>();
/// assert_state::<u32>();
/// ```
pub trait State: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> State for T where T: Clone + Eq + Hash + Debug + Send + Sync + 'static {}

/// Render a state identity for logs and error payloads.
pub(crate) fn describe<T: State>(state: &T) -> String {
    format!("{state:?}")
}
