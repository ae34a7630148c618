//! Machine configuration.

use crate::core::DuplicatePolicy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// History entries kept when no limit is configured explicitly.
pub const DEFAULT_HISTORY_LIMIT: usize = 256;

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid machine configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for a [`StateMachine`](crate::machine::StateMachine).
///
/// Missing fields fall back to their defaults, so `{}` is a valid
/// configuration. A `null` history limit keeps every entry.
///
/// # Example
///
/// ```rust
/// use nested_fsm::config::MachineConfig;
/// use nested_fsm::core::DuplicatePolicy;
///
/// let config = MachineConfig::from_json(r#"{ "duplicate_policy": "replace" }"#).unwrap();
/// assert_eq!(config.duplicate_policy, DuplicatePolicy::Replace);
/// assert_eq!(config.history_limit, Some(256));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Handling of a state registered twice
    pub duplicate_policy: DuplicatePolicy,
    /// Maximum history entries retained, `None` for unbounded
    pub history_limit: Option<usize>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}

impl MachineConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    pub fn history_limit(mut self, limit: Option<usize>) -> Self {
        self.history_limit = limit;
        self
    }
}
