//! Detection engine configuration.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_RESTRICTED_ENVIRONMENTS;

/// Policy knobs handed to the drift detector.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Environments where rules with `allowed_in_prod = false` are enforced.
    /// Compared case-insensitively. Default: `["prod"]`.
    #[serde(default)]
    pub restricted_environments: Vec<String>,
}

impl EngineConfig {
    /// Returns the effective restricted environments, defaulting to `["prod"]`.
    pub fn effective_restricted_environments(&self) -> Vec<String> {
        if self.restricted_environments.is_empty() {
            DEFAULT_RESTRICTED_ENVIRONMENTS
                .iter()
                .map(|e| e.to_string())
                .collect()
        } else {
            self.restricted_environments.clone()
        }
    }
}
