//! Detection policy: environment-level knobs applied on top of the rules.

use confdrift_core::config::EngineConfig;
use confdrift_core::constants::DEFAULT_RESTRICTED_ENVIRONMENTS;

/// Which environments enforce `allowed_in_prod = false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectionPolicy {
    restricted_environments: Vec<String>,
}

impl DetectionPolicy {
    /// Names are compared case-insensitively.
    pub fn new<I, S>(restricted_environments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            restricted_environments: restricted_environments
                .into_iter()
                .map(|e| e.as_ref().to_lowercase())
                .collect(),
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.effective_restricted_environments())
    }

    pub fn is_restricted(&self, environment: &str) -> bool {
        let env = environment.to_lowercase();
        self.restricted_environments.iter().any(|r| *r == env)
    }

    pub fn restricted_environments(&self) -> &[String] {
        &self.restricted_environments
    }
}

impl Default for DetectionPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_RESTRICTED_ENVIRONMENTS)
    }
}
