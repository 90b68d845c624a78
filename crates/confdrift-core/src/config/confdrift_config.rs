//! Top-level confdrift configuration with layered resolution.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::{AgentConfig, EngineConfig, ServerConfig};
use crate::errors::ConfigError;

/// Project-level config file name, looked up in the project root.
pub const PROJECT_CONFIG_FILE: &str = "confdrift.toml";

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_cli_overrides`)
/// 2. Environment variables (`CONFDRIFT_*`)
/// 3. Project config (`confdrift.toml` in project root)
/// 4. User config (`~/.confdrift/config.toml`)
/// 5. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ConfdriftConfig {
    pub engine: EngineConfig,
    pub server: ServerConfig,
    pub agent: AgentConfig,
}

/// Override arguments that can be applied to a config.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub database_path: Option<String>,
    pub server_url: Option<String>,
    pub application_name: Option<String>,
    pub environment: Option<String>,
    pub restricted_environments: Option<Vec<String>>,
}

impl ConfdriftConfig {
    /// Load configuration with layered resolution from `root`.
    pub fn load(root: &Path, cli_overrides: Option<&CliOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        // Layer 4 (lowest priority): user config
        if let Some(user_config_path) = Self::user_config_path() {
            if user_config_path.exists() {
                match Self::merge_toml_file(&mut config, &user_config_path) {
                    Ok(()) => {}
                    Err(e @ ConfigError::ParseError { .. }) => return Err(e),
                    Err(e) => {
                        tracing::warn!(error = %e, "ignoring unreadable user config");
                    }
                }
            }
        }

        // Layer 3: project config
        let project_config_path = root.join(PROJECT_CONFIG_FILE);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        // Layer 2: environment variables
        Self::apply_env_overrides(&mut config);

        // Layer 1 (highest priority): explicit overrides
        if let Some(cli) = cli_overrides {
            Self::apply_cli_overrides(&mut config, cli);
        }

        Self::validate(&config)?;

        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate the configuration values.
    pub fn validate(config: &ConfdriftConfig) -> Result<(), ConfigError> {
        if config
            .engine
            .restricted_environments
            .iter()
            .any(|e| e.trim().is_empty())
        {
            return Err(ConfigError::ValidationFailed {
                field: "engine.restricted_environments".to_string(),
                message: "environment names must not be empty".to_string(),
            });
        }
        if config.agent.collection_interval_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "agent.collection_interval_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if config.agent.request_timeout_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "agent.request_timeout_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        for (field, patterns) in [
            ("server.secret_patterns", &config.server.secret_patterns),
            ("agent.secret_patterns", &config.agent.secret_patterns),
        ] {
            for pattern in patterns {
                if let Err(e) = regex::Regex::new(pattern) {
                    return Err(ConfigError::InvalidValue {
                        field: field.to_string(),
                        message: format!("{pattern:?}: {e}"),
                    });
                }
            }
        }
        Ok(())
    }

    /// Returns the user config path: `~/.confdrift/config.toml`.
    fn user_config_path() -> Option<PathBuf> {
        home_dir().map(|h| h.join(".confdrift").join("config.toml"))
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are silently ignored (forward-compatible).
    fn merge_toml_file(config: &mut ConfdriftConfig, path: &Path) -> Result<(), ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        let file_config: ConfdriftConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Merge `other` into `base`; `other` wins wherever it sets a value.
    fn merge(base: &mut ConfdriftConfig, other: &ConfdriftConfig) {
        // Engine
        if !other.engine.restricted_environments.is_empty() {
            base.engine.restricted_environments = other.engine.restricted_environments.clone();
        }

        // Server
        if other.server.database_path.is_some() {
            base.server.database_path = other.server.database_path.clone();
        }
        if !other.server.secret_patterns.is_empty() {
            base.server.secret_patterns = other.server.secret_patterns.clone();
        }

        // Agent
        let (a, o) = (&mut base.agent, &other.agent);
        if o.server_url.is_some() {
            a.server_url = o.server_url.clone();
        }
        if o.application_name.is_some() {
            a.application_name = o.application_name.clone();
        }
        if o.environment.is_some() {
            a.environment = o.environment.clone();
        }
        if o.collection_interval_ms.is_some() {
            a.collection_interval_ms = o.collection_interval_ms;
        }
        if o.initial_delay_ms.is_some() {
            a.initial_delay_ms = o.initial_delay_ms;
        }
        if o.enabled.is_some() {
            a.enabled = o.enabled;
        }
        if !o.secret_patterns.is_empty() {
            a.secret_patterns = o.secret_patterns.clone();
        }
        if !o.ignored_prefixes.is_empty() {
            a.ignored_prefixes = o.ignored_prefixes.clone();
        }
        if o.max_retries.is_some() {
            a.max_retries = o.max_retries;
        }
        if o.initial_backoff_ms.is_some() {
            a.initial_backoff_ms = o.initial_backoff_ms;
        }
        if o.request_timeout_ms.is_some() {
            a.request_timeout_ms = o.request_timeout_ms;
        }
    }

    /// Apply `CONFDRIFT_*` environment variable overrides from the process.
    fn apply_env_overrides(config: &mut ConfdriftConfig) {
        Self::apply_env_with(config, |name| std::env::var(name).ok());
    }

    /// Apply environment overrides read through `lookup`.
    /// Values that fail to parse are ignored.
    pub fn apply_env_with<F>(config: &mut ConfdriftConfig, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("CONFDRIFT_RESTRICTED_ENVIRONMENTS") {
            config.engine.restricted_environments = split_list(&val);
        }
        if let Some(val) = lookup("CONFDRIFT_DB_PATH") {
            config.server.database_path = Some(val);
        }
        if let Some(val) = lookup("CONFDRIFT_SECRET_PATTERNS") {
            config.server.secret_patterns = split_list(&val);
        }
        if let Some(val) = lookup("CONFDRIFT_SERVER_URL") {
            config.agent.server_url = Some(val);
        }
        if let Some(val) = lookup("CONFDRIFT_APPLICATION_NAME") {
            config.agent.application_name = Some(val);
        }
        if let Some(val) = lookup("CONFDRIFT_ENVIRONMENT") {
            config.agent.environment = Some(val);
        }
        if let Some(v) = lookup("CONFDRIFT_COLLECTION_INTERVAL_MS").and_then(|v| v.parse().ok()) {
            config.agent.collection_interval_ms = Some(v);
        }
        if let Some(v) = lookup("CONFDRIFT_INITIAL_DELAY_MS").and_then(|v| v.parse().ok()) {
            config.agent.initial_delay_ms = Some(v);
        }
        if let Some(v) = lookup("CONFDRIFT_AGENT_ENABLED").and_then(|v| v.parse().ok()) {
            config.agent.enabled = Some(v);
        }
    }

    /// Apply explicit overrides (highest priority).
    pub fn apply_cli_overrides(config: &mut ConfdriftConfig, cli: &CliOverrides) {
        if let Some(ref v) = cli.database_path {
            config.server.database_path = Some(v.clone());
        }
        if let Some(ref v) = cli.server_url {
            config.agent.server_url = Some(v.clone());
        }
        if let Some(ref v) = cli.application_name {
            config.agent.application_name = Some(v.clone());
        }
        if let Some(ref v) = cli.environment {
            config.agent.environment = Some(v.clone());
        }
        if let Some(ref v) = cli.restricted_environments {
            config.engine.restricted_environments = v.clone();
        }
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }
}

/// Comma-separated list, trimmed, empty items dropped.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Cross-platform home directory resolution.
fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(PathBuf::from)
}
