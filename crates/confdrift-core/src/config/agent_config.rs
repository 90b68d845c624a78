//! Runtime agent configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_AGENT_ENVIRONMENT, DEFAULT_COLLECTION_INTERVAL_MS, DEFAULT_IGNORED_ENV_PREFIXES,
    DEFAULT_INITIAL_BACKOFF_MS, DEFAULT_INITIAL_DELAY_MS, DEFAULT_MAX_BACKOFF_MS,
    DEFAULT_MAX_RETRIES, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_SECRET_PATTERNS, DEFAULT_SERVER_URL,
};

/// Configuration for the config-collecting agent embedded in a service.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the confdrift server. Default: `http://localhost:8080`.
    pub server_url: Option<String>,
    /// Name the service reports under. Required to build an agent.
    pub application_name: Option<String>,
    /// Deployment environment reported with every snapshot. Default: `default`.
    pub environment: Option<String>,
    /// Milliseconds between collections. Default: 60000.
    pub collection_interval_ms: Option<u64>,
    /// Milliseconds before the first collection. Default: 10000.
    pub initial_delay_ms: Option<u64>,
    /// Master switch. Default: true.
    pub enabled: Option<bool>,
    /// Key regexes whose values are hashed before leaving the process.
    #[serde(default)]
    pub secret_patterns: Vec<String>,
    /// Environment variable prefixes that are never collected.
    #[serde(default)]
    pub ignored_prefixes: Vec<String>,
    /// Extra delivery attempts after the first failure. Default: 3.
    pub max_retries: Option<u32>,
    /// First retry delay in milliseconds, doubled per retry. Default: 1000.
    pub initial_backoff_ms: Option<u64>,
    /// Per-attempt request timeout in milliseconds. Default: 10000.
    pub request_timeout_ms: Option<u64>,
}

impl AgentConfig {
    pub fn effective_server_url(&self) -> &str {
        self.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn effective_environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_AGENT_ENVIRONMENT)
    }

    pub fn effective_collection_interval(&self) -> Duration {
        Duration::from_millis(
            self.collection_interval_ms
                .unwrap_or(DEFAULT_COLLECTION_INTERVAL_MS),
        )
    }

    pub fn effective_initial_delay(&self) -> Duration {
        Duration::from_millis(self.initial_delay_ms.unwrap_or(DEFAULT_INITIAL_DELAY_MS))
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(true)
    }

    pub fn effective_secret_patterns(&self) -> Vec<String> {
        if self.secret_patterns.is_empty() {
            DEFAULT_SECRET_PATTERNS.iter().map(|p| p.to_string()).collect()
        } else {
            self.secret_patterns.clone()
        }
    }

    pub fn effective_ignored_prefixes(&self) -> Vec<String> {
        if self.ignored_prefixes.is_empty() {
            DEFAULT_IGNORED_ENV_PREFIXES
                .iter()
                .map(|p| p.to_string())
                .collect()
        } else {
            self.ignored_prefixes.clone()
        }
    }

    pub fn effective_max_retries(&self) -> u32 {
        self.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)
    }

    pub fn effective_initial_backoff(&self) -> Duration {
        Duration::from_millis(self.initial_backoff_ms.unwrap_or(DEFAULT_INITIAL_BACKOFF_MS))
    }

    pub fn effective_max_backoff(&self) -> Duration {
        Duration::from_millis(DEFAULT_MAX_BACKOFF_MS)
    }

    pub fn effective_request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.unwrap_or(DEFAULT_REQUEST_TIMEOUT_MS))
    }
}
