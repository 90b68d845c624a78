//! Runtime configuration collection.

use std::collections::BTreeMap;
use std::fmt;

use confdrift_core::config::AgentConfig;
use confdrift_core::errors::ConfigError;
use confdrift_core::secrets::SecretHandler;
use confdrift_core::{ConfigMap, ConfigValue};

/// Source label for process environment variables.
pub const ENVIRONMENT_VARIABLE: &str = "ENVIRONMENT_VARIABLE";
/// Default source label for [`ConfigCollector::collect_from_source`].
pub const CONFIG_FILE: &str = "CONFIG_FILE";

/// One collected key with its raw and transmittable values.
#[derive(Clone, PartialEq)]
pub struct ConfigEntry {
    pub key: String,
    /// Raw value, for local use only.
    pub value: ConfigValue,
    /// Value safe to transmit: hashed when the key is a secret.
    pub safe_value: ConfigValue,
    pub source: String,
    pub is_secret: bool,
}

impl fmt::Debug for ConfigEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value: &dyn fmt::Debug = if self.is_secret {
            &"<redacted>"
        } else {
            &self.value
        };
        f.debug_struct("ConfigEntry")
            .field("key", &self.key)
            .field("value", value)
            .field("safe_value", &self.safe_value)
            .field("source", &self.source)
            .field("is_secret", &self.is_secret)
            .finish()
    }
}

/// Collected entries keyed by configuration key.
pub type ConfigEntries = BTreeMap<String, ConfigEntry>;

/// Reads configuration from the process and from caller-supplied sources.
#[derive(Debug, Clone)]
pub struct ConfigCollector {
    secrets: SecretHandler,
    ignored_prefixes: Vec<String>,
}

impl ConfigCollector {
    pub fn new(secrets: SecretHandler, ignored_prefixes: Vec<String>) -> Self {
        Self {
            secrets,
            ignored_prefixes,
        }
    }

    pub fn from_config(config: &AgentConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            SecretHandler::new(config.effective_secret_patterns())?,
            config.effective_ignored_prefixes(),
        ))
    }

    /// Environment variables of this process, minus ignored prefixes and
    /// variables that are not valid UTF-8.
    pub fn collect_runtime_config(&self) -> ConfigEntries {
        self.collect_from_vars(
            std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?))),
        )
    }

    /// Collect from an explicit variable list, as if it were the environment.
    pub fn collect_from_vars<I>(&self, vars: I) -> ConfigEntries
    where
        I: IntoIterator<Item = (String, String)>,
    {
        vars.into_iter()
            .filter(|(key, _)| !self.is_ignored(key))
            .map(|(key, value)| {
                let entry = self.entry(&key, ConfigValue::String(value), ENVIRONMENT_VARIABLE);
                (key, entry)
            })
            .collect()
    }

    /// Collect from an already-flattened map, e.g. a loaded config file.
    pub fn collect_from_source(&self, map: &ConfigMap, source_name: &str) -> ConfigEntries {
        map.iter()
            .map(|(key, value)| (key.clone(), self.entry(key, value.clone(), source_name)))
            .collect()
    }

    fn entry(&self, key: &str, value: ConfigValue, source: &str) -> ConfigEntry {
        let processed = self.secrets.process_value(key, &value);
        ConfigEntry {
            key: key.to_string(),
            value,
            safe_value: processed.safe_value,
            source: source.to_string(),
            is_secret: processed.is_secret,
        }
    }

    fn is_ignored(&self, key: &str) -> bool {
        self.ignored_prefixes.iter().any(|p| key.starts_with(p.as_str()))
    }
}

/// Merge sources in order; a later source wins for a key present in several.
pub fn merge_sources<I>(sources: I) -> ConfigEntries
where
    I: IntoIterator<Item = ConfigEntries>,
{
    sources.into_iter().flatten().collect()
}

/// Key → safe value, ready for transmission.
pub fn to_simple_map(entries: &ConfigEntries) -> ConfigMap {
    entries
        .values()
        .map(|e| (e.key.clone(), e.safe_value.clone()))
        .collect()
}

/// Number of entries per source label.
pub fn source_stats(entries: &ConfigEntries) -> BTreeMap<String, u64> {
    entries.values().fold(BTreeMap::new(), |mut stats, e| {
        *stats.entry(e.source.clone()).or_insert(0) += 1;
        stats
    })
}
