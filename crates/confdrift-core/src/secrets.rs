//! Secret detection and one-way hashing of configuration values.
//!
//! Hashes are only meant for change detection: two snapshots of the same
//! secret compare equal without the secret ever leaving the process.

use regex::{Regex, RegexBuilder};
use sha2::{Digest, Sha256};

use crate::constants::{DEFAULT_SECRET_PATTERNS, SECRET_HASH_LENGTH, SECRET_HASH_PREFIX};
use crate::errors::ConfigError;
use crate::types::ConfigValue;

/// Outcome of sanitizing one value.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedValue {
    /// Value that may be transmitted or stored.
    pub safe_value: ConfigValue,
    pub is_secret: bool,
}

/// Classifies keys as secret and replaces their values with digests.
#[derive(Debug, Clone)]
pub struct SecretHandler {
    patterns: Vec<Regex>,
}

impl SecretHandler {
    /// Compile the given key patterns (case-insensitive).
    pub fn new<I, S>(patterns: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns = patterns
            .into_iter()
            .map(|p| {
                compile(p.as_ref()).map_err(|e| ConfigError::InvalidValue {
                    field: "secret_patterns".to_string(),
                    message: format!("{:?}: {e}", p.as_ref()),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { patterns })
    }

    /// Handler using the built-in pattern list.
    pub fn with_defaults() -> Self {
        Self {
            patterns: DEFAULT_SECRET_PATTERNS
                .iter()
                .filter_map(|p| compile(p).ok())
                .collect(),
        }
    }

    /// Whether the key names a secret.
    pub fn is_secret(&self, config_key: &str) -> bool {
        if config_key.is_empty() {
            return false;
        }
        let lower = config_key.to_lowercase();
        self.patterns.iter().any(|p| p.is_match(&lower))
    }

    /// First 16 hex characters of the SHA-256 digest of `value`.
    /// Empty input has nothing to hash.
    pub fn hash_secret(value: &str) -> Option<String> {
        if value.is_empty() {
            return None;
        }
        let digest = Sha256::digest(value.as_bytes());
        let mut hex = hex::encode(digest);
        hex.truncate(SECRET_HASH_LENGTH);
        Some(hex)
    }

    /// Hash the value if the key is secret, otherwise pass it through.
    pub fn process_value(&self, config_key: &str, value: &ConfigValue) -> ProcessedValue {
        if value.is_null() {
            return ProcessedValue {
                safe_value: ConfigValue::Null,
                is_secret: false,
            };
        }
        if !self.is_secret(config_key) {
            return ProcessedValue {
                safe_value: value.clone(),
                is_secret: false,
            };
        }
        let safe_value = Self::hash_secret(&value.to_string())
            .map(|h| ConfigValue::String(format!("{SECRET_HASH_PREFIX}{h}")))
            .unwrap_or(ConfigValue::Null);
        ProcessedValue {
            safe_value,
            is_secret: true,
        }
    }

    /// Server-side sanitization of an incoming value. Values the agent
    /// already hashed are kept so their digests stay comparable.
    pub fn sanitize_value(&self, config_key: &str, value: &ConfigValue) -> ConfigValue {
        if is_hashed(value) {
            return value.clone();
        }
        self.process_value(config_key, value).safe_value
    }
}

impl Default for SecretHandler {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Whether the value has exactly the shape [`SecretHandler`] produces:
/// the prefix followed by `SECRET_HASH_LENGTH` lowercase hex digits.
pub fn is_hashed(value: &ConfigValue) -> bool {
    value
        .as_str()
        .and_then(|s| s.strip_prefix(SECRET_HASH_PREFIX))
        .is_some_and(|digest| {
            digest.len() == SECRET_HASH_LENGTH
                && digest.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
        })
}

fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}
