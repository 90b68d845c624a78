//! Server-side configuration: storage location and secret patterns.

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_DATABASE_PATH, DEFAULT_SECRET_PATTERNS};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// SQLite database file. Default: `./data/confdrift.db`.
    pub database_path: Option<String>,
    /// Key regexes whose values are hashed before storage.
    #[serde(default)]
    pub secret_patterns: Vec<String>,
}

impl ServerConfig {
    pub fn effective_database_path(&self) -> &str {
        self.database_path.as_deref().unwrap_or(DEFAULT_DATABASE_PATH)
    }

    pub fn effective_secret_patterns(&self) -> Vec<String> {
        if self.secret_patterns.is_empty() {
            DEFAULT_SECRET_PATTERNS.iter().map(|p| p.to_string()).collect()
        } else {
            self.secret_patterns.clone()
        }
    }
}
