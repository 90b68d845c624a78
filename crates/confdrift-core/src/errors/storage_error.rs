//! Storage errors.

use super::error_code::{self, ErrorCode};

/// Errors from the SQLite persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {message}")]
    SqliteError { message: String },

    #[error("Database is busy")]
    DbBusy,

    #[error("Migration to v{version} failed: {message}")]
    MigrationFailed { version: u32, message: String },

    #[error("Failed to (de)serialize stored {what}: {message}")]
    Serialization { what: String, message: String },
}

impl StorageError {
    /// Map a rusqlite-style error message, recognizing lock contention.
    pub fn sqlite(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.contains("database is locked") {
            Self::DbBusy
        } else {
            Self::SqliteError { message }
        }
    }
}

impl ErrorCode for StorageError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::DbBusy => error_code::DB_BUSY,
            Self::MigrationFailed { .. } => error_code::MIGRATION_FAILED,
            Self::SqliteError { .. } | Self::Serialization { .. } => error_code::STORAGE_ERROR,
        }
    }
}
