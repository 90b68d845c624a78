//! Service-level errors and their client/server classification.

use super::error_code::{self, ErrorCode};
use super::{BaselineError, ConfigError, DetectionError, StorageError};

/// Errors returned by the monitor service operations.
/// Aggregates subsystem errors via `From` conversions.
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Baseline error: {0}")]
    Baseline(#[from] BaselineError),

    #[error("Rule error: {0}")]
    Detection(#[from] DetectionError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl MonitorError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest {
            message: message.into(),
        }
    }

    /// True when the caller sent something unusable; false when the failure
    /// is on the serving side (storage, configuration).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidRequest { .. }
                | Self::NotFound { .. }
                | Self::Baseline(_)
                | Self::Detection(_)
        )
    }
}

impl ErrorCode for MonitorError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidRequest { .. } => error_code::INVALID_REQUEST,
            Self::NotFound { .. } => error_code::NOT_FOUND,
            Self::Baseline(e) => e.error_code(),
            Self::Detection(e) => e.error_code(),
            Self::Storage(e) => e.error_code(),
            Self::Config(e) => e.error_code(),
        }
    }
}
