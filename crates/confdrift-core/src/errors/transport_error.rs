//! Snapshot delivery errors.

use super::error_code::{self, ErrorCode};

/// Errors from delivering a snapshot to the server.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("Network error: {reason}")]
    Network { reason: String },

    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Payload serialization failed: {message}")]
    Serialization { message: String },

    #[error("All {attempts} delivery attempts failed: {last_error}")]
    RetriesExhausted { attempts: u32, last_error: String },
}

impl TransportError {
    /// Client errors and bad payloads will fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network { .. } => true,
            Self::Http { status, .. } => !(400..500).contains(status),
            Self::Serialization { .. } | Self::RetriesExhausted { .. } => false,
        }
    }
}

impl ErrorCode for TransportError {
    fn error_code(&self) -> &'static str {
        error_code::TRANSPORT_ERROR
    }
}
