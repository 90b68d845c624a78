//! Detection errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while preparing a rule set for detection.
///
/// Detection itself never fails; a rule whose key pattern cannot be compiled
/// is rejected when the rule set is built.
#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("Invalid rule pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },
}

impl ErrorCode for DetectionError {
    fn error_code(&self) -> &'static str {
        error_code::INVALID_RULE_PATTERN
    }
}
