//! Baseline document errors.

use super::error_code::{self, ErrorCode};

/// Errors raised while turning a declared configuration document into a flat map.
#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("Failed to parse YAML: {message}")]
    Parse { message: String },

    #[error("Baseline document root must be a mapping, found {found}")]
    InvalidRoot { found: String },
}

impl ErrorCode for BaselineError {
    fn error_code(&self) -> &'static str {
        error_code::BASELINE_PARSE_ERROR
    }
}
