//! ErrorCode trait for stable, machine-readable error codes.

/// Every error enum implements this to expose a structured code string that
/// callers (API layers, CI scripts) can match on without parsing messages.
pub trait ErrorCode {
    /// Returns the error code string (e.g., "STORAGE_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns the formatted error string: `[ERROR_CODE] message`.
    fn coded_string(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const INVALID_RULE_PATTERN: &str = "INVALID_RULE_PATTERN";
pub const STORAGE_ERROR: &str = "STORAGE_ERROR";
pub const DB_BUSY: &str = "DB_BUSY";
pub const MIGRATION_FAILED: &str = "MIGRATION_FAILED";
pub const BASELINE_PARSE_ERROR: &str = "BASELINE_PARSE_ERROR";
pub const TRANSPORT_ERROR: &str = "TRANSPORT_ERROR";
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const NOT_FOUND: &str = "NOT_FOUND";
