//! Query modules, one per table.

pub mod applications;
pub mod drifts;
pub mod rules;
pub mod snapshots;

use confdrift_core::errors::StorageError;

pub(crate) fn sql_err(e: rusqlite::Error) -> StorageError {
    StorageError::sqlite(e.to_string())
}
