//! Queries for the `config_snapshots` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use confdrift_core::errors::StorageError;

use super::sql_err;

#[derive(Debug, Clone, PartialEq)]
pub struct SnapshotRow {
    pub id: String,
    pub application_id: String,
    pub timestamp: String,
    /// Sanitized runtime configuration as a JSON object.
    pub config: String,
    pub environment: String,
    /// Per-source key counts reported by the agent, as JSON.
    pub source_stats: Option<String>,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<SnapshotRow> {
    Ok(SnapshotRow {
        id: row.get(0)?,
        application_id: row.get(1)?,
        timestamp: row.get(2)?,
        config: row.get(3)?,
        environment: row.get(4)?,
        source_stats: row.get(5)?,
    })
}

pub fn insert_snapshot(conn: &Connection, s: &SnapshotRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO config_snapshots (id, application_id, timestamp, config, environment, source_stats)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            s.id,
            s.application_id,
            s.timestamp,
            s.config,
            s.environment,
            s.source_stats
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Newest snapshot for an application, if any.
pub fn latest_snapshot(
    conn: &Connection,
    application_id: &str,
) -> Result<Option<SnapshotRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(
            "SELECT id, application_id, timestamp, config, environment, source_stats
             FROM config_snapshots WHERE application_id = ?1
             ORDER BY timestamp DESC, rowid DESC LIMIT 1",
        )
        .map_err(sql_err)?;
    stmt.query_row(params![application_id], from_row)
        .optional()
        .map_err(sql_err)
}
