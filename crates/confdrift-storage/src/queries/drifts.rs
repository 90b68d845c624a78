//! Queries for the `config_drifts` table.

use std::fmt;

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use confdrift_core::errors::StorageError;

use super::sql_err;

/// Lifecycle of a recorded drift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriftStatus {
    Active,
    Acknowledged,
    Resolved,
}

impl DriftStatus {
    pub const ALL: [Self; 3] = [Self::Active, Self::Acknowledged, Self::Resolved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Resolved => "RESOLVED",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Some(Self::Active),
            "ACKNOWLEDGED" => Some(Self::Acknowledged),
            "RESOLVED" => Some(Self::Resolved),
            _ => None,
        }
    }

    /// Active and acknowledged drifts still need attention.
    pub fn is_unresolved(&self) -> bool {
        !matches!(self, Self::Resolved)
    }

    pub fn unresolved() -> impl Iterator<Item = Self> {
        Self::ALL.into_iter().filter(Self::is_unresolved)
    }
}

impl fmt::Display for DriftStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DriftRow {
    pub id: String,
    pub application_id: String,
    pub config_key: String,
    /// JSON-encoded values.
    pub expected_value: Option<String>,
    pub actual_value: Option<String>,
    pub drift_type: String,
    pub severity: String,
    pub rule_key: Option<String>,
    pub first_detected_at: String,
    pub status: String,
    pub acknowledged_at: Option<String>,
    pub resolved_at: Option<String>,
    pub description: Option<String>,
}

/// A drift joined with the name of its application.
#[derive(Debug, Clone, PartialEq)]
pub struct DriftListRow {
    pub application_name: String,
    pub drift: DriftRow,
}

/// Optional filters for [`query_drifts`].
#[derive(Debug, Clone, Default)]
pub struct DriftFilter<'a> {
    pub application_name: Option<&'a str>,
    pub status: Option<DriftStatus>,
}

const COLUMNS: &str = "d.id, d.application_id, d.config_key, d.expected_value, d.actual_value, \
     d.drift_type, d.severity, d.rule_key, d.first_detected_at, d.status, d.acknowledged_at, \
     d.resolved_at, d.description";

fn from_row(row: &Row<'_>) -> rusqlite::Result<DriftRow> {
    Ok(DriftRow {
        id: row.get(0)?,
        application_id: row.get(1)?,
        config_key: row.get(2)?,
        expected_value: row.get(3)?,
        actual_value: row.get(4)?,
        drift_type: row.get(5)?,
        severity: row.get(6)?,
        rule_key: row.get(7)?,
        first_detected_at: row.get(8)?,
        status: row.get(9)?,
        acknowledged_at: row.get(10)?,
        resolved_at: row.get(11)?,
        description: row.get(12)?,
    })
}

pub fn insert_drift(conn: &Connection, d: &DriftRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO config_drifts (id, application_id, config_key, expected_value, actual_value, drift_type, severity, rule_key, first_detected_at, status, acknowledged_at, resolved_at, description)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
        params![
            d.id,
            d.application_id,
            d.config_key,
            d.expected_value,
            d.actual_value,
            d.drift_type,
            d.severity,
            d.rule_key,
            d.first_detected_at,
            d.status,
            d.acknowledged_at,
            d.resolved_at,
            d.description
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Id of an unresolved drift already recorded for this application and key.
pub fn find_unresolved(
    conn: &Connection,
    application_id: &str,
    config_key: &str,
) -> Result<Option<String>, StorageError> {
    let statuses: Vec<&str> = DriftStatus::unresolved().map(|s| s.as_str()).collect();
    let placeholders = (3..3 + statuses.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT id FROM config_drifts
             WHERE application_id = ?1 AND config_key = ?2 AND status IN ({placeholders})
             LIMIT 1"
        ))
        .map_err(sql_err)?;
    let bound = [application_id, config_key].into_iter().chain(statuses);
    stmt.query_row(params_from_iter(bound), |row| row.get(0))
        .optional()
        .map_err(sql_err)
}

pub fn get_drift(conn: &Connection, id: &str) -> Result<Option<DriftRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!("SELECT {COLUMNS} FROM config_drifts d WHERE d.id = ?1"))
        .map_err(sql_err)?;
    stmt.query_row(params![id], from_row)
        .optional()
        .map_err(sql_err)
}

/// Mark a drift acknowledged. Returns false when `id` is unknown.
pub fn mark_acknowledged(conn: &Connection, id: &str, at: &str) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "UPDATE config_drifts SET status = 'ACKNOWLEDGED', acknowledged_at = ?1 WHERE id = ?2",
            params![at, id],
        )
        .map_err(sql_err)?;
    Ok(changed > 0)
}

/// Mark a drift resolved. Returns false when `id` is unknown.
pub fn mark_resolved(conn: &Connection, id: &str, at: &str) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "UPDATE config_drifts SET status = 'RESOLVED', resolved_at = ?1 WHERE id = ?2",
            params![at, id],
        )
        .map_err(sql_err)?;
    Ok(changed > 0)
}

/// Drifts matching `filter`, newest first.
pub fn query_drifts(
    conn: &Connection,
    filter: &DriftFilter<'_>,
) -> Result<Vec<DriftListRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS}, a.name FROM config_drifts d
             JOIN applications a ON d.application_id = a.id
             WHERE (?1 IS NULL OR a.name = ?1) AND (?2 IS NULL OR d.status = ?2)
             ORDER BY d.first_detected_at DESC, d.rowid DESC"
        ))
        .map_err(sql_err)?;
    let rows = stmt
        .query_map(
            params![filter.application_name, filter.status.map(|s| s.as_str())],
            |row| {
                Ok(DriftListRow {
                    drift: from_row(row)?,
                    application_name: row.get(13)?,
                })
            },
        )
        .map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Active drifts, optionally for one application name.
pub fn query_active_drifts(
    conn: &Connection,
    application_name: Option<&str>,
) -> Result<Vec<DriftListRow>, StorageError> {
    query_drifts(
        conn,
        &DriftFilter {
            application_name,
            status: Some(DriftStatus::Active),
        },
    )
}
