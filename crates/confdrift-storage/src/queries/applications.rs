//! Queries for the `applications` table.

use rusqlite::{params, Connection, OptionalExtension, Row};

use confdrift_core::errors::StorageError;

use super::sql_err;

#[derive(Debug, Clone, PartialEq)]
pub struct ApplicationRow {
    pub id: String,
    pub name: String,
    pub environment: String,
    /// Flattened baseline as a JSON object; `None` until one is registered.
    pub baseline_config: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

const COLUMNS: &str = "id, name, environment, baseline_config, created_at, updated_at";

fn from_row(row: &Row<'_>) -> rusqlite::Result<ApplicationRow> {
    Ok(ApplicationRow {
        id: row.get(0)?,
        name: row.get(1)?,
        environment: row.get(2)?,
        baseline_config: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}

pub fn insert_application(conn: &Connection, app: &ApplicationRow) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO applications (id, name, environment, baseline_config, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            app.id,
            app.name,
            app.environment,
            app.baseline_config,
            app.created_at,
            app.updated_at
        ],
    )
    .map_err(sql_err)?;
    Ok(())
}

/// Look up the application registered under `name` for `environment`.
pub fn find_application(
    conn: &Connection,
    name: &str,
    environment: &str,
) -> Result<Option<ApplicationRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM applications WHERE name = ?1 AND environment = ?2"
        ))
        .map_err(sql_err)?;
    stmt.query_row(params![name, environment], from_row)
        .optional()
        .map_err(sql_err)
}

/// Existing application for `candidate`'s name and environment, or
/// `candidate` itself after inserting it.
pub fn find_or_insert_application(
    conn: &Connection,
    candidate: &ApplicationRow,
) -> Result<ApplicationRow, StorageError> {
    if let Some(existing) = find_application(conn, &candidate.name, &candidate.environment)? {
        return Ok(existing);
    }
    insert_application(conn, candidate)?;
    tracing::debug!(
        application = %candidate.name,
        environment = %candidate.environment,
        "application created"
    );
    Ok(candidate.clone())
}

/// Most recently updated application with this name, any environment.
pub fn find_application_by_name(
    conn: &Connection,
    name: &str,
) -> Result<Option<ApplicationRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM applications WHERE name = ?1
             ORDER BY updated_at DESC, rowid DESC LIMIT 1"
        ))
        .map_err(sql_err)?;
    stmt.query_row(params![name], from_row)
        .optional()
        .map_err(sql_err)
}

/// Replace the stored baseline. Returns false when `id` is unknown.
pub fn update_baseline(
    conn: &Connection,
    id: &str,
    baseline_config: &str,
    updated_at: &str,
) -> Result<bool, StorageError> {
    let changed = conn
        .execute(
            "UPDATE applications SET baseline_config = ?1, updated_at = ?2 WHERE id = ?3",
            params![baseline_config, updated_at, id],
        )
        .map_err(sql_err)?;
    Ok(changed > 0)
}
