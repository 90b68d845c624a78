//! Queries for the `config_rules` table. Rule order is the `position`
//! column; first match wins downstream, so every read is position-ordered.

use rusqlite::{params, Connection, Row};

use confdrift_core::errors::StorageError;

use super::sql_err;

#[derive(Debug, Clone, PartialEq)]
pub struct RuleRow {
    pub id: String,
    pub position: i64,
    pub config_key: String,
    pub required: bool,
    pub allowed_in_prod: bool,
    pub min_value: Option<f64>,
    pub max_value: Option<f64>,
    pub change_policy: String,
    pub environment: String,
}

fn from_row(row: &Row<'_>) -> rusqlite::Result<RuleRow> {
    Ok(RuleRow {
        id: row.get(0)?,
        position: row.get(1)?,
        config_key: row.get(2)?,
        required: row.get::<_, i64>(3)? != 0,
        allowed_in_prod: row.get::<_, i64>(4)? != 0,
        min_value: row.get(5)?,
        max_value: row.get(6)?,
        change_policy: row.get(7)?,
        environment: row.get(8)?,
    })
}

const COLUMNS: &str = "id, position, config_key, required, allowed_in_prod, min_value, max_value, change_policy, environment";

/// All rules in precedence order.
pub fn query_rules(conn: &Connection) -> Result<Vec<RuleRow>, StorageError> {
    let mut stmt = conn
        .prepare_cached(&format!(
            "SELECT {COLUMNS} FROM config_rules ORDER BY position, rowid"
        ))
        .map_err(sql_err)?;
    let rows = stmt.query_map([], from_row).map_err(sql_err)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(sql_err)
}

/// Append a rule after every existing one. `rule.position` is ignored;
/// the assigned position is returned.
pub fn append_rule(conn: &Connection, rule: &RuleRow) -> Result<i64, StorageError> {
    let position: i64 = conn
        .query_row(
            "SELECT COALESCE(MAX(position), 0) + 1 FROM config_rules",
            [],
            |row| row.get(0),
        )
        .map_err(sql_err)?;
    conn.execute(
        "INSERT INTO config_rules (id, position, config_key, required, allowed_in_prod, min_value, max_value, change_policy, environment)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            rule.id,
            position,
            rule.config_key,
            rule.required as i64,
            rule.allowed_in_prod as i64,
            rule.min_value,
            rule.max_value,
            rule.change_policy,
            rule.environment
        ],
    )
    .map_err(sql_err)?;
    Ok(position)
}

/// Returns false when `id` is unknown.
pub fn delete_rule(conn: &Connection, id: &str) -> Result<bool, StorageError> {
    let changed = conn
        .execute("DELETE FROM config_rules WHERE id = ?1", params![id])
        .map_err(sql_err)?;
    Ok(changed > 0)
}
