//! v001: applications, snapshots, drifts, rules.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS applications (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    environment TEXT NOT NULL,
    baseline_config TEXT,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    UNIQUE (name, environment)
) STRICT;

CREATE TABLE IF NOT EXISTS config_snapshots (
    id TEXT PRIMARY KEY,
    application_id TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    timestamp TEXT NOT NULL,
    config TEXT NOT NULL,
    environment TEXT NOT NULL,
    source_stats TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_snapshots_app ON config_snapshots(application_id, timestamp);

CREATE TABLE IF NOT EXISTS config_drifts (
    id TEXT PRIMARY KEY,
    application_id TEXT NOT NULL REFERENCES applications(id) ON DELETE CASCADE,
    config_key TEXT NOT NULL,
    expected_value TEXT,
    actual_value TEXT,
    drift_type TEXT NOT NULL,
    severity TEXT NOT NULL,
    rule_key TEXT,
    first_detected_at TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'ACTIVE',
    acknowledged_at TEXT,
    resolved_at TEXT,
    description TEXT
) STRICT;

CREATE INDEX IF NOT EXISTS idx_drifts_app_key ON config_drifts(application_id, config_key);
CREATE INDEX IF NOT EXISTS idx_drifts_status ON config_drifts(status);
CREATE INDEX IF NOT EXISTS idx_drifts_detected ON config_drifts(first_detected_at);

CREATE TABLE IF NOT EXISTS config_rules (
    id TEXT PRIMARY KEY,
    position INTEGER NOT NULL,
    config_key TEXT NOT NULL,
    required INTEGER NOT NULL DEFAULT 0,
    allowed_in_prod INTEGER NOT NULL DEFAULT 1,
    min_value REAL,
    max_value REAL,
    change_policy TEXT NOT NULL DEFAULT 'RUNTIME_ALLOWED',
    environment TEXT NOT NULL DEFAULT '*'
) STRICT;

CREATE INDEX IF NOT EXISTS idx_rules_position ON config_rules(position);
"#;
