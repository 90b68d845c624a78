//! Monitor service: the operations behind baseline registration, snapshot
//! ingestion, drift listing and lifecycle, the CI gate, and rule management.

use std::path::Path;

use chrono::{SecondsFormat, Utc};
use confdrift_core::config::ConfdriftConfig;
use confdrift_core::errors::{MonitorError, StorageError};
use confdrift_core::secrets::SecretHandler;
use confdrift_core::ConfigMap;
use confdrift_engine::{DetectionPolicy, DriftDetector, KeyPattern, Rule, RuleSet};
use confdrift_storage::connection::writer::with_immediate_transaction;
use confdrift_storage::queries::{applications, drifts, rules, snapshots};
use confdrift_storage::queries::applications::ApplicationRow;
use confdrift_storage::queries::drifts::{DriftFilter, DriftStatus};
use confdrift_storage::queries::snapshots::SnapshotRow;
use confdrift_storage::DatabaseManager;

use crate::api::{
    BaselineRegistered, CiCheckResult, CiDriftSummary, CiStatus, ConfigComparison, DriftQuery,
    DriftRecord, RegisterBaselineRequest, SnapshotReceived, SnapshotRequest, StoredRule,
};
use crate::baseline::parse_yaml;
use crate::records::{
    decode_map, drift_to_row, encode_map, row_to_record, row_to_rule, rule_to_row,
};

/// The drift monitor. All state lives in the database; the service itself
/// only holds the connection manager and the sanitization/detection policy.
pub struct MonitorService {
    db: DatabaseManager,
    secrets: SecretHandler,
    policy: DetectionPolicy,
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

fn require(field: &str, value: &str) -> Result<(), MonitorError> {
    if value.trim().is_empty() {
        return Err(MonitorError::invalid_request(format!("{field} is required")));
    }
    Ok(())
}

impl MonitorService {
    pub fn new(db: DatabaseManager, secrets: SecretHandler, policy: DetectionPolicy) -> Self {
        Self {
            db,
            secrets,
            policy,
        }
    }

    /// Open the configured database and build the service from `config`.
    pub fn open(config: &ConfdriftConfig) -> Result<Self, MonitorError> {
        let db = DatabaseManager::open(Path::new(config.server.effective_database_path()))?;
        let secrets = SecretHandler::new(config.server.effective_secret_patterns())?;
        let policy = DetectionPolicy::from_config(&config.engine);
        Ok(Self::new(db, secrets, policy))
    }

    /// In-memory service with default secret patterns and policy.
    pub fn in_memory() -> Result<Self, MonitorError> {
        Ok(Self::new(
            DatabaseManager::open_in_memory()?,
            SecretHandler::with_defaults(),
            DetectionPolicy::default(),
        ))
    }

    pub fn database(&self) -> &DatabaseManager {
        &self.db
    }

    /// Store the flattened YAML baseline for an application, creating the
    /// application if it is new.
    pub fn register_baseline(
        &self,
        request: &RegisterBaselineRequest,
    ) -> Result<BaselineRegistered, MonitorError> {
        require("applicationName", &request.application_name)?;
        require("environment", &request.environment)?;
        require("yamlContent", &request.yaml_content)?;

        let baseline = parse_yaml(&request.yaml_content)?;
        let encoded = encode_map(&baseline)?;
        let at = now();

        let application_id = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                match applications::find_application(
                    tx,
                    &request.application_name,
                    &request.environment,
                )? {
                    Some(app) => {
                        applications::update_baseline(tx, &app.id, &encoded, &at)?;
                        Ok(app.id)
                    }
                    None => {
                        let app = ApplicationRow {
                            id: new_id(),
                            name: request.application_name.clone(),
                            environment: request.environment.clone(),
                            baseline_config: Some(encoded.clone()),
                            created_at: at.clone(),
                            updated_at: at.clone(),
                        };
                        applications::insert_application(tx, &app)?;
                        Ok(app.id)
                    }
                }
            })
        })?;

        tracing::info!(
            application = %request.application_name,
            environment = %request.environment,
            keys = baseline.len(),
            "baseline registered"
        );
        Ok(BaselineRegistered {
            application_id,
            config_keys: baseline.len(),
        })
    }

    /// Record a runtime snapshot and the drifts it shows.
    ///
    /// A drift is only recorded when no unresolved drift exists for the same
    /// application and key.
    pub fn ingest_snapshot(
        &self,
        request: &SnapshotRequest,
    ) -> Result<SnapshotReceived, MonitorError> {
        require("applicationName", &request.application_name)?;
        require("environment", &request.environment)?;
        let config = request
            .config
            .as_ref()
            .ok_or_else(|| MonitorError::invalid_request("config is required"))?;

        let runtime: ConfigMap = config
            .iter()
            .map(|(key, value)| (key.clone(), self.secrets.sanitize_value(key, value)))
            .collect();
        let detector = DriftDetector::new(self.load_rule_set()?, self.policy.clone());
        let source_stats = request
            .source_stats
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| StorageError::Serialization {
                what: "source stats".to_string(),
                message: e.to_string(),
            })?;
        let encoded = encode_map(&runtime)?;
        let at = now();

        let received = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let app = applications::find_or_insert_application(
                    tx,
                    &ApplicationRow {
                        id: new_id(),
                        name: request.application_name.clone(),
                        environment: request.environment.clone(),
                        baseline_config: None,
                        created_at: at.clone(),
                        updated_at: at.clone(),
                    },
                )?;

                let snapshot_id = new_id();
                snapshots::insert_snapshot(
                    tx,
                    &SnapshotRow {
                        id: snapshot_id.clone(),
                        application_id: app.id.clone(),
                        timestamp: at.clone(),
                        config: encoded.clone(),
                        environment: request.environment.clone(),
                        source_stats: source_stats.clone(),
                    },
                )?;

                let declared = decode_map(app.baseline_config.as_deref())?;
                let found = detector.detect(&declared, &runtime, &app.environment);

                let mut recorded = 0;
                for drift in &found {
                    if drifts::find_unresolved(tx, &app.id, &drift.config_key)?.is_some() {
                        continue;
                    }
                    drifts::insert_drift(tx, &drift_to_row(drift, new_id(), &app.id, &at)?)?;
                    recorded += 1;
                }

                Ok(SnapshotReceived {
                    snapshot_id,
                    drifts_detected: found.len(),
                    drifts_recorded: recorded,
                })
            })
        })?;

        tracing::info!(
            application = %request.application_name,
            environment = %request.environment,
            keys = runtime.len(),
            detected = received.drifts_detected,
            recorded = received.drifts_recorded,
            "snapshot ingested"
        );
        Ok(received)
    }

    /// Recorded drifts, newest first.
    pub fn list_drifts(&self, query: &DriftQuery) -> Result<Vec<DriftRecord>, MonitorError> {
        let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
            None => None,
            Some(s) => Some(DriftStatus::parse(s).ok_or_else(|| {
                MonitorError::invalid_request(format!("unknown drift status {s:?}"))
            })?),
        };
        let filter = DriftFilter {
            application_name: query.application_name.as_deref().filter(|n| !n.is_empty()),
            status,
        };
        let rows = self.db.with_reader(|conn| drifts::query_drifts(conn, &filter))?;
        Ok(rows
            .into_iter()
            .map(row_to_record)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Acknowledge an active drift. Resolved drifts cannot be reopened;
    /// acknowledging twice keeps the first timestamp.
    pub fn acknowledge(&self, drift_id: &str) -> Result<(), MonitorError> {
        self.transition(drift_id, DriftStatus::Acknowledged)
    }

    /// Resolve a drift. Resolving twice keeps the first timestamp.
    pub fn resolve(&self, drift_id: &str) -> Result<(), MonitorError> {
        self.transition(drift_id, DriftStatus::Resolved)
    }

    fn transition(&self, drift_id: &str, target: DriftStatus) -> Result<(), MonitorError> {
        let at = now();
        let outcome = self.db.with_writer(|conn| {
            with_immediate_transaction(conn, |tx| {
                let Some(row) = drifts::get_drift(tx, drift_id)? else {
                    return Ok(Transition::NotFound);
                };
                let current =
                    DriftStatus::parse(&row.status).ok_or_else(|| StorageError::Serialization {
                        what: "drift status".to_string(),
                        message: format!("unknown status {:?}", row.status),
                    })?;
                if current == target {
                    return Ok(Transition::Unchanged);
                }
                if !current.is_unresolved() {
                    return Ok(Transition::Rejected(current));
                }
                match target {
                    DriftStatus::Acknowledged => drifts::mark_acknowledged(tx, drift_id, &at)?,
                    _ => drifts::mark_resolved(tx, drift_id, &at)?,
                };
                Ok(Transition::Applied)
            })
        })?;

        match outcome {
            Transition::NotFound => Err(drift_not_found(drift_id)),
            Transition::Rejected(current) => Err(MonitorError::invalid_request(format!(
                "drift {drift_id} is {current} and cannot become {target}"
            ))),
            Transition::Unchanged => Ok(()),
            Transition::Applied => {
                tracing::info!(drift_id, status = %target, "drift status changed");
                Ok(())
            }
        }
    }

    /// Fails while any drift is still `ACTIVE`. Acknowledged drifts do not
    /// block.
    pub fn ci_check(&self, application_name: Option<&str>) -> Result<CiCheckResult, MonitorError> {
        let application_name = application_name.filter(|n| !n.is_empty());
        let active = self
            .db
            .with_reader(|conn| drifts::query_active_drifts(conn, application_name))?;
        let summaries = active
            .into_iter()
            .map(|listed| {
                row_to_record(listed).map(|r| CiDriftSummary {
                    key: r.config_key,
                    drift_type: r.drift_type,
                    severity: r.severity,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let result = if summaries.is_empty() {
            CiCheckResult {
                status: CiStatus::Pass,
                message: "No unresolved configuration drifts".to_string(),
                drift_count: 0,
                drifts: Vec::new(),
            }
        } else {
            CiCheckResult {
                status: CiStatus::Fail,
                message: "Unresolved configuration drifts detected".to_string(),
                drift_count: summaries.len(),
                drifts: summaries,
            }
        };
        tracing::info!(
            application = application_name.unwrap_or("*"),
            passed = result.passed(),
            drifts = result.drift_count,
            "ci check"
        );
        Ok(result)
    }

    /// Baseline next to the latest runtime snapshot.
    pub fn config_comparison(
        &self,
        application_name: &str,
    ) -> Result<ConfigComparison, MonitorError> {
        let (app, latest) = self.db.with_reader(|conn| {
            let Some(app) = applications::find_application_by_name(conn, application_name)? else {
                return Ok((None, None));
            };
            let latest = snapshots::latest_snapshot(conn, &app.id)?;
            Ok((Some(app), latest))
        })?;
        let app = app.ok_or_else(|| MonitorError::NotFound {
            entity: "Application",
            id: application_name.to_string(),
        })?;

        Ok(ConfigComparison {
            baseline_config: decode_map(app.baseline_config.as_deref())?,
            runtime_config: decode_map(latest.as_ref().map(|s| s.config.as_str()))?,
            snapshot_timestamp: latest.map(|s| s.timestamp),
            application_name: app.name,
            environment: app.environment,
        })
    }

    /// All rules in precedence order.
    pub fn list_rules(&self) -> Result<Vec<StoredRule>, MonitorError> {
        let rows = self.db.with_reader(rules::query_rules)?;
        Ok(rows
            .into_iter()
            .map(row_to_rule)
            .collect::<Result<Vec<_>, _>>()?)
    }

    /// Append a rule at the lowest precedence. The key pattern must compile.
    pub fn add_rule(&self, rule: Rule) -> Result<StoredRule, MonitorError> {
        require("key", &rule.key)?;
        require("environment", &rule.environment)?;
        KeyPattern::compile(&rule.key)?;

        let id = new_id();
        let row = rule_to_row(&rule, id.clone());
        let position = self
            .db
            .with_writer(|conn| with_immediate_transaction(conn, |tx| rules::append_rule(tx, &row)))?;
        tracing::info!(rule_id = %id, key = %rule.key, position, "rule added");
        Ok(StoredRule { id, position, rule })
    }

    pub fn delete_rule(&self, rule_id: &str) -> Result<(), MonitorError> {
        let found = self
            .db
            .with_writer(|conn| rules::delete_rule(conn, rule_id))?;
        if !found {
            return Err(MonitorError::NotFound {
                entity: "Rule",
                id: rule_id.to_string(),
            });
        }
        tracing::info!(rule_id, "rule deleted");
        Ok(())
    }

    fn load_rule_set(&self) -> Result<RuleSet, MonitorError> {
        let stored = self.list_rules()?;
        Ok(RuleSet::compile(stored.into_iter().map(|s| s.rule))?)
    }
}

enum Transition {
    NotFound,
    Unchanged,
    Rejected(DriftStatus),
    Applied,
}

fn drift_not_found(id: &str) -> MonitorError {
    MonitorError::NotFound {
        entity: "Drift",
        id: id.to_string(),
    }
}
