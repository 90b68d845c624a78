//! Query tests for applications, snapshots, drifts, and rules.

use confdrift_storage::queries::applications::{
    find_application, find_application_by_name, insert_application, update_baseline,
    ApplicationRow,
};
use confdrift_storage::queries::drifts::{
    find_unresolved, get_drift, insert_drift, mark_acknowledged, mark_resolved,
    query_active_drifts, query_drifts, DriftFilter, DriftRow, DriftStatus,
};
use confdrift_storage::queries::rules::{append_rule, delete_rule, query_rules, RuleRow};
use confdrift_storage::queries::snapshots::{insert_snapshot, latest_snapshot, SnapshotRow};
use confdrift_storage::DatabaseManager;

fn app(id: &str, name: &str, env: &str, at: &str) -> ApplicationRow {
    ApplicationRow {
        id: id.into(),
        name: name.into(),
        environment: env.into(),
        baseline_config: None,
        created_at: at.into(),
        updated_at: at.into(),
    }
}

fn drift(id: &str, app_id: &str, key: &str, at: &str) -> DriftRow {
    DriftRow {
        id: id.into(),
        application_id: app_id.into(),
        config_key: key.into(),
        expected_value: Some("\"(required)\"".into()),
        actual_value: None,
        drift_type: "MISSING".into(),
        severity: "HIGH".into(),
        rule_key: Some(key.into()),
        first_detected_at: at.into(),
        status: DriftStatus::Active.as_str().into(),
        acknowledged_at: None,
        resolved_at: None,
        description: Some("missing".into()),
    }
}

fn seeded() -> DatabaseManager {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_writer(|conn| {
        insert_application(conn, &app("a1", "payments", "prod", "2026-01-01T00:00:00.000Z"))?;
        insert_application(conn, &app("a2", "orders", "prod", "2026-01-01T00:00:00.000Z"))?;
        Ok(())
    })
    .unwrap();
    db
}

// ---- Applications ----

#[test]
fn test_application_unique_per_environment() {
    let db = seeded();
    db.with_writer(|conn| {
        insert_application(conn, &app("a3", "payments", "staging", "2026-01-02T00:00:00.000Z"))?;
        let dup = insert_application(conn, &app("a4", "payments", "prod", "2026-01-02T00:00:00.000Z"));
        assert!(dup.is_err());
        Ok(())
    })
    .unwrap();

    db.with_reader(|conn| {
        assert_eq!(find_application(conn, "payments", "staging")?.unwrap().id, "a3");
        assert_eq!(find_application(conn, "payments", "prod")?.unwrap().id, "a1");
        assert!(find_application(conn, "payments", "dev")?.is_none());
        assert_eq!(find_application_by_name(conn, "payments")?.unwrap().id, "a3");
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_update_baseline() {
    let db = seeded();
    db.with_writer(|conn| {
        assert!(update_baseline(conn, "a1", r#"{"server.port":8080}"#, "2026-02-01T00:00:00.000Z")?);
        assert!(!update_baseline(conn, "nope", "{}", "2026-02-01T00:00:00.000Z")?);
        let a = find_application(conn, "payments", "prod")?.unwrap();
        assert_eq!(a.baseline_config.as_deref(), Some(r#"{"server.port":8080}"#));
        assert_eq!(a.updated_at, "2026-02-01T00:00:00.000Z");
        assert_eq!(a.created_at, "2026-01-01T00:00:00.000Z");
        Ok(())
    })
    .unwrap();
}

// ---- Snapshots ----

#[test]
fn test_latest_snapshot() {
    let db = seeded();
    db.with_writer(|conn| {
        assert!(latest_snapshot(conn, "a1")?.is_none());
        for (id, ts) in [("s1", "2026-01-01T00:00:01.000Z"), ("s2", "2026-01-01T00:00:02.000Z")] {
            insert_snapshot(
                conn,
                &SnapshotRow {
                    id: id.into(),
                    application_id: "a1".into(),
                    timestamp: ts.into(),
                    config: "{}".into(),
                    environment: "prod".into(),
                    source_stats: None,
                },
            )?;
        }
        assert_eq!(latest_snapshot(conn, "a1")?.unwrap().id, "s2");
        assert!(latest_snapshot(conn, "a2")?.is_none());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_snapshot_requires_application() {
    let db = seeded();
    let result = db.with_writer(|conn| {
        insert_snapshot(
            conn,
            &SnapshotRow {
                id: "s1".into(),
                application_id: "ghost".into(),
                timestamp: "2026-01-01T00:00:00.000Z".into(),
                config: "{}".into(),
                environment: "prod".into(),
                source_stats: None,
            },
        )
    });
    assert!(result.is_err(), "foreign key should reject unknown application");
}

// ---- Drifts ----

#[test]
fn test_unresolved_lookup_follows_status() {
    let db = seeded();
    db.with_writer(|conn| {
        insert_drift(conn, &drift("d1", "a1", "database.*", "2026-01-01T00:00:01.000Z"))?;
        assert_eq!(find_unresolved(conn, "a1", "database.*")?.as_deref(), Some("d1"));
        assert!(find_unresolved(conn, "a2", "database.*")?.is_none());

        assert!(mark_acknowledged(conn, "d1", "2026-01-01T00:01:00.000Z")?);
        assert_eq!(find_unresolved(conn, "a1", "database.*")?.as_deref(), Some("d1"));

        assert!(mark_resolved(conn, "d1", "2026-01-01T00:02:00.000Z")?);
        assert!(find_unresolved(conn, "a1", "database.*")?.is_none());

        let d = get_drift(conn, "d1")?.unwrap();
        assert_eq!(d.status, "RESOLVED");
        assert_eq!(d.acknowledged_at.as_deref(), Some("2026-01-01T00:01:00.000Z"));
        assert_eq!(d.resolved_at.as_deref(), Some("2026-01-01T00:02:00.000Z"));

        assert!(!mark_resolved(conn, "missing", "2026-01-01T00:02:00.000Z")?);
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_query_drifts_filters_and_order() {
    let db = seeded();
    db.with_writer(|conn| {
        insert_drift(conn, &drift("d1", "a1", "k1", "2026-01-01T00:00:01.000Z"))?;
        insert_drift(conn, &drift("d2", "a1", "k2", "2026-01-01T00:00:03.000Z"))?;
        insert_drift(conn, &drift("d3", "a2", "k1", "2026-01-01T00:00:02.000Z"))?;
        mark_resolved(conn, "d2", "2026-01-01T00:00:04.000Z")?;
        Ok(())
    })
    .unwrap();

    db.with_reader(|conn| {
        let all = query_drifts(conn, &DriftFilter::default())?;
        let ids: Vec<_> = all.iter().map(|r| r.drift.id.as_str()).collect();
        assert_eq!(ids, ["d2", "d3", "d1"]);
        assert_eq!(all[1].application_name, "orders");

        let payments = query_drifts(
            conn,
            &DriftFilter {
                application_name: Some("payments"),
                status: None,
            },
        )?;
        assert_eq!(payments.len(), 2);

        let resolved = query_drifts(
            conn,
            &DriftFilter {
                application_name: None,
                status: Some(DriftStatus::Resolved),
            },
        )?;
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].drift.id, "d2");

        assert_eq!(query_active_drifts(conn, None)?.len(), 2);
        assert_eq!(query_active_drifts(conn, Some("payments"))?.len(), 1);
        assert!(query_active_drifts(conn, Some("unknown"))?.is_empty());
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_status_parse_is_case_insensitive() {
    assert_eq!(DriftStatus::parse("active"), Some(DriftStatus::Active));
    assert_eq!(DriftStatus::parse("Acknowledged"), Some(DriftStatus::Acknowledged));
    assert_eq!(DriftStatus::parse("RESOLVED"), Some(DriftStatus::Resolved));
    assert_eq!(DriftStatus::parse("open"), None);
    assert!(DriftStatus::Acknowledged.is_unresolved());
    assert!(!DriftStatus::Resolved.is_unresolved());
    assert_eq!(
        DriftStatus::unresolved().collect::<Vec<_>>(),
        [DriftStatus::Active, DriftStatus::Acknowledged]
    );
}

// ---- Rules ----

#[test]
fn test_append_and_delete_rules() {
    let db = DatabaseManager::open_in_memory().unwrap();
    db.with_writer(|conn| {
        let position = append_rule(
            conn,
            &RuleRow {
                id: "custom".into(),
                position: 0,
                config_key: "cache.*".into(),
                required: true,
                allowed_in_prod: false,
                min_value: Some(1.0),
                max_value: None,
                change_policy: "CI_ONLY".into(),
                environment: "prod".into(),
            },
        )?;
        assert_eq!(position, 7);

        let rules = query_rules(conn)?;
        let last = rules.last().unwrap();
        assert_eq!(last.id, "custom");
        assert!(last.required);
        assert!(!last.allowed_in_prod);
        assert_eq!(last.min_value, Some(1.0));
        assert_eq!(last.max_value, None);

        assert!(delete_rule(conn, "rule-1")?);
        assert!(!delete_rule(conn, "rule-1")?);
        assert!(query_rules(conn)?.iter().all(|r| r.id != "rule-1"));
        assert_eq!(query_rules(conn)?.first().unwrap().config_key, "spring.profiles.active");
        Ok(())
    })
    .unwrap();
}

#[test]
fn test_seeded_payment_rule_bounds() {
    let db = DatabaseManager::open_in_memory().unwrap();
    let rule = db
        .with_reader(query_rules)
        .unwrap()
        .into_iter()
        .find(|r| r.id == "rule-5")
        .unwrap();
    assert_eq!(rule.config_key, "payment.timeout");
    assert_eq!(rule.min_value, Some(1000.0));
    assert_eq!(rule.max_value, Some(30000.0));
    assert_eq!(rule.change_policy, "CI_ONLY");
    assert_eq!(rule.environment, "prod");
}
