//! Collector behavior: prefixes, sources, merging, secret handling.

use confdrift_agent::collector::{
    merge_sources, source_stats, to_simple_map, ConfigCollector, CONFIG_FILE,
    ENVIRONMENT_VARIABLE,
};
use confdrift_core::secrets::SecretHandler;
use confdrift_core::{ConfigMap, ConfigValue};

fn collector() -> ConfigCollector {
    ConfigCollector::new(
        SecretHandler::with_defaults(),
        vec!["CARGO_".to_string(), "RUSTUP_".to_string()],
    )
}

fn vars(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_environment_variables_are_collected_with_source() {
    let entries = collector().collect_from_vars(vars(&[("SERVER_PORT", "8080")]));
    let entry = &entries["SERVER_PORT"];
    assert_eq!(entry.value, ConfigValue::from("8080"));
    assert_eq!(entry.safe_value, ConfigValue::from("8080"));
    assert_eq!(entry.source, ENVIRONMENT_VARIABLE);
    assert!(!entry.is_secret);
}

#[test]
fn test_ignored_prefixes_are_skipped() {
    let entries = collector().collect_from_vars(vars(&[
        ("CARGO_PKG_NAME", "x"),
        ("RUSTUP_HOME", "/r"),
        ("APP_MODE", "fast"),
    ]));
    assert_eq!(entries.keys().collect::<Vec<_>>(), vec!["APP_MODE"]);
}

#[test]
fn test_secret_values_are_hashed_but_raw_value_kept_locally() {
    let entries = collector().collect_from_vars(vars(&[("DB_PASSWORD", "hunter2")]));
    let entry = &entries["DB_PASSWORD"];
    assert!(entry.is_secret);
    assert_eq!(entry.value, ConfigValue::from("hunter2"));
    assert_eq!(entry.safe_value, ConfigValue::from("HASH:f52fbd32b2b3b86f"));
}

#[test]
fn test_debug_output_redacts_secret_values() {
    let entries = collector().collect_from_vars(vars(&[("API_TOKEN", "s3cr3t-value")]));
    let rendered = format!("{:?}", entries["API_TOKEN"]);
    assert!(!rendered.contains("s3cr3t-value"));
    assert!(rendered.contains("<redacted>"));
}

#[test]
fn test_collect_from_source_labels_entries() {
    let mut map = ConfigMap::new();
    map.insert("server.port".into(), ConfigValue::Number(8080.0));
    map.insert("feature.enabled".into(), ConfigValue::Bool(true));

    let entries = collector().collect_from_source(&map, CONFIG_FILE);
    assert_eq!(entries.len(), 2);
    assert!(entries.values().all(|e| e.source == CONFIG_FILE));
    assert_eq!(entries["server.port"].value, ConfigValue::Number(8080.0));
}

#[test]
fn test_later_sources_win_on_merge() {
    let c = collector();
    let mut file = ConfigMap::new();
    file.insert("APP_MODE".into(), ConfigValue::from("slow"));
    file.insert("server.port".into(), ConfigValue::from("80"));

    let merged = merge_sources([
        c.collect_from_source(&file, CONFIG_FILE),
        c.collect_from_vars(vars(&[("APP_MODE", "fast")])),
    ]);

    assert_eq!(merged.len(), 2);
    assert_eq!(merged["APP_MODE"].value, ConfigValue::from("fast"));
    assert_eq!(merged["APP_MODE"].source, ENVIRONMENT_VARIABLE);
    assert_eq!(merged["server.port"].source, CONFIG_FILE);
}

#[test]
fn test_simple_map_carries_only_safe_values() {
    let entries = collector().collect_from_vars(vars(&[
        ("DB_PASSWORD", "hunter2"),
        ("APP_MODE", "fast"),
    ]));
    let map = to_simple_map(&entries);
    assert_eq!(map["DB_PASSWORD"], ConfigValue::from("HASH:f52fbd32b2b3b86f"));
    assert_eq!(map["APP_MODE"], ConfigValue::from("fast"));
}

#[test]
fn test_source_stats_count_per_source() {
    let c = collector();
    let mut file = ConfigMap::new();
    file.insert("a".into(), ConfigValue::from("1"));
    file.insert("b".into(), ConfigValue::from("2"));
    let merged = merge_sources([
        c.collect_from_source(&file, "custom"),
        c.collect_from_vars(vars(&[("C", "3")])),
    ]);

    let stats = source_stats(&merged);
    assert_eq!(stats["custom"], 2);
    assert_eq!(stats[ENVIRONMENT_VARIABLE], 1);
}

#[test]
fn test_runtime_collection_respects_prefixes() {
    let everything_ignored =
        ConfigCollector::new(SecretHandler::with_defaults(), vec![String::new()]);
    assert!(everything_ignored.collect_runtime_config().is_empty());
}
