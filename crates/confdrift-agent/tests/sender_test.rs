//! Sender: retry semantics, statistics, payload shape.

mod common;

use std::time::Duration;

use common::{network_error, FakeTransport};
use confdrift_agent::collector::{ConfigCollector, ENVIRONMENT_VARIABLE};
use confdrift_agent::{
    HttpTransport, RetryPolicy, SendOutcome, SenderStats, SnapshotSender, SnapshotTransport,
};
use confdrift_core::config::AgentConfig;
use confdrift_core::errors::TransportError;
use confdrift_core::secrets::SecretHandler;

fn no_wait(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        initial_backoff: Duration::ZERO,
        max_backoff: Duration::ZERO,
    }
}

fn sender_with(transport: &FakeTransport, ignored: Vec<String>) -> SnapshotSender {
    SnapshotSender::new(
        ConfigCollector::new(SecretHandler::with_defaults(), ignored),
        Box::new(transport.clone()),
        "orders",
        "staging",
    )
    .with_retry(no_wait(3))
}

fn sender(transport: &FakeTransport) -> SnapshotSender {
    sender_with(transport, vec!["CARGO_".to_string()])
}

#[test]
fn test_first_attempt_success_is_counted() {
    let transport = FakeTransport::default();
    let sender = sender(&transport);

    assert_eq!(sender.send(), SendOutcome::Delivered);
    assert_eq!(transport.call_count(), 1);

    let stats = sender.stats();
    assert_eq!(stats.success_count, 1);
    assert_eq!(stats.failure_count, 0);
    assert!(stats.last_success_time.is_some());
    assert!(stats.last_failure_time.is_none());
}

#[test]
fn test_transient_failures_are_retried() {
    let transport = FakeTransport::failing_with(network_error(), 2);
    let sender = sender(&transport);

    assert_eq!(sender.send(), SendOutcome::Delivered);
    assert_eq!(transport.call_count(), 3);
    assert_eq!(sender.stats().success_count, 1);
    assert_eq!(sender.stats().failure_count, 0);
}

#[test]
fn test_exhausted_retries_count_one_failure() {
    let transport = FakeTransport::failing_with(network_error(), 10);
    let sender = sender(&transport);

    assert_eq!(sender.send(), SendOutcome::Failed);
    assert_eq!(transport.call_count(), 4);

    let stats = sender.stats();
    assert_eq!(stats.failure_count, 1);
    assert_eq!(stats.success_count, 0);
    assert!(stats.last_failure_time.is_some());
}

#[test]
fn test_client_errors_are_not_retried() {
    let transport = FakeTransport::failing_with(
        TransportError::Http {
            status: 400,
            body: "applicationName is required".to_string(),
        },
        10,
    );
    let sender = sender(&transport);

    assert_eq!(sender.send(), SendOutcome::Failed);
    assert_eq!(transport.call_count(), 1);
}

#[test]
fn test_server_errors_are_retried() {
    let transport = FakeTransport::failing_with(
        TransportError::Http {
            status: 503,
            body: String::new(),
        },
        1,
    );
    let sender = sender(&transport);

    assert_eq!(sender.send(), SendOutcome::Delivered);
    assert_eq!(transport.call_count(), 2);
}

#[test]
fn test_disabled_sender_does_nothing() {
    let transport = FakeTransport::default();
    let sender = sender(&transport).enabled(false);

    assert_eq!(sender.send(), SendOutcome::Skipped);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(sender.stats(), SenderStats::default());
}

#[test]
fn test_empty_collection_does_nothing() {
    let transport = FakeTransport::default();
    let sender = sender_with(&transport, vec![String::new()]);

    assert_eq!(sender.send(), SendOutcome::Skipped);
    assert_eq!(transport.call_count(), 0);
    assert_eq!(sender.stats(), SenderStats::default());
}

#[test]
fn test_payload_carries_identity_and_source_stats() {
    let transport = FakeTransport::default();
    sender(&transport).send();

    let calls = transport.calls.lock().unwrap();
    let payload = &calls[0];
    assert_eq!(payload.application_name, "orders");
    assert_eq!(payload.environment, "staging");
    assert!(!payload.config.is_empty());
    assert!(payload.config.keys().all(|k| !k.starts_with("CARGO_")));
    assert_eq!(
        payload.source_stats[ENVIRONMENT_VARIABLE] as usize,
        payload.config.len()
    );

    let json = serde_json::to_value(payload).unwrap();
    assert_eq!(json["applicationName"], "orders");
    assert_eq!(json["environment"], "staging");
    assert!(json["config"].is_object());
    assert!(json["sourceStats"].is_object());
}

#[test]
fn test_stats_serialize_camel_case() {
    let json = serde_json::to_value(SenderStats::default()).unwrap();
    assert_eq!(json["successCount"], 0);
    assert_eq!(json["failureCount"], 0);
    assert!(json["lastSuccessTime"].is_null());
    assert!(json["lastFailureTime"].is_null());
}

#[test]
fn test_retry_policy_defaults() {
    let policy = RetryPolicy::from_config(&AgentConfig::default());
    assert_eq!(policy.max_retries, 3);
    assert_eq!(policy.initial_backoff, Duration::from_secs(1));
    assert_eq!(policy.max_backoff, Duration::from_secs(30));
}

#[test]
fn test_retry_policy_reports_attempts_when_exhausted() {
    let mut attempts = 0;
    let result = no_wait(2).run(|| {
        attempts += 1;
        Err(network_error())
    });
    assert_eq!(attempts, 3);
    match result {
        Err(TransportError::RetriesExhausted { attempts, last_error }) => {
            assert_eq!(attempts, 3);
            assert!(last_error.contains("connection refused"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn test_http_transport_targets_snapshot_endpoint() {
    let transport = HttpTransport::new("http://monitor:8080/", Duration::from_secs(1)).unwrap();
    assert_eq!(transport.url(), "http://monitor:8080/api/v1/config-snapshots");
}

#[test]
fn test_http_transport_unreachable_server_is_network_error() {
    let transport = HttpTransport::new("http://127.0.0.1:1", Duration::from_secs(2)).unwrap();
    let payload = confdrift_agent::SnapshotPayload {
        application_name: "orders".to_string(),
        environment: "staging".to_string(),
        config: Default::default(),
        source_stats: Default::default(),
    };
    let err = transport.post_snapshot(&payload).unwrap_err();
    assert!(matches!(err, TransportError::Network { .. }));
    assert!(err.is_retryable());
}
