//! Agent lifecycle: construction, scheduling, manual sends.

mod common;

use std::thread;
use std::time::Duration;

use common::FakeTransport;
use confdrift_agent::{ConfigMonitorAgent, SendOutcome};
use confdrift_core::config::AgentConfig;
use confdrift_core::errors::ConfigError;

fn config() -> AgentConfig {
    AgentConfig {
        application_name: Some("orders".to_string()),
        environment: Some("staging".to_string()),
        initial_delay_ms: Some(0),
        collection_interval_ms: Some(20),
        initial_backoff_ms: Some(0),
        ..Default::default()
    }
}

#[test]
fn test_application_name_is_required() {
    let cfg = AgentConfig {
        application_name: None,
        ..config()
    };
    let err = ConfigMonitorAgent::with_transport(&cfg, Box::new(FakeTransport::default()))
        .err()
        .unwrap();
    assert!(matches!(
        err,
        ConfigError::ValidationFailed { ref field, .. } if field == "agent.application_name"
    ));

    let blank = AgentConfig {
        application_name: Some("  ".to_string()),
        ..config()
    };
    assert!(
        ConfigMonitorAgent::with_transport(&blank, Box::new(FakeTransport::default())).is_err()
    );
}

#[test]
fn test_invalid_secret_pattern_is_rejected() {
    let cfg = AgentConfig {
        secret_patterns: vec!["(".to_string()],
        ..config()
    };
    assert!(
        ConfigMonitorAgent::with_transport(&cfg, Box::new(FakeTransport::default())).is_err()
    );
}

#[test]
fn test_http_agent_builds_from_defaults() {
    let agent = ConfigMonitorAgent::new(&config()).unwrap();
    assert!(!agent.is_running());
}

#[test]
fn test_started_agent_sends_periodically_until_stopped() {
    let transport = FakeTransport::default();
    let agent =
        ConfigMonitorAgent::with_transport(&config(), Box::new(transport.clone())).unwrap();

    assert!(agent.start());
    assert!(agent.is_running());
    thread::sleep(Duration::from_millis(200));
    agent.stop();
    assert!(!agent.is_running());

    let sent = transport.call_count();
    assert!(sent >= 2, "expected repeated sends, got {sent}");
    assert_eq!(agent.stats().success_count as usize, sent);

    thread::sleep(Duration::from_millis(60));
    assert_eq!(transport.call_count(), sent);
}

#[test]
fn test_stop_interrupts_initial_delay() {
    let transport = FakeTransport::default();
    let cfg = AgentConfig {
        initial_delay_ms: Some(60_000),
        ..config()
    };
    let agent = ConfigMonitorAgent::with_transport(&cfg, Box::new(transport.clone())).unwrap();

    assert!(agent.start());
    agent.stop();
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_start_twice_keeps_one_worker() {
    let transport = FakeTransport::default();
    let cfg = AgentConfig {
        initial_delay_ms: Some(60_000),
        ..config()
    };
    let agent = ConfigMonitorAgent::with_transport(&cfg, Box::new(transport)).unwrap();
    assert!(agent.start());
    assert!(agent.start());
    agent.stop();
    assert!(!agent.is_running());
    agent.stop();
}

#[test]
fn test_disabled_agent_never_starts_or_sends() {
    let transport = FakeTransport::default();
    let cfg = AgentConfig {
        enabled: Some(false),
        ..config()
    };
    let agent = ConfigMonitorAgent::with_transport(&cfg, Box::new(transport.clone())).unwrap();

    assert!(!agent.start());
    assert!(!agent.is_running());
    assert_eq!(agent.send_snapshot(), SendOutcome::Skipped);
    assert_eq!(transport.call_count(), 0);
}

#[test]
fn test_manual_send_updates_stats() {
    let transport = FakeTransport::default();
    let agent =
        ConfigMonitorAgent::with_transport(&config(), Box::new(transport.clone())).unwrap();

    assert_eq!(agent.send_snapshot(), SendOutcome::Delivered);
    assert_eq!(agent.stats().success_count, 1);

    let calls = transport.calls.lock().unwrap();
    assert_eq!(calls[0].application_name, "orders");
    assert_eq!(calls[0].environment, "staging");
}

#[test]
fn test_dropping_a_running_agent_stops_it() {
    let transport = FakeTransport::default();
    let agent =
        ConfigMonitorAgent::with_transport(&config(), Box::new(transport.clone())).unwrap();
    agent.start();
    thread::sleep(Duration::from_millis(50));
    drop(agent);

    let sent = transport.call_count();
    thread::sleep(Duration::from_millis(60));
    assert_eq!(transport.call_count(), sent);
}
