//! # confdrift-agent
//!
//! Runs inside a service, periodically collects the configuration the
//! process actually sees, hashes anything that looks like a secret, and
//! posts the snapshot to the monitor. Delivery failures never propagate to
//! the host service.

pub mod agent;
pub mod collector;
pub mod sender;

pub use agent::ConfigMonitorAgent;
pub use collector::{ConfigCollector, ConfigEntries, ConfigEntry};
pub use sender::{
    HttpTransport, RetryPolicy, SendOutcome, SenderStats, SnapshotPayload, SnapshotSender,
    SnapshotTransport,
};
