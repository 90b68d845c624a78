//! # confdrift-server
//!
//! The monitor service behind the agent and CI integrations: it keeps each
//! application's declared baseline, receives runtime snapshots, runs the
//! drift engine against the persisted rule set, and tracks the lifecycle of
//! every recorded drift.

pub mod api;
pub mod baseline;
pub mod records;
pub mod service;

pub use baseline::{flatten_json, parse_yaml};
pub use service::MonitorService;
