//! # confdrift-storage
//!
//! SQLite persistence for applications and their baselines, runtime
//! snapshots, recorded drifts, and the ordered rule set.
//!
//! One serialized write connection plus a round-robin pool of read-only
//! connections (on-disk databases only). Schema versions are tracked with
//! `PRAGMA user_version`.

pub mod connection;
pub mod migrations;
pub mod queries;

pub use connection::DatabaseManager;
