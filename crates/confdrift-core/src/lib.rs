//! # confdrift-core
//!
//! Shared foundation for the confdrift workspace: configuration values,
//! one error enum per subsystem, layered TOML configuration, tracing setup,
//! constants, and secret hashing used by both the agent and the server.

pub mod config;
pub mod constants;
pub mod errors;
pub mod secrets;
pub mod tracing;
pub mod types;

pub use types::{ConfigMap, ConfigValue};
