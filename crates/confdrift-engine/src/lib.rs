//! # confdrift-engine
//!
//! Compares a declared configuration baseline with the configuration observed
//! at runtime and evaluates policy rules against it.
//!
//! Subsystems:
//! - `matcher`: exact/wildcard key patterns, compiled once per rule
//! - `selector`: environment scoping and first-match rule resolution
//! - `detectors`: missing, overridden, and unsafe value detectors
//! - `detector`: the aggregator running all three in a fixed order
//! - `policy`: which environments enforce production restrictions
//!
//! The engine performs no I/O and keeps no state between calls.

pub mod defaults;
pub mod detector;
pub mod detectors;
pub mod matcher;
pub mod numeric;
pub mod policy;
pub mod selector;
pub mod types;

pub use defaults::default_production_rules;
pub use detector::{detect_drift, DriftDetector};
pub use matcher::{matches, KeyPattern};
pub use policy::DetectionPolicy;
pub use selector::{applicable_rules, find_rule, CompiledRule, RuleSet};
pub use types::{ChangePolicy, Drift, DriftType, Rule, Severity};
