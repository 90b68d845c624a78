//! Configuration value types shared across crates.

pub mod value;

pub use value::{ConfigMap, ConfigValue};
