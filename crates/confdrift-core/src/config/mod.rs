//! Configuration system for confdrift.
//! TOML-based, layered resolution: overrides > env > project > user > defaults.

pub mod agent_config;
pub mod confdrift_config;
pub mod engine_config;
pub mod server_config;

pub use agent_config::AgentConfig;
pub use confdrift_config::{CliOverrides, ConfdriftConfig};
pub use engine_config::EngineConfig;
pub use server_config::ServerConfig;
