//! Error handling for confdrift.
//! One error enum per subsystem, `thiserror` only.

pub mod baseline_error;
pub mod config_error;
pub mod detection_error;
pub mod error_code;
pub mod monitor_error;
pub mod storage_error;
pub mod transport_error;

pub use baseline_error::BaselineError;
pub use config_error::ConfigError;
pub use detection_error::DetectionError;
pub use error_code::ErrorCode;
pub use monitor_error::MonitorError;
pub use storage_error::StorageError;
pub use transport_error::TransportError;
