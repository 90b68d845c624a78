//! The three drift detectors. Each is a pure function over the applicable
//! rules and returns its findings in runtime-key order.

pub mod missing;
pub mod overridden;
pub mod unsafe_value;

pub use missing::detect_missing;
pub use overridden::detect_overridden;
pub use unsafe_value::detect_unsafe;
