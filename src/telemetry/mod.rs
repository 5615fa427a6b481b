//! Telemetry setup.

pub mod tracing;

pub use self::tracing::{init_telemetry, shutdown_telemetry};
