//! Logging and metrics for Jelly.
//!
//! - **Logging**: [`logging::init_logging`] installs a `tracing-subscriber`
//!   stack with an `EnvFilter` and JSON or pretty output.
//! - **Metrics**: [`metrics`] names and records dispatch counters through
//!   the `metrics` facade.
//!
//! # Standard Metrics
//!
//! | Metric | Type | Labels |
//! |--------|------|--------|
//! | `jelly_dispatch_total` | Counter | `outcome` |
//! | `jelly_dispatch_duration_seconds` | Histogram | `outcome` |
//! | `jelly_setup_errors_total` | Counter | - |

#![doc(html_root_url = "https://docs.rs/jelly-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::TelemetryError;
pub use logging::{init_logging, LogConfig, LogFormat};
pub use metrics::{record_dispatch, DispatchOutcome};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
