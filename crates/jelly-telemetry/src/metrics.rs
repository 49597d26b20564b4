//! Dispatch metrics.
//!
//! Recorded through the `metrics` facade. Without an installed recorder the
//! calls are no-ops; choosing and installing an exporter is left to the host.
//!
//! | Metric | Type | Labels | Description |
//! |--------|------|--------|-------------|
//! | `jelly_dispatch_total` | Counter | `outcome` | Dispatched requests |
//! | `jelly_dispatch_duration_seconds` | Histogram | `outcome` | Dispatch latency |
//! | `jelly_setup_errors_total` | Counter | - | Wiring faults hit at dispatch |

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Duration;

/// Counter of dispatched requests.
pub const DISPATCH_TOTAL: &str = "jelly_dispatch_total";

/// Histogram of dispatch latency.
pub const DISPATCH_DURATION: &str = "jelly_dispatch_duration_seconds";

/// Counter of wiring faults surfaced at dispatch.
pub const SETUP_ERRORS_TOTAL: &str = "jelly_setup_errors_total";

/// How a dispatch ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchOutcome {
    /// A route matched.
    Found,
    /// No route matched the path.
    NotFound,
    /// The path matched but not the method.
    MethodNotAllowed,
    /// A fault escaped the chain.
    Unhandled,
}

impl DispatchOutcome {
    /// Label value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Found => "found",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::Unhandled => "unhandled",
        }
    }
}

/// Registers metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(DISPATCH_TOTAL, Unit::Count, "Requests dispatched, by routing outcome");
    describe_histogram!(
        DISPATCH_DURATION,
        Unit::Seconds,
        "Time spent dispatching a request through its chain"
    );
    describe_counter!(
        SETUP_ERRORS_TOTAL,
        Unit::Count,
        "Wiring faults surfaced while dispatching"
    );
}

/// Records one finished dispatch.
pub fn record_dispatch(outcome: DispatchOutcome, duration: Duration) {
    counter!(DISPATCH_TOTAL, "outcome" => outcome.as_str()).increment(1);
    histogram!(DISPATCH_DURATION, "outcome" => outcome.as_str()).record(duration.as_secs_f64());
}

/// Records a wiring fault hit during dispatch.
pub fn record_setup_error() {
    counter!(SETUP_ERRORS_TOTAL).increment(1);
}
