//! Decision metrics
//!
//! Emitted through the `metrics` facade; nothing is recorded unless the host
//! installs a recorder.

use crate::core_authz::{Decision, RequestKind};
use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::{Duration, Instant};

pub const DECISIONS_ALLOWED: &str = "authz.decisions.allowed";
pub const DECISIONS_DENIED: &str = "authz.decisions.denied";
pub const LOOKUP_FAILURES: &str = "authz.lookup.failures";
pub const DECISION_DURATION: &str = "authz.decision.duration_ms";

/// Register metric descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!(DECISIONS_ALLOWED, "Authorization requests allowed");
    describe_counter!(DECISIONS_DENIED, "Authorization requests denied");
    describe_counter!(
        LOOKUP_FAILURES,
        "Denials caused by a collaborator lookup failure"
    );
    describe_histogram!(DECISION_DURATION, "Authorization decision duration in milliseconds");
}

/// Count one decision, labelled by request kind
pub fn record_decision(kind: RequestKind, decision: &Decision) {
    let label = kind.as_str();
    match decision {
        Decision::Allowed => counter!(DECISIONS_ALLOWED, "kind" => label).increment(1),
        Decision::Denied(reason) => {
            counter!(DECISIONS_DENIED, "kind" => label).increment(1);
            if reason.is_lookup_failure() {
                counter!(LOOKUP_FAILURES, "kind" => label).increment(1);
            }
        }
    }
}

/// Record how long one decision took, labelled by request kind
pub fn record_duration(kind: RequestKind, elapsed: Duration) {
    histogram!(DECISION_DURATION, "kind" => kind.as_str()).record(elapsed.as_secs_f64() * 1000.0);
}

/// Measures one decision
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since [`Timer::start`]; records nothing
    pub fn stop(self) -> Duration {
        self.start.elapsed()
    }
}
