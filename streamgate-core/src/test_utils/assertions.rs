//! Decision assertions
//!
//! Panics carry the full decision so a failing test shows why it was denied.

use crate::core_authz::{AuthorizationDenied, Decision, DenialReason};
use std::fmt::Debug;

/// Assert that a decision allowed
#[track_caller]
pub fn assert_allowed(decision: &Decision) {
    if let Decision::Denied(reason) = decision {
        panic!("Expected Allowed, got Denied({reason})");
    }
}

/// Assert that a decision denied and return the reason
#[track_caller]
pub fn assert_denied(decision: &Decision) -> &DenialReason {
    match decision {
        Decision::Allowed => panic!("Expected Denied, got Allowed"),
        Decision::Denied(reason) => reason,
    }
}

/// Assert that a decision denied for exactly `expected`
#[track_caller]
pub fn assert_denied_with(decision: &Decision, expected: &DenialReason) {
    let reason = assert_denied(decision);
    if reason != expected {
        panic!("Expected denial {expected:?}, got {reason:?}");
    }
}

/// Assert that a denial came from a collaborator failure
#[track_caller]
pub fn assert_lookup_denied(decision: &Decision) {
    let reason = assert_denied(decision);
    if !reason.is_lookup_failure() {
        panic!("Expected a lookup failure denial, got {reason:?}");
    }
}

/// Assert that `authorize` returned an error and return it
#[track_caller]
pub fn assert_unauthorized<T: Debug>(result: Result<T, AuthorizationDenied>) -> AuthorizationDenied {
    match result {
        Ok(value) => panic!("Expected AuthorizationDenied, got Ok({value:?})"),
        Err(e) => e,
    }
}
