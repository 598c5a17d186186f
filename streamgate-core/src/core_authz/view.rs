//! View decisions via security trimming

use super::decision::{Decision, DenialReason};
use crate::core_stream::{ActivityId, Principal, SecurityTrimmer};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Authoritative VIEW check: an activity is viewable iff the trimmer keeps it
pub struct ViewAuthorizer {
    trimmer: Arc<dyn SecurityTrimmer>,
}

impl ViewAuthorizer {
    pub fn new(trimmer: Arc<dyn SecurityTrimmer>) -> Self {
        Self { trimmer }
    }

    pub fn decide(&self, principal: &Principal, activity_id: ActivityId) -> Decision {
        let visible = match self.trimmer.trim(&[activity_id], principal.id) {
            Ok(visible) => visible,
            Err(e) => {
                error!(
                    principal = %principal,
                    activity = %activity_id,
                    error = %e,
                    "Security trimming failed"
                );
                return Decision::deny(e.into());
            }
        };

        if visible.contains(&activity_id) {
            debug!(principal = %principal, activity = %activity_id, "View allowed");
            Decision::Allowed
        } else {
            warn!(principal = %principal, activity = %activity_id, "Activity trimmed from view");
            Decision::deny(DenialReason::NotVisible(activity_id))
        }
    }
}
