//! Delete decisions for activities and comments
//!
//! Both paths defer the actual rule to a deletable setter and only act on
//! the flag it leaves behind.

use super::decision::{Decision, DenialReason};
use crate::core_stream::{
    Activity, ActivityDeletableSetter, ActivityId, ActivityLookup, CommentDeletableSetter,
    CommentId, CommentLookup, LookupFailure, LookupResult, Principal,
};
use std::sync::Arc;
use tracing::{debug, error, warn};

fn account_id(principal: &Principal) -> LookupResult<&str> {
    if principal.account_id.is_empty() {
        return Err(LookupFailure::MissingAccountId);
    }
    Ok(&principal.account_id)
}

fn fetch_activity(
    activities: &dyn ActivityLookup,
    activity_id: ActivityId,
    account_id: &str,
) -> LookupResult<Option<Activity>> {
    Ok(activities
        .activities_by_ids(&[activity_id], Some(account_id))?
        .into_iter()
        .next())
}

fn log_outcome(principal: &Principal, target: &dyn std::fmt::Display, decision: &Decision) {
    match decision {
        Decision::Allowed => debug!(principal = %principal, target = %target, "Delete allowed"),
        Decision::Denied(reason) => {
            warn!(principal = %principal, target = %target, reason = %reason, "Delete denied")
        }
    }
}

/// Decides whether a principal may delete an activity
pub struct ActivityDeleteAuthorizer {
    activities: Arc<dyn ActivityLookup>,
    deletable: Arc<dyn ActivityDeletableSetter>,
}

impl ActivityDeleteAuthorizer {
    pub fn new(
        activities: Arc<dyn ActivityLookup>,
        deletable: Arc<dyn ActivityDeletableSetter>,
    ) -> Self {
        Self {
            activities,
            deletable,
        }
    }

    pub fn decide(&self, principal: &Principal, activity_id: ActivityId) -> Decision {
        let result = self.evaluate(principal, activity_id);
        if let Err(e) = &result {
            error!(
                principal = %principal,
                activity = %activity_id,
                error = %e,
                "Failed to determine whether activity is deletable"
            );
        }
        let decision = Decision::from(result);
        log_outcome(principal, &activity_id, &decision);
        decision
    }

    fn evaluate(&self, principal: &Principal, activity_id: ActivityId) -> LookupResult<Decision> {
        let account_id = account_id(principal)?;
        let Some(mut activity) = fetch_activity(self.activities.as_ref(), activity_id, account_id)?
        else {
            return Ok(Decision::deny(DenialReason::ActivityNotFound(activity_id)));
        };

        self.deletable.set_deletable(account_id, &mut activity)?;
        Ok(Decision::allow_if(activity.deletable, || {
            DenialReason::ActivityNotDeletable(activity_id)
        }))
    }
}

/// Decides whether a principal may delete a comment
pub struct CommentDeleteAuthorizer {
    comments: Arc<dyn CommentLookup>,
    activities: Arc<dyn ActivityLookup>,
    deletable: Arc<dyn CommentDeletableSetter>,
}

impl CommentDeleteAuthorizer {
    pub fn new(
        comments: Arc<dyn CommentLookup>,
        activities: Arc<dyn ActivityLookup>,
        deletable: Arc<dyn CommentDeletableSetter>,
    ) -> Self {
        Self {
            comments,
            activities,
            deletable,
        }
    }

    pub fn decide(&self, principal: &Principal, comment_id: CommentId) -> Decision {
        let result = self.evaluate(principal, comment_id);
        if let Err(e) = &result {
            error!(
                principal = %principal,
                comment = %comment_id,
                error = %e,
                "Failed to determine whether comment is deletable"
            );
        }
        let decision = Decision::from(result);
        log_outcome(principal, &comment_id, &decision);
        decision
    }

    fn evaluate(&self, principal: &Principal, comment_id: CommentId) -> LookupResult<Decision> {
        let account_id = account_id(principal)?;

        let mut comments = self.comments.comments_by_ids(&[comment_id])?;
        let Some(parent_id) = comments.first().map(|c| c.activity_id) else {
            return Ok(Decision::deny(DenialReason::CommentNotFound(comment_id)));
        };

        let Some(parent) = fetch_activity(self.activities.as_ref(), parent_id, account_id)? else {
            return Ok(Decision::deny(DenialReason::ActivityNotFound(parent_id)));
        };

        self.deletable
            .set_deletable(account_id, &parent, &mut comments)?;

        let deletable = comments
            .iter()
            .find(|c| c.id == comment_id)
            .is_some_and(|c| c.deletable);
        Ok(Decision::allow_if(deletable, || {
            DenialReason::CommentNotDeletable(comment_id)
        }))
    }
}
