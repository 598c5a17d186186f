//! Decision and denial types
//!
//! Decision paths produce a [`Decision`]. Only [`AuthorizationDenied`]
//! crosses the public boundary; collaborator failures are folded into
//! [`DenialReason::LookupFailed`] before that.

use crate::core_stream::{ActivityId, CommentId, EntityType, InteractionType, LookupFailure};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why an interaction was denied
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum DenialReason {
    #[error("unsupported destination stream type: {0}")]
    UnsupportedDestination(EntityType),

    #[error("unsupported interaction type: {0}")]
    UnsupportedInteraction(InteractionType),

    #[error("{interaction} is disabled for non-privileged principals on this stream")]
    InteractionDisabled { interaction: InteractionType },

    #[error("principal is neither a coordinator nor a follower of private group {group}")]
    NotGroupMember { group: String },

    #[error("activity {0} not found")]
    ActivityNotFound(ActivityId),

    #[error("comment {0} not found")]
    CommentNotFound(CommentId),

    #[error("principal may not delete activity {0}")]
    ActivityNotDeletable(ActivityId),

    #[error("principal may not delete comment {0}")]
    CommentNotDeletable(CommentId),

    #[error("activity {0} is not visible to the principal")]
    NotVisible(ActivityId),

    #[error("lookup failed: {0}")]
    LookupFailed(String),

    #[error("authorization task failed: {0}")]
    Internal(String),
}

impl DenialReason {
    /// Whether the denial came from a collaborator failure rather than policy
    pub fn is_lookup_failure(&self) -> bool {
        matches!(self, DenialReason::LookupFailed(_))
    }
}

impl From<LookupFailure> for DenialReason {
    fn from(failure: LookupFailure) -> Self {
        DenialReason::LookupFailed(failure.to_string())
    }
}

/// The outcome of evaluating one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Decision {
    Allowed,
    Denied(DenialReason),
}

impl Decision {
    pub fn deny(reason: DenialReason) -> Self {
        Decision::Denied(reason)
    }

    /// Allow iff `condition` holds, otherwise deny with `reason`
    pub fn allow_if(condition: bool, reason: impl FnOnce() -> DenialReason) -> Self {
        if condition {
            Decision::Allowed
        } else {
            Decision::Denied(reason())
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Decision::Allowed)
    }

    pub fn denial_reason(&self) -> Option<&DenialReason> {
        match self {
            Decision::Allowed => None,
            Decision::Denied(reason) => Some(reason),
        }
    }

    /// Convert to the public result form
    pub fn into_result(self) -> Result<(), AuthorizationDenied> {
        match self {
            Decision::Allowed => Ok(()),
            Decision::Denied(reason) => Err(AuthorizationDenied { reason }),
        }
    }
}

/// Folds a collaborator failure into a denial
impl From<Result<Decision, LookupFailure>> for Decision {
    fn from(result: Result<Decision, LookupFailure>) -> Self {
        match result {
            Ok(decision) => decision,
            Err(failure) => Decision::Denied(failure.into()),
        }
    }
}

/// The only error returned by the public `authorize` entry points
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("authorization denied: {reason}")]
pub struct AuthorizationDenied {
    pub reason: DenialReason,
}

/// Kind of request being authorized, used for logs and metrics labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    PostActivity,
    Interact,
    DeleteActivity,
    DeleteComment,
    ViewActivity,
}

impl RequestKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestKind::PostActivity => "post_activity",
            RequestKind::Interact => "interact",
            RequestKind::DeleteActivity => "delete_activity",
            RequestKind::DeleteComment => "delete_comment",
            RequestKind::ViewActivity => "view_activity",
        }
    }
}
