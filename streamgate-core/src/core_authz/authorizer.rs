//! Single dispatch point for every authorization request

use super::decision::{AuthorizationDenied, Decision, RequestKind};
use super::evaluator::MembershipEvaluator;
use super::interaction::ActivityInteractionAuthorizer;
use super::modification::{ActivityDeleteAuthorizer, CommentDeleteAuthorizer};
use super::post::PostAuthorizer;
use super::resolver::StreamDestinationResolver;
use super::view::ViewAuthorizer;
use crate::config::{MetricsConfig, PolicyConfig};
use crate::core_stream::{
    ActivityDeletableSetter, ActivityDraft, ActivityId, ActivityLookup, ActorIdentityResolver,
    CommentDeletableSetter, CommentId, CommentLookup, CoordinatorIdSetLookup,
    FollowerIdListLookup, GroupLookup, InteractionType, PersonLookup, Principal, SecurityTrimmer,
};
use crate::metrics::{record_decision, record_duration, Timer};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// What a principal is asking to do
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthorizationRequest {
    /// Post a not-yet-persisted activity
    PostActivity(ActivityDraft),
    /// POST, COMMENT or VIEW against an existing activity
    Interact {
        activity_id: ActivityId,
        interaction: InteractionType,
    },
    DeleteActivity { activity_id: ActivityId },
    DeleteComment { comment_id: CommentId },
    /// Security-trimmed VIEW
    ViewActivity { activity_id: ActivityId },
}

impl AuthorizationRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            AuthorizationRequest::PostActivity(_) => RequestKind::PostActivity,
            AuthorizationRequest::Interact { .. } => RequestKind::Interact,
            AuthorizationRequest::DeleteActivity { .. } => RequestKind::DeleteActivity,
            AuthorizationRequest::DeleteComment { .. } => RequestKind::DeleteComment,
            AuthorizationRequest::ViewActivity { .. } => RequestKind::ViewActivity,
        }
    }
}

/// Every collaborator the engine consumes
#[derive(Clone)]
pub struct StreamCollaborators {
    pub people: Arc<dyn PersonLookup>,
    pub groups: Arc<dyn GroupLookup>,
    pub coordinators: Arc<dyn CoordinatorIdSetLookup>,
    pub followers: Arc<dyn FollowerIdListLookup>,
    pub activities: Arc<dyn ActivityLookup>,
    pub comments: Arc<dyn CommentLookup>,
    pub actors: Arc<dyn ActorIdentityResolver>,
    pub trimmer: Arc<dyn SecurityTrimmer>,
    pub activity_deletable: Arc<dyn ActivityDeletableSetter>,
    pub comment_deletable: Arc<dyn CommentDeletableSetter>,
}

impl StreamCollaborators {
    /// Use one value that implements every collaborator trait
    pub fn uniform<S>(source: Arc<S>) -> Self
    where
        S: PersonLookup
            + GroupLookup
            + CoordinatorIdSetLookup
            + FollowerIdListLookup
            + ActivityLookup
            + CommentLookup
            + ActorIdentityResolver
            + SecurityTrimmer
            + ActivityDeletableSetter
            + CommentDeletableSetter
            + 'static,
    {
        Self {
            people: source.clone(),
            groups: source.clone(),
            coordinators: source.clone(),
            followers: source.clone(),
            activities: source.clone(),
            comments: source.clone(),
            actors: source.clone(),
            trimmer: source.clone(),
            activity_deletable: source.clone(),
            comment_deletable: source,
        }
    }
}

/// Routes each [`AuthorizationRequest`] to its decision path
///
/// Stateless between calls; share it behind an `Arc`.
pub struct Authorizer {
    post: PostAuthorizer,
    interaction: ActivityInteractionAuthorizer,
    activity_delete: ActivityDeleteAuthorizer,
    comment_delete: CommentDeleteAuthorizer,
    view: ViewAuthorizer,
    slow_decision_threshold: Duration,
    metrics_enabled: bool,
}

impl Authorizer {
    pub fn new(collaborators: StreamCollaborators, policy: &PolicyConfig) -> Self {
        let membership = Arc::new(
            MembershipEvaluator::new(
                collaborators.people.clone(),
                collaborators.groups.clone(),
                collaborators.coordinators.clone(),
                collaborators.followers.clone(),
                collaborators.actors.clone(),
            )
            .with_case_insensitive_account_ids(policy.case_insensitive_account_ids),
        );

        let post = PostAuthorizer::new(
            collaborators.people.clone(),
            collaborators.groups.clone(),
            collaborators.actors.clone(),
            membership.clone(),
        )
        .with_owner_match(policy.post_owner_match)
        .with_case_insensitive_account_ids(policy.case_insensitive_account_ids);

        let interaction = ActivityInteractionAuthorizer::new(
            StreamDestinationResolver::new(collaborators.activities.clone()),
            membership,
        );

        info!(
            post_owner_match = ?policy.post_owner_match,
            case_insensitive_account_ids = policy.case_insensitive_account_ids,
            "Authorizer initialized"
        );

        Self {
            post,
            interaction,
            activity_delete: ActivityDeleteAuthorizer::new(
                collaborators.activities.clone(),
                collaborators.activity_deletable,
            ),
            comment_delete: CommentDeleteAuthorizer::new(
                collaborators.comments,
                collaborators.activities,
                collaborators.comment_deletable,
            ),
            view: ViewAuthorizer::new(collaborators.trimmer),
            slow_decision_threshold: policy.slow_decision_threshold,
            metrics_enabled: true,
        }
    }

    /// Apply the `[metrics]` settings
    pub fn with_metrics(mut self, metrics: &MetricsConfig) -> Self {
        self.metrics_enabled = metrics.enabled;
        self
    }

    /// Evaluate `request` without converting the outcome to an error
    pub fn decide(&self, principal: &Principal, request: &AuthorizationRequest) -> Decision {
        let kind = request.kind();
        let timer = Timer::start();

        let decision = match request {
            AuthorizationRequest::PostActivity(draft) => self.post.decide(principal, draft),
            AuthorizationRequest::Interact {
                activity_id,
                interaction,
            } => self.interaction.decide(principal, *activity_id, *interaction),
            AuthorizationRequest::DeleteActivity { activity_id } => {
                self.activity_delete.decide(principal, *activity_id)
            }
            AuthorizationRequest::DeleteComment { comment_id } => {
                self.comment_delete.decide(principal, *comment_id)
            }
            AuthorizationRequest::ViewActivity { activity_id } => {
                self.view.decide(principal, *activity_id)
            }
        };

        let elapsed = timer.stop();
        if elapsed > self.slow_decision_threshold {
            warn!(
                kind = kind.as_str(),
                principal = %principal,
                elapsed_ms = elapsed.as_millis() as u64,
                "Slow authorization decision"
            );
        }
        if self.metrics_enabled {
            record_duration(kind, elapsed);
            record_decision(kind, &decision);
        }
        decision
    }

    /// Authorize `request`; any denial, including a failed lookup, is an
    /// [`AuthorizationDenied`]
    pub fn authorize(
        &self,
        principal: &Principal,
        request: &AuthorizationRequest,
    ) -> Result<(), AuthorizationDenied> {
        self.decide(principal, request).into_result()
    }
}
