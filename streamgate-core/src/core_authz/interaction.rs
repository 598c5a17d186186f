//! Authorization of POST, COMMENT and VIEW against an existing activity

use super::decision::Decision;
use super::evaluator::MembershipEvaluator;
use super::resolver::StreamDestinationResolver;
use crate::core_stream::{ActivityId, InteractionType, Principal};
use std::sync::Arc;

/// Resolves the target activity and hands it to the membership evaluator
pub struct ActivityInteractionAuthorizer {
    resolver: StreamDestinationResolver,
    membership: Arc<MembershipEvaluator>,
}

impl ActivityInteractionAuthorizer {
    pub fn new(resolver: StreamDestinationResolver, membership: Arc<MembershipEvaluator>) -> Self {
        Self {
            resolver,
            membership,
        }
    }

    /// Decide `interaction` on `activity_id`. An activity that cannot be
    /// found denies.
    pub fn decide(
        &self,
        principal: &Principal,
        activity_id: ActivityId,
        interaction: InteractionType,
    ) -> Decision {
        match self.resolver.fetch(principal, activity_id) {
            Ok(activity) => self.membership.evaluate(principal, &activity, interaction),
            Err(reason) => Decision::deny(reason),
        }
    }
}
