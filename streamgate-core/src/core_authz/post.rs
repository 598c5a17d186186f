//! Creation-time authorization for posting a new activity
//!
//! Differs from the post-creation path in two ways: the destination group
//! must resolve to exactly one group, and ownership of a personal stream is
//! decided by [`PostOwnerMatch`].

use super::decision::Decision;
use super::evaluator::{decide_for_role, log_decision, MembershipEvaluator, StreamRole};
use super::policy::evaluate_interaction;
use super::resolver::{classify, ResolvedDestination};
use crate::core_stream::{
    same_account, ActivityDraft, ActorIdentityResolver, GroupLookup, InteractionType,
    LookupResult, PersonLookup, Principal,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{error, trace};

/// How post-time ownership of a personal stream is decided
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostOwnerMatch {
    /// The principal's account id equals the destination's account id
    #[default]
    AccountId,
    /// The draft's actor entity id equals the principal's numeric id
    ActorEntityId,
}

impl FromStr for PostOwnerMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "actor_entity_id" => Ok(PostOwnerMatch::ActorEntityId),
            "account_id" => Ok(PostOwnerMatch::AccountId),
            other => Err(format!("unknown post owner match: {other}")),
        }
    }
}

/// Authorizes posting an [`ActivityDraft`]
pub struct PostAuthorizer {
    people: Arc<dyn PersonLookup>,
    groups: Arc<dyn GroupLookup>,
    actors: Arc<dyn ActorIdentityResolver>,
    membership: Arc<MembershipEvaluator>,
    owner_match: PostOwnerMatch,
    case_insensitive_account_ids: bool,
}

impl PostAuthorizer {
    pub fn new(
        people: Arc<dyn PersonLookup>,
        groups: Arc<dyn GroupLookup>,
        actors: Arc<dyn ActorIdentityResolver>,
        membership: Arc<MembershipEvaluator>,
    ) -> Self {
        Self {
            people,
            groups,
            actors,
            membership,
            owner_match: PostOwnerMatch::default(),
            case_insensitive_account_ids: true,
        }
    }

    pub fn with_owner_match(mut self, owner_match: PostOwnerMatch) -> Self {
        self.owner_match = owner_match;
        self
    }

    pub fn with_case_insensitive_account_ids(mut self, enabled: bool) -> Self {
        self.case_insensitive_account_ids = enabled;
        self
    }

    /// Decide whether `principal` may post `draft`
    pub fn decide(&self, principal: &Principal, draft: &ActivityDraft) -> Decision {
        let destination = match classify(&draft.destination) {
            Ok(destination) => destination,
            Err(reason) => return Decision::deny(reason),
        };

        let result = match destination {
            ResolvedDestination::Person { account_id } => {
                trace!(stream = account_id, "Authorizing post to person stream");
                self.decide_person(principal, draft, account_id)
            }
            ResolvedDestination::Group { short_name } => {
                trace!(stream = short_name, "Authorizing post to group stream");
                self.decide_group(principal, draft, short_name)
            }
        };

        if let Err(e) = &result {
            error!(
                principal = %principal,
                destination = %draft.destination,
                error = %e,
                "Lookup failed while authorizing activity post"
            );
        }
        Decision::from(result)
    }

    fn is_owner(&self, principal: &Principal, draft: &ActivityDraft, account_id: &str) -> bool {
        match self.owner_match {
            PostOwnerMatch::ActorEntityId => draft.actor.entity_id == principal.id.value(),
            PostOwnerMatch::AccountId => same_account(
                &principal.account_id,
                account_id,
                self.case_insensitive_account_ids,
            ),
        }
    }

    fn decide_person(
        &self,
        principal: &Principal,
        draft: &ActivityDraft,
        account_id: &str,
    ) -> LookupResult<Decision> {
        let owner = self.people.person_by_account_id(account_id)?;

        let (role, decision) = if self.is_owner(principal, draft, account_id) {
            (StreamRole::Owner, Decision::Allowed)
        } else {
            (
                StreamRole::NonPrivileged,
                evaluate_interaction(InteractionType::Post, &owner),
            )
        };
        log_decision(principal, draft, InteractionType::Post, role, &decision);
        Ok(decision)
    }

    fn decide_group(
        &self,
        principal: &Principal,
        draft: &ActivityDraft,
        short_name: &str,
    ) -> LookupResult<Decision> {
        let group = self.groups.group_by_short_name(short_name)?;
        let actor = self.actors.actor_id(principal, draft)?;

        let role = self.membership.group_role(&group, actor)?;
        let decision = decide_for_role(role, InteractionType::Post, &group, &group.short_name);
        log_decision(principal, draft, InteractionType::Post, role, &decision);
        Ok(decision)
    }
}
