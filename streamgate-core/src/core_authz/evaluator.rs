//! Visibility and membership evaluation
//!
//! Works out how the actor relates to a destination stream (owner,
//! coordinator, follower, outsider) and applies the interaction policy for
//! that role:
//!
//! - a PERSON stream's owner skips the toggles
//! - a GROUP coordinator skips the toggles
//! - a public GROUP gates outsiders by the toggles only
//! - a private GROUP denies non-followers outright and gates followers by the toggles

use super::decision::{Decision, DenialReason};
use super::policy::{evaluate_interaction, evaluate_privileged};
use super::resolver::{classify, ResolvedDestination};
use crate::core_stream::{
    same_account, ActorIdentityResolver, CoordinatorIdSetLookup, FollowerIdListLookup,
    GroupLookup, GroupSnapshot, InteractionType, LookupFailure, LookupResult, PersonId,
    PersonLookup, Principal, StreamItem, StreamToggles,
};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, warn};

/// How the actor relates to the destination stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRole {
    /// Owner of a personal stream
    Owner,
    /// Coordinator of a group
    Coordinator,
    /// Anyone else on a personal stream or a public group
    NonPrivileged,
    /// Follower of a private group
    PrivateMember,
    /// Neither coordinator nor follower of a private group
    PrivateNonMember,
}

impl StreamRole {
    /// Owners and coordinators bypass toggles
    pub fn is_privileged(&self) -> bool {
        matches!(self, StreamRole::Owner | StreamRole::Coordinator)
    }
}

impl fmt::Display for StreamRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamRole::Owner => "owner",
            StreamRole::Coordinator => "coordinator",
            StreamRole::NonPrivileged => "non-privileged",
            StreamRole::PrivateMember => "private-member",
            StreamRole::PrivateNonMember => "private-non-member",
        };
        f.write_str(name)
    }
}

/// Apply the interaction policy for an already-determined role
pub fn decide_for_role(
    role: StreamRole,
    interaction: InteractionType,
    toggles: &dyn StreamToggles,
    stream_name: &str,
) -> Decision {
    match role {
        StreamRole::Owner | StreamRole::Coordinator => evaluate_privileged(interaction),
        StreamRole::PrivateNonMember => Decision::deny(DenialReason::NotGroupMember {
            group: stream_name.to_string(),
        }),
        StreamRole::NonPrivileged | StreamRole::PrivateMember => {
            evaluate_interaction(interaction, toggles)
        }
    }
}

/// Evaluates interactions against persisted activities
pub struct MembershipEvaluator {
    people: Arc<dyn PersonLookup>,
    groups: Arc<dyn GroupLookup>,
    coordinators: Arc<dyn CoordinatorIdSetLookup>,
    followers: Arc<dyn FollowerIdListLookup>,
    actors: Arc<dyn ActorIdentityResolver>,
    case_insensitive_account_ids: bool,
}

impl MembershipEvaluator {
    pub fn new(
        people: Arc<dyn PersonLookup>,
        groups: Arc<dyn GroupLookup>,
        coordinators: Arc<dyn CoordinatorIdSetLookup>,
        followers: Arc<dyn FollowerIdListLookup>,
        actors: Arc<dyn ActorIdentityResolver>,
    ) -> Self {
        Self {
            people,
            groups,
            coordinators,
            followers,
            actors,
            case_insensitive_account_ids: false,
        }
    }

    /// Compare stream owner account ids ignoring ASCII case
    pub fn with_case_insensitive_account_ids(mut self, enabled: bool) -> Self {
        self.case_insensitive_account_ids = enabled;
        self
    }

    /// Role of `actor` in `group`. Coordinators are checked first; followers
    /// are only fetched for private groups.
    pub fn group_role(&self, group: &GroupSnapshot, actor: PersonId) -> LookupResult<StreamRole> {
        if self.coordinators.coordinator_ids(group.entity_id)?.contains(&actor) {
            return Ok(StreamRole::Coordinator);
        }
        if group.is_public {
            return Ok(StreamRole::NonPrivileged);
        }
        if self.followers.follower_ids(group.entity_id)?.contains(&actor) {
            Ok(StreamRole::PrivateMember)
        } else {
            Ok(StreamRole::PrivateNonMember)
        }
    }

    /// Decide `interaction` by `principal` against `item`'s destination
    pub fn evaluate(
        &self,
        principal: &Principal,
        item: &dyn StreamItem,
        interaction: InteractionType,
    ) -> Decision {
        if interaction == InteractionType::NotSet {
            warn!(principal = %principal, "Interaction type not set");
            return Decision::deny(DenialReason::UnsupportedInteraction(interaction));
        }

        let destination = match classify(item.destination()) {
            Ok(destination) => destination,
            Err(reason) => return Decision::deny(reason),
        };

        let result = match destination {
            ResolvedDestination::Person { account_id } => {
                self.evaluate_person(principal, item, account_id, interaction)
            }
            ResolvedDestination::Group { short_name } => {
                self.evaluate_group(principal, item, short_name, interaction)
            }
        };

        if let Err(e) = &result {
            error!(
                principal = %principal,
                destination = %item.destination(),
                error = %e,
                "Lookup failed while authorizing activity interaction"
            );
        }
        Decision::from(result)
    }

    fn evaluate_person(
        &self,
        principal: &Principal,
        item: &dyn StreamItem,
        account_id: &str,
        interaction: InteractionType,
    ) -> LookupResult<Decision> {
        let owner = self.people.person_by_account_id(account_id)?;
        let actor_account = self.actors.actor_account_id(principal, item)?;

        let role = if same_account(&actor_account, account_id, self.case_insensitive_account_ids) {
            StreamRole::Owner
        } else {
            StreamRole::NonPrivileged
        };

        let decision = decide_for_role(role, interaction, &owner, account_id);
        log_decision(principal, item, interaction, role, &decision);
        Ok(decision)
    }

    fn evaluate_group(
        &self,
        principal: &Principal,
        item: &dyn StreamItem,
        short_name: &str,
        interaction: InteractionType,
    ) -> LookupResult<Decision> {
        let group = self
            .groups
            .groups_by_short_names(&[short_name.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| LookupFailure::not_found("group", short_name))?;
        let actor = self.actors.actor_id(principal, item)?;

        let role = self.group_role(&group, actor)?;
        let decision = decide_for_role(role, interaction, &group, &group.short_name);
        log_decision(principal, item, interaction, role, &decision);
        Ok(decision)
    }
}

pub(crate) fn log_decision(
    principal: &Principal,
    item: &dyn StreamItem,
    interaction: InteractionType,
    role: StreamRole,
    decision: &Decision,
) {
    match decision {
        Decision::Allowed => debug!(
            principal = %principal,
            destination = %item.destination(),
            interaction = %interaction,
            role = %role,
            "Stream interaction allowed"
        ),
        Decision::Denied(reason) => warn!(
            principal = %principal,
            destination = %item.destination(),
            interaction = %interaction,
            role = %role,
            reason = %reason,
            "Stream interaction denied"
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_stream::{
        Activity, ActivityId, EntityType, GroupId, InMemoryStreamDirectory, LookupKind,
        PersonSnapshot, StreamDestination,
    };

    const OWNER: PersonId = PersonId(1);
    const OTHER: PersonId = PersonId(2);
    const COORDINATOR: PersonId = PersonId(3);
    const FOLLOWER: PersonId = PersonId(4);
    const PRIVATE: GroupId = GroupId(6);
    const PUBLIC: GroupId = GroupId(7);

    fn directory() -> Arc<InMemoryStreamDirectory> {
        let directory = InMemoryStreamDirectory::new();
        directory.insert_person(PersonSnapshot::new(OWNER, "jdoe").with_toggles(false, false));
        directory.insert_person(PersonSnapshot::new(OTHER, "other"));
        directory.insert_group(
            GroupSnapshot::new(PRIVATE, "secret", false)
                .with_toggles(false, false)
                .with_coordinator(COORDINATOR),
        );
        directory.insert_group(GroupSnapshot::new(PUBLIC, "open", true).with_toggles(true, false));
        directory.add_follower(PRIVATE, FOLLOWER);
        Arc::new(directory)
    }

    fn evaluator(directory: &Arc<InMemoryStreamDirectory>) -> MembershipEvaluator {
        MembershipEvaluator::new(
            directory.clone(),
            directory.clone(),
            directory.clone(),
            directory.clone(),
            directory.clone(),
        )
    }

    fn activity(destination: StreamDestination) -> Activity {
        Activity::new(
            ActivityId(42),
            destination,
            StreamDestination::person("other", OTHER),
        )
    }

    fn principal(id: PersonId, account: &str) -> Principal {
        Principal::new(id, account)
    }

    #[test]
    fn test_owner_bypasses_person_toggles() {
        let directory = directory();
        let eval = evaluator(&directory);
        let item = activity(StreamDestination::person("jdoe", OWNER));

        for interaction in [InteractionType::Post, InteractionType::Comment, InteractionType::View] {
            assert!(eval.evaluate(&principal(OWNER, "jdoe"), &item, interaction).is_allowed());
        }
    }

    #[test]
    fn test_non_owner_gated_by_person_toggles() {
        let directory = directory();
        let eval = evaluator(&directory);
        let item = activity(StreamDestination::person("jdoe", OWNER));
        let other = principal(OTHER, "other");

        assert!(!eval.evaluate(&other, &item, InteractionType::Post).is_allowed());
        assert!(!eval.evaluate(&other, &item, InteractionType::Comment).is_allowed());
        assert!(eval.evaluate(&other, &item, InteractionType::View).is_allowed());
    }

    #[test]
    fn test_account_id_case_sensitivity() {
        let directory = directory();
        let item = activity(StreamDestination::person("jdoe", OWNER));
        let shouting = principal(OWNER, "JDOE");

        let strict = evaluator(&directory);
        assert!(!strict.evaluate(&shouting, &item, InteractionType::Post).is_allowed());

        let relaxed = evaluator(&directory).with_case_insensitive_account_ids(true);
        assert!(relaxed.evaluate(&shouting, &item, InteractionType::Post).is_allowed());
    }

    #[test]
    fn test_coordinator_bypasses_private_group() {
        let directory = directory();
        let eval = evaluator(&directory);
        let item = activity(StreamDestination::group("secret", PRIVATE));
        let coordinator = principal(COORDINATOR, "coord");

        for interaction in [InteractionType::Post, InteractionType::Comment, InteractionType::View] {
            assert!(eval.evaluate(&coordinator, &item, interaction).is_allowed());
        }
        assert_eq!(directory.call_count(LookupKind::Followers), 0);
    }

    #[test]
    fn test_private_group_non_member_denied_without_toggle_check() {
        let directory = directory();
        let eval = evaluator(&directory);
        let item = activity(StreamDestination::group("secret", PRIVATE));
        let outsider = principal(OTHER, "other");

        for interaction in [InteractionType::Post, InteractionType::Comment, InteractionType::View] {
            let decision = eval.evaluate(&outsider, &item, interaction);
            assert_eq!(
                decision,
                Decision::Denied(DenialReason::NotGroupMember {
                    group: "secret".to_string()
                })
            );
        }
    }

    #[test]
    fn test_private_group_follower_gated_by_toggles() {
        let directory = directory();
        let eval = evaluator(&directory);
        let item = activity(StreamDestination::group("secret", PRIVATE));
        let follower = principal(FOLLOWER, "follower");

        assert!(!eval.evaluate(&follower, &item, InteractionType::Post).is_allowed());
        assert!(!eval.evaluate(&follower, &item, InteractionType::Comment).is_allowed());
        assert!(eval.evaluate(&follower, &item, InteractionType::View).is_allowed());
    }

    #[test]
    fn test_public_group_gated_by_toggles() {
        let directory = directory();
        let eval = evaluator(&directory);
        let item = activity(StreamDestination::group("open", PUBLIC));
        let outsider = principal(OTHER, "other");

        assert!(eval.evaluate(&outsider, &item, InteractionType::Post).is_allowed());
        assert!(!eval.evaluate(&outsider, &item, InteractionType::Comment).is_allowed());
        assert!(eval.evaluate(&outsider, &item, InteractionType::View).is_allowed());
        assert_eq!(directory.call_count(LookupKind::Followers), 0);
    }

    #[test]
    fn test_not_set_denied_for_every_role() {
        let directory = directory();
        let eval = evaluator(&directory);
        let cases = [
            (StreamDestination::person("jdoe", OWNER), principal(OWNER, "jdoe")),
            (StreamDestination::group("secret", PRIVATE), principal(COORDINATOR, "coord")),
            (StreamDestination::group("open", PUBLIC), principal(OTHER, "other")),
        ];
        for (destination, who) in cases {
            let decision = eval.evaluate(&who, &activity(destination), InteractionType::NotSet);
            assert_eq!(
                decision,
                Decision::Denied(DenialReason::UnsupportedInteraction(InteractionType::NotSet))
            );
        }
    }

    #[test]
    fn test_unsupported_destination_denied() {
        let directory = directory();
        let eval = evaluator(&directory);
        let item = activity(StreamDestination::of_type(EntityType::Application, "app", 9));
        let decision = eval.evaluate(&principal(OWNER, "jdoe"), &item, InteractionType::Post);
        assert_eq!(
            decision,
            Decision::Denied(DenialReason::UnsupportedDestination(EntityType::Application))
        );
    }

    #[test]
    fn test_lookup_failures_deny() {
        for kind in [LookupKind::Person, LookupKind::ActorAccountId] {
            let directory = directory();
            directory.fail(kind);
            let item = activity(StreamDestination::person("jdoe", OWNER));
            let decision =
                evaluator(&directory).evaluate(&principal(OWNER, "jdoe"), &item, InteractionType::Post);
            assert!(decision.denial_reason().unwrap().is_lookup_failure(), "{:?}", kind);
        }

        for kind in [
            LookupKind::Group,
            LookupKind::ActorId,
            LookupKind::Coordinators,
            LookupKind::Followers,
        ] {
            let directory = directory();
            directory.fail(kind);
            let item = activity(StreamDestination::group("secret", PRIVATE));
            let decision = evaluator(&directory).evaluate(
                &principal(FOLLOWER, "follower"),
                &item,
                InteractionType::View,
            );
            assert!(decision.denial_reason().unwrap().is_lookup_failure(), "{:?}", kind);
        }
    }

    #[test]
    fn test_unknown_group_denied() {
        let directory = directory();
        let item = activity(StreamDestination::group("nowhere", GroupId(99)));
        let decision =
            evaluator(&directory).evaluate(&principal(OWNER, "jdoe"), &item, InteractionType::View);
        assert!(decision.denial_reason().unwrap().is_lookup_failure());
    }
}
