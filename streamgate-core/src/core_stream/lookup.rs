//! Collaborator traits consumed by the authorization engine
//!
//! Persistence, caching and list trimming live behind these traits. Every
//! method reports failure through [`LookupFailure`]; the engine converts any
//! failure into a denial and never retries.

use super::entity::{Activity, Comment, GroupSnapshot, PersonSnapshot, StreamItem};
use super::types::{ActivityId, CommentId, GroupId, PersonId, Principal};
use std::collections::HashSet;
use thiserror::Error;

/// Result type for collaborator calls
pub type LookupResult<T> = Result<T, LookupFailure>;

/// A collaborator could not resolve a required entity
#[derive(Debug, Error)]
pub enum LookupFailure {
    /// No entity matched the key
    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A single-result lookup matched several entities
    #[error("{entity} lookup for {key} matched {count} results, expected exactly one")]
    NotUnique {
        entity: &'static str,
        key: String,
        count: usize,
    },

    /// The principal carries no account id
    #[error("principal has no account id")]
    MissingAccountId,

    /// Storage or transport failure inside the collaborator
    #[error("backend failure: {0}")]
    Backend(#[from] anyhow::Error),
}

impl LookupFailure {
    pub fn not_found(entity: &'static str, key: impl ToString) -> Self {
        LookupFailure::NotFound {
            entity,
            key: key.to_string(),
        }
    }
}

/// Fetches people by account id
pub trait PersonLookup: Send + Sync {
    /// Fetch a person by account id
    fn person_by_account_id(&self, account_id: &str) -> LookupResult<PersonSnapshot>;
}

/// Fetches groups by short name
pub trait GroupLookup: Send + Sync {
    /// Bulk fetch; unknown names are omitted from the result
    fn groups_by_short_names(&self, short_names: &[String]) -> LookupResult<Vec<GroupSnapshot>>;

    /// Fetch exactly one group; zero or several matches fail
    fn group_by_short_name(&self, short_name: &str) -> LookupResult<GroupSnapshot> {
        let mut groups = self.groups_by_short_names(&[short_name.to_string()])?;
        match groups.len() {
            0 => Err(LookupFailure::not_found("group", short_name)),
            1 => Ok(groups.remove(0)),
            count => Err(LookupFailure::NotUnique {
                entity: "group",
                key: short_name.to_string(),
                count,
            }),
        }
    }
}

/// Fetches the people holding coordinator access to a group
pub trait CoordinatorIdSetLookup: Send + Sync {
    fn coordinator_ids(&self, group: GroupId) -> LookupResult<HashSet<PersonId>>;
}

/// Fetches the followers (members) of a group
pub trait FollowerIdListLookup: Send + Sync {
    fn follower_ids(&self, group: GroupId) -> LookupResult<Vec<PersonId>>;
}

/// Fetches activities
pub trait ActivityLookup: Send + Sync {
    /// Resolve the activity a request refers to; `None` when it does not exist
    fn activity_by_params(
        &self,
        principal: &Principal,
        activity_id: ActivityId,
    ) -> LookupResult<Option<Activity>>;

    /// Bulk fetch. `requesting_account` is the companion filter the store may
    /// use to personalize the result; unknown ids are omitted.
    fn activities_by_ids(
        &self,
        ids: &[ActivityId],
        requesting_account: Option<&str>,
    ) -> LookupResult<Vec<Activity>>;
}

/// Fetches comments
pub trait CommentLookup: Send + Sync {
    /// Bulk fetch; unknown ids are omitted
    fn comments_by_ids(&self, ids: &[CommentId]) -> LookupResult<Vec<Comment>>;
}

/// Resolves who is acting on an activity on behalf of a principal
pub trait ActorIdentityResolver: Send + Sync {
    fn actor_account_id(&self, principal: &Principal, item: &dyn StreamItem)
        -> LookupResult<String>;

    fn actor_id(&self, principal: &Principal, item: &dyn StreamItem) -> LookupResult<PersonId>;
}

/// Removes activities a person may not see
pub trait SecurityTrimmer: Send + Sync {
    /// Returns the subset of `ids` visible to `principal_id`
    fn trim(&self, ids: &[ActivityId], principal_id: PersonId) -> LookupResult<Vec<ActivityId>>;
}

/// Computes whether an account may delete an activity
pub trait ActivityDeletableSetter: Send + Sync {
    /// Populate `activity.deletable` for `account_id`
    fn set_deletable(&self, account_id: &str, activity: &mut Activity) -> LookupResult<()>;
}

/// Computes whether an account may delete comments
pub trait CommentDeletableSetter: Send + Sync {
    /// Populate `deletable` on every comment of `parent_activity`
    fn set_deletable(
        &self,
        account_id: &str,
        parent_activity: &Activity,
        comments: &mut [Comment],
    ) -> LookupResult<()>;
}

/// Lists system administrators
pub trait SystemAdministratorLookup: Send + Sync {
    fn system_administrator_ids(&self) -> LookupResult<HashSet<PersonId>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_stream::types::GroupId;

    struct FixedGroups(Vec<GroupSnapshot>);

    impl GroupLookup for FixedGroups {
        fn groups_by_short_names(&self, _: &[String]) -> LookupResult<Vec<GroupSnapshot>> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_unique_group_lookup_zero_matches() {
        let lookup = FixedGroups(vec![]);
        let err = lookup.group_by_short_name("missing").unwrap_err();
        assert!(matches!(err, LookupFailure::NotFound { entity: "group", .. }));
    }

    #[test]
    fn test_unique_group_lookup_single_match() {
        let lookup = FixedGroups(vec![GroupSnapshot::new(GroupId(1), "g", true)]);
        let group = lookup.group_by_short_name("g").unwrap();
        assert_eq!(group.entity_id, GroupId(1));
    }

    #[test]
    fn test_unique_group_lookup_multiple_matches() {
        let lookup = FixedGroups(vec![
            GroupSnapshot::new(GroupId(1), "g", true),
            GroupSnapshot::new(GroupId(2), "g", true),
        ]);
        let err = lookup.group_by_short_name("g").unwrap_err();
        assert!(matches!(err, LookupFailure::NotUnique { count: 2, .. }));
    }

    #[test]
    fn test_lookup_failure_display() {
        let err = LookupFailure::not_found("person", "jdoe");
        assert_eq!(err.to_string(), "person not found: jdoe");

        let err: LookupFailure = anyhow::anyhow!("connection reset").into();
        assert_eq!(err.to_string(), "backend failure: connection reset");
    }
}
