//! Test fixtures for stream directories and authorizers

use crate::config::PolicyConfig;
use crate::core_authz::{Authorizer, StreamCollaborators};
use crate::core_stream::{
    Activity, ActivityDraft, ActivityId, Comment, CommentId, GroupId, GroupSnapshot,
    InMemoryStreamDirectory, PersonId, PersonSnapshot, Principal, StreamDestination,
};
use std::sync::Arc;

/// Builder for a populated in-memory directory
#[derive(Default)]
pub struct StreamFixture {
    directory: InMemoryStreamDirectory,
}

impl StreamFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn person(self, id: i64, account_id: &str, postable: bool, commentable: bool) -> Self {
        self.directory.insert_person(
            PersonSnapshot::new(PersonId(id), account_id).with_toggles(postable, commentable),
        );
        self
    }

    pub fn group(self, group: GroupSnapshot) -> Self {
        self.directory.insert_group(group);
        self
    }

    pub fn coordinator(self, group: i64, person: i64) -> Self {
        self.directory.add_coordinator(GroupId(group), PersonId(person));
        self
    }

    pub fn follower(self, group: i64, person: i64) -> Self {
        self.directory.add_follower(GroupId(group), PersonId(person));
        self
    }

    /// Activity `id` on `destination`, acted on by `actor`
    pub fn activity(self, id: i64, destination: StreamDestination, actor: StreamDestination) -> Self {
        self.directory
            .insert_activity(Activity::new(ActivityId(id), destination, actor));
        self
    }

    pub fn comment(self, id: i64, activity: i64, author: i64) -> Self {
        self.directory.insert_comment(Comment::new(
            CommentId(id),
            ActivityId(activity),
            PersonId(author),
        ));
        self
    }

    pub fn visible(self, activity: i64, person: i64) -> Self {
        self.directory.grant_view(ActivityId(activity), PersonId(person));
        self
    }

    pub fn build(self) -> Arc<InMemoryStreamDirectory> {
        Arc::new(self.directory)
    }
}

/// An authorizer over `directory` with the given policy
pub fn authorizer_over(directory: &Arc<InMemoryStreamDirectory>, policy: &PolicyConfig) -> Authorizer {
    Authorizer::new(StreamCollaborators::uniform(directory.clone()), policy)
}

/// An authorizer over `directory` with the default policy
pub fn default_authorizer(directory: &Arc<InMemoryStreamDirectory>) -> Authorizer {
    authorizer_over(directory, &PolicyConfig::default())
}

pub fn principal(id: i64, account_id: &str) -> Principal {
    Principal::new(id, account_id)
}

pub fn person_stream(id: i64, account_id: &str) -> StreamDestination {
    StreamDestination::person(account_id, PersonId(id))
}

pub fn group_stream(id: i64, short_name: &str) -> StreamDestination {
    StreamDestination::group(short_name, GroupId(id))
}

/// A draft posted to `destination` with `actor` as the acting person
pub fn draft(destination: StreamDestination, actor: StreamDestination) -> ActivityDraft {
    ActivityDraft::new(destination, actor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_stream::{ActivityLookup, CoordinatorIdSetLookup, PersonLookup};

    #[test]
    fn test_fixture_populates_directory() {
        let directory = StreamFixture::new()
            .person(1, "jdoe", true, false)
            .group(GroupSnapshot::new(GroupId(6), "secret", false))
            .coordinator(6, 3)
            .activity(42, group_stream(6, "secret"), person_stream(1, "jdoe"))
            .build();

        assert!(!directory.person_by_account_id("jdoe").unwrap().is_commentable);
        assert!(directory.coordinator_ids(GroupId(6)).unwrap().contains(&PersonId(3)));
        assert_eq!(
            directory
                .activity_by_params(&principal(1, "jdoe"), ActivityId(42))
                .unwrap()
                .map(|a| a.id),
            Some(ActivityId(42))
        );
    }
}
