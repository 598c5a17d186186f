//! Reference rules for the `deletable` flag on activities and comments
//!
//! An activity may be deleted by its author, by the owner of the personal
//! stream it was posted to, by a coordinator of the group stream it was
//! posted to, or by a system administrator. A comment may be deleted by
//! the owner of the personal stream, a coordinator of the group stream, or
//! its author.

use super::entity::{Activity, Comment, EntityType, StreamDestination};
use super::lookup::{
    ActivityDeletableSetter, CommentDeletableSetter, CoordinatorIdSetLookup, GroupLookup,
    LookupResult, PersonLookup, SystemAdministratorLookup,
};
use super::types::{same_account, PersonId};
use std::sync::Arc;
use tracing::debug;

/// Deletable-flag rules backed by people, group and administrator lookups
pub struct StreamDeletableRules {
    people: Arc<dyn PersonLookup>,
    groups: Arc<dyn GroupLookup>,
    coordinators: Arc<dyn CoordinatorIdSetLookup>,
    administrators: Arc<dyn SystemAdministratorLookup>,
    case_insensitive_account_ids: bool,
}

impl StreamDeletableRules {
    pub fn new(
        people: Arc<dyn PersonLookup>,
        groups: Arc<dyn GroupLookup>,
        coordinators: Arc<dyn CoordinatorIdSetLookup>,
        administrators: Arc<dyn SystemAdministratorLookup>,
    ) -> Self {
        Self {
            people,
            groups,
            coordinators,
            administrators,
            case_insensitive_account_ids: true,
        }
    }

    /// Compare account ids exactly instead of ignoring ASCII case
    pub fn with_case_sensitive_account_ids(mut self) -> Self {
        self.case_insensitive_account_ids = false;
        self
    }

    fn owns_person_stream(&self, account_id: &str, stream: &StreamDestination) -> bool {
        stream.entity_type == EntityType::Person
            && same_account(
                account_id,
                &stream.unique_identifier,
                self.case_insensitive_account_ids,
            )
    }

    fn person_id(&self, account_id: &str) -> LookupResult<PersonId> {
        Ok(self.people.person_by_account_id(account_id)?.id)
    }

    fn coordinates_group_stream(
        &self,
        person: PersonId,
        stream: &StreamDestination,
    ) -> LookupResult<bool> {
        if stream.entity_type != EntityType::Group {
            return Ok(false);
        }
        let group = self.groups.group_by_short_name(&stream.unique_identifier)?;
        Ok(self.coordinators.coordinator_ids(group.entity_id)?.contains(&person))
    }
}

impl ActivityDeletableSetter for StreamDeletableRules {
    fn set_deletable(&self, account_id: &str, activity: &mut Activity) -> LookupResult<()> {
        if account_id.is_empty() {
            activity.deletable = false;
            return Ok(());
        }

        // author
        if self.owns_person_stream(account_id, &activity.actor) {
            activity.deletable = true;
            return Ok(());
        }

        // personal stream owner
        if self.owns_person_stream(account_id, &activity.destination) {
            activity.deletable = true;
            return Ok(());
        }

        // group coordinator
        let person = self.person_id(account_id)?;
        if self.coordinates_group_stream(person, &activity.destination)? {
            activity.deletable = true;
            return Ok(());
        }

        // system administrator
        activity.deletable = self.administrators.system_administrator_ids()?.contains(&person);
        debug!(
            activity = %activity.id,
            account = account_id,
            deletable = activity.deletable,
            "Activity deletable flag set"
        );
        Ok(())
    }
}

impl CommentDeletableSetter for StreamDeletableRules {
    fn set_deletable(
        &self,
        account_id: &str,
        parent_activity: &Activity,
        comments: &mut [Comment],
    ) -> LookupResult<()> {
        if account_id.is_empty() {
            comments.iter_mut().for_each(|c| c.deletable = false);
            return Ok(());
        }

        // personal stream owner
        if self.owns_person_stream(account_id, &parent_activity.destination) {
            comments.iter_mut().for_each(|c| c.deletable = true);
            return Ok(());
        }

        // group coordinator
        let person = self.person_id(account_id)?;
        if self.coordinates_group_stream(person, &parent_activity.destination)? {
            comments.iter_mut().for_each(|c| c.deletable = true);
            return Ok(());
        }

        // comment author
        for comment in comments.iter_mut() {
            comment.deletable = comment.author_id == person;
        }
        Ok(())
    }
}
