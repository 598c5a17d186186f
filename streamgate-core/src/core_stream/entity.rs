//! Stream entity snapshots: activities, comments, people and groups

use super::types::{ActivityId, CommentId, GroupId, PersonId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Kind of entity a stream belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    /// A person's own stream
    Person,
    /// A group stream
    Group,
    /// An application stream
    Application,
    /// Type was never populated
    NotSet,
}

impl EntityType {
    /// Stable string form used in logs and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Person => "PERSON",
            EntityType::Group => "GROUP",
            EntityType::Application => "APPLICATION",
            EntityType::NotSet => "NOTSET",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interaction a principal wants to perform against an activity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InteractionType {
    /// Post to the stream
    Post,
    /// Comment on an activity
    Comment,
    /// View an activity
    View,
    /// Type was never populated
    NotSet,
}

impl InteractionType {
    /// Stable string form used in logs and metrics labels
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionType::Post => "POST",
            InteractionType::Comment => "COMMENT",
            InteractionType::View => "VIEW",
            InteractionType::NotSet => "NOTSET",
        }
    }
}

impl fmt::Display for InteractionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stream an activity targets, or the entity acting on it
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamDestination {
    /// Kind of stream
    #[serde(rename = "type")]
    pub entity_type: EntityType,

    /// Account id for people, short name for groups
    pub unique_identifier: String,

    /// Numeric id of the owning entity
    pub entity_id: i64,
}

impl StreamDestination {
    /// A person's stream
    pub fn person(account_id: impl Into<String>, id: PersonId) -> Self {
        Self {
            entity_type: EntityType::Person,
            unique_identifier: account_id.into(),
            entity_id: id.0,
        }
    }

    /// A group's stream
    pub fn group(short_name: impl Into<String>, id: GroupId) -> Self {
        Self {
            entity_type: EntityType::Group,
            unique_identifier: short_name.into(),
            entity_id: id.0,
        }
    }

    /// A stream of an arbitrary type
    pub fn of_type(
        entity_type: EntityType,
        unique_identifier: impl Into<String>,
        entity_id: i64,
    ) -> Self {
        Self {
            entity_type,
            unique_identifier: unique_identifier.into(),
            entity_id,
        }
    }
}

impl fmt::Display for StreamDestination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.entity_type, self.unique_identifier)
    }
}

/// Anything that names a destination stream and an actor: persisted
/// activities and not-yet-persisted drafts
pub trait StreamItem: Send + Sync {
    /// The stream the item targets
    fn destination(&self) -> &StreamDestination;

    /// The entity acting
    fn actor(&self) -> &StreamDestination;
}

/// A persisted activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: ActivityId,

    pub destination: StreamDestination,

    pub actor: StreamDestination,

    /// Populated by an [`ActivityDeletableSetter`](super::lookup::ActivityDeletableSetter)
    #[serde(default)]
    pub deletable: bool,
}

impl Activity {
    /// Create an activity that is not (yet) deletable
    pub fn new(id: ActivityId, destination: StreamDestination, actor: StreamDestination) -> Self {
        Self {
            id,
            destination,
            actor,
            deletable: false,
        }
    }
}

impl StreamItem for Activity {
    fn destination(&self) -> &StreamDestination {
        &self.destination
    }

    fn actor(&self) -> &StreamDestination {
        &self.actor
    }
}

/// An activity about to be posted; it has no id yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub destination: StreamDestination,

    pub actor: StreamDestination,
}

impl ActivityDraft {
    pub fn new(destination: StreamDestination, actor: StreamDestination) -> Self {
        Self { destination, actor }
    }
}

impl StreamItem for ActivityDraft {
    fn destination(&self) -> &StreamDestination {
        &self.destination
    }

    fn actor(&self) -> &StreamDestination {
        &self.actor
    }
}

/// A persisted comment on an activity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,

    /// Parent activity
    pub activity_id: ActivityId,

    /// Person who wrote the comment
    pub author_id: PersonId,

    /// Populated by a [`CommentDeletableSetter`](super::lookup::CommentDeletableSetter)
    #[serde(default)]
    pub deletable: bool,
}

impl Comment {
    pub fn new(id: CommentId, activity_id: ActivityId, author_id: PersonId) -> Self {
        Self {
            id,
            activity_id,
            author_id,
            deletable: false,
        }
    }
}

/// Per-entity toggles gating non-privileged interactions
pub trait StreamToggles {
    /// Whether non-privileged principals may post to the stream
    fn is_stream_postable(&self) -> bool;

    /// Whether non-privileged principals may comment in the stream
    fn is_commentable(&self) -> bool;
}

/// Read snapshot of a group
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupSnapshot {
    pub entity_id: GroupId,

    pub short_name: String,

    pub is_public: bool,

    pub is_stream_postable: bool,

    pub is_commentable: bool,

    /// Coordinators as cached on the group itself. Decisions always use
    /// [`CoordinatorIdSetLookup`](super::lookup::CoordinatorIdSetLookup).
    #[serde(default)]
    pub coordinator_ids: HashSet<PersonId>,
}

impl GroupSnapshot {
    /// A group with both toggles enabled and no coordinators
    pub fn new(entity_id: GroupId, short_name: impl Into<String>, is_public: bool) -> Self {
        Self {
            entity_id,
            short_name: short_name.into(),
            is_public,
            is_stream_postable: true,
            is_commentable: true,
            coordinator_ids: HashSet::new(),
        }
    }

    pub fn with_toggles(mut self, postable: bool, commentable: bool) -> Self {
        self.is_stream_postable = postable;
        self.is_commentable = commentable;
        self
    }

    pub fn with_coordinator(mut self, person: PersonId) -> Self {
        self.coordinator_ids.insert(person);
        self
    }

    /// The stream destination that targets this group
    pub fn destination(&self) -> StreamDestination {
        StreamDestination::group(self.short_name.clone(), self.entity_id)
    }
}

impl StreamToggles for GroupSnapshot {
    fn is_stream_postable(&self) -> bool {
        self.is_stream_postable
    }

    fn is_commentable(&self) -> bool {
        self.is_commentable
    }
}

/// Read snapshot of a person
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonSnapshot {
    pub id: PersonId,

    pub account_id: String,

    pub is_stream_postable: bool,

    pub is_commentable: bool,
}

impl PersonSnapshot {
    /// A person with both toggles enabled
    pub fn new(id: PersonId, account_id: impl Into<String>) -> Self {
        Self {
            id,
            account_id: account_id.into(),
            is_stream_postable: true,
            is_commentable: true,
        }
    }

    pub fn with_toggles(mut self, postable: bool, commentable: bool) -> Self {
        self.is_stream_postable = postable;
        self.is_commentable = commentable;
        self
    }

    /// The stream destination that targets this person
    pub fn destination(&self) -> StreamDestination {
        StreamDestination::person(self.account_id.clone(), self.id)
    }
}

impl StreamToggles for PersonSnapshot {
    fn is_stream_postable(&self) -> bool {
        self.is_stream_postable
    }

    fn is_commentable(&self) -> bool {
        self.is_commentable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_constructors() {
        let person = StreamDestination::person("jdoe", PersonId(1));
        assert_eq!(person.entity_type, EntityType::Person);
        assert_eq!(person.unique_identifier, "jdoe");
        assert_eq!(person.entity_id, 1);
        assert_eq!(person.to_string(), "PERSON:jdoe");

        let group = StreamDestination::group("rustaceans", GroupId(6));
        assert_eq!(group.entity_type, EntityType::Group);
        assert_eq!(group.entity_id, 6);
    }

    #[test]
    fn test_snapshot_destinations_match_identity() {
        let group = GroupSnapshot::new(GroupId(6), "rustaceans", false);
        assert_eq!(group.destination(), StreamDestination::group("rustaceans", GroupId(6)));

        let person = PersonSnapshot::new(PersonId(3), "jdoe");
        assert_eq!(person.destination(), StreamDestination::person("jdoe", PersonId(3)));
    }

    #[test]
    fn test_new_activity_is_not_deletable() {
        let activity = Activity::new(
            ActivityId(42),
            StreamDestination::person("jdoe", PersonId(1)),
            StreamDestination::person("jdoe", PersonId(1)),
        );
        assert!(!activity.deletable);
    }

    #[test]
    fn test_toggles_builder() {
        let group = GroupSnapshot::new(GroupId(1), "g", true).with_toggles(false, true);
        assert!(!group.is_stream_postable());
        assert!(group.is_commentable());

        let person = PersonSnapshot::new(PersonId(1), "p").with_toggles(true, false);
        assert!(person.is_stream_postable());
        assert!(!person.is_commentable());
    }

    #[test]
    fn test_entity_type_wire_names() {
        let json = serde_json::to_string(&EntityType::NotSet).unwrap();
        assert_eq!(json, "\"NOT_SET\"");
        let parsed: InteractionType = serde_json::from_str("\"COMMENT\"").unwrap();
        assert_eq!(parsed, InteractionType::Comment);
    }
}
