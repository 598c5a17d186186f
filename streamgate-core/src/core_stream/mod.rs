//! Stream data model and collaborators
//!
//! This module holds the read snapshots the authorization engine reasons
//! about (activities, comments, people, groups) and the collaborator traits
//! through which they are fetched.
//!
//! ## Collaborators
//!
//! - **Lookups**: people, groups, coordinators, followers, activities, comments
//! - **Actor resolution**: who acts on behalf of a principal
//! - **Security trimming**: stream-wide view visibility
//! - **Deletable setters**: populate the `deletable` flag on activities and comments
//!
//! [`memory::InMemoryStreamDirectory`] implements all of them over maps,
//! [`deletable::StreamDeletableRules`] computes deletability from ownership
//! and coordinator status, and [`actor::PrincipalActorResolver`] treats the
//! principal as the actor.

pub mod actor;
pub mod deletable;
pub mod entity;
pub mod lookup;
pub mod memory;
pub mod types;

pub use actor::PrincipalActorResolver;
pub use deletable::StreamDeletableRules;
pub use entity::{
    Activity, ActivityDraft, Comment, EntityType, GroupSnapshot, InteractionType, PersonSnapshot,
    StreamDestination, StreamItem, StreamToggles,
};
pub use lookup::{
    ActivityDeletableSetter, ActivityLookup, ActorIdentityResolver, CommentDeletableSetter,
    CommentLookup, CoordinatorIdSetLookup, FollowerIdListLookup, GroupLookup, LookupFailure,
    LookupResult, PersonLookup, SecurityTrimmer, SystemAdministratorLookup,
};
pub use memory::{InMemoryStreamDirectory, LookupKind};
pub use types::{same_account, ActivityId, CommentId, GroupId, PersonId, Principal};
