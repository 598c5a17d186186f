//! In-memory stream directory
//!
//! Implements every collaborator trait over plain maps. View visibility and
//! deletability are explicit grants rather than computed rules. Any lookup
//! can be switched to fail, which is how fail-closed behavior is exercised.

use super::entity::{Activity, Comment, GroupSnapshot, PersonSnapshot, StreamItem};
use super::lookup::{
    ActivityDeletableSetter, ActivityLookup, ActorIdentityResolver, CommentDeletableSetter,
    CommentLookup, CoordinatorIdSetLookup, FollowerIdListLookup, GroupLookup, LookupFailure,
    LookupResult, PersonLookup, SecurityTrimmer, SystemAdministratorLookup,
};
use super::types::{ActivityId, CommentId, GroupId, PersonId, Principal};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Names each collaborator call the directory serves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Person,
    Group,
    Coordinators,
    Followers,
    ActivityByParams,
    ActivitiesByIds,
    Comments,
    ActorAccountId,
    ActorId,
    Trim,
    ActivityDeletable,
    CommentDeletable,
    SystemAdministrators,
}

#[derive(Debug, Default)]
struct DirectoryState {
    people: HashMap<String, PersonSnapshot>,
    groups: Vec<GroupSnapshot>,
    coordinators: HashMap<GroupId, HashSet<PersonId>>,
    followers: HashMap<GroupId, Vec<PersonId>>,
    activities: HashMap<ActivityId, Activity>,
    comments: HashMap<CommentId, Comment>,
    visible: HashSet<(ActivityId, PersonId)>,
    deletable_activities: HashSet<(String, ActivityId)>,
    deletable_comments: HashSet<(String, CommentId)>,
    administrators: HashSet<PersonId>,
    failing: HashSet<LookupKind>,
}

/// Thread-safe in-memory implementation of all stream collaborators
#[derive(Debug, Default)]
pub struct InMemoryStreamDirectory {
    state: RwLock<DirectoryState>,
    calls: Mutex<HashMap<LookupKind, usize>>,
}

impl InMemoryStreamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    fn write(&self) -> RwLockWriteGuard<'_, DirectoryState> {
        self.state.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn read(&self) -> RwLockReadGuard<'_, DirectoryState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Count the call and fail it if `kind` was switched to fail
    fn enter(&self, kind: LookupKind) -> LookupResult<RwLockReadGuard<'_, DirectoryState>> {
        {
            let mut calls = self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
            *calls.entry(kind).or_insert(0) += 1;
        }
        let state = self.read();
        if state.failing.contains(&kind) {
            return Err(LookupFailure::Backend(anyhow::anyhow!(
                "{:?} lookup unavailable",
                kind
            )));
        }
        Ok(state)
    }

    pub fn insert_person(&self, person: PersonSnapshot) {
        self.write().people.insert(person.account_id.clone(), person);
    }

    /// Insert a group. Inserting two groups with the same short name is
    /// allowed and makes unique lookups of that name fail.
    pub fn insert_group(&self, group: GroupSnapshot) {
        let mut state = self.write();
        let coordinators = state.coordinators.entry(group.entity_id).or_default();
        coordinators.extend(group.coordinator_ids.iter().copied());
        state.groups.push(group);
    }

    pub fn add_coordinator(&self, group: GroupId, person: PersonId) {
        self.write().coordinators.entry(group).or_default().insert(person);
    }

    pub fn add_follower(&self, group: GroupId, person: PersonId) {
        let mut state = self.write();
        let followers = state.followers.entry(group).or_default();
        if !followers.contains(&person) {
            followers.push(person);
        }
    }

    pub fn insert_activity(&self, activity: Activity) {
        self.write().activities.insert(activity.id, activity);
    }

    pub fn insert_comment(&self, comment: Comment) {
        self.write().comments.insert(comment.id, comment);
    }

    /// Let `person` see `activity` through the security trimmer
    pub fn grant_view(&self, activity: ActivityId, person: PersonId) {
        self.write().visible.insert((activity, person));
    }

    /// Make `activity` deletable by `account_id`
    pub fn grant_activity_delete(&self, account_id: impl Into<String>, activity: ActivityId) {
        self.write()
            .deletable_activities
            .insert((account_id.into(), activity));
    }

    /// Make `comment` deletable by `account_id`
    pub fn grant_comment_delete(&self, account_id: impl Into<String>, comment: CommentId) {
        self.write()
            .deletable_comments
            .insert((account_id.into(), comment));
    }

    pub fn add_system_administrator(&self, person: PersonId) {
        self.write().administrators.insert(person);
    }

    /// Make every subsequent call of `kind` fail with a backend error
    pub fn fail(&self, kind: LookupKind) {
        self.write().failing.insert(kind);
    }

    /// Restore a lookup switched off by [`fail`](Self::fail)
    pub fn recover(&self, kind: LookupKind) {
        self.write().failing.remove(&kind);
    }

    /// Number of times `kind` was called
    pub fn call_count(&self, kind: LookupKind) -> usize {
        let calls = self.calls.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        calls.get(&kind).copied().unwrap_or(0)
    }
}

impl PersonLookup for InMemoryStreamDirectory {
    fn person_by_account_id(&self, account_id: &str) -> LookupResult<PersonSnapshot> {
        let state = self.enter(LookupKind::Person)?;
        state
            .people
            .get(account_id)
            .cloned()
            .ok_or_else(|| LookupFailure::not_found("person", account_id))
    }
}

impl GroupLookup for InMemoryStreamDirectory {
    fn groups_by_short_names(&self, short_names: &[String]) -> LookupResult<Vec<GroupSnapshot>> {
        let state = self.enter(LookupKind::Group)?;
        Ok(state
            .groups
            .iter()
            .filter(|g| short_names.contains(&g.short_name))
            .cloned()
            .collect())
    }
}

impl CoordinatorIdSetLookup for InMemoryStreamDirectory {
    fn coordinator_ids(&self, group: GroupId) -> LookupResult<HashSet<PersonId>> {
        let state = self.enter(LookupKind::Coordinators)?;
        Ok(state.coordinators.get(&group).cloned().unwrap_or_default())
    }
}

impl FollowerIdListLookup for InMemoryStreamDirectory {
    fn follower_ids(&self, group: GroupId) -> LookupResult<Vec<PersonId>> {
        let state = self.enter(LookupKind::Followers)?;
        Ok(state.followers.get(&group).cloned().unwrap_or_default())
    }
}

impl ActivityLookup for InMemoryStreamDirectory {
    fn activity_by_params(
        &self,
        _principal: &Principal,
        activity_id: ActivityId,
    ) -> LookupResult<Option<Activity>> {
        let state = self.enter(LookupKind::ActivityByParams)?;
        Ok(state.activities.get(&activity_id).cloned())
    }

    fn activities_by_ids(
        &self,
        ids: &[ActivityId],
        _requesting_account: Option<&str>,
    ) -> LookupResult<Vec<Activity>> {
        let state = self.enter(LookupKind::ActivitiesByIds)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.activities.get(id).cloned())
            .collect())
    }
}

impl CommentLookup for InMemoryStreamDirectory {
    fn comments_by_ids(&self, ids: &[CommentId]) -> LookupResult<Vec<Comment>> {
        let state = self.enter(LookupKind::Comments)?;
        Ok(ids
            .iter()
            .filter_map(|id| state.comments.get(id).cloned())
            .collect())
    }
}

impl ActorIdentityResolver for InMemoryStreamDirectory {
    fn actor_account_id(
        &self,
        principal: &Principal,
        _item: &dyn StreamItem,
    ) -> LookupResult<String> {
        let _state = self.enter(LookupKind::ActorAccountId)?;
        if principal.account_id.is_empty() {
            return Err(LookupFailure::MissingAccountId);
        }
        Ok(principal.account_id.clone())
    }

    fn actor_id(&self, principal: &Principal, _item: &dyn StreamItem) -> LookupResult<PersonId> {
        let _state = self.enter(LookupKind::ActorId)?;
        Ok(principal.id)
    }
}

impl SecurityTrimmer for InMemoryStreamDirectory {
    fn trim(&self, ids: &[ActivityId], principal_id: PersonId) -> LookupResult<Vec<ActivityId>> {
        let state = self.enter(LookupKind::Trim)?;
        Ok(ids
            .iter()
            .copied()
            .filter(|id| state.visible.contains(&(*id, principal_id)))
            .collect())
    }
}

impl ActivityDeletableSetter for InMemoryStreamDirectory {
    fn set_deletable(&self, account_id: &str, activity: &mut Activity) -> LookupResult<()> {
        let state = self.enter(LookupKind::ActivityDeletable)?;
        activity.deletable = state
            .deletable_activities
            .contains(&(account_id.to_string(), activity.id));
        Ok(())
    }
}

impl CommentDeletableSetter for InMemoryStreamDirectory {
    fn set_deletable(
        &self,
        account_id: &str,
        _parent_activity: &Activity,
        comments: &mut [Comment],
    ) -> LookupResult<()> {
        let state = self.enter(LookupKind::CommentDeletable)?;
        for comment in comments.iter_mut() {
            comment.deletable = state
                .deletable_comments
                .contains(&(account_id.to_string(), comment.id));
        }
        Ok(())
    }
}

impl SystemAdministratorLookup for InMemoryStreamDirectory {
    fn system_administrator_ids(&self) -> LookupResult<HashSet<PersonId>> {
        let state = self.enter(LookupKind::SystemAdministrators)?;
        Ok(state.administrators.clone())
    }
}
