//! Default actor resolution: the principal acts for itself

use super::entity::StreamItem;
use super::lookup::{ActorIdentityResolver, LookupFailure, LookupResult};
use super::types::{PersonId, Principal};

/// Resolves the actor of any activity to the requesting principal
#[derive(Debug, Clone, Copy, Default)]
pub struct PrincipalActorResolver;

impl ActorIdentityResolver for PrincipalActorResolver {
    fn actor_account_id(
        &self,
        principal: &Principal,
        _item: &dyn StreamItem,
    ) -> LookupResult<String> {
        if principal.account_id.is_empty() {
            return Err(LookupFailure::MissingAccountId);
        }
        Ok(principal.account_id.clone())
    }

    fn actor_id(&self, principal: &Principal, _item: &dyn StreamItem) -> LookupResult<PersonId> {
        Ok(principal.id)
    }
}
