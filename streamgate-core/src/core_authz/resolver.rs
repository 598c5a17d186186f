//! Stream destination resolution

use super::decision::DenialReason;
use crate::core_stream::{
    Activity, ActivityId, ActivityLookup, EntityType, Principal, StreamDestination,
};
use std::sync::Arc;
use tracing::{error, warn};

/// A destination the engine knows how to authorize against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedDestination<'a> {
    /// A person's stream, keyed by account id
    Person { account_id: &'a str },
    /// A group's stream, keyed by short name
    Group { short_name: &'a str },
}

/// Classify a destination; anything but PERSON or GROUP is unsupported
pub fn classify(destination: &StreamDestination) -> Result<ResolvedDestination<'_>, DenialReason> {
    match destination.entity_type {
        EntityType::Person => Ok(ResolvedDestination::Person {
            account_id: &destination.unique_identifier,
        }),
        EntityType::Group => Ok(ResolvedDestination::Group {
            short_name: &destination.unique_identifier,
        }),
        other => {
            warn!(destination = %destination, "Unsupported destination stream type");
            Err(DenialReason::UnsupportedDestination(other))
        }
    }
}

/// Retrieves persisted activities for decision paths
pub struct StreamDestinationResolver {
    activities: Arc<dyn ActivityLookup>,
}

impl StreamDestinationResolver {
    pub fn new(activities: Arc<dyn ActivityLookup>) -> Self {
        Self { activities }
    }

    /// Fetch the activity a request refers to. A failed or empty lookup
    /// denies.
    pub fn fetch(&self, principal: &Principal, activity_id: ActivityId) -> Result<Activity, DenialReason> {
        match self.activities.activity_by_params(principal, activity_id) {
            Ok(Some(activity)) => Ok(activity),
            Ok(None) => {
                warn!(activity = %activity_id, "Activity not found");
                Err(DenialReason::ActivityNotFound(activity_id))
            }
            Err(e) => {
                error!(activity = %activity_id, error = %e, "Failed to retrieve activity");
                Err(e.into())
            }
        }
    }
}
