//! Interaction policy: maps an interaction and a stream's toggles to a decision

use super::decision::{Decision, DenialReason};
use crate::core_stream::{InteractionType, StreamToggles};

/// Decide a non-privileged interaction against a stream's toggles.
///
/// POST consults the postable toggle and COMMENT the commentable toggle.
/// VIEW carries no toggle: by the time this runs, membership has been
/// settled by the caller. Anything else is denied.
pub fn evaluate_interaction(interaction: InteractionType, toggles: &dyn StreamToggles) -> Decision {
    match interaction {
        InteractionType::Post => Decision::allow_if(toggles.is_stream_postable(), || {
            DenialReason::InteractionDisabled { interaction }
        }),
        InteractionType::Comment => Decision::allow_if(toggles.is_commentable(), || {
            DenialReason::InteractionDisabled { interaction }
        }),
        InteractionType::View => Decision::Allowed,
        InteractionType::NotSet => Decision::deny(DenialReason::UnsupportedInteraction(interaction)),
    }
}

/// Privileged principals (stream owners, group coordinators) skip the toggles
/// but still need a recognized interaction type
pub fn evaluate_privileged(interaction: InteractionType) -> Decision {
    match interaction {
        InteractionType::Post | InteractionType::Comment | InteractionType::View => {
            Decision::Allowed
        }
        InteractionType::NotSet => Decision::deny(DenialReason::UnsupportedInteraction(interaction)),
    }
}
