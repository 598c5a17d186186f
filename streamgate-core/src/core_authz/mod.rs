//! Stream authorization decisions
//!
//! Every request goes through [`Authorizer`], which picks one of the
//! decision paths:
//!
//! - [`PostAuthorizer`]: posting a new activity
//! - [`ActivityInteractionAuthorizer`]: POST, COMMENT or VIEW against an existing activity
//! - [`ActivityDeleteAuthorizer`] and [`CommentDeleteAuthorizer`]: deletes
//! - [`ViewAuthorizer`]: security-trimmed VIEW
//!
//! Decisions fail closed. A collaborator that errors or returns nothing
//! produces a denial, never an allow.

pub mod async_authorizer;
pub mod authorizer;
pub mod decision;
pub mod evaluator;
pub mod interaction;
pub mod modification;
pub mod policy;
pub mod post;
pub mod resolver;
pub mod view;

pub use async_authorizer::AsyncAuthorizer;
pub use authorizer::{AuthorizationRequest, Authorizer, StreamCollaborators};
pub use decision::{AuthorizationDenied, Decision, DenialReason, RequestKind};
pub use evaluator::{decide_for_role, MembershipEvaluator, StreamRole};
pub use interaction::ActivityInteractionAuthorizer;
pub use modification::{ActivityDeleteAuthorizer, CommentDeleteAuthorizer};
pub use policy::{evaluate_interaction, evaluate_privileged};
pub use post::{PostAuthorizer, PostOwnerMatch};
pub use resolver::{classify, ResolvedDestination, StreamDestinationResolver};
pub use view::ViewAuthorizer;
