//! Policy decisions for social-stream interactions
//!
//! Decides whether a principal may post, comment on, view or delete stream
//! content. Data access goes through the collaborator traits in
//! [`core_stream`]; decisions live in [`core_authz`].
//!
//! ```
//! use std::sync::Arc;
//! use streamgate_core::config::PolicyConfig;
//! use streamgate_core::core_authz::{AuthorizationRequest, Authorizer, StreamCollaborators};
//! use streamgate_core::core_stream::{ActivityId, InMemoryStreamDirectory, PersonId, Principal};
//!
//! let directory = Arc::new(InMemoryStreamDirectory::new());
//! directory.grant_view(ActivityId(42), PersonId(6));
//!
//! let authorizer = Authorizer::new(
//!     StreamCollaborators::uniform(directory),
//!     &PolicyConfig::default(),
//! );
//! let request = AuthorizationRequest::ViewActivity { activity_id: ActivityId(42) };
//! assert!(authorizer.authorize(&Principal::new(6, "homer"), &request).is_ok());
//! ```

pub mod config;
pub mod core_authz;
pub mod core_stream;
pub mod logging;
pub mod metrics;
pub mod test_utils;

pub use config::Config;
pub use core_authz::{
    AsyncAuthorizer, AuthorizationDenied, AuthorizationRequest, Authorizer, Decision,
    DenialReason, StreamCollaborators,
};
pub use core_stream::Principal;
pub use logging::{init_logging, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let _ = LogLevel::Info;
        assert!(Config::default().validate().is_ok());
    }
}
