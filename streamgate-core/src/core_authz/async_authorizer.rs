//! Async facade over [`Authorizer`]
//!
//! Collaborators may block on I/O, so each decision runs on tokio's blocking
//! pool instead of the caller's executor thread.

use super::authorizer::{AuthorizationRequest, Authorizer};
use super::decision::{AuthorizationDenied, Decision, DenialReason};
use crate::core_stream::Principal;
use std::sync::Arc;
use tracing::error;

/// Runs authorization off the async executor
#[derive(Clone)]
pub struct AsyncAuthorizer {
    inner: Arc<Authorizer>,
}

impl AsyncAuthorizer {
    pub fn new(inner: Arc<Authorizer>) -> Self {
        Self { inner }
    }

    /// The wrapped synchronous authorizer
    pub fn inner(&self) -> &Arc<Authorizer> {
        &self.inner
    }

    /// Decide `request`. A blocking task that panics or is cancelled denies.
    pub async fn decide(&self, principal: Principal, request: AuthorizationRequest) -> Decision {
        let inner = self.inner.clone();
        let kind = request.kind();
        match tokio::task::spawn_blocking(move || inner.decide(&principal, &request)).await {
            Ok(decision) => decision,
            Err(e) => {
                error!(kind = kind.as_str(), error = %e, "Authorization task failed");
                Decision::deny(DenialReason::Internal(e.to_string()))
            }
        }
    }

    pub async fn authorize(
        &self,
        principal: Principal,
        request: AuthorizationRequest,
    ) -> Result<(), AuthorizationDenied> {
        self.decide(principal, request).await.into_result()
    }
}
