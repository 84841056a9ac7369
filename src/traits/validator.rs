//! Key validator trait abstraction.

use async_trait::async_trait;

use crate::key::ValidationOutcome;

/// Trait for checking a candidate key against the remote authority.
///
/// Implementations hold no state between calls. They must not retry and
/// must not impose a timeout of their own; both are left to callers.
#[async_trait]
pub trait KeyValidator: Send + Sync {
    /// Validate a candidate key.
    ///
    /// An empty or missing candidate is rejected with
    /// [`KeyError::NoKeyProvided`](crate::error::KeyError::NoKeyProvided)
    /// without any remote call.
    async fn validate(&self, candidate: Option<&str>) -> ValidationOutcome;

    /// Whether the candidate is accepted, discarding cause and info.
    async fn is_valid(&self, candidate: Option<&str>) -> bool {
        self.validate(candidate).await.is_accepted()
    }
}
