//! Waiting for a usable key.
//!
//! Features that cannot run without a key call
//! [`PromptCoordinator::await_credential`]. The fast path returns the valid
//! key right away. Otherwise the startup validation is awaited first, and
//! only if that does not produce a key is the user told to supply one. A
//! single-fire waiter then races the deadline. Whichever side loses is
//! inert: a waiter firing after the deadline sends into a dropped channel.
//!
//! Waiters cannot be deregistered. A waiter left behind by a timeout, or by
//! the re-check that finds a key adopted just before registration, stays in
//! the registry until the next adoption fires and prunes it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tracing::{debug, info, warn};

use super::state::KeyState;
use super::waiters::WaiterMode;
use crate::error::{KeyError, KeyResult};
use crate::traits::Notifier;

/// How long a feature waits for a key unless told otherwise.
pub const DEFAULT_PROMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Gate for features that need a usable key.
///
/// Concurrent callers are independent: each registers its own waiter and
/// runs its own deadline, and one adoption releases all of them.
#[derive(Clone)]
pub struct PromptCoordinator {
    state: Arc<KeyState>,
    notifier: Arc<dyn Notifier>,
    timeout: Duration,
}

impl PromptCoordinator {
    pub fn new(state: Arc<KeyState>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            state,
            notifier,
            timeout: DEFAULT_PROMPT_TIMEOUT,
        }
    }

    /// Set the deadline used by [`await_key`](Self::await_key).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn state(&self) -> &Arc<KeyState> {
        &self.state
    }

    /// [`await_credential`](Self::await_credential) with the configured deadline.
    pub async fn await_key(&self, feature: &str) -> KeyResult<String> {
        self.await_credential(feature, self.timeout).await
    }

    /// Resolve with a usable key, waiting up to `deadline` for one.
    ///
    /// # Errors
    ///
    /// [`KeyError::PromptTimeout`] if no key became usable in time. A key
    /// adopted after that does not revive the call.
    pub async fn await_credential(&self, feature: &str, deadline: Duration) -> KeyResult<String> {
        if let Some(key) = self.state.current() {
            return Ok(key);
        }

        match tokio::time::timeout(deadline, self.wait_for_key(feature)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(feature, waited = ?deadline, "Gave up waiting for an API key");
                Err(KeyError::PromptTimeout {
                    feature: feature.to_string(),
                    waited: deadline,
                })
            }
        }
    }

    async fn wait_for_key(&self, feature: &str) -> KeyResult<String> {
        if let Some(session) = self.state.session() {
            debug!(feature, "Waiting on startup validation");
            let _ = session.await;
            if let Some(key) = self.state.current() {
                return Ok(key);
            }
        }

        let (tx, rx) = oneshot::channel();
        let mut tx = Some(tx);
        self.state.on_key_change(
            move |key: &str| {
                if let Some(tx) = tx.take() {
                    // Receiver is gone once the deadline passed.
                    let _ = tx.send(key.to_string());
                }
            },
            WaiterMode::SingleFire,
        );

        // A key adopted between the checks above and registering would
        // otherwise be missed. The waiter is pruned by the next adoption.
        if let Some(key) = self.state.current() {
            return Ok(key);
        }

        info!(feature, "Waiting for an API key");
        self.notifier.key_required(feature);

        rx.await.map_err(|_| KeyError::NoKeyProvided)
    }
}

impl std::fmt::Debug for PromptCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptCoordinator")
            .field("state", &self.state)
            .field("timeout", &self.timeout)
            .finish()
    }
}
