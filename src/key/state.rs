//! The key and its validity.
//!
//! [`KeyState`] is the only place the key is mutated. Both ways a key can
//! be adopted, a trusted [`replace`](KeyState::replace) and a checked
//! [`try_set`](KeyState::try_set), go through the same step: update key and
//! validity together, persist, then notify waiters. That step runs under a
//! mutation lock, so two adoptions never interleave their notification
//! passes.
//!
//! Validity starts out false. [`startup_validation`](KeyState::startup_validation)
//! checks the stored key once per process; until it resolves every query
//! sees "no usable key".

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use futures::future::{self, BoxFuture, Shared};
use futures::FutureExt;
use once_cell::sync::OnceCell;
use tracing::{debug, info, warn};

use super::record::{mask_key, StoredKey};
use super::validator::{KeyInfo, ValidationOutcome};
use super::waiters::{WaiterMode, WaiterRegistry};
use crate::error::{KeyError, KeyResult};
use crate::traits::{KeyStore, KeyValidator, Notifier};

/// The memoized startup check of the stored key.
///
/// Every clone resolves to the same outcome: the usable key, or why there
/// is none.
pub type ValidationSession = Shared<BoxFuture<'static, KeyResult<String>>>;

#[derive(Debug, Default)]
struct KeyRecord {
    key: String,
    valid: bool,
    hidden: bool,
}

impl KeyRecord {
    fn to_stored(&self) -> StoredKey {
        StoredKey {
            key: self.key.clone(),
            hidden: self.hidden,
        }
    }
}

/// Single source of truth for the managed key.
pub struct KeyState {
    record: Mutex<KeyRecord>,
    /// Serializes adoption, persistence and notification.
    mutation: Mutex<()>,
    store: Box<dyn KeyStore>,
    validator: Arc<dyn KeyValidator>,
    notifier: Option<Arc<dyn Notifier>>,
    waiters: WaiterRegistry,
    session: OnceCell<ValidationSession>,
}

impl KeyState {
    /// Load the stored record. The key starts out not valid.
    ///
    /// A record that cannot be read is treated as no key at all.
    pub fn load(store: Box<dyn KeyStore>, validator: Arc<dyn KeyValidator>) -> Self {
        let stored = match store.load() {
            Ok(stored) => stored.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Could not load stored API key, starting without one");
                StoredKey::default()
            }
        };

        debug!(
            has_key = stored.has_key(),
            hidden = stored.hidden,
            "Loaded key record"
        );

        Self {
            record: Mutex::new(KeyRecord {
                key: stored.key,
                valid: false,
                hidden: stored.hidden,
            }),
            mutation: Mutex::new(()),
            store,
            validator,
            notifier: None,
            waiters: WaiterRegistry::new(),
            session: OnceCell::new(),
        }
    }

    /// Report a rejected stored key to this notifier.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = Some(notifier);
        self
    }

    fn record(&self) -> MutexGuard<'_, KeyRecord> {
        self.record.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn serialize_mutation(&self) -> MutexGuard<'_, ()> {
        self.mutation.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The key, only if it is currently known to be valid.
    pub fn current(&self) -> Option<String> {
        let record = self.record();
        record.valid.then(|| record.key.clone())
    }

    /// Whether any key is stored, valid or not.
    pub fn has_value(&self) -> bool {
        !self.record().key.is_empty()
    }

    /// The stored key regardless of validity.
    pub fn value(&self) -> Option<String> {
        let record = self.record();
        (!record.key.is_empty()).then(|| record.key.clone())
    }

    pub fn is_hidden(&self) -> bool {
        self.record().hidden
    }

    /// Flip the display preference and persist it. Returns the new value.
    pub fn toggle_hidden(&self) -> bool {
        let _serial = self.serialize_mutation();
        let (hidden, stored) = {
            let mut record = self.record();
            record.hidden = !record.hidden;
            (record.hidden, record.to_stored())
        };
        self.persist(&stored);
        hidden
    }

    pub fn waiters(&self) -> &WaiterRegistry {
        &self.waiters
    }

    /// Register a callback for accepted keys.
    ///
    /// Callbacks run inside the mutation step and must not call
    /// [`replace`](Self::replace), [`try_set`](Self::try_set) or
    /// [`toggle_hidden`](Self::toggle_hidden). Queries and
    /// [`invalidate`](Self::invalidate) are fine.
    pub fn on_key_change<F>(&self, callback: F, mode: WaiterMode)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.waiters.register(callback, mode);
    }

    /// Adopt a key issued by a trusted source without checking it.
    pub fn replace(&self, key: impl Into<String>) {
        let key = key.into();
        info!(key = %mask_key(&key), "API key replaced");
        self.adopt(&key);
    }

    /// Check `candidate` with the remote authority and adopt it if accepted.
    ///
    /// A rejected candidate leaves the current key and its validity alone.
    pub async fn try_set(&self, candidate: &str) -> KeyResult<KeyInfo> {
        match self.validator.validate(Some(candidate)).await {
            ValidationOutcome::Accepted(info) => {
                info!(key = %mask_key(candidate), owner = %info.owner, "API key set");
                self.adopt(candidate);
                Ok(info)
            }
            ValidationOutcome::Rejected(err) => {
                debug!(key = %mask_key(candidate), "Candidate key not adopted");
                Err(err)
            }
        }
    }

    /// Mark the key as no longer valid, keeping the value.
    ///
    /// Only the record lock is taken, so waiter callbacks may call this.
    pub fn invalidate(&self) {
        let mut record = self.record();
        if record.valid {
            warn!(key = %mask_key(&record.key), "API key invalidated");
        }
        record.valid = false;
    }

    /// Usage info for `candidate`, or for the stored key when `None`.
    ///
    /// This never changes state; callers decide what a failure on their own
    /// key means.
    pub async fn info(&self, candidate: Option<&str>) -> KeyResult<KeyInfo> {
        let stored;
        let candidate = match candidate {
            Some(c) => Some(c),
            None => {
                stored = self.value();
                stored.as_deref()
            }
        };
        self.validator.validate(candidate).await.into_result()
    }

    /// The startup validation session, if it has been started.
    pub fn session(&self) -> Option<ValidationSession> {
        self.session.get().cloned()
    }

    /// Start checking the stored key, once per process.
    ///
    /// The check is spawned immediately; later calls return the same
    /// session. With no stored key the session is already resolved with
    /// [`KeyError::NoKeyProvided`]. Accepting the stored key notifies
    /// waiters like any other adoption; a rejection is reported only if
    /// the checked key is still the stored one. Must be called within a
    /// Tokio runtime.
    pub fn startup_validation(self: &Arc<Self>) -> ValidationSession {
        self.session
            .get_or_init(|| match self.value() {
                Some(key) => self.spawn_validation(key),
                None => future::ready(Err(KeyError::NoKeyProvided)).boxed().shared(),
            })
            .clone()
    }

    fn spawn_validation(self: &Arc<Self>, key: String) -> ValidationSession {
        let state = Arc::clone(self);
        let handle = tokio::spawn(async move {
            debug!(key = %mask_key(&key), "Startup validation started");
            match state.validator.validate(Some(&key)).await {
                ValidationOutcome::Accepted(_) => {
                    state.mark_valid_if_current(&key);
                    state.current().ok_or(KeyError::NoKeyProvided)
                }
                ValidationOutcome::Rejected(err) => {
                    match &state.notifier {
                        Some(notifier) if state.holds_value(&key) => {
                            notifier.stored_key_rejected(&err)
                        }
                        _ => {}
                    }
                    // A key adopted while the check was running stays usable.
                    state.current().ok_or(err)
                }
            }
        });

        async move {
            handle.await.unwrap_or_else(|e| {
                Err(KeyError::Transport {
                    message: format!("startup validation task failed: {}", e),
                })
            })
        }
        .boxed()
        .shared()
    }

    fn holds_value(&self, key: &str) -> bool {
        self.record().key == key
    }

    /// Accept the checked key unless a newer one was adopted meanwhile.
    /// Waiters are notified when validity actually changes.
    fn mark_valid_if_current(&self, key: &str) {
        let _serial = self.serialize_mutation();
        let became_valid = {
            let mut record = self.record();
            if record.key != key {
                debug!("Key changed during startup validation, keeping newer key");
                return;
            }
            let was_valid = std::mem::replace(&mut record.valid, true);
            !was_valid
        };
        if became_valid {
            info!(key = %mask_key(key), "Stored API key is valid");
            self.waiters.notify_all(key);
        }
    }

    fn adopt(&self, key: &str) {
        let _serial = self.serialize_mutation();
        let stored = {
            let mut record = self.record();
            record.key = key.to_string();
            record.valid = true;
            record.to_stored()
        };
        self.persist(&stored);
        self.waiters.notify_all(key);
    }

    fn persist(&self, stored: &StoredKey) {
        if let Err(e) = self.store.save(stored) {
            warn!(error = %e, "Failed to save API key");
        }
    }
}

impl fmt::Debug for KeyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let record = self.record();
        f.debug_struct("KeyState")
            .field("key", &mask_key(&record.key))
            .field("valid", &record.valid)
            .field("hidden", &record.hidden)
            .field("waiters", &self.waiters)
            .finish()
    }
}
