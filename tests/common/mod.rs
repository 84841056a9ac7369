//! Shared fixtures for integration tests.
//!
//! # Example
//!
//! ```ignore
//! let fx = Fixture::new(Some("abc"), MockValidator::new().accepting("abc"));
//! fx.state.startup_validation();
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use keyward::adapters::mock::{InMemoryKeyStore, MockValidator, RecordingNotifier};
use keyward::key::{KeyState, PromptCoordinator, StoredKey};

/// A key state wired to in-memory doubles, plus a coordinator on top.
pub struct Fixture {
    pub store: InMemoryKeyStore,
    pub validator: MockValidator,
    pub notifier: RecordingNotifier,
    pub state: Arc<KeyState>,
    pub prompt: PromptCoordinator,
}

impl Fixture {
    /// Build a fixture whose store holds `stored` (if any).
    pub fn new(stored: Option<&str>, validator: MockValidator) -> Self {
        Self::with_record(stored.map(StoredKey::new), validator)
    }

    pub fn with_record(stored: Option<StoredKey>, validator: MockValidator) -> Self {
        let store = match stored {
            Some(record) => InMemoryKeyStore::with_record(record),
            None => InMemoryKeyStore::new(),
        };
        let notifier = RecordingNotifier::new();
        let state = Arc::new(
            KeyState::load(Box::new(store.clone()), Arc::new(validator.clone()))
                .with_notifier(Arc::new(notifier.clone())),
        );
        let prompt = PromptCoordinator::new(Arc::clone(&state), Arc::new(notifier.clone()));

        Self {
            store,
            validator,
            notifier,
            state,
            prompt,
        }
    }
}

/// Sample body the remote authority sends for an accepted key.
pub fn accepted_body(key: &str) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "record": {
            "key": key,
            "owner": "f7c77d999f154a66a87dc4a51ef30d19",
            "limit": 120,
            "queriesInPastMin": 4,
            "totalQueries": 1234567
        }
    })
}

/// Sample body the remote authority sends for a rejected key.
pub fn rejected_body(cause: &str) -> serde_json::Value {
    serde_json::json!({
        "success": false,
        "cause": cause
    })
}
