//! Notifier that records what it was asked to show.

use std::sync::{Arc, Mutex};

use crate::error::KeyError;
use crate::traits::Notifier;

/// Records notifications instead of showing them. Clones share the log.
#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    required: Arc<Mutex<Vec<String>>>,
    rejected: Arc<Mutex<Vec<String>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Features that asked for a key, in order.
    pub fn required(&self) -> Vec<String> {
        self.required.lock().unwrap().clone()
    }

    /// Causes reported for a rejected stored key.
    pub fn rejected(&self) -> Vec<String> {
        self.rejected.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn key_required(&self, feature: &str) {
        self.required.lock().unwrap().push(feature.to_string());
    }

    fn stored_key_rejected(&self, err: &KeyError) {
        self.rejected
            .lock()
            .unwrap()
            .push(err.cause().unwrap_or_default().to_string());
    }
}
