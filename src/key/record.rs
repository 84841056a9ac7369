//! The persisted key record.

use serde::{Deserialize, Serialize};

/// What is written to storage: the key and the display preference.
///
/// Validity is never persisted; it is re-established on every start.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredKey {
    /// The API key. Empty means no key.
    #[serde(default)]
    pub key: String,
    /// Hide the key in command output.
    #[serde(default)]
    pub hidden: bool,
}

impl StoredKey {
    /// Create a record holding `key`, shown in output.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            hidden: false,
        }
    }

    /// Check if the record holds a key.
    pub fn has_key(&self) -> bool {
        !self.key.is_empty()
    }
}

/// Masked form of a key, safe for logs.
pub fn mask_key(key: &str) -> String {
    match key.char_indices().nth(4) {
        Some((idx, _)) => format!("{}…", &key[..idx]),
        None if key.is_empty() => String::new(),
        None => "…".to_string(),
    }
}
