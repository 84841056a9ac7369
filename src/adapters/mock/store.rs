//! In-memory key store for testing.

use std::sync::{Arc, Mutex};

use crate::error::StorageError;
use crate::key::StoredKey;
use crate::traits::KeyStore;

/// In-memory key store for testing.
///
/// Clones share the same record, so a test can keep a handle after moving
/// the store into a [`KeyState`](crate::key::KeyState).
#[derive(Debug, Clone, Default)]
pub struct InMemoryKeyStore {
    /// Stored record
    record: Arc<Mutex<Option<StoredKey>>>,
    /// Whether save should fail
    save_should_fail: Arc<Mutex<bool>>,
    /// Whether load should fail
    load_should_fail: Arc<Mutex<bool>>,
    /// Number of successful saves
    saves: Arc<Mutex<usize>>,
}

impl InMemoryKeyStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding an initial record.
    pub fn with_record(record: StoredKey) -> Self {
        let store = Self::new();
        store.set_record(Some(record));
        store
    }

    /// Configure whether save should fail.
    pub fn set_save_should_fail(&self, should_fail: bool) {
        *self.save_should_fail.lock().unwrap() = should_fail;
    }

    /// Configure whether load should fail.
    pub fn set_load_should_fail(&self, should_fail: bool) {
        *self.load_should_fail.lock().unwrap() = should_fail;
    }

    /// Get the stored record.
    pub fn get_record(&self) -> Option<StoredKey> {
        self.record.lock().unwrap().clone()
    }

    /// Set the stored record.
    pub fn set_record(&self, record: Option<StoredKey>) {
        *self.record.lock().unwrap() = record;
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl KeyStore for InMemoryKeyStore {
    fn load(&self) -> Result<Option<StoredKey>, StorageError> {
        if *self.load_should_fail.lock().unwrap() {
            return Err(StorageError::Other("Mock load failure".to_string()));
        }

        Ok(self.record.lock().unwrap().clone())
    }

    fn save(&self, record: &StoredKey) -> Result<(), StorageError> {
        if *self.save_should_fail.lock().unwrap() {
            return Err(StorageError::Other("Mock save failure".to_string()));
        }

        *self.record.lock().unwrap() = Some(record.clone());
        *self.saves.lock().unwrap() += 1;
        Ok(())
    }
}
