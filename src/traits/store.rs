//! Key record storage trait abstraction.

use crate::error::StorageError;
use crate::key::StoredKey;

/// Trait for persisting the key record.
///
/// Implementations are synchronous. They include the file-based store and an in-memory store
/// for tests.
pub trait KeyStore: Send + Sync {
    /// Load the stored record.
    ///
    /// # Returns
    /// - `Ok(Some(record))` if a record exists
    /// - `Ok(None)` if nothing was ever stored
    /// - `Err(error)` if reading failed
    fn load(&self) -> Result<Option<StoredKey>, StorageError>;

    /// Persist the record, replacing whatever was stored before.
    fn save(&self, record: &StoredKey) -> Result<(), StorageError>;
}
