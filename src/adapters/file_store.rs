//! File-based key store.
//!
//! The record lives in `<data_dir>/localdata.json` as
//! `{"key": "...", "hidden": false}`. Older versions kept only the bare key
//! in `<data_dir>/key.txt`; that file is still read when the JSON record
//! has no key, and is superseded by the first save.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::StorageError;
use crate::key::StoredKey;
use crate::traits::KeyStore;

/// The data directory name under the home directory.
const DATA_DIR: &str = ".keyward";

/// The record file name.
const RECORD_FILE: &str = "localdata.json";

/// The file older versions stored the bare key in.
const LEGACY_KEY_FILE: &str = "key.txt";

/// Stores the key record as JSON in a data directory.
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    data_dir: PathBuf,
}

impl FileKeyStore {
    /// Store in `~/.keyward`.
    pub fn new() -> Result<Self, StorageError> {
        let home = dirs::home_dir().ok_or(StorageError::NoHomeDirectory)?;
        Ok(Self::in_dir(home.join(DATA_DIR)))
    }

    /// Store in a specific directory.
    pub fn in_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Get the path to the record file.
    pub fn record_path(&self) -> PathBuf {
        self.data_dir.join(RECORD_FILE)
    }

    fn legacy_key_path(&self) -> PathBuf {
        self.data_dir.join(LEGACY_KEY_FILE)
    }

    fn read_record(&self) -> Result<Option<StoredKey>, StorageError> {
        let file = match File::open(self.record_path()) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let record = serde_json::from_reader(BufReader::new(file))?;
        Ok(Some(record))
    }

    fn read_legacy_key(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.legacy_key_path()) {
            Ok(contents) => {
                let key = contents.trim();
                Ok((!key.is_empty()).then(|| key.to_string()))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl KeyStore for FileKeyStore {
    fn load(&self) -> Result<Option<StoredKey>, StorageError> {
        let record = self.read_record()?;
        if record.as_ref().is_some_and(StoredKey::has_key) {
            return Ok(record);
        }

        match self.read_legacy_key()? {
            Some(key) => {
                info!(path = %self.legacy_key_path().display(), "Using key from legacy key file");
                Ok(Some(StoredKey {
                    key,
                    hidden: record.map(|r| r.hidden).unwrap_or(false),
                }))
            }
            None => Ok(record),
        }
    }

    fn save(&self, record: &StoredKey) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir)?;

        let path = self.record_path();
        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, record)?;
        writer.flush()?;

        debug!(path = %path.display(), "Saved key record");
        Ok(())
    }
}
