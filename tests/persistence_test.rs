//! Integration tests for the key record on disk across restarts.

use std::sync::Arc;

use keyward::adapters::mock::MockValidator;
use keyward::adapters::FileKeyStore;
use keyward::config::Config;
use keyward::key::KeyState;
use tempfile::TempDir;

fn load(dir: &TempDir, validator: &MockValidator) -> Arc<KeyState> {
    let store = Config::default().with_data_dir(dir.path()).key_store().unwrap();
    Arc::new(KeyState::load(Box::new(store), Arc::new(validator.clone())))
}

#[tokio::test]
async fn test_adopted_key_survives_restart() {
    let dir = TempDir::new().unwrap();
    let validator = MockValidator::new().accepting("abc");

    let state = load(&dir, &validator);
    state.replace("abc");
    assert!(state.toggle_hidden());
    drop(state);

    let state = load(&dir, &validator);
    assert!(state.has_value());
    assert!(state.is_hidden());
    // Validity is never persisted.
    assert_eq!(state.current(), None);

    assert_eq!(state.startup_validation().await, Ok("abc".to_string()));
    assert_eq!(state.current(), Some("abc".to_string()));
}

#[tokio::test]
async fn test_legacy_key_file_is_picked_up() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("key.txt"), "legacy-key\n").unwrap();
    let validator = MockValidator::new().accepting("legacy-key");

    let state = load(&dir, &validator);

    assert_eq!(state.value(), Some("legacy-key".to_string()));
    assert_eq!(
        state.startup_validation().await,
        Ok("legacy-key".to_string())
    );
}

#[test]
fn test_corrupt_record_starts_without_key() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("localdata.json"), "{not json").unwrap();

    let state = load(&dir, &MockValidator::new());

    assert!(!state.has_value());
    state.replace("fresh");

    let store = FileKeyStore::in_dir(dir.path());
    let saved = std::fs::read_to_string(store.record_path()).unwrap();
    assert!(saved.contains("fresh"));
}
