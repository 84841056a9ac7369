//! Integration tests for the key state and its waiters.
//!
//! These cover:
//! - Trusted replacement and checked adoption
//! - Single-fire and persistent waiters across several adoptions
//! - Invalidation after a later failure, including from a waiter
//! - Concurrent adoptions

mod common;

use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use common::Fixture;
use keyward::adapters::mock::MockValidator;
use keyward::error::KeyError;
use keyward::key::{StoredKey, WaiterMode};

fn recorder() -> (Arc<Mutex<Vec<String>>>, impl FnMut(&str) + Send + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |key: &str| sink.lock().unwrap().push(key.to_string()))
}

#[test]
fn test_replace_makes_key_current() {
    let fx = Fixture::new(None, MockValidator::new());

    fx.state.replace("abc");

    assert_eq!(fx.state.current(), Some("abc".to_string()));
    assert_eq!(fx.store.get_record(), Some(StoredKey::new("abc")));
    assert_eq!(fx.validator.call_count(), 0);
}

#[test]
fn test_replace_keeps_hidden_preference() {
    let fx = Fixture::with_record(
        Some(StoredKey {
            key: "old".to_string(),
            hidden: true,
        }),
        MockValidator::new(),
    );

    fx.state.replace("new");

    let record = fx.store.get_record().unwrap();
    assert_eq!(record.key, "new");
    assert!(record.hidden);
}

#[test]
fn test_single_fire_waiter_fires_once() {
    let fx = Fixture::new(None, MockValidator::new());
    let (seen, callback) = recorder();
    fx.state.on_key_change(callback, WaiterMode::SingleFire);

    fx.state.replace("first");
    fx.state.replace("second");

    assert_eq!(*seen.lock().unwrap(), vec!["first".to_string()]);
    assert!(fx.state.waiters().is_empty());
}

#[test]
fn test_persistent_waiter_sees_every_key() {
    let fx = Fixture::new(None, MockValidator::new());
    let (seen, callback) = recorder();
    fx.state.on_key_change(callback, WaiterMode::Persistent);

    fx.state.replace("first");
    fx.state.replace("second");

    assert_eq!(
        *seen.lock().unwrap(),
        vec!["first".to_string(), "second".to_string()]
    );
    assert_eq!(fx.state.waiters().len(), 1);
}

#[test]
fn test_waiter_sees_key_already_current() {
    let fx = Fixture::new(None, MockValidator::new());
    let state = Arc::clone(&fx.state);
    let observed = Arc::new(Mutex::new(None));
    let sink = Arc::clone(&observed);

    fx.state.on_key_change(
        move |key: &str| {
            *sink.lock().unwrap() = Some((key.to_string(), state.current()));
        },
        WaiterMode::SingleFire,
    );
    fx.state.replace("abc");

    assert_eq!(
        *observed.lock().unwrap(),
        Some(("abc".to_string(), Some("abc".to_string())))
    );
}

#[test]
fn test_panicking_waiter_does_not_block_others() {
    let fx = Fixture::new(None, MockValidator::new());
    let (seen, callback) = recorder();
    fx.state
        .on_key_change(|_: &str| panic!("waiter failed"), WaiterMode::SingleFire);
    fx.state.on_key_change(callback, WaiterMode::SingleFire);

    fx.state.replace("abc");

    assert_eq!(*seen.lock().unwrap(), vec!["abc".to_string()]);
    assert_eq!(fx.state.current(), Some("abc".to_string()));
}

#[tokio::test]
async fn test_rejected_try_set_leaves_everything() {
    let fx = Fixture::new(None, MockValidator::new());
    fx.state.replace("old");
    let (seen, callback) = recorder();
    fx.state.on_key_change(callback, WaiterMode::SingleFire);

    let err = fx.state.try_set("bad").await.unwrap_err();

    assert_eq!(err.cause(), Some("Invalid API key"));
    assert_eq!(fx.state.current(), Some("old".to_string()));
    assert_eq!(fx.store.get_record().unwrap().key, "old");
    assert!(seen.lock().unwrap().is_empty());
    assert_eq!(fx.state.waiters().len(), 1);
}

#[tokio::test]
async fn test_accepted_try_set_notifies() {
    let fx = Fixture::new(None, MockValidator::new().accepting("good"));
    let (seen, callback) = recorder();
    fx.state.on_key_change(callback, WaiterMode::SingleFire);

    let info = fx.state.try_set("good").await.unwrap();

    assert_eq!(info.owner, "mock-owner");
    assert_eq!(*seen.lock().unwrap(), vec!["good".to_string()]);
    assert_eq!(fx.validator.calls(), vec!["good".to_string()]);
}

#[tokio::test]
async fn test_transport_failure_is_rejection() {
    let validator = MockValidator::new();
    validator.set_outcome(
        "abc",
        keyward::key::ValidationOutcome::Rejected(KeyError::Transport {
            message: "connection refused".to_string(),
        }),
    );
    let fx = Fixture::new(None, validator);

    let err = fx.state.try_set("abc").await.unwrap_err();

    assert!(err.is_rejection());
    assert_eq!(fx.state.current(), None);
}

#[tokio::test]
async fn test_invalidate_after_failed_info() {
    let fx = Fixture::new(None, MockValidator::new());
    fx.state.replace("abc");

    assert!(fx.state.info(None).await.is_err());
    fx.state.invalidate();

    assert_eq!(fx.state.current(), None);
    assert!(fx.state.has_value());
    // Value survives on disk too.
    assert_eq!(fx.store.get_record().unwrap().key, "abc");
}

#[tokio::test]
async fn test_startup_rejection_notifies() {
    let fx = Fixture::new(Some("stale"), MockValidator::new());

    let result = fx.state.startup_validation().await;

    assert!(matches!(result, Err(KeyError::InvalidKey { .. })));
    assert_eq!(fx.notifier.rejected(), vec!["Invalid API key".to_string()]);
    assert_eq!(fx.state.current(), None);
}

#[tokio::test]
async fn test_startup_success_notifies_waiters() {
    let fx = Fixture::new(Some("abc"), MockValidator::new().accepting("abc"));
    let (seen, callback) = recorder();
    fx.state.on_key_change(callback, WaiterMode::SingleFire);

    assert_eq!(fx.state.startup_validation().await, Ok("abc".to_string()));

    assert_eq!(*seen.lock().unwrap(), vec!["abc".to_string()]);
    assert!(fx.state.waiters().is_empty());
    assert!(fx.notifier.rejected().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_startup_rejection_of_replaced_key_is_silent() {
    let validator = MockValidator::new().with_delay(Duration::from_secs(1));
    let fx = Fixture::new(Some("stale"), validator);
    let (seen, callback) = recorder();
    fx.state.on_key_change(callback, WaiterMode::Persistent);

    let session = fx.state.startup_validation();
    fx.state.replace("fresh");

    assert_eq!(session.await, Ok("fresh".to_string()));
    assert!(fx.notifier.rejected().is_empty());
    assert_eq!(fx.state.current(), Some("fresh".to_string()));
    // Only the replacement notified.
    assert_eq!(*seen.lock().unwrap(), vec!["fresh".to_string()]);
}

#[test]
fn test_waiter_may_invalidate() {
    let fx = Fixture::new(None, MockValidator::new());
    let state = Arc::clone(&fx.state);
    fx.state
        .on_key_change(move |_: &str| state.invalidate(), WaiterMode::SingleFire);

    let (done_tx, done_rx) = mpsc::channel();
    let state = Arc::clone(&fx.state);
    std::thread::spawn(move || {
        state.replace("abc");
        let _ = done_tx.send(());
    });

    done_rx
        .recv_timeout(Duration::from_secs(3))
        .expect("replace should return when a waiter invalidates");
    assert_eq!(fx.state.current(), None);
    assert_eq!(fx.state.value(), Some("abc".to_string()));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_replacements_end_consistent() {
    let fx = Fixture::new(None, MockValidator::new());
    let (seen, callback) = recorder();
    fx.state.on_key_change(callback, WaiterMode::Persistent);

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let state = Arc::clone(&fx.state);
            tokio::spawn(async move { state.replace(format!("key-{}", i)) })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 8);
    // The last notification matches the state that won.
    assert_eq!(fx.state.current().as_ref(), seen.last());
    assert_eq!(fx.store.get_record().unwrap().key, *seen.last().unwrap());
}
