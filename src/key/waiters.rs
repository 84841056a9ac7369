//! Callbacks waiting for an accepted key.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

/// Callback invoked with the newly accepted key.
pub type KeyCallback = Box<dyn FnMut(&str) + Send>;

/// How long a waiter stays registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaiterMode {
    /// Invoked on the next accepted key, then dropped.
    SingleFire,
    /// Invoked on every accepted key for the life of the registry.
    Persistent,
}

struct Waiter {
    callback: KeyCallback,
    mode: WaiterMode,
}

/// Ordered list of waiters.
///
/// There is no way to remove a persistent waiter; the registry is expected
/// to hold a handful of entries.
#[derive(Default)]
pub struct WaiterRegistry {
    waiters: Mutex<Vec<Waiter>>,
}

impl WaiterRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Waiter>> {
        self.waiters.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append a waiter.
    pub fn register<F>(&self, callback: F, mode: WaiterMode)
    where
        F: FnMut(&str) + Send + 'static,
    {
        self.lock().push(Waiter {
            callback: Box::new(callback),
            mode,
        });
    }

    /// Number of registered waiters.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Invoke every waiter with `key` in registration order, then drop the
    /// single-fire ones.
    ///
    /// Callbacks run on a snapshot with the lock released, so a callback may
    /// register further waiters; those are kept and first fire on the next
    /// pass. A panicking callback is logged and does not stop the pass.
    pub fn notify_all(&self, key: &str) {
        let mut snapshot = std::mem::take(&mut *self.lock());
        debug!(waiters = snapshot.len(), "Notifying key waiters");

        for (index, waiter) in snapshot.iter_mut().enumerate() {
            let callback = &mut waiter.callback;
            if catch_unwind(AssertUnwindSafe(|| callback(key))).is_err() {
                warn!(index, mode = ?waiter.mode, "Key waiter panicked");
            }
        }

        snapshot.retain(|waiter| waiter.mode == WaiterMode::Persistent);

        let mut waiters = self.lock();
        let registered_during_pass = std::mem::replace(&mut *waiters, snapshot);
        waiters.extend(registered_during_pass);
    }
}

impl fmt::Debug for WaiterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modes: Vec<WaiterMode> = self.lock().iter().map(|w| w.mode).collect();
        f.debug_struct("WaiterRegistry")
            .field("waiters", &modes)
            .finish()
    }
}
