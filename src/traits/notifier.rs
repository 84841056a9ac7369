//! Out-of-band user notifications.

use crate::error::KeyError;

/// Receives the instructional messages the key lifecycle wants shown.
///
/// The core only decides *when* to notify; how the message looks is up to
/// the implementation.
pub trait Notifier: Send + Sync {
    /// A feature needs a key and is now waiting for one.
    fn key_required(&self, feature: &str);

    /// The key loaded at startup could not be confirmed, either because
    /// the remote authority rejected it or because it could not be reached.
    fn stored_key_rejected(&self, err: &KeyError);
}
