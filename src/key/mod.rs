//! API key lifecycle.
//!
//! This module owns the single API key the tool manages:
//! - [`record`] - the persisted record and a masked display form
//! - [`validator`] - checking a candidate key against the remote authority
//! - [`state`] - the one mutation path for the key and its validity
//! - [`waiters`] - callbacks waiting for the next (or every) accepted key
//! - [`prompt`] - waiting for a usable key up to a deadline
//!
//! ```text
//!   replace / try_set ──► KeyState ──► RemoteValidator
//!                            │
//!                            ▼
//!                      WaiterRegistry ◄── PromptCoordinator
//! ```

pub mod prompt;
pub mod record;
pub mod state;
pub mod validator;
pub mod waiters;

pub use prompt::PromptCoordinator;
pub use record::{mask_key, StoredKey};
pub use state::{KeyState, ValidationSession};
pub use validator::{KeyInfo, RemoteValidator, ValidationOutcome, DEFAULT_API_URL};
pub use waiters::{WaiterMode, WaiterRegistry};
