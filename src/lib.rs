//! keyward - keeps a single API key loaded, validated and available.
//!
//! The key is loaded from disk at startup, checked once against the remote
//! authority, and replaced either by a trusted announcement or by a
//! user-supplied key that passes validation. Features that need the key
//! can wait for it with a deadline.
//!
//! ```ignore
//! use std::sync::Arc;
//! use keyward::adapters::{FileKeyStore, TerminalNotifier};
//! use keyward::key::{KeyState, PromptCoordinator, RemoteValidator};
//!
//! let state = Arc::new(KeyState::load(
//!     Box::new(FileKeyStore::new()?),
//!     Arc::new(RemoteValidator::new()),
//! ));
//! state.startup_validation();
//!
//! let prompt = PromptCoordinator::new(state, Arc::new(TerminalNotifier::new()));
//! let key = prompt.await_key("stats").await?;
//! ```

pub mod adapters;
pub mod chat;
pub mod cli;
pub mod config;
pub mod error;
pub mod key;
pub mod traits;
