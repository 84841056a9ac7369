//! Error types for keyward.
//!
//! Two families of errors exist:
//!
//! - [`KeyError`] - everything that can go wrong while obtaining a usable
//!   API key: remote rejection, missing input, transport failure and
//!   prompt deadlines.
//! - [`StorageError`] - reading or writing the persisted key record.
//!
//! None of these are fatal. Rejections are returned as values, storage
//! failures are logged and degrade to "no key", and a prompt timeout only
//! means "no key available right now".
//!
//! # Example
//!
//! ```ignore
//! use keyward::error::KeyError;
//!
//! match state.try_set("some-key").await {
//!     Ok(info) => println!("Saved key owned by {}", info.owner),
//!     Err(err) => eprintln!("{} ({})", err.user_message(), err.error_code()),
//! }
//! ```

mod key;
mod storage;

pub use key::{KeyError, KeyResult, UNKNOWN_CAUSE};
pub use storage::StorageError;
