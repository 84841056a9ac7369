//! Concrete implementations of trait abstractions.
//!
//! # Adapters
//!
//! - [`ReqwestHttpClient`] - HTTP client using reqwest
//! - [`FileKeyStore`] - Key record stored as JSON on disk
//! - [`TerminalNotifier`] - Prints notifications to the terminal
//!
//! # Mock Implementations
//!
//! The [`mock`] submodule provides test doubles:
//! - [`mock::MockHttpClient`] - Configurable HTTP responses
//! - [`mock::InMemoryKeyStore`] - In-memory key record storage
//! - [`mock::MockValidator`] - Scripted validation outcomes
//! - [`mock::RecordingNotifier`] - Records notifications

pub mod file_store;
pub mod mock;
pub mod reqwest_http;
pub mod terminal_notifier;

pub use file_store::FileKeyStore;
pub use mock::{InMemoryKeyStore, MockHttpClient, MockValidator, RecordingNotifier};
pub use reqwest_http::ReqwestHttpClient;
pub use terminal_notifier::TerminalNotifier;
