//! Trait abstractions for dependency injection and testability.
//!
//! Every collaborator the key lifecycle talks to sits behind one of these
//! traits so the state machine can be driven by mocks in tests.
//!
//! # Traits
//!
//! - [`HttpClient`] - HTTP GET against the remote authority
//! - [`KeyStore`] - Persisted key record storage and retrieval
//! - [`KeyValidator`] - Checks a candidate key against the remote authority
//! - [`Notifier`] - Out-of-band messages shown to the user

pub mod http;
pub mod notifier;
pub mod store;
pub mod validator;

pub use http::{Headers, HttpClient, HttpError, Response};
pub use notifier::Notifier;
pub use store::KeyStore;
pub use validator::KeyValidator;
