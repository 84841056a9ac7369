//! Mock implementations for testing.
//!
//! These let the key lifecycle be exercised without network or file system
//! access.
//!
//! # Available Mocks
//!
//! - [`MockHttpClient`] - HTTP client with configurable responses
//! - [`InMemoryKeyStore`] - In-memory key record storage
//! - [`MockValidator`] - Validator with scripted outcomes and a call counter
//! - [`RecordingNotifier`] - Notifier that records what it was asked to show

pub mod http;
pub mod notifier;
pub mod store;
pub mod validator;

pub use http::{MockHttpClient, MockResponse, RecordedRequest};
pub use notifier::RecordingNotifier;
pub use store::InMemoryKeyStore;
pub use validator::{MockValidator, MOCK_REJECTION_CAUSE};
