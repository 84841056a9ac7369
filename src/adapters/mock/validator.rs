//! Scripted key validator for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::KeyError;
use crate::key::{KeyInfo, ValidationOutcome};
use crate::traits::KeyValidator;

/// Cause returned for keys the mock was not told to accept.
pub const MOCK_REJECTION_CAUSE: &str = "Invalid API key";

/// Validator with scripted outcomes.
///
/// Keys are rejected unless accepted via [`accepting`](Self::accepting) or
/// scripted via [`set_outcome`](Self::set_outcome). Empty candidates are
/// rejected without being counted, like the real validator.
#[derive(Debug, Clone, Default)]
pub struct MockValidator {
    outcomes: Arc<Mutex<HashMap<String, ValidationOutcome>>>,
    calls: Arc<Mutex<Vec<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
}

impl MockValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Info reported for an accepted key.
    pub fn info_for(key: &str) -> KeyInfo {
        KeyInfo {
            key: key.to_string(),
            owner: "mock-owner".to_string(),
            limit: 120,
            queries_in_past_minute: 3,
            total_queries: 12345,
        }
    }

    /// Accept `key` from now on.
    pub fn accepting(self, key: &str) -> Self {
        self.accept(key);
        self
    }

    pub fn accept(&self, key: &str) {
        self.set_outcome(key, ValidationOutcome::Accepted(Self::info_for(key)));
    }

    /// Script the outcome for `key`.
    pub fn set_outcome(&self, key: &str, outcome: ValidationOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .insert(key.to_string(), outcome);
    }

    /// Make every validation take this long (Tokio time).
    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = Some(delay);
        self
    }

    /// Number of validations that would have hit the network.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Candidates validated so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl KeyValidator for MockValidator {
    async fn validate(&self, candidate: Option<&str>) -> ValidationOutcome {
        let candidate = match candidate {
            Some(c) if !c.is_empty() => c,
            _ => return ValidationOutcome::Rejected(KeyError::NoKeyProvided),
        };
        self.calls.lock().unwrap().push(candidate.to_string());

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.outcomes
            .lock()
            .unwrap()
            .get(candidate)
            .cloned()
            .unwrap_or_else(|| ValidationOutcome::Rejected(KeyError::invalid(MOCK_REJECTION_CAUSE)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_by_default() {
        let validator = MockValidator::new();
        let outcome = validator.validate(Some("abc")).await;
        assert_eq!(outcome.cause(), Some(MOCK_REJECTION_CAUSE));
        assert_eq!(validator.calls(), vec!["abc".to_string()]);
    }

    #[tokio::test]
    async fn test_accepting() {
        let validator = MockValidator::new().accepting("abc");
        assert!(validator.is_valid(Some("abc")).await);
        assert!(!validator.is_valid(Some("other")).await);
        assert_eq!(validator.call_count(), 2);
    }

    #[tokio::test]
    async fn test_empty_not_counted() {
        let validator = MockValidator::new();
        assert!(!validator.is_valid(None).await);
        assert!(!validator.is_valid(Some("")).await);
        assert_eq!(validator.call_count(), 0);
    }

    #[tokio::test]
    async fn test_scripted_transport_failure() {
        let validator = MockValidator::new();
        validator.set_outcome(
            "abc",
            ValidationOutcome::Rejected(KeyError::Transport {
                message: "down".to_string(),
            }),
        );
        assert_eq!(validator.validate(Some("abc")).await.cause(), Some("down"));
    }
}
