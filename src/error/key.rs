//! Errors raised while obtaining or checking an API key.

use std::time::Duration;

use thiserror::Error;

/// Cause reported when the remote authority rejects a key without saying why.
pub const UNKNOWN_CAUSE: &str = "unknown cause";

/// Failure modes of the key lifecycle.
///
/// `Clone` is required because a single validation session hands the same
/// outcome to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The remote authority rejected the key.
    #[error("Invalid API key: {cause}")]
    InvalidKey { cause: String },

    /// Validation was attempted without a key.
    #[error("No API key provided")]
    NoKeyProvided,

    /// Nobody supplied a usable key before the prompt deadline.
    #[error("Timed out after {waited:?} waiting for an API key for {feature}")]
    PromptTimeout { feature: String, waited: Duration },

    /// The validation request could not be completed.
    #[error("Could not reach the API: {message}")]
    Transport { message: String },
}

/// Result alias for key operations.
pub type KeyResult<T> = Result<T, KeyError>;

impl KeyError {
    /// Build an [`KeyError::InvalidKey`] from a remote cause string.
    pub fn invalid(cause: impl Into<String>) -> Self {
        KeyError::InvalidKey {
            cause: cause.into(),
        }
    }

    /// Whether this error means the candidate key was not accepted.
    ///
    /// Transport failures count as rejections since no retry is made.
    pub fn is_rejection(&self) -> bool {
        !matches!(self, KeyError::PromptTimeout { .. })
    }

    /// The rejection cause, if there is one.
    pub fn cause(&self) -> Option<&str> {
        match self {
            KeyError::InvalidKey { cause } => Some(cause),
            KeyError::NoKeyProvided => Some("no credential provided"),
            KeyError::Transport { message } => Some(message),
            KeyError::PromptTimeout { .. } => None,
        }
    }

    /// Get a user-friendly error message.
    pub fn user_message(&self) -> String {
        match self {
            KeyError::InvalidKey { .. } => "It appears your API key was invalid!".to_string(),
            KeyError::NoKeyProvided => "You do not have an API key set!".to_string(),
            KeyError::PromptTimeout { feature, .. } => {
                format!("{} gave up waiting for an API key.", feature)
            }
            KeyError::Transport { .. } => {
                "Could not reach the API to check your key. Try again later.".to_string()
            }
        }
    }

    /// Get a short error code for logging.
    pub fn error_code(&self) -> &'static str {
        match self {
            KeyError::InvalidKey { .. } => "E_KEY_INVALID",
            KeyError::NoKeyProvided => "E_KEY_MISSING",
            KeyError::PromptTimeout { .. } => "E_KEY_PROMPT_TIMEOUT",
            KeyError::Transport { .. } => "E_KEY_TRANSPORT",
        }
    }
}
