//! Remote validation of candidate keys.
//!
//! The remote authority answers `GET {base}/key?key={candidate}` with
//!
//! ```json
//! {"success": true, "record": {"key": "…", "owner": "…", "limit": 120,
//!  "queriesInPastMin": 3, "totalQueries": 1024}}
//! ```
//!
//! or `{"success": false, "cause": "Invalid API key"}`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::record::mask_key;
use crate::adapters::ReqwestHttpClient;
use crate::error::{KeyError, KeyResult, UNKNOWN_CAUSE};
use crate::traits::{Headers, HttpClient, KeyValidator};

/// Default URL of the remote authority.
pub const DEFAULT_API_URL: &str = "https://api.hypixel.net";

/// Usage information the remote authority reports for an accepted key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyInfo {
    #[serde(default)]
    pub key: String,
    /// Account that owns the key.
    #[serde(default)]
    pub owner: String,
    /// Requests allowed per minute.
    #[serde(default)]
    pub limit: u64,
    #[serde(default, rename = "queriesInPastMin")]
    pub queries_in_past_minute: u64,
    #[serde(default)]
    pub total_queries: u64,
}

/// Result of checking a candidate key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Accepted(KeyInfo),
    Rejected(KeyError),
}

impl ValidationOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationOutcome::Accepted(_))
    }

    /// The rejection cause, if rejected.
    pub fn cause(&self) -> Option<&str> {
        match self {
            ValidationOutcome::Accepted(_) => None,
            ValidationOutcome::Rejected(err) => err.cause(),
        }
    }

    pub fn into_result(self) -> KeyResult<KeyInfo> {
        match self {
            ValidationOutcome::Accepted(info) => Ok(info),
            ValidationOutcome::Rejected(err) => Err(err),
        }
    }
}

/// Body of the `/key` endpoint.
#[derive(Debug, Deserialize)]
struct KeyResponse {
    success: bool,
    #[serde(default)]
    record: Option<KeyInfo>,
    #[serde(default)]
    cause: Option<String>,
}

/// Validator that asks the remote authority over HTTP.
#[derive(Debug, Clone)]
pub struct RemoteValidator<C = ReqwestHttpClient> {
    base_url: String,
    client: C,
}

impl RemoteValidator<ReqwestHttpClient> {
    /// Create a validator for the default remote authority.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_API_URL)
    }

    /// Create a validator for a custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, ReqwestHttpClient::new())
    }
}

impl Default for RemoteValidator<ReqwestHttpClient> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: HttpClient> RemoteValidator<C> {
    /// Create a validator on top of an arbitrary HTTP client.
    pub fn with_client(base_url: impl Into<String>, client: C) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn key_url(&self, candidate: &str) -> String {
        format!(
            "{}/key?key={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(candidate)
        )
    }

    async fn request(&self, candidate: &str) -> KeyResult<KeyInfo> {
        let response = self
            .client
            .get(&self.key_url(candidate), &Headers::new())
            .await
            .map_err(|e| KeyError::Transport {
                message: e.to_string(),
            })?;

        // The authority answers rejections with a 4xx status and the same
        // JSON shape, so the body decides.
        let body: KeyResponse = response.json().map_err(|e| {
            debug!(status = response.status, error = %e, "Unparseable key response");
            KeyError::invalid(format!("unexpected response (HTTP {})", response.status))
        })?;

        if !body.success {
            return Err(KeyError::invalid(
                body.cause.unwrap_or_else(|| UNKNOWN_CAUSE.to_string()),
            ));
        }

        let mut info = body.record.unwrap_or_default();
        if info.key.is_empty() {
            info.key = candidate.to_string();
        }
        Ok(info)
    }
}

#[async_trait]
impl<C: HttpClient> KeyValidator for RemoteValidator<C> {
    async fn validate(&self, candidate: Option<&str>) -> ValidationOutcome {
        let candidate = match candidate {
            Some(c) if !c.is_empty() => c,
            _ => return ValidationOutcome::Rejected(KeyError::NoKeyProvided),
        };

        debug!(key = %mask_key(candidate), "Validating API key");
        match self.request(candidate).await {
            Ok(info) => {
                debug!(key = %mask_key(candidate), owner = %info.owner, "API key accepted");
                ValidationOutcome::Accepted(info)
            }
            Err(err) => {
                warn!(key = %mask_key(candidate), code = err.error_code(), "API key rejected: {}", err);
                ValidationOutcome::Rejected(err)
            }
        }
    }
}
