//! Google Calendar source configuration.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{ProviderError, ProviderResult};

/// Default OAuth token endpoint for service accounts.
pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

/// A Google Cloud service-account key, as downloaded from the console.
///
/// Only the fields needed for the JWT bearer flow are read; the rest of the
/// JSON file is ignored.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    /// The service account's email (`…@….iam.gserviceaccount.com`).
    pub client_email: String,
    /// PEM-encoded RSA private key.
    pub private_key: String,
    /// Identifier of the private key, sent as the JWT `kid`.
    #[serde(default)]
    pub private_key_id: Option<String>,
    /// OAuth token endpoint.
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl std::fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("client_email", &self.client_email)
            .field("private_key", &"<redacted>")
            .field("private_key_id", &self.private_key_id)
            .field("token_uri", &self.token_uri)
            .finish()
    }
}

impl ServiceAccountKey {
    /// Loads a key from a service-account JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> ProviderResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::configuration(format!(
                "failed to read service account file {}: {}",
                path.display(),
                e
            ))
            .with_source(e)
        })?;
        Self::from_json(&content)
    }

    /// Parses a key from the service-account JSON content.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        let key: Self = serde_json::from_str(json).map_err(|e| {
            ProviderError::configuration(format!("invalid service account JSON: {}", e))
        })?;
        key.validate()?;
        Ok(key)
    }

    /// Checks that the key has the fields the token exchange needs.
    pub fn validate(&self) -> ProviderResult<()> {
        if self.client_email.trim().is_empty() {
            return Err(ProviderError::configuration(
                "service account client_email is empty",
            ));
        }
        if !self.private_key.contains("PRIVATE KEY") {
            return Err(ProviderError::configuration(
                "service account private_key is not a PEM private key",
            ));
        }
        Ok(())
    }
}

/// Configuration for [`super::GoogleCalendarSource`].
#[derive(Debug, Clone)]
pub struct GoogleConfig {
    /// Calendar to read holidays from, e.g.
    /// `en.malaysia#holiday@group.v.calendar.google.com`.
    pub calendar_id: String,

    /// Service-account key used to authenticate.
    pub service_account: ServiceAccountKey,

    /// Request timeout.
    pub timeout: Duration,

    /// OAuth scopes to request.
    ///
    /// Defaults to `["https://www.googleapis.com/auth/calendar.readonly"]`.
    pub scopes: Vec<String>,

    /// Base URL of the Calendar API (overridable for tests).
    pub api_base: String,
}

impl GoogleConfig {
    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Default OAuth scope for read-only calendar access.
    pub const DEFAULT_SCOPE: &'static str = "https://www.googleapis.com/auth/calendar.readonly";

    /// Base URL for Google Calendar API v3.
    pub const DEFAULT_API_BASE: &'static str = "https://www.googleapis.com/calendar/v3";

    /// Creates a configuration for `calendar_id` authenticated with `service_account`.
    pub fn new(calendar_id: impl Into<String>, service_account: ServiceAccountKey) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            service_account,
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
            scopes: vec![Self::DEFAULT_SCOPE.to_string()],
            api_base: Self::DEFAULT_API_BASE.to_string(),
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the OAuth scopes.
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    /// Sets the Calendar API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }
}
