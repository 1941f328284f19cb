//! Slack profile status sink.
//!
//! Uses the Web API methods `users.profile.get` and `users.profile.set` with a
//! user token carrying the `users.profile:read` and `users.profile:write`
//! scopes. Slack answers HTTP 200 for most failures and reports them in the
//! `{"ok": false, "error": "..."}` envelope, so both layers are checked.

use std::time::Duration;

use phstatus_core::StatusUpdate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderErrorCode, ProviderResult};
use crate::source::{BoxFuture, StatusSink};

const PROVIDER_NAME: &str = "slack";

/// Configuration for [`SlackStatusSink`].
#[derive(Clone)]
pub struct SlackConfig {
    /// User OAuth token (`xoxp-…`).
    pub token: String,
    /// Base URL of the Web API.
    pub api_base: String,
    /// Request timeout.
    pub timeout: Duration,
}

impl std::fmt::Debug for SlackConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackConfig")
            .field("token", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl SlackConfig {
    /// Base URL of the Slack Web API.
    pub const DEFAULT_API_BASE: &'static str = "https://slack.com/api";

    /// Default timeout in seconds.
    pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

    /// Creates a configuration for `token`.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            api_base: Self::DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Sets the Web API base URL.
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Profile status fields as Slack names them.
#[derive(Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
struct ProfileStatus {
    #[serde(default)]
    status_text: String,
    #[serde(default)]
    status_emoji: String,
    #[serde(default)]
    status_expiration: i64,
}

impl From<&StatusUpdate> for ProfileStatus {
    fn from(status: &StatusUpdate) -> Self {
        Self {
            status_text: status.text.clone(),
            status_emoji: status.emoji.clone(),
            status_expiration: status.expiration,
        }
    }
}

impl ProfileStatus {
    fn into_status(self) -> Option<StatusUpdate> {
        if self.status_text.is_empty() && self.status_emoji.is_empty() {
            return None;
        }
        Some(StatusUpdate::new(
            self.status_text,
            self.status_emoji,
            self.status_expiration,
        ))
    }
}

#[derive(Debug, Serialize)]
struct SetProfileRequest<'a> {
    profile: &'a ProfileStatus,
}

/// Response envelope shared by every Web API method.
#[derive(Debug, Deserialize)]
struct Envelope {
    ok: bool,
    error: Option<String>,
    profile: Option<ProfileStatus>,
}

/// Maps a Web API error string to an error code.
pub fn error_code_for(error: &str) -> ProviderErrorCode {
    match error {
        "invalid_auth" | "not_authed" | "token_revoked" | "token_expired" | "account_inactive" => {
            ProviderErrorCode::AuthenticationFailed
        }
        "missing_scope" | "not_allowed_token_type" | "no_permission" => {
            ProviderErrorCode::AuthorizationFailed
        }
        "ratelimited" => ProviderErrorCode::RateLimited,
        "invalid_json" | "invalid_arguments" | "invalid_form_data" | "profile_set_failed" => {
            ProviderErrorCode::InvalidResponse
        }
        _ => ProviderErrorCode::ServerError,
    }
}

/// Parses a Web API response body, turning `ok: false` into an error.
fn parse_envelope(method: &str, body: &str) -> ProviderResult<Envelope> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| {
        ProviderError::invalid_response(format!("{} returned invalid JSON: {}", method, e))
    })?;

    if envelope.ok {
        return Ok(envelope);
    }

    let error = envelope.error.unwrap_or_else(|| "unknown_error".to_string());
    Err(ProviderError::new(
        error_code_for(&error),
        format!("{} failed: {}", method, error),
    ))
}

/// Reads and writes the Slack profile status of the token's owner.
#[derive(Debug)]
pub struct SlackStatusSink {
    config: SlackConfig,
    http_client: reqwest::Client,
}

impl SlackStatusSink {
    /// Creates a sink from `config`.
    pub fn new(config: SlackConfig) -> ProviderResult<Self> {
        if config.token.trim().is_empty() {
            return Err(ProviderError::configuration("slack token is empty").with_provider(PROVIDER_NAME));
        }

        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self { config, http_client })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.config.api_base.trim_end_matches('/'), method)
    }

    async fn read_response(method: &str, response: reqwest::Response) -> ProviderResult<Envelope> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            return Err(ProviderError::http(status.as_u16(), body));
        }
        parse_envelope(method, &body)
    }

    async fn get_profile(&self) -> ProviderResult<Option<StatusUpdate>> {
        let method = "users.profile.get";
        let response = self
            .http_client
            .get(self.method_url(method))
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("{} request failed: {}", method, e)))?;

        let envelope = Self::read_response(method, response).await?;
        let current = envelope.profile.and_then(ProfileStatus::into_status);
        debug!(?current, "read slack status");
        Ok(current)
    }

    async fn set_profile(&self, status: &StatusUpdate) -> ProviderResult<()> {
        let method = "users.profile.set";
        let body = encode_set_request(status)?;

        let response = self
            .http_client
            .post(self.method_url(method))
            .bearer_auth(&self.config.token)
            .header(reqwest::header::CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("{} request failed: {}", method, e)))?;

        Self::read_response(method, response).await?;
        info!(text = %status.text, emoji = %status.emoji, expiration = status.expiration, "slack status set");
        Ok(())
    }
}

fn encode_set_request(status: &StatusUpdate) -> ProviderResult<String> {
    let profile = ProfileStatus::from(status);
    serde_json::to_string(&SetProfileRequest { profile: &profile })
        .map_err(|e| ProviderError::internal(format!("failed to encode profile: {}", e)))
}

impl StatusSink for SlackStatusSink {
    fn name(&self) -> &str {
        PROVIDER_NAME
    }

    fn current_status(&self) -> BoxFuture<'_, ProviderResult<Option<StatusUpdate>>> {
        Box::pin(async move {
            self.get_profile()
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }

    fn apply_status<'a>(&'a self, status: &'a StatusUpdate) -> BoxFuture<'a, ProviderResult<()>> {
        Box::pin(async move {
            self.set_profile(status)
                .await
                .map_err(|e| e.with_provider(PROVIDER_NAME))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod envelope {
        use super::*;

        #[test]
        fn ok_profile_is_parsed() {
            let body = r#"{
                "ok": true,
                "profile": {
                    "real_name": "Aisyah",
                    "status_text": "PH: Hari Raya Puasa",
                    "status_emoji": ":red_circle:",
                    "status_expiration": 1712707200
                }
            }"#;
            let envelope = parse_envelope("users.profile.get", body).unwrap();
            let status = envelope.profile.and_then(ProfileStatus::into_status).unwrap();
            assert_eq!(status, StatusUpdate::new("PH: Hari Raya Puasa", ":red_circle:", 1_712_707_200));
        }

        #[test]
        fn empty_status_is_none() {
            let body = r#"{"ok": true, "profile": {"status_text": "", "status_emoji": "", "status_expiration": 0}}"#;
            let envelope = parse_envelope("users.profile.get", body).unwrap();
            assert!(envelope.profile.and_then(ProfileStatus::into_status).is_none());
        }

        #[test]
        fn invalid_auth_is_authentication_failure() {
            let err = parse_envelope("users.profile.set", r#"{"ok": false, "error": "invalid_auth"}"#)
                .unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::AuthenticationFailed);
            assert_eq!(err.message(), "users.profile.set failed: invalid_auth");
        }

        #[test]
        fn missing_error_field() {
            let err = parse_envelope("users.profile.get", r#"{"ok": false}"#).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::ServerError);
            assert!(err.message().contains("unknown_error"));
        }

        #[test]
        fn garbage_body_is_invalid_response() {
            let err = parse_envelope("users.profile.get", "<html>").unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::InvalidResponse);
        }
    }

    mod error_codes {
        use super::*;

        #[test]
        fn mapping() {
            assert_eq!(error_code_for("not_authed"), ProviderErrorCode::AuthenticationFailed);
            assert_eq!(error_code_for("token_revoked"), ProviderErrorCode::AuthenticationFailed);
            assert_eq!(error_code_for("missing_scope"), ProviderErrorCode::AuthorizationFailed);
            assert_eq!(error_code_for("ratelimited"), ProviderErrorCode::RateLimited);
            assert_eq!(error_code_for("fatal_error"), ProviderErrorCode::ServerError);
        }
    }

    mod requests {
        use super::*;

        #[test]
        fn set_request_body() {
            let status = StatusUpdate::new("Upcoming PH: [10/2-11/2] Thaipusam", ":large_yellow_circle:", 1_707_523_200);
            let body = encode_set_request(&status).unwrap();
            let value: serde_json::Value = serde_json::from_str(&body).unwrap();
            assert_eq!(
                value,
                serde_json::json!({
                    "profile": {
                        "status_text": "Upcoming PH: [10/2-11/2] Thaipusam",
                        "status_emoji": ":large_yellow_circle:",
                        "status_expiration": 1_707_523_200
                    }
                })
            );
        }

        #[test]
        fn method_urls() {
            let sink = SlackStatusSink::new(SlackConfig::new("xoxp-test").with_api_base("http://localhost:9/api/")).unwrap();
            assert_eq!(sink.method_url("users.profile.get"), "http://localhost:9/api/users.profile.get");
        }

        #[test]
        fn empty_token_rejected() {
            let err = SlackStatusSink::new(SlackConfig::new("  ")).unwrap_err();
            assert_eq!(err.code(), ProviderErrorCode::ConfigurationError);
            assert_eq!(err.provider(), Some("slack"));
        }

        #[test]
        fn debug_redacts_token() {
            let debug = format!("{:?}", SlackConfig::new("xoxp-secret"));
            assert!(!debug.contains("xoxp-secret"));
        }
    }
}
