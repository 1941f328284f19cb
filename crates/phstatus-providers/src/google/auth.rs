//! Service-account authentication for Google APIs.
//!
//! Implements the OAuth 2.0 JWT bearer flow used by service accounts:
//!
//! 1. Build a claim set naming the service account, the scopes and the
//!    token endpoint
//! 2. Sign it with the account's RSA key (RS256)
//! 3. POST the signed assertion to the token endpoint
//! 4. Use the returned access token for Calendar API requests

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{ProviderError, ProviderResult};

use super::config::ServiceAccountKey;

/// Grant type for the JWT bearer flow.
const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion (Google's maximum).
const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Claims of the signed assertion.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssertionClaims {
    /// Issuer: the service account email.
    pub iss: String,
    /// Space-separated OAuth scopes.
    pub scope: String,
    /// Audience: the token endpoint.
    pub aud: String,
    /// Issued at (unix seconds).
    pub iat: i64,
    /// Expiration (unix seconds).
    pub exp: i64,
}

impl AssertionClaims {
    /// Builds the claims for `key` and `scopes` issued at `now`.
    pub fn new(key: &ServiceAccountKey, scopes: &[String], now: DateTime<Utc>) -> Self {
        let iat = now.timestamp();
        Self {
            iss: key.client_email.clone(),
            scope: scopes.join(" "),
            aud: key.token_uri.clone(),
            iat,
            exp: iat + ASSERTION_LIFETIME_SECS,
        }
    }
}

/// Response from the token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Exchanges service-account assertions for access tokens.
#[derive(Debug)]
pub struct ServiceAccountAuth {
    key: ServiceAccountKey,
    scopes: Vec<String>,
    http_client: reqwest::Client,
}

impl ServiceAccountAuth {
    /// Creates an authenticator for `key` requesting `scopes`.
    pub fn new(key: ServiceAccountKey, scopes: Vec<String>, timeout: Duration) -> ProviderResult<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::internal("failed to create HTTP client").with_source(e))?;

        Ok(Self {
            key,
            scopes,
            http_client,
        })
    }

    /// Signs an assertion for the current time.
    pub fn signed_assertion(&self, now: DateTime<Utc>) -> ProviderResult<String> {
        sign_assertion(&self.key, &AssertionClaims::new(&self.key, &self.scopes, now))
    }

    /// Obtains a fresh access token.
    pub async fn access_token(&self) -> ProviderResult<String> {
        let assertion = self.signed_assertion(Utc::now())?;
        let params = [("grant_type", JWT_BEARER_GRANT), ("assertion", assertion.as_str())];

        debug!(account = %self.key.client_email, "requesting service account token");
        let response = self
            .http_client
            .post(&self.key.token_uri)
            .form(&params)
            .send()
            .await
            .map_err(|e| ProviderError::network(format!("token request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ProviderError::network(format!("failed to read response: {}", e)))?;

        if !status.is_success() {
            // The token endpoint answers 400 invalid_grant for a bad key or clock skew.
            return Err(ProviderError::authentication(format!(
                "token exchange failed ({}): {}",
                status, body
            )));
        }

        let token = parse_token_response(&body)?;
        info!(expires_in = ?token.expires_in, "obtained service account access token");
        Ok(token.access_token)
    }
}

/// Signs `claims` with the service account's RSA key.
pub fn sign_assertion(key: &ServiceAccountKey, claims: &AssertionClaims) -> ProviderResult<String> {
    let encoding_key = EncodingKey::from_rsa_pem(key.private_key.as_bytes()).map_err(|e| {
        ProviderError::configuration(format!("invalid service account private key: {}", e))
    })?;

    let mut header = Header::new(Algorithm::RS256);
    header.kid = key.private_key_id.clone();

    encode(&header, claims, &encoding_key).map_err(|e| {
        ProviderError::internal(format!("failed to sign service account assertion: {}", e))
    })
}

fn parse_token_response(body: &str) -> ProviderResult<TokenResponse> {
    serde_json::from_str(body)
        .map_err(|e| ProviderError::invalid_response(format!("invalid token response: {}", e)))
}
