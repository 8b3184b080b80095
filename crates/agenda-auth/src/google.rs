//! Google OAuth2 provider for Calendar access.

use agenda_core::{AuthError, OAuthConfig};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::credentials::ApplicationCredential;
use crate::storage::UserToken;

/// Lifetime assumed when the provider omits `expires_in`.
const DEFAULT_EXPIRES_IN: u64 = 3600;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoogleTokenResponse {
    pub access_token: String,
    pub refresh_token: Option<String>,
    #[serde(default = "default_expires_in")]
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
    #[serde(default)]
    pub scope: String,
}

fn default_expires_in() -> u64 {
    DEFAULT_EXPIRES_IN
}

impl GoogleTokenResponse {
    /// Convert to the persisted form, anchoring `expires_in` at `now`.
    ///
    /// The expiry is kept at millisecond precision so it survives a save/load
    /// cycle unchanged.
    pub fn into_user_token(self, now: DateTime<Utc>) -> UserToken {
        let expires_ms = i64::try_from(self.expires_in.saturating_mul(1000)).unwrap_or(i64::MAX);
        let expiry_ms = now.timestamp_millis().saturating_add(expires_ms);
        let expiry_date = DateTime::from_timestamp_millis(expiry_ms).unwrap_or(now);

        UserToken {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expiry_date,
            scope: self.scope,
            token_type: if self.token_type.is_empty() {
                "Bearer".to_string()
            } else {
                self.token_type
            },
        }
    }
}

pub struct GoogleOAuth2Provider {
    credential: ApplicationCredential,
    config: OAuthConfig,
    client: reqwest::Client,
}

impl GoogleOAuth2Provider {
    pub fn new(credential: ApplicationCredential, config: OAuthConfig, client: reqwest::Client) -> Self {
        Self {
            credential,
            config,
            client,
        }
    }

    /// Generate authorization URL for the OAuth flow.
    /// Returns (url, state); state is checked when the operator pastes the
    /// full redirect URL back.
    pub fn authorization_url(&self) -> (String, String) {
        let state = uuid::Uuid::new_v4().to_string();
        let scopes = self.config.scopes.join(" ");

        let url = format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}&access_type=offline",
            self.config.auth_url,
            urlencoding::encode(&self.credential.client_id),
            urlencoding::encode(&self.credential.redirect_uri),
            urlencoding::encode(&scopes),
            urlencoding::encode(&state),
        );

        (url, state)
    }

    /// Exchange authorization code for tokens.
    #[tracing::instrument(skip(self, code), level = "info")]
    pub async fn exchange_code(&self, code: &str) -> Result<GoogleTokenResponse, AuthError> {
        let response = self
            .client
            .post(&self.config.token_url)
            .form(&[
                ("code", code),
                ("client_id", self.credential.client_id.as_str()),
                ("client_secret", self.credential.client_secret.as_str()),
                ("redirect_uri", self.credential.redirect_uri.as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("token request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AuthError::TokenExchange(format!("{}: {}", status, error_text)));
        }

        response
            .json::<GoogleTokenResponse>()
            .await
            .map_err(|e| AuthError::TokenExchange(format!("malformed token response: {}", e)))
    }
}
