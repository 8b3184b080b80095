use agenda_core::AuthError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// User token issued by the authorization-code exchange.
///
/// Serialized with the field names Google's client libraries use for
/// `token.json`, including `expiry_date` in Unix milliseconds.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserToken {
    /// Access token for API requests
    pub access_token: String,

    /// Refresh token, issued because offline access is requested
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,

    /// When the access token stops being accepted
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub expiry_date: DateTime<Utc>,

    /// Space-separated scopes granted to this token
    #[serde(default)]
    pub scope: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "Bearer".to_string()
}

impl fmt::Debug for UserToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserToken")
            .field("access_token", &"[redacted]")
            .field(
                "refresh_token",
                &self.refresh_token.as_ref().map(|_| "[redacted]"),
            )
            .field("expiry_date", &self.expiry_date)
            .field("scope", &self.scope)
            .field("token_type", &self.token_type)
            .finish()
    }
}

/// File-backed storage for the single cached user token.
#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached token, if there is a usable one.
    ///
    /// A missing file is the normal first-run case. An unreadable or
    /// malformed file is logged and treated the same way, so the caller
    /// falls back to interactive authorization.
    pub fn load_cached_token(&self) -> Option<UserToken> {
        let json = match fs::read_to_string(&self.path) {
            Ok(json) => json,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::debug!("No cached token at {:?}", self.path);
                return None;
            }
            Err(e) => {
                tracing::warn!("Failed to read token file {:?}: {}", self.path, e);
                return None;
            }
        };

        match serde_json::from_str::<UserToken>(&json) {
            Ok(token) => {
                tracing::debug!("Loaded cached token from {:?}", self.path);
                Some(token)
            }
            Err(e) => {
                tracing::warn!("Ignoring malformed token file {:?}: {}", self.path, e);
                None
            }
        }
    }

    /// Write the token, replacing any existing file.
    pub fn save_token(&self, token: &UserToken) -> Result<(), AuthError> {
        let persist_error = |reason: String| AuthError::TokenPersist {
            path: self.path.clone(),
            reason,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| persist_error(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(token).map_err(|e| persist_error(e.to_string()))?;

        fs::write(&self.path, json).map_err(|e| persist_error(e.to_string()))?;

        // Owner-only, the file carries the refresh token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(0o600))
                .map_err(|e| persist_error(e.to_string()))?;
        }

        tracing::info!("Token stored to {:?}", self.path);
        Ok(())
    }
}
