//! Centralized error types for agenda.
//!
//! Each concern (configuration, authorization, fetching) gets its own enum.
//! Everything converts into [`AppError`], which the binary reports once at
//! the top level using `user_message()`.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level application error type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Authorization error: {0}")]
    Auth(#[from] AuthError),

    #[error("Calendar error: {0}")]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Returns a short, non-technical message for the console.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Config(e) => e.user_message(),
            AppError::Auth(e) => e.user_message(),
            AppError::Fetch(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed.",
            AppError::Other(_) => "An unexpected error occurred.",
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Configuration parse error: {0}")]
    ParseError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration file not found. Check the --config path.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
        }
    }
}

/// Authorization errors (credential file, code exchange, token storage).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Error loading client secret file {}: {reason}", path.display())]
    CredentialFile { path: PathBuf, reason: String },

    #[error("Error retrieving access token: {0}")]
    TokenExchange(String),

    #[error("Authorization response state does not match the request")]
    StateMismatch,

    #[error("Could not read authorization code: {0}")]
    Prompt(String),

    #[error("Error storing token at {}: {reason}", path.display())]
    TokenPersist { path: PathBuf, reason: String },
}

impl AuthError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AuthError::CredentialFile { .. } => {
                "Could not load credentials.json. Download OAuth client credentials from the Google Cloud console."
            }
            AuthError::TokenExchange(_) => {
                "The authorization code was rejected. Run again and paste a fresh code."
            }
            AuthError::StateMismatch => {
                "The pasted URL belongs to a different sign-in attempt. Run again."
            }
            AuthError::Prompt(_) => "No authorization code was entered.",
            AuthError::TokenPersist { .. } => "Failed to save the token. You will be asked to sign in again next time.",
        }
    }
}

/// Errors raised while listing calendar events.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Unauthorized - token may be invalid or expired")]
    Unauthorized,

    #[error("Forbidden - insufficient permissions")]
    Forbidden,

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Listing window of {0} days is out of range")]
    WindowOutOfRange(u32),

    #[error("Network error: {0}")]
    Network(String),
}

impl FetchError {
    pub fn user_message(&self) -> &'static str {
        match self {
            FetchError::Unauthorized => {
                "Google rejected the saved token. Delete token.json and sign in again."
            }
            FetchError::Forbidden => "You don't have permission to read this calendar.",
            FetchError::CalendarNotFound(_) => "Calendar not found. Check the calendar id.",
            FetchError::RateLimited(_) => "Too many requests. Please wait and try again.",
            FetchError::Api { status, .. } if *status >= 500 => {
                "Google Calendar is experiencing issues. Please try again later."
            }
            FetchError::Api { .. } => "The calendar request failed.",
            FetchError::InvalidResponse(_) => "Received an unexpected response from Google.",
            FetchError::WindowOutOfRange(_) => "The look-ahead window is too large. Use fewer --days.",
            FetchError::Network(_) => "Unable to connect. Check your internet connection.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_fetch_error(self) -> FetchError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_fetch_error(self) -> FetchError {
        if self.is_decode() {
            FetchError::InvalidResponse(self.to_string())
        } else if let Some(status) = self.status() {
            FetchError::Api {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            FetchError::Network(self.to_string())
        }
    }
}
