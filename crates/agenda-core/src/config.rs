use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

use crate::error::ConfigError;

pub const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
pub const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
pub const CALENDAR_API_BASE: &str = "https://www.googleapis.com/calendar/v3";
pub const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar";

/// Upper bound Google accepts for `maxResults` on events.list.
const API_MAX_RESULTS: u32 = 2500;

/// Longest look-ahead window accepted, roughly ten years.
pub const MAX_WINDOW_DAYS: u32 = 3660;

pub const ENV_CREDENTIALS_PATH: &str = "AGENDA_CREDENTIALS_PATH";
pub const ENV_TOKEN_PATH: &str = "AGENDA_TOKEN_PATH";
pub const ENV_CALENDAR_ID: &str = "AGENDA_CALENDAR_ID";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Where the credential and token files live
    pub paths: PathsConfig,

    /// OAuth endpoints and requested scopes
    pub oauth: OAuthConfig,

    /// Which calendar to read and how much of it
    pub calendar: CalendarConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// OAuth client credentials downloaded from the Google Cloud console
    pub credentials: PathBuf,

    /// Cached user token written after the first successful sign-in
    pub token: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            credentials: PathBuf::from("credentials.json"),
            token: PathBuf::from("token.json"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OAuthConfig {
    pub scopes: Vec<String>,
    pub auth_url: String,
    pub token_url: String,
}

impl Default for OAuthConfig {
    fn default() -> Self {
        Self {
            scopes: vec![CALENDAR_SCOPE.to_string()],
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    pub api_base_url: String,

    /// Calendar to list; "primary" is the signed-in user's main calendar
    pub calendar_id: String,

    /// Length of the listing window starting now
    pub window_days: u32,

    /// Maximum number of events requested
    pub max_results: u32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            api_base_url: CALENDAR_API_BASE.to_string(),
            calendar_id: "primary".to_string(),
            window_days: 7,
            max_results: 10,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist. Without one, the per-user config file is
    /// read when present and built-in defaults are used otherwise.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => {
                if !path.exists() {
                    return Err(ConfigError::NotFound(path.to_path_buf()));
                }
                Self::from_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => {
                    tracing::debug!("No config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        let config: Config = toml::from_str(&contents)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

        tracing::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable source.
    pub fn apply_env_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup(ENV_CREDENTIALS_PATH).filter(|v| !v.is_empty()) {
            self.paths.credentials = PathBuf::from(path);
        }
        if let Some(path) = lookup(ENV_TOKEN_PATH).filter(|v| !v.is_empty()) {
            self.paths.token = PathBuf::from(path);
        }
        if let Some(id) = lookup(ENV_CALENDAR_ID).filter(|v| !v.is_empty()) {
            self.calendar.calendar_id = id;
        }
    }

    /// Validate and log warnings, failing on any error.
    pub fn ensure_valid(&self) -> Result<ValidationResult, ConfigError> {
        let validation = self.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()));
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok(validation)
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.oauth.scopes.is_empty() {
            result.add_error("oauth.scopes", "At least one scope is required");
        }
        Self::validate_url(&self.oauth.auth_url, "oauth.auth_url", &mut result);
        Self::validate_url(&self.oauth.token_url, "oauth.token_url", &mut result);
        Self::validate_url(
            &self.calendar.api_base_url,
            "calendar.api_base_url",
            &mut result,
        );

        if self.calendar.calendar_id.trim().is_empty() {
            result.add_error("calendar.calendar_id", "Calendar id must not be empty");
        }

        if self.calendar.window_days == 0 {
            result.add_error("calendar.window_days", "Window must be at least one day");
        } else if self.calendar.window_days > MAX_WINDOW_DAYS {
            result.add_error(
                "calendar.window_days",
                format!("Window must be at most {} days", MAX_WINDOW_DAYS),
            );
        }

        if self.calendar.max_results == 0 {
            result.add_error("calendar.max_results", "Result cap must be greater than 0");
        } else if self.calendar.max_results > API_MAX_RESULTS {
            result.add_warning(
                "calendar.max_results",
                format!("Google caps results at {}", API_MAX_RESULTS),
            );
        }

        result
    }

    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }
                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Per-user config file, e.g. `~/.config/agenda/config.toml` on Linux.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("agenda").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        assert!(result.is_valid(), "Default config should be valid: {:?}", result.errors);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_defaults_match_single_week_listing() {
        let config = Config::default();
        assert_eq!(config.calendar.window_days, 7);
        assert_eq!(config.calendar.max_results, 10);
        assert_eq!(config.calendar.calendar_id, "primary");
        assert_eq!(config.oauth.scopes, vec![CALENDAR_SCOPE.to_string()]);
        assert_eq!(config.paths.token, PathBuf::from("token.json"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[calendar]\nwindow_days = 14\n\n[paths]\ntoken = \"/var/lib/agenda/token.json\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.calendar.window_days, 14);
        assert_eq!(config.calendar.max_results, 10);
        assert_eq!(config.paths.token, PathBuf::from("/var/lib/agenda/token.json"));
        assert_eq!(config.paths.credentials, PathBuf::from("credentials.json"));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_malformed_file_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[calendar\nwindow_days = ").unwrap();
        assert!(matches!(
            Config::load(Some(&path)),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            (ENV_CREDENTIALS_PATH, "/etc/agenda/client.json"),
            (ENV_TOKEN_PATH, ""),
            (ENV_CALENDAR_ID, "team@example.com"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env_from(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.paths.credentials, PathBuf::from("/etc/agenda/client.json"));
        // Empty values are ignored
        assert_eq!(config.paths.token, PathBuf::from("token.json"));
        assert_eq!(config.calendar.calendar_id, "team@example.com");
    }

    #[test]
    fn test_zero_window_is_error() {
        let mut config = Config::default();
        config.calendar.window_days = 0;
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "calendar.window_days"));
        assert!(matches!(config.ensure_valid(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_oversized_window_is_error() {
        let mut config = Config::default();
        config.calendar.window_days = 200_000_000;
        assert!(config
            .validate()
            .errors
            .iter()
            .any(|e| e.field == "calendar.window_days"));
        assert!(matches!(config.ensure_valid(), Err(ConfigError::Invalid(_))));

        config.calendar.window_days = MAX_WINDOW_DAYS;
        assert!(config.ensure_valid().is_ok());
    }

    #[test]
    fn test_large_result_cap_is_warning() {
        let mut config = Config::default();
        config.calendar.max_results = 5000;
        let result = config.validate();
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.field == "calendar.max_results"));
    }

    #[test]
    fn test_invalid_url_scheme() {
        let mut config = Config::default();
        config.oauth.token_url = "ftp://localhost:8080".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.message.contains("http or https")));
    }

    #[test]
    fn test_empty_scopes_is_error() {
        let mut config = Config::default();
        config.oauth.scopes.clear();
        assert!(!config.validate().is_valid());
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }
}
