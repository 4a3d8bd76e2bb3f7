use reqwest::Url;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub const API_URL_VAR: &str = "CREATIVE_MANAGER_API_URL";
pub const TIMEOUT_VAR: &str = "CREATIVE_MANAGER_TIMEOUT_SECS";
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid API URL '{value}': {reason}")]
    InvalidUrl { value: String, reason: String },
    #[error("API URL '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("invalid request timeout '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
}

/// Settings injected once at startup. Every backend call is resolved against
/// `api_base_url`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: Url,
    /// `None` keeps the transport default (no timeout).
    pub request_timeout: Option<Duration>,
}

/// Loads `.env` into the process environment. A missing file is not an
/// error. Runs before logging is set up so `RUST_LOG` can come from the file;
/// the caller logs the outcome once a subscriber exists.
pub fn load_dotenv() -> Result<Option<PathBuf>, dotenvy::Error> {
    missing_is_ok(dotenvy::dotenv().map(Some))
}

fn missing_is_ok(
    result: Result<Option<PathBuf>, dotenvy::Error>,
) -> Result<Option<PathBuf>, dotenvy::Error> {
    match result {
        Err(err) if err.not_found() => Ok(None),
        other => other,
    }
}

impl AppConfig {
    /// Reads the process environment. Call [`load_dotenv`] first to pick up
    /// a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var(API_URL_VAR).ok().as_deref(),
            std::env::var(TIMEOUT_VAR).ok().as_deref(),
        )
    }

    pub fn from_values(api_url: Option<&str>, timeout: Option<&str>) -> Result<Self, ConfigError> {
        let raw_url = api_url
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .unwrap_or(DEFAULT_API_URL);

        let mut api_base_url = Url::parse(raw_url).map_err(|err| ConfigError::InvalidUrl {
            value: raw_url.to_string(),
            reason: err.to_string(),
        })?;
        if !matches!(api_base_url.scheme(), "http" | "https") {
            return Err(ConfigError::UnsupportedScheme(raw_url.to_string()));
        }
        // Url::join drops the last segment unless the path ends with a slash.
        if !api_base_url.path().ends_with('/') {
            let path = format!("{}/", api_base_url.path());
            api_base_url.set_path(&path);
        }

        let request_timeout = match timeout.map(str::trim).filter(|value| !value.is_empty()) {
            None => None,
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidTimeout(value.to_string())),
            },
        };

        Ok(Self {
            api_base_url,
            request_timeout,
        })
    }

    /// Callback the backend registers with Google when a provider is set up.
    pub fn redirect_uri(&self, provider_slug: &str) -> String {
        format!(
            "{}integrations/{}/callback",
            self.api_base_url, provider_slug
        )
    }
}
