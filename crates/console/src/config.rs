//! Console configuration from the environment.
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file in the working directory.

use posadmin_observability::LogFormat;

pub const DEFAULT_API_URL: &str = "http://localhost:8080";

const API_URL_VAR: &str = "POSADMIN_API_URL";
const LOG_FORMAT_VAR: &str = "POSADMIN_LOG_FORMAT";
const USERNAME_VAR: &str = "POSADMIN_USERNAME";
const PASSWORD_VAR: &str = "POSADMIN_PASSWORD";

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },
}

/// Username/password pair used by the binary to open a session.
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

impl core::fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    pub log_format: LogFormat,
    pub login: Option<LoginCredentials>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            log_format: LogFormat::default(),
            login: None,
        }
    }
}

impl ConsoleConfig {
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = normalize_url(&api_url.into());
        self
    }

    /// Load configuration, reading `.env` first when one exists.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_url = lookup(API_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .map(|v| normalize_url(&v))
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            return Err(ConfigError::Invalid {
                var: API_URL_VAR,
                message: format!("`{api_url}` is not an http(s) URL"),
            });
        }

        let log_format = match lookup(LOG_FORMAT_VAR) {
            Some(raw) if !raw.trim().is_empty() => raw
                .parse::<LogFormat>()
                .map_err(|message| ConfigError::Invalid {
                    var: LOG_FORMAT_VAR,
                    message,
                })?,
            _ => LogFormat::default(),
        };

        let login = match (lookup(USERNAME_VAR), lookup(PASSWORD_VAR)) {
            (Some(username), Some(password)) => Some(LoginCredentials { username, password }),
            _ => None,
        };

        Ok(Self {
            api_url,
            log_format,
            login,
        })
    }
}

fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}
