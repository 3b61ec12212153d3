use std::env;

use thiserror::Error;

use crate::cookies::CSRF_COOKIE_NAME;

const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
const DEFAULT_TIMEOUT_MS: u64 = 30_000;

/// Connection settings for [`crate::PlatformAdminClient`].
#[derive(Debug, Clone)]
pub struct AdminClientConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    /// Browser-shaped cookie store, forwarded verbatim as the `Cookie`
    /// header so the backend sees the same credentials the admin page sends.
    pub cookie_header: String,
    pub csrf_cookie_name: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid WORKMANIA_ADMIN_TIMEOUT_MS: {0}")]
    InvalidTimeoutMs(String),
}

impl AdminClientConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            cookie_header: String::new(),
            csrf_cookie_name: CSRF_COOKIE_NAME.to_string(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = env::var("WORKMANIA_ADMIN_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let timeout_ms = env::var("WORKMANIA_ADMIN_TIMEOUT_MS")
            .unwrap_or_else(|_| DEFAULT_TIMEOUT_MS.to_string())
            .parse::<u64>()
            .map_err(|error| ConfigError::InvalidTimeoutMs(error.to_string()))?;
        let cookie_header = env::var("WORKMANIA_ADMIN_COOKIE")
            .unwrap_or_default()
            .trim()
            .to_string();
        let csrf_cookie_name = env::var("WORKMANIA_ADMIN_CSRF_COOKIE")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| CSRF_COOKIE_NAME.to_string());

        Ok(Self {
            base_url,
            timeout_ms,
            cookie_header,
            csrf_cookie_name,
        })
    }
}
