//! Thin client for the Workmania admin panel's platform scraping controls.
//!
//! Mirrors the start/stop links on the platform admin page: each operation
//! issues one CSRF-protected GET against the backend API and hands the JSON
//! payload back untouched. The per-click UI flow around those calls lives in
//! [`action`].

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header;
use thiserror::Error;

pub mod action;
pub mod config;
pub mod cookies;

pub use action::{
    ActionOutcome, ActionSurface, PageReloader, ScrapingAction, ScrapingBackend, TriggerLink,
    run_scraping_action,
};
pub use config::{AdminClientConfig, ConfigError};

#[derive(Debug, Error)]
pub enum AdminClientError {
    #[error("base URL is not configured")]
    BaseUrlMissing,
    #[error("invalid request path")]
    InvalidPath,
    #[error("failed to build HTTP client: {0}")]
    Build(String),
    #[error("request failed: {0}")]
    Request(String),
    #[error("failed to read response body: {0}")]
    Read(String),
    #[error("HTTP {status}: {body}")]
    Http { status: StatusCode, body: String },
    #[error("failed to decode JSON response: {0}")]
    Decode(String),
}

/// Client for the backend's platform scraping endpoints.
#[derive(Debug, Clone)]
pub struct PlatformAdminClient {
    base_url: String,
    cookie_header: String,
    csrf_cookie_name: String,
    http: reqwest::Client,
}

impl PlatformAdminClient {
    pub fn new(config: AdminClientConfig) -> Result<Self, AdminClientError> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms.max(250)))
            .build()
            .map_err(|error| AdminClientError::Build(error.to_string()))?;
        Ok(Self {
            base_url,
            cookie_header: config.cookie_header,
            csrf_cookie_name: config.csrf_cookie_name,
            http,
        })
    }

    #[must_use]
    pub fn endpoint(&self, path: &str) -> Option<String> {
        let trimmed = path.trim();
        if trimmed.is_empty() {
            return None;
        }
        if trimmed.starts_with('/') {
            Some(format!("{}{}", self.base_url, trimmed))
        } else {
            Some(format!("{}/{}", self.base_url, trimmed))
        }
    }

    #[must_use]
    pub fn scraping_start_path(platform_id: &str) -> String {
        format!("/api/v1/platforms/{}/scraping_start/", platform_id.trim())
    }

    #[must_use]
    pub fn scraping_stop_path(platform_id: &str) -> String {
        format!("/api/v1/platforms/{}/scraping_stop/", platform_id.trim())
    }

    /// Decoded value of the CSRF cookie from the configured cookie store.
    #[must_use]
    pub fn csrf_token(&self) -> Option<String> {
        cookies::cookie_value(&self.cookie_header, &self.csrf_cookie_name)
    }

    /// Starts the background scraping process for a platform. One request,
    /// no retry; the JSON payload comes back as-is.
    pub async fn scraping_start(
        &self,
        platform_id: &str,
    ) -> Result<serde_json::Value, AdminClientError> {
        self.get_json(Self::scraping_start_path(platform_id).as_str())
            .await
    }

    /// Stops the background scraping process for a platform.
    pub async fn scraping_stop(
        &self,
        platform_id: &str,
    ) -> Result<serde_json::Value, AdminClientError> {
        self.get_json(Self::scraping_stop_path(platform_id).as_str())
            .await
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, AdminClientError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let url = self.endpoint(path).ok_or(AdminClientError::InvalidPath)?;

        let mut request = self
            .http
            .get(url.as_str())
            .header("X-Requested-With", "XMLHttpRequest");
        match self.csrf_token() {
            Some(token) => {
                request = request.header("X-CSRFToken", token);
            }
            None => {
                tracing::debug!(
                    cookie = %self.csrf_cookie_name,
                    "CSRF cookie not found; sending request without X-CSRFToken"
                );
            }
        }
        if !self.cookie_header.is_empty() {
            request = request.header(header::COOKIE, self.cookie_header.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|error| AdminClientError::Request(error.to_string()))?;
        decode_json_response(response).await
    }
}

fn normalize_base_url(base_url: &str) -> Result<String, AdminClientError> {
    let trimmed = base_url.trim();
    if trimmed.is_empty() {
        return Err(AdminClientError::BaseUrlMissing);
    }
    Ok(trimmed.trim_end_matches('/').to_string())
}

async fn decode_json_response<T>(response: reqwest::Response) -> Result<T, AdminClientError>
where
    T: for<'de> serde::Deserialize<'de>,
{
    let status = response.status();
    let bytes = response
        .bytes()
        .await
        .map_err(|error| AdminClientError::Read(error.to_string()))?;

    if !status.is_success() {
        let body = String::from_utf8_lossy(&bytes).trim().to_string();
        let body = if body.is_empty() {
            "<empty>".to_string()
        } else {
            body
        };
        return Err(AdminClientError::Http { status, body });
    }

    serde_json::from_slice::<T>(&bytes).map_err(|error| AdminClientError::Decode(error.to_string()))
}
