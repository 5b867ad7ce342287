//! Google Drive API HTTP client
//!
//! Provides a typed HTTP client for the Drive v3 REST API. Handles
//! authentication headers, base-URL construction (the upload endpoints
//! live under a separate base), response classification into
//! [`DriveError`], and a bounded retry/backoff policy for throttling and
//! server errors.
//!
//! ## Retry policy
//!
//! Transient failures (HTTP 429, 5xx, network errors) are retried up to
//! [`MAX_RETRIES`] times. A 429 honors the `Retry-After` header when
//! present; otherwise, and for all 5xx/network retries, the delay grows
//! exponentially from [`BACKOFF_BASE`] and is capped at [`BACKOFF_CAP`].
//! Non-transient failures (401/403/404) are returned immediately.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, info, warn};

use crate::DriveError;

/// Base URL for Drive v3 metadata/content API calls
const API_BASE_URL: &str = "https://www.googleapis.com/drive/v3";

/// Base URL for Drive v3 upload API calls
const UPLOAD_BASE_URL: &str = "https://www.googleapis.com/upload/drive/v3";

/// Default retry-after duration when the header is missing or unparsable
const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(30);

/// Maximum number of retries for transient failures
pub const MAX_RETRIES: u32 = 5;

/// First backoff delay; doubles per attempt
const BACKOFF_BASE: Duration = Duration::from_millis(500);

/// Upper bound on a single backoff delay
const BACKOFF_CAP: Duration = Duration::from_secs(32);

/// HTTP client for Google Drive API calls
///
/// Wraps `reqwest::Client` with bearer authentication and base-URL
/// construction. Holds no per-call mutable state, so one instance can be
/// shared across concurrently running operations.
pub struct DriveClient {
    /// The underlying HTTP client
    client: Client,
    /// Base URL for metadata/content requests
    base_url: String,
    /// Base URL for upload requests
    upload_base_url: String,
    /// Current OAuth2 access token
    access_token: String,
}

impl DriveClient {
    /// Creates a new DriveClient with the given access token
    ///
    /// # Arguments
    /// * `access_token` - A valid OAuth2 access token for the Drive API
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: API_BASE_URL.to_string(),
            upload_base_url: UPLOAD_BASE_URL.to_string(),
            access_token: access_token.into(),
        }
    }

    /// Creates a DriveClient with custom base URLs (useful for testing)
    ///
    /// # Arguments
    /// * `access_token` - A valid OAuth2 access token
    /// * `base_url` - Base URL for metadata/content requests
    /// * `upload_base_url` - Base URL for upload requests
    pub fn with_base_urls(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
        upload_base_url: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            upload_base_url: upload_base_url.into(),
            access_token: access_token.into(),
        }
    }

    /// Updates the access token (e.g., after a token refresh)
    pub fn set_access_token(&mut self, token: impl Into<String>) {
        self.access_token = token.into();
        debug!("Updated DriveClient access token");
    }

    /// Returns the current access token
    pub fn access_token(&self) -> &str {
        &self.access_token
    }

    /// Creates an authenticated request builder against the API base URL
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the base URL (e.g., "/files")
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Creates an authenticated request builder against the upload base URL
    ///
    /// # Arguments
    /// * `method` - HTTP method
    /// * `path` - API path relative to the upload base URL
    pub fn upload_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.upload_base_url, path);
        self.client
            .request(method, &url)
            .bearer_auth(&self.access_token)
    }

    /// Executes a request with retry/backoff for transient failures
    ///
    /// The `build` closure is invoked once per attempt to produce a fresh
    /// request (request builders are single-use). Non-success statuses
    /// that survive the retry budget are classified via [`check_status`].
    ///
    /// # Arguments
    /// * `build` - Produces the request for each attempt
    /// * `context` - Short call description for log entries
    pub async fn execute_with_retry<F>(
        &self,
        build: F,
        context: &str,
    ) -> Result<Response, DriveError>
    where
        F: Fn() -> RequestBuilder,
    {
        let mut last_error: Option<DriveError> = None;

        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                let delay = match &last_error {
                    Some(DriveError::TooManyRequests { retry_after }) => *retry_after,
                    _ => backoff_delay(attempt),
                };
                info!(
                    context,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying after transient failure"
                );
                tokio::time::sleep(delay).await;
            }

            let response = match build().send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(context, attempt, error = %e, "Request failed to send");
                    last_error = Some(DriveError::NetworkError(e));
                    continue;
                }
            };

            match check_status(response).await {
                Ok(response) => {
                    if attempt > 0 {
                        info!(context, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }
                Err(e) if e.is_transient() => {
                    warn!(context, attempt, error = %e, "Transient API failure");
                    last_error = Some(e);
                }
                Err(e) => return Err(e),
            }
        }

        Err(last_error.unwrap_or_else(|| {
            DriveError::InvalidResponse(format!("retry loop exited unexpectedly for {context}"))
        }))
    }

    /// Returns a reference to the underlying HTTP client
    ///
    /// Used by upload operations that target absolute session URLs rather
    /// than paths under a base URL.
    pub(crate) fn http_client(&self) -> &Client {
        &self.client
    }
}

/// Classifies a non-success response into a [`DriveError`]
///
/// Reads the response body into the error message so the cause (e.g., a
/// Drive `reason` code) survives into the logs.
pub async fn check_status(response: Response) -> Result<Response, DriveError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let retry_after = response
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .map(|v| parse_retry_after(v, DEFAULT_RETRY_AFTER));

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "unable to read error body".to_string());

    Err(match status {
        StatusCode::UNAUTHORIZED => DriveError::Unauthorized(body),
        // Drive reports quota throttling as 403 with a rateLimitExceeded
        // reason, not only as 429.
        StatusCode::FORBIDDEN if body.contains("ateLimitExceeded") => DriveError::TooManyRequests {
            retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
        },
        StatusCode::FORBIDDEN => DriveError::Forbidden(body),
        StatusCode::NOT_FOUND => DriveError::NotFound(body),
        StatusCode::TOO_MANY_REQUESTS => DriveError::TooManyRequests {
            retry_after: retry_after.unwrap_or(DEFAULT_RETRY_AFTER),
        },
        s if s.is_server_error() => DriveError::ServerError(format!("{s}: {body}")),
        s => DriveError::InvalidResponse(format!("unexpected status {s}: {body}")),
    })
}

/// Parses a `Retry-After` header value given in whole seconds
///
/// Falls back to `default` for the HTTP-date form or garbage input.
pub fn parse_retry_after(value: &str, default: Duration) -> Duration {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .unwrap_or(default)
}

/// Exponential backoff delay for the given attempt number (1-based)
pub(crate) fn backoff_delay(attempt: u32) -> Duration {
    let exp = BACKOFF_BASE.saturating_mul(1u32 << (attempt - 1).min(16));
    exp.min(BACKOFF_CAP)
}
