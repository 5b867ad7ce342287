//! lindrive Drive - Google Drive v3 API adapter
//!
//! Provides the async adapter behind the `RemoteFileOps` port:
//! - Authenticated, retrying HTTP client for the Drive v3 REST API
//! - Paginated folder listing with all-or-nothing aggregation
//! - Streaming chunked download
//! - Resumable chunked upload with per-chunk retry
//! - Folder creation and metadata fetch
//! - OAuth2 token persistence and refresh
//!
//! ## Modules
//!
//! - [`auth`] - OAuth2 token storage and refresh
//! - [`client`] - Drive API HTTP client with retry/backoff
//! - [`list`] - Paginated children listing
//! - [`transfer`] - Download and resumable upload
//! - [`files`] - Folder creation and metadata fetch
//! - [`ops`] - `RemoteFileOps` port implementation
//! - [`wire`] - Drive API wire types shared across modules

pub mod auth;
pub mod client;
pub mod files;
pub mod list;
pub mod ops;
pub mod transfer;
pub mod wire;

use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when communicating with the Google Drive API
///
/// Every remote failure is classified here at the adapter boundary, so
/// callers can distinguish a genuinely empty folder from a failed
/// listing, and a missing item from a permission problem.
#[derive(Debug, Error)]
pub enum DriveError {
    /// Authentication credentials are invalid or expired
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Insufficient permissions for the requested operation
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limit exceeded; retry after the specified duration
    #[error("Too many requests, retry after {retry_after:?}")]
    TooManyRequests {
        /// Duration to wait before retrying
        retry_after: Duration,
    },

    /// A server-side error occurred (5xx)
    #[error("Server error: {0}")]
    ServerError(String),

    /// A network-level error occurred
    #[error("Network error: {0}")]
    NetworkError(#[source] reqwest::Error),

    /// A local filesystem error occurred during a transfer
    #[error("Local I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The API response could not be parsed or was malformed
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl DriveError {
    /// Returns true if retrying the same call may succeed
    ///
    /// Rate limiting, server errors, and network errors are transient;
    /// auth failures and missing resources are not.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            DriveError::TooManyRequests { .. }
                | DriveError::ServerError(_)
                | DriveError::NetworkError(_)
        )
    }
}

impl From<reqwest::Error> for DriveError {
    fn from(e: reqwest::Error) -> Self {
        // A decode failure means the server already answered; re-sending
        // the request cannot make a malformed body parse.
        if e.is_decode() {
            DriveError::InvalidResponse(format!("undecodable response body: {e}"))
        } else {
            DriveError::NetworkError(e)
        }
    }
}
