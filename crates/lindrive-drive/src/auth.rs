//! OAuth2 token persistence and refresh
//!
//! Handles the credential lifecycle the rest of the adapter consumes:
//! loading a previously granted token from disk, checking expiry, and
//! exchanging the refresh token for a fresh access token against
//! Google's token endpoint. The interactive consent flow that produces
//! the initial grant lives outside this crate; only its persisted result
//! is consumed here.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use oauth2::{basic::BasicClient, ClientId, ClientSecret, RefreshToken, TokenResponse, TokenUrl};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Google's OAuth2 token endpoint
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";

/// OAuth tokens as persisted in the token file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredToken {
    /// Bearer token for authenticating API requests
    pub access_token: String,
    /// Token for obtaining new access tokens without user interaction
    pub refresh_token: Option<String>,
    /// When the access token expires
    pub expires_at: DateTime<Utc>,
}

impl StoredToken {
    /// Returns true if the access token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Returns true if the access token will expire within the given duration
    pub fn expires_within(&self, duration: Duration) -> bool {
        Utc::now() + duration >= self.expires_at
    }
}

// ============================================================================
// Token file
// ============================================================================

/// On-disk storage for the OAuth token
///
/// A plain JSON file (mode 0600 on Unix) holding one [`StoredToken`].
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    /// Creates a handle for the token file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the persisted token
    ///
    /// # Errors
    /// Fails if the file is missing or unparsable; the caller decides
    /// whether that means "run the consent flow first".
    pub fn load(&self) -> Result<StoredToken> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read token file {}", self.path.display()))?;
        let token: StoredToken = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse token file {}", self.path.display()))?;
        debug!(path = %self.path.display(), expired = token.is_expired(), "Loaded token");
        Ok(token)
    }

    /// Persists a token, creating parent directories as needed
    pub fn save(&self, token: &StoredToken) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create token directory {}", parent.display())
                })?;
            }
        }
        let json = serde_json::to_string_pretty(token)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write token file {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
                .with_context(|| format!("Failed to chmod token file {}", self.path.display()))?;
        }

        debug!(path = %self.path.display(), "Saved token");
        Ok(())
    }
}

// ============================================================================
// Refresh
// ============================================================================

/// Exchanges a refresh token for a fresh access token
///
/// # Arguments
/// * `client_id` - OAuth client ID of this application
/// * `client_secret` - Client secret (installed-app flows have one)
/// * `token` - The stored token whose `refresh_token` is used
///
/// # Returns
/// A new [`StoredToken`]; the refresh token is carried over when the
/// provider does not rotate it.
pub async fn refresh_access_token(
    client_id: &str,
    client_secret: Option<&str>,
    token: &StoredToken,
) -> Result<StoredToken> {
    let refresh_token = token
        .refresh_token
        .as_deref()
        .context("No refresh token available; re-run the consent flow")?;

    info!("Refreshing access token");

    let mut client = BasicClient::new(ClientId::new(client_id.to_string()))
        .set_token_uri(TokenUrl::new(TOKEN_URL.to_string()).context("Invalid token URL")?);
    if let Some(secret) = client_secret {
        client = client.set_client_secret(ClientSecret::new(secret.to_string()));
    }

    let http_client = reqwest::Client::new();
    let token_result = client
        .exchange_refresh_token(&RefreshToken::new(refresh_token.to_string()))
        .request_async(&http_client)
        .await
        .context("Failed to refresh token")?;

    let expires_at = token_result
        .expires_in()
        .map(|d| Utc::now() + Duration::seconds(d.as_secs() as i64))
        .unwrap_or_else(|| Utc::now() + Duration::hours(1));

    let refreshed = StoredToken {
        access_token: token_result.access_token().secret().to_string(),
        refresh_token: token_result
            .refresh_token()
            .map(|t| t.secret().to_string())
            .or_else(|| Some(refresh_token.to_string())),
        expires_at,
    };

    info!("Successfully refreshed access token");
    Ok(refreshed)
}
