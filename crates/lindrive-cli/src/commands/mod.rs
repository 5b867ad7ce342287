//! CLI command implementations and shared setup helpers

pub mod files;
pub mod list;
pub mod status;
pub mod transfer;

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use lindrive_core::config::Config;
use lindrive_drive::auth::TokenFile;
use lindrive_drive::client::DriveClient;
use lindrive_drive::ops::DriveFileOps;

/// Loads the configuration from the given path or the platform default
pub fn load_config(path: Option<&str>) -> Result<Config> {
    let path = match path {
        Some(p) => Path::new(p).to_path_buf(),
        None => Config::default_path(),
    };
    Config::load(&path)
        .with_context(|| format!("Cannot load configuration from {}", path.display()))
}

/// Builds an authenticated Drive client from the persisted token
///
/// Refreshes the access token first when it is expired and the config
/// carries OAuth client credentials.
pub async fn drive_client(config: &Config) -> Result<DriveClient> {
    let token_file = TokenFile::new(&config.token_path);
    let mut token = token_file
        .load()
        .context("No usable token; run the consent flow and place its result in the token file")?;

    // Refresh ahead of expiry so the token does not lapse in the middle
    // of a chunked transfer.
    if token.expires_within(chrono::Duration::seconds(60)) {
        match config.oauth_client_id.as_deref() {
            Some(client_id) => {
                token = lindrive_drive::auth::refresh_access_token(
                    client_id,
                    config.oauth_client_secret.as_deref(),
                    &token,
                )
                .await?;
                token_file.save(&token)?;
                debug!("Access token refreshed");
            }
            None if token.is_expired() => anyhow::bail!(
                "Access token expired and no oauth_client_id configured for refresh"
            ),
            None => warn!("Access token expires soon and no oauth_client_id is configured"),
        }
    }

    Ok(DriveClient::new(token.access_token))
}

/// Builds the Drive adapter behind the `RemoteFileOps` port
pub async fn drive_ops(config: &Config) -> Result<DriveFileOps> {
    Ok(DriveFileOps::new(drive_client(config).await?))
}
