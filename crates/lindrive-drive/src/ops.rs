//! DriveFileOps - RemoteFileOps implementation for Google Drive
//!
//! Wraps the [`DriveClient`] and delegates to the list, transfer, and
//! files modules to fulfil the [`RemoteFileOps`] port contract.
//!
//! ## Design Notes
//!
//! - Holds no mutable state of its own; the underlying client is shared
//!   freely across concurrent port calls.
//! - Errors cross the port boundary as `anyhow` chains with the
//!   structured [`DriveError`](crate::DriveError) as the root cause, so
//!   coordinators that care can downcast while the common path just logs
//!   and skips.
//! - Every failure is logged here with call context; nothing panics past
//!   this boundary.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::error;

use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::{RemoteFileOps, RemoteResource};

use crate::client::DriveClient;
use crate::{files, list, transfer};

/// Google Drive implementation of the [`RemoteFileOps`] port
pub struct DriveFileOps {
    client: DriveClient,
}

impl DriveFileOps {
    /// Creates the adapter around an authenticated client
    pub fn new(client: DriveClient) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl RemoteFileOps for DriveFileOps {
    async fn list_children(&self, folder_id: Option<&RemoteId>) -> Result<Vec<RemoteResource>> {
        list::list_children(&self.client, folder_id)
            .await
            .map_err(|e| {
                error!(folder = ?folder_id.map(RemoteId::as_str), error = %e, "Listing failed");
                anyhow::Error::new(e)
            })
            .context("Failed to list folder children")
    }

    async fn download_to(&self, remote_id: &RemoteId, local_path: &Path) -> Result<()> {
        transfer::download_to(&self.client, remote_id, local_path)
            .await
            .map_err(|e| {
                error!(id = %remote_id, path = %local_path.display(), error = %e, "Download failed");
                anyhow::Error::new(e)
            })
            .with_context(|| format!("Failed to download {remote_id}"))
    }

    async fn upload(
        &self,
        local_path: &Path,
        name: &str,
        parent_id: Option<&RemoteId>,
        mime_type: Option<&str>,
    ) -> Result<RemoteResource> {
        transfer::upload(&self.client, local_path, name, parent_id, mime_type)
            .await
            .map_err(|e| {
                error!(name, path = %local_path.display(), error = %e, "Upload failed");
                anyhow::Error::new(e)
            })
            .with_context(|| format!("Failed to upload {}", local_path.display()))
    }

    async fn create_folder(&self, name: &str, parent_id: Option<&RemoteId>) -> Result<RemoteId> {
        files::create_folder(&self.client, name, parent_id)
            .await
            .map_err(|e| {
                error!(name, error = %e, "Folder creation failed");
                anyhow::Error::new(e)
            })
            .with_context(|| format!("Failed to create folder '{name}'"))
    }

    async fn get_metadata(&self, remote_id: &RemoteId) -> Result<RemoteResource> {
        files::get_metadata(&self.client, remote_id)
            .await
            .map_err(|e| {
                error!(id = %remote_id, error = %e, "Metadata fetch failed");
                anyhow::Error::new(e)
            })
            .with_context(|| format!("Failed to fetch metadata for {remote_id}"))
    }
}
