//! Folder creation and metadata fetch
//!
//! The two metadata-only Drive calls: `POST /files` with the folder MIME
//! type, and `GET /files/{id}` with the standard field projection.

use reqwest::Method;
use tracing::{debug, info};

use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::{RemoteResource, FOLDER_MIME_TYPE};

use crate::client::DriveClient;
use crate::wire::{DriveFile, FILE_FIELDS};
use crate::DriveError;

/// Response of the folder-create call (only the ID is projected)
#[derive(Debug, serde::Deserialize)]
struct CreatedFolder {
    id: String,
}

/// Creates a folder-type remote resource
///
/// Not idempotent: Drive happily creates a second folder with the same
/// name under the same parent. Callers that need uniqueness must check
/// with `list_children` first.
///
/// # Arguments
/// * `client` - The authenticated DriveClient
/// * `name` - Folder name
/// * `parent_id` - Parent folder, or `None` for root
///
/// # Returns
/// The ID of the newly created folder
pub async fn create_folder(
    client: &DriveClient,
    name: &str,
    parent_id: Option<&RemoteId>,
) -> Result<RemoteId, DriveError> {
    let mut metadata = serde_json::json!({
        "name": name,
        "mimeType": FOLDER_MIME_TYPE,
    });
    if let Some(parent) = parent_id {
        metadata["parents"] = serde_json::json!([parent.as_str()]);
    }

    let response = client
        .execute_with_retry(
            || {
                client
                    .request(Method::POST, "/files")
                    .query(&[("fields", "id")])
                    .json(&metadata)
            },
            "create_folder",
        )
        .await?;

    let created: CreatedFolder = response.json().await?;
    let id = RemoteId::new(created.id)
        .map_err(|e| DriveError::InvalidResponse(format!("bad folder id: {e}")))?;
    info!(name, id = %id, "Created folder");
    Ok(id)
}

/// Fetches current metadata for one remote item
///
/// # Arguments
/// * `client` - The authenticated DriveClient
/// * `remote_id` - The item to inspect
///
/// # Errors
/// [`DriveError::NotFound`] if the item does not exist,
/// [`DriveError::Forbidden`] if access is denied.
pub async fn get_metadata(
    client: &DriveClient,
    remote_id: &RemoteId,
) -> Result<RemoteResource, DriveError> {
    let path = format!("/files/{}", remote_id.as_str());
    debug!(id = %remote_id, "Fetching metadata");

    let response = client
        .execute_with_retry(
            || {
                client
                    .request(Method::GET, &path)
                    .query(&[("fields", FILE_FIELDS)])
            },
            "get_metadata",
        )
        .await?;

    let file: DriveFile = response.json().await?;
    file.into_resource()
}
