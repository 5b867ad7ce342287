//! Google Drive API wire types
//!
//! JSON-deserialization structs for the Drive v3 `File` resource and the
//! paginated file list envelope, plus the mapping into the port-level
//! [`RemoteResource`] DTO. The same `fields` projection is requested on
//! every call that returns a file resource, so one wire type serves the
//! listing, upload, and metadata modules.
//!
//! See: <https://developers.google.com/drive/api/reference/rest/v3/files>

use serde::Deserialize;

use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::RemoteResource;

use crate::DriveError;

/// Field projection requested for every file-resource response
pub const FILE_FIELDS: &str = "id, name, mimeType, md5Checksum, parents";

/// A Drive `File` resource as returned by the v3 API
///
/// Fields use camelCase to match the JSON format. `md5Checksum` is absent
/// for folders and Google-native document types; `parents` is absent for
/// items shared without parent visibility.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriveFile {
    /// Unique identifier of the item within the drive
    pub id: String,
    /// Name of the item (filename or folder name)
    #[serde(default)]
    pub name: String,
    /// MIME type; `application/vnd.google-apps.folder` marks folders
    #[serde(default)]
    pub mime_type: String,
    /// MD5 checksum of the content (absent for folders)
    pub md5_checksum: Option<String>,
    /// IDs of the parent folders
    pub parents: Option<Vec<String>>,
}

/// Response envelope of `GET /files` (paginated listing)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileList {
    /// One page of file resources
    #[serde(default)]
    pub files: Vec<DriveFile>,
    /// Cursor for the next page (absent on the last page)
    pub next_page_token: Option<String>,
}

impl DriveFile {
    /// Converts this wire struct into the port-level [`RemoteResource`]
    ///
    /// # Errors
    /// Returns [`DriveError::InvalidResponse`] if the API returned an
    /// empty or malformed item or parent ID.
    pub fn into_resource(self) -> Result<RemoteResource, DriveError> {
        let id = RemoteId::new(self.id)
            .map_err(|e| DriveError::InvalidResponse(format!("bad file id: {e}")))?;

        let parents = self
            .parents
            .unwrap_or_default()
            .into_iter()
            .map(|p| {
                RemoteId::new(p)
                    .map_err(|e| DriveError::InvalidResponse(format!("bad parent id: {e}")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RemoteResource {
            id,
            name: self.name,
            mime_type: self.mime_type,
            content_hash: self.md5_checksum,
            parents,
        })
    }
}
