//! Remote file operations port (driven/secondary port)
//!
//! This module defines the interface for interacting with the remote
//! storage backend. The primary implementation targets Google Drive via
//! the Drive v3 REST API, but the trait is provider-agnostic: it exposes
//! exactly the listing/transfer/metadata primitives a sync coordinator
//! needs, with pagination and resumable-transfer mechanics hidden behind
//! the adapter.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification; the
//!   adapter attaches a structured cause (its own error enum) to the
//!   chain so callers that care can downcast.
//! - Uses `#[async_trait]` for async trait methods.
//! - `RemoteResource` is a port-level DTO, not a domain entity; it is
//!   always fetched live and never persisted.
//! - None of these operations is idempotent with respect to name/parent
//!   collisions: repeated `upload`/`create_folder` calls create duplicate
//!   remote items. Callers must list-before-create.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::newtypes::RemoteId;

/// MIME type Google Drive uses to mark folder resources
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

// ============================================================================
// RemoteResource DTO
// ============================================================================

/// A remote file or folder as reported by the storage backend
///
/// Transient: always fetched live from listing/metadata calls, never
/// cached or persisted. Folders carry no content hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteResource {
    /// Provider-assigned item identifier
    pub id: RemoteId,
    /// Item name (file or folder name, not a path)
    pub name: String,
    /// MIME type; [`FOLDER_MIME_TYPE`] marks folders
    pub mime_type: String,
    /// MD5 checksum of the content (absent for folders)
    pub content_hash: Option<String>,
    /// IDs of the parent folders containing this item
    pub parents: Vec<RemoteId>,
}

impl RemoteResource {
    /// Returns true if this resource is a folder
    #[must_use]
    pub fn is_folder(&self) -> bool {
        self.mime_type == FOLDER_MIME_TYPE
    }
}

// ============================================================================
// RemoteFileOps trait
// ============================================================================

/// Port trait for remote storage operations
///
/// This is the interface sync coordinators (Monitor/Poller) use for all
/// remote interaction. Implementations handle the provider-specific API
/// calls, page-cursor continuation, chunked transfer, retry/backoff, and
/// error mapping.
///
/// ## Implementation Notes
///
/// - All methods are stateless per call and safe to invoke concurrently
///   from multiple tasks; the adapter holds no shared mutable state.
/// - `list_children` must aggregate every page before returning: callers
///   never observe a partial page, and a failure on any page fails the
///   whole call rather than returning the pages fetched so far.
/// - `download_to` must stream in bounded chunks (no whole-file
///   buffering) and must not leave a partial destination file behind on
///   failure.
#[async_trait::async_trait]
pub trait RemoteFileOps: Send + Sync {
    /// Lists all non-trashed children of a folder (non-recursive)
    ///
    /// Follows the page-token cursor until exhausted and returns one
    /// aggregated, deduplicated set. Ordering is not guaranteed.
    ///
    /// # Arguments
    /// * `folder_id` - Folder to list, or `None` for root scope
    async fn list_children(
        &self,
        folder_id: Option<&RemoteId>,
    ) -> anyhow::Result<Vec<RemoteResource>>;

    /// Downloads a file's content to a local path
    ///
    /// Overwrites any existing file at `local_path`. On failure the
    /// partially written destination is removed before the error is
    /// returned.
    ///
    /// # Arguments
    /// * `remote_id` - The remote item to download
    /// * `local_path` - Destination path on the local filesystem
    async fn download_to(&self, remote_id: &RemoteId, local_path: &Path) -> anyhow::Result<()>;

    /// Uploads a new file via a resumable transfer session
    ///
    /// An individual chunk can be retried without restarting the whole
    /// transfer. Creates a new remote item on every call (no overwrite,
    /// no collision check).
    ///
    /// # Arguments
    /// * `local_path` - Source file on the local filesystem
    /// * `name` - Name of the file on the remote side
    /// * `parent_id` - Parent folder, or `None` for root
    /// * `mime_type` - MIME type hint, or `None` to let the provider infer
    ///
    /// # Returns
    /// The created resource's metadata (id, name, hash, parents)
    async fn upload(
        &self,
        local_path: &Path,
        name: &str,
        parent_id: Option<&RemoteId>,
        mime_type: Option<&str>,
    ) -> anyhow::Result<RemoteResource>;

    /// Creates a folder-type remote resource
    ///
    /// Creates a new folder on every call, even if one with the same name
    /// already exists under `parent_id`.
    ///
    /// # Arguments
    /// * `name` - Folder name
    /// * `parent_id` - Parent folder, or `None` for root
    ///
    /// # Returns
    /// The ID of the newly created folder
    async fn create_folder(
        &self,
        name: &str,
        parent_id: Option<&RemoteId>,
    ) -> anyhow::Result<RemoteId>;

    /// Fetches current metadata for one remote item
    ///
    /// # Arguments
    /// * `remote_id` - The item to inspect
    async fn get_metadata(&self, remote_id: &RemoteId) -> anyhow::Result<RemoteResource>;
}
