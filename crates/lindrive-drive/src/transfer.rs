//! File content transfer: streaming download and resumable upload
//!
//! Both directions move content in bounded chunks so memory use stays
//! flat regardless of file size:
//! - Download consumes the response body as a byte stream and writes each
//!   chunk to disk as it arrives.
//! - Upload opens a resumable session (`uploadType=resumable`) and PUTs
//!   fixed-size chunks with `Content-Range` headers. An individual chunk
//!   that fails transiently is retried without restarting the session.
//!
//! ## Google Drive resumable upload protocol
//!
//! 1. `POST /upload/drive/v3/files?uploadType=resumable` with the file
//!    metadata as JSON; the session URI comes back in `Location`.
//! 2. `PUT <session-uri>` per chunk with `Content-Range: bytes a-b/total`.
//!    Intermediate chunks are answered with `308 Resume Incomplete`; the
//!    final chunk returns `200`/`201` with the created file resource.
//!
//! See: <https://developers.google.com/drive/api/guides/manage-uploads#resumable>

use std::path::Path;

use futures_util::StreamExt;
use reqwest::{Method, StatusCode};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tracing::{debug, info, warn};

use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::RemoteResource;

use crate::client::{backoff_delay, check_status, DriveClient};
use crate::wire::{DriveFile, FILE_FIELDS};
use crate::DriveError;

/// Chunk size for resumable uploads: 8 MiB
///
/// Drive requires chunk sizes that are multiples of 256 KiB.
/// 8 MiB = 256 KiB * 32, which satisfies this requirement.
pub const UPLOAD_CHUNK_SIZE: usize = 8 * 1024 * 1024;

/// Retries for an individual upload chunk before the session is abandoned
const CHUNK_RETRIES: u32 = 3;

// ============================================================================
// Download
// ============================================================================

/// Downloads a file's content to a local path
///
/// Streams `GET /files/{id}?alt=media` to `local_path` chunk by chunk,
/// overwriting any existing file. On failure the partially written
/// destination is removed before the error is returned, so callers never
/// see a half-file.
///
/// # Arguments
/// * `client` - The authenticated DriveClient
/// * `remote_id` - The remote item to download
/// * `local_path` - Destination path on the local filesystem
pub async fn download_to(
    client: &DriveClient,
    remote_id: &RemoteId,
    local_path: &Path,
) -> Result<(), DriveError> {
    let path = format!("/files/{}", remote_id.as_str());
    let response = client
        .execute_with_retry(
            || {
                client
                    .request(Method::GET, &path)
                    .query(&[("alt", "media")])
            },
            "download",
        )
        .await?;

    // The destination is only touched once the request has succeeded, so
    // a pre-existing file survives a failed call untouched.
    match stream_to_file(response, local_path).await {
        Ok(bytes) => {
            info!(id = %remote_id, path = %local_path.display(), bytes, "Downloaded file");
            Ok(())
        }
        Err(e) => {
            if let Err(cleanup) = tokio::fs::remove_file(local_path).await {
                if cleanup.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %local_path.display(), error = %cleanup,
                        "Failed to remove partial download");
                }
            }
            Err(e)
        }
    }
}

/// Streams the media response body into the destination file
///
/// Returns the number of bytes written. The destination may be partial
/// on error; [`download_to`] handles cleanup.
async fn stream_to_file(response: reqwest::Response, local_path: &Path) -> Result<u64, DriveError> {
    let mut file = tokio::fs::File::create(local_path).await?;
    let mut stream = response.bytes_stream();
    let mut bytes: u64 = 0;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        bytes += chunk.len() as u64;
    }
    file.flush().await?;

    Ok(bytes)
}

// ============================================================================
// Resumable upload
// ============================================================================

/// Creates a resumable upload session for a new file
///
/// # Arguments
/// * `client` - The authenticated DriveClient
/// * `name` - Name of the file on Drive
/// * `parent_id` - Parent folder, or `None` for root
/// * `mime_type` - MIME type hint, or `None` to let Drive infer
///
/// # Returns
/// The session URI to PUT chunks against
pub async fn create_upload_session(
    client: &DriveClient,
    name: &str,
    parent_id: Option<&RemoteId>,
    mime_type: Option<&str>,
) -> Result<String, DriveError> {
    let mut metadata = serde_json::json!({ "name": name });
    if let Some(parent) = parent_id {
        metadata["parents"] = serde_json::json!([parent.as_str()]);
    }
    if let Some(mime) = mime_type {
        metadata["mimeType"] = serde_json::json!(mime);
    }

    debug!(name, parent = ?parent_id.map(RemoteId::as_str), "Creating upload session");

    let response = client
        .execute_with_retry(
            || {
                client
                    .upload_request(Method::POST, "/files")
                    .query(&[("uploadType", "resumable"), ("fields", FILE_FIELDS)])
                    .json(&metadata)
            },
            "create_upload_session",
        )
        .await?;

    let session_url = response
        .headers()
        .get("Location")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .ok_or_else(|| {
            DriveError::InvalidResponse("upload session response lacks Location header".to_string())
        })?;

    debug!("Upload session created");
    Ok(session_url)
}

/// Uploads a single chunk to a resumable session
///
/// # Arguments
/// * `http` - Raw HTTP client (session URLs are absolute)
/// * `session_url` - The session URI from [`create_upload_session`]
/// * `data` - The chunk bytes
/// * `offset` - Byte offset of this chunk within the file
/// * `total` - Total file size in bytes
///
/// # Returns
/// - `Some(DriveFile)` with the created resource on the final chunk
/// - `None` for intermediate chunks (HTTP 308 Resume Incomplete)
pub async fn upload_chunk(
    http: &reqwest::Client,
    session_url: &str,
    data: &[u8],
    offset: u64,
    total: u64,
) -> Result<Option<DriveFile>, DriveError> {
    let content_range = if total == 0 {
        // Zero-byte file: a single finalizing PUT with no body.
        "bytes */0".to_string()
    } else {
        let range_end = offset + data.len() as u64 - 1;
        format!("bytes {offset}-{range_end}/{total}")
    };

    debug!(range = %content_range, "Uploading chunk");

    let response = http
        .put(session_url)
        .header("Content-Length", data.len().to_string())
        .header("Content-Range", &content_range)
        .body(data.to_vec())
        .send()
        .await?;

    // 308 Resume Incomplete: the chunk was stored, more are expected.
    if response.status() == StatusCode::PERMANENT_REDIRECT {
        debug!(range = %content_range, "Chunk accepted");
        return Ok(None);
    }

    let response = check_status(response).await?;
    let file: DriveFile = response.json().await?;
    debug!(id = %file.id, "Upload session completed");
    Ok(Some(file))
}

/// Uploads a new file via a resumable session with per-chunk retry
///
/// Reads `local_path` through a fixed-size buffer (never the whole file),
/// creating a new remote item. Transiently failing chunks are retried up
/// to [`CHUNK_RETRIES`] times with exponential backoff before the whole
/// upload fails.
///
/// Not idempotent: a repeated call with the same name and parent creates
/// a second remote file.
///
/// # Arguments
/// * `client` - The authenticated DriveClient
/// * `local_path` - Source file on the local filesystem
/// * `name` - Name of the file on Drive
/// * `parent_id` - Parent folder, or `None` for root
/// * `mime_type` - MIME type hint, or `None` to let Drive infer
///
/// # Returns
/// The created resource's metadata
pub async fn upload(
    client: &DriveClient,
    local_path: &Path,
    name: &str,
    parent_id: Option<&RemoteId>,
    mime_type: Option<&str>,
) -> Result<RemoteResource, DriveError> {
    let total = tokio::fs::metadata(local_path).await?.len();
    info!(
        name,
        path = %local_path.display(),
        bytes = total,
        chunks = total.div_ceil(UPLOAD_CHUNK_SIZE as u64).max(1),
        "Starting resumable upload"
    );

    let session_url = create_upload_session(client, name, parent_id, mime_type).await?;
    let http = client.http_client();

    let mut file = tokio::fs::File::open(local_path).await?;
    let mut offset: u64 = 0;

    let completed = loop {
        let chunk_len = (total - offset).min(UPLOAD_CHUNK_SIZE as u64) as usize;
        let mut chunk = vec![0u8; chunk_len];
        if chunk_len > 0 {
            file.read_exact(&mut chunk).await?;
        }

        let result = upload_chunk_with_retry(http, &session_url, &chunk, offset, total).await?;
        offset += chunk_len as u64;

        if offset >= total {
            break result;
        }
    };

    let file = completed.ok_or_else(|| {
        DriveError::InvalidResponse("upload session ended without a final response".to_string())
    })?;
    info!(id = %file.id, name = %file.name, "Upload complete");
    file.into_resource()
}

/// Retries a single chunk on transient failure without restarting the session
async fn upload_chunk_with_retry(
    http: &reqwest::Client,
    session_url: &str,
    data: &[u8],
    offset: u64,
    total: u64,
) -> Result<Option<DriveFile>, DriveError> {
    let mut attempt: u32 = 0;
    loop {
        match upload_chunk(http, session_url, data, offset, total).await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_transient() && attempt < CHUNK_RETRIES => {
                attempt += 1;
                let delay = backoff_delay(attempt);
                warn!(
                    offset,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Chunk upload failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => return Err(e),
        }
    }
}
