//! Shared test helpers for Drive API integration tests
//!
//! Provides wiremock-based mock server setup for Drive v3 endpoints.
//! The metadata base and the upload base of the real API differ; both
//! are pointed at the same mock server, with the upload base living
//! under an `/upload` prefix.

use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lindrive_drive::client::DriveClient;

/// Starts a mock server and returns it with a client pointed at it
pub async fn setup_drive_mock() -> (MockServer, DriveClient) {
    let server = MockServer::start().await;
    let client = DriveClient::with_base_urls(
        "test-access-token",
        server.uri(),
        format!("{}/upload", server.uri()),
    );
    (server, client)
}

/// A minimal Drive file resource as JSON
pub fn file_json(id: &str, name: &str, md5: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": name,
        "mimeType": "application/octet-stream",
        "md5Checksum": md5,
        "parents": ["root-id"]
    })
}

/// Mounts one listing page keyed by its page token
///
/// Pass `token = None` for the first page (matched by the *absence* of
/// `pageToken`), and `next = None` for the last page.
pub async fn mount_listing_page(
    server: &MockServer,
    token: Option<&str>,
    files: serde_json::Value,
    next: Option<&str>,
) {
    let mut body = serde_json::json!({ "files": files });
    if let Some(next) = next {
        body["nextPageToken"] = serde_json::json!(next);
    }

    let mock = Mock::given(method("GET")).and(path("/files"));
    let mock = match token {
        Some(token) => mock.and(query_param("pageToken", token)),
        None => mock.and(query_param_is_missing("pageToken")),
    };
    mock.respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Mounts a media download endpoint for a specific item ID
pub async fn mount_download(server: &MockServer, item_id: &str, content: &[u8]) {
    Mock::given(method("GET"))
        .and(path(format!("/files/{item_id}")))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(content.to_vec()))
        .mount(server)
        .await;
}

/// Mounts the resumable-session creation endpoint
///
/// Responds with a `Location` header pointing at `/upload-session/{tag}`
/// on the same server, and returns that absolute session URL.
pub async fn mount_upload_session(server: &MockServer, tag: &str) -> String {
    let session_url = format!("{}/upload-session/{tag}", server.uri());
    Mock::given(method("POST"))
        .and(path("/upload/files"))
        .and(query_param("uploadType", "resumable"))
        .respond_with(ResponseTemplate::new(200).insert_header("Location", session_url.as_str()))
        .mount(server)
        .await;
    session_url
}
