//! Integration tests for download and resumable upload
//!
//! Covers streaming download (including failure cleanup), the resumable
//! session protocol (chunk sequencing with 308 responses, per-chunk
//! retry), zero-byte uploads, and the hash-preservation property across
//! a download/upload round trip.

use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use lindrive_core::domain::newtypes::{ContentHash, RemoteId};
use lindrive_drive::client::DriveClient;
use lindrive_drive::transfer;
use lindrive_drive::{files, DriveError};

use crate::common;

fn remote(id: &str) -> RemoteId {
    RemoteId::new(id).unwrap()
}

#[tokio::test]
async fn test_download_writes_content() {
    let (server, client) = common::setup_drive_mock().await;
    let content = b"The quick brown fox jumps over the lazy dog";
    common::mount_download(&server, "file-001", content).await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("fox.txt");

    transfer::download_to(&client, &remote("file-001"), &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), content);
}

#[tokio::test]
async fn test_download_overwrites_existing_file() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_download(&server, "file-001", b"new content").await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.txt");
    std::fs::write(&dest, b"old content that is longer").unwrap();

    transfer::download_to(&client, &remote("file-001"), &dest)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&dest).unwrap(), b"new content");
}

#[tokio::test]
async fn test_download_missing_item_keeps_existing_file() {
    let (server, client) = common::setup_drive_mock().await;
    Mock::given(method("GET"))
        .and(path("/files/gone"))
        .and(query_param("alt", "media"))
        .respond_with(ResponseTemplate::new(404).set_body_string("notFound"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("out.txt");
    std::fs::write(&dest, b"precious local data").unwrap();

    let result = transfer::download_to(&client, &remote("gone"), &dest).await;

    assert!(matches!(result, Err(DriveError::NotFound(_))));
    // The request never succeeded, so the destination was never touched.
    assert_eq!(std::fs::read(&dest).unwrap(), b"precious local data");
}

/// Serves one request whose body is cut off mid-stream
///
/// Declares a large `Content-Length`, sends a few bytes, then drops the
/// connection, so the client's body stream fails after partial data.
async fn truncating_media_server() -> String {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        if let Ok((mut socket, _)) = listener.accept().await {
            let mut request = [0u8; 1024];
            let _ = socket.read(&mut request).await;
            let response = "HTTP/1.1 200 OK\r\nContent-Length: 100000\r\n\r\npartial bytes";
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.flush().await;
        }
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn test_interrupted_download_removes_partial_file() {
    let base = truncating_media_server().await;
    let client = DriveClient::with_base_urls("test-access-token", base.clone(), base);

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("cut-short.bin");

    let result = transfer::download_to(&client, &remote("file-cut"), &dest).await;

    assert!(result.is_err());
    // The partially written destination must not survive the failure.
    assert!(!dest.exists());
}

#[tokio::test]
async fn test_upload_single_chunk() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_upload_session(&server, "s1").await;

    let content = b"hello drive";
    Mock::given(method("PUT"))
        .and(path("/upload-session/s1"))
        .and(header("Content-Range", "bytes 0-10/11"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_json(
            "new-file-1",
            "hello.txt",
            &ContentHash::of_bytes(content).to_string(),
        )))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("hello.txt");
    std::fs::write(&src, content).unwrap();

    let resource = transfer::upload(&client, &src, "hello.txt", None, Some("text/plain"))
        .await
        .unwrap();

    assert_eq!(resource.id.as_str(), "new-file-1");
    assert_eq!(resource.name, "hello.txt");
    assert_eq!(
        resource.content_hash.as_deref(),
        Some(ContentHash::of_bytes(content).as_str())
    );
}

#[tokio::test]
async fn test_upload_multiple_chunks_sequenced() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_upload_session(&server, "s2").await;

    // 12 MiB file: one full 8 MiB chunk, one 4 MiB tail.
    let total: usize = 12 * 1024 * 1024;
    let chunk = transfer::UPLOAD_CHUNK_SIZE;

    Mock::given(method("PUT"))
        .and(path("/upload-session/s2"))
        .and(header(
            "Content-Range",
            format!("bytes 0-{}/{total}", chunk - 1).as_str(),
        ))
        .respond_with(ResponseTemplate::new(308))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload-session/s2"))
        .and(header(
            "Content-Range",
            format!("bytes {chunk}-{}/{total}", total - 1).as_str(),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(common::file_json(
            "new-file-2",
            "big.bin",
            "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa",
        )))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("big.bin");
    std::fs::write(&src, vec![0x5au8; total]).unwrap();

    let resource = transfer::upload(&client, &src, "big.bin", None, None)
        .await
        .unwrap();

    assert_eq!(resource.id.as_str(), "new-file-2");
}

#[tokio::test]
async fn test_upload_zero_byte_file() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_upload_session(&server, "s3").await;

    Mock::given(method("PUT"))
        .and(path("/upload-session/s3"))
        .and(header("Content-Range", "bytes */0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_json(
            "new-file-3",
            "empty.txt",
            "d41d8cd98f00b204e9800998ecf8427e",
        )))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("empty.txt");
    std::fs::write(&src, b"").unwrap();

    let resource = transfer::upload(&client, &src, "empty.txt", None, None)
        .await
        .unwrap();
    assert_eq!(resource.id.as_str(), "new-file-3");
}

#[tokio::test]
async fn test_upload_chunk_retried_without_restarting_session() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_upload_session(&server, "s4").await;

    // First PUT attempt fails with a 500; the retry of the same chunk
    // succeeds. The session creation endpoint must be hit exactly once.
    Mock::given(method("PUT"))
        .and(path("/upload-session/s4"))
        .respond_with(ResponseTemplate::new(500).set_body_string("backendError"))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/upload-session/s4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_json(
            "new-file-4",
            "retry.txt",
            "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb",
        )))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("retry.txt");
    std::fs::write(&src, b"retry me").unwrap();

    let resource = transfer::upload(&client, &src, "retry.txt", None, None)
        .await
        .unwrap();
    assert_eq!(resource.id.as_str(), "new-file-4");

    let session_hits = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/upload/files")
        .count();
    assert_eq!(session_hits, 1);
}

#[tokio::test]
async fn test_malformed_completion_body_fails_without_retry() {
    let (server, client) = common::setup_drive_mock().await;
    common::mount_upload_session(&server, "s6").await;

    // A 200 with an unparsable body is a malformed answer, not a
    // transient fault; the chunk must not be re-PUT.
    Mock::given(method("PUT"))
        .and(path("/upload-session/s6"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("odd.txt");
    std::fs::write(&src, b"payload").unwrap();

    let result = transfer::upload(&client, &src, "odd.txt", None, None).await;
    assert!(matches!(result, Err(DriveError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_download_then_upload_preserves_hash() {
    let (server, client) = common::setup_drive_mock().await;
    let content = b"stable content, stable hash";
    let md5 = ContentHash::of_bytes(content);

    // Original remote resource: downloadable content plus metadata
    // reporting its checksum.
    common::mount_download(&server, "orig-1", content).await;
    Mock::given(method("GET"))
        .and(path("/files/orig-1"))
        .and(query_param("fields", "id, name, mimeType, md5Checksum, parents"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::file_json("orig-1", "stable.txt", md5.as_str())),
        )
        .mount(&server)
        .await;

    // Upload target echoes back the checksum of what was sent.
    common::mount_upload_session(&server, "s5").await;
    Mock::given(method("PUT"))
        .and(path("/upload-session/s5"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::file_json("copy-1", "stable.txt", md5.as_str())),
        )
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let local = dir.path().join("stable.txt");

    transfer::download_to(&client, &remote("orig-1"), &local)
        .await
        .unwrap();
    let local_hash = ContentHash::of_file(&local).unwrap();

    let uploaded = transfer::upload(&client, &local, "stable.txt", None, None)
        .await
        .unwrap();
    let original = files::get_metadata(&client, &remote("orig-1")).await.unwrap();

    assert_eq!(Some(local_hash.as_str()), original.content_hash.as_deref());
    assert_eq!(uploaded.content_hash, original.content_hash);
}
