//! Integration tests for folder creation, metadata fetch, and the
//! port-level adapter wiring

use std::sync::Arc;

use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::{RemoteFileOps, FOLDER_MIME_TYPE};
use lindrive_drive::ops::DriveFileOps;
use lindrive_drive::{files, DriveError};

use crate::common;

#[tokio::test]
async fn test_create_folder_in_root() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_partial_json(serde_json::json!({
            "name": "Reports",
            "mimeType": FOLDER_MIME_TYPE,
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "folder-new" })),
        )
        .mount(&server)
        .await;

    let id = files::create_folder(&client, "Reports", None).await.unwrap();
    assert_eq!(id.as_str(), "folder-new");
}

#[tokio::test]
async fn test_create_folder_with_parent() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("POST"))
        .and(path("/files"))
        .and(body_partial_json(serde_json::json!({
            "name": "2026",
            "mimeType": FOLDER_MIME_TYPE,
            "parents": ["folder-parent"],
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": "folder-child" })),
        )
        .mount(&server)
        .await;

    let parent = RemoteId::new("folder-parent").unwrap();
    let id = files::create_folder(&client, "2026", Some(&parent))
        .await
        .unwrap();
    assert_eq!(id.as_str(), "folder-child");
}

#[tokio::test]
async fn test_get_metadata() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/file-7"))
        .and(query_param("fields", "id, name, mimeType, md5Checksum, parents"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::file_json(
            "file-7",
            "notes.md",
            "77777777777777777777777777777777",
        )))
        .mount(&server)
        .await;

    let resource = files::get_metadata(&client, &RemoteId::new("file-7").unwrap())
        .await
        .unwrap();

    assert_eq!(resource.id.as_str(), "file-7");
    assert_eq!(resource.name, "notes.md");
    assert!(!resource.is_folder());
    assert_eq!(resource.parents.len(), 1);
}

#[tokio::test]
async fn test_get_metadata_not_found() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("notFound"))
        .mount(&server)
        .await;

    let result = files::get_metadata(&client, &RemoteId::new("gone").unwrap()).await;
    assert!(matches!(result, Err(DriveError::NotFound(_))));
}

#[tokio::test]
async fn test_get_metadata_access_denied() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/secret"))
        .respond_with(ResponseTemplate::new(403).set_body_string("insufficientPermissions"))
        .mount(&server)
        .await;

    let result = files::get_metadata(&client, &RemoteId::new("secret").unwrap()).await;
    assert!(matches!(result, Err(DriveError::Forbidden(_))));
}

#[tokio::test]
async fn test_port_adapter_preserves_structured_cause() {
    let (server, client) = common::setup_drive_mock().await;

    Mock::given(method("GET"))
        .and(path("/files/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_string("notFound"))
        .mount(&server)
        .await;

    // Through the port the error is an anyhow chain, but the structured
    // DriveError survives as the root cause for callers that downcast.
    let ops: Arc<dyn RemoteFileOps> = Arc::new(DriveFileOps::new(client));
    let err = ops
        .get_metadata(&RemoteId::new("gone").unwrap())
        .await
        .unwrap_err();

    let drive_err = err
        .downcast_ref::<DriveError>()
        .expect("root cause should be a DriveError");
    assert!(matches!(drive_err, DriveError::NotFound(_)));
}

#[tokio::test]
async fn test_port_adapter_lists_through_trait_object() {
    let (server, client) = common::setup_drive_mock().await;

    common::mount_listing_page(
        &server,
        None,
        serde_json::json!([common::file_json(
            "f1",
            "a.txt",
            "11111111111111111111111111111111"
        )]),
        None,
    )
    .await;

    let ops: Arc<dyn RemoteFileOps> = Arc::new(DriveFileOps::new(client));
    let items = ops.list_children(None).await.unwrap();
    assert_eq!(items.len(), 1);
}
