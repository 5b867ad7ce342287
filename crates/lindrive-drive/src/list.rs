//! Paginated folder listing
//!
//! Implements `GET /files` with a `q` filter and page-token cursor,
//! aggregating every page into one deduplicated result before returning.
//!
//! ## Aggregation contract
//!
//! Callers never observe a partial page set: the cursor is followed until
//! the API stops returning `nextPageToken`, and a failure on *any* page
//! fails the whole call. The two successfully fetched pages before a
//! page-three failure are discarded, so a returned listing is always
//! complete for the moment it was taken.

use std::collections::HashSet;

use reqwest::Method;
use tracing::{debug, warn};

use lindrive_core::domain::newtypes::RemoteId;
use lindrive_core::ports::remote_ops::RemoteResource;

use crate::client::DriveClient;
use crate::wire::{FileList, FILE_FIELDS};
use crate::DriveError;

/// Upper bound on pages followed before the cursor is declared runaway
///
/// A defect in the backend (or a mock) that keeps returning the same
/// cursor would otherwise loop forever.
const MAX_PAGES: u32 = 1_000;

/// Lists all non-trashed children of a folder (non-recursive)
///
/// Follows the page-token cursor until exhausted. Results are
/// deduplicated by item ID; ordering is whatever the API returned and
/// must not be relied upon.
///
/// # Arguments
/// * `client` - The authenticated DriveClient
/// * `folder_id` - Folder to list, or `None` for root scope
///
/// # Errors
/// Any page failing (after the client's retry budget) fails the whole
/// call; no partial listing is ever returned.
pub async fn list_children(
    client: &DriveClient,
    folder_id: Option<&RemoteId>,
) -> Result<Vec<RemoteResource>, DriveError> {
    let query = match folder_id {
        Some(id) => format!("trashed = false and '{}' in parents", id.as_str()),
        None => "trashed = false".to_string(),
    };
    let fields = format!("nextPageToken, files({FILE_FIELDS})");

    debug!(folder = ?folder_id.map(RemoteId::as_str), "Listing children");

    let mut results: Vec<RemoteResource> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut page_token: Option<String> = None;
    let mut page_count: u32 = 0;

    loop {
        page_count += 1;
        if page_count > MAX_PAGES {
            return Err(DriveError::InvalidResponse(format!(
                "listing exceeded {MAX_PAGES} pages, aborting"
            )));
        }

        let response = client
            .execute_with_retry(
                || {
                    let mut request = client
                        .request(Method::GET, "/files")
                        .query(&[("q", query.as_str()), ("fields", fields.as_str())]);
                    if let Some(token) = &page_token {
                        request = request.query(&[("pageToken", token.as_str())]);
                    }
                    request
                },
                "list_children",
            )
            .await?;

        let page: FileList = response.json().await?;
        debug!(
            page = page_count,
            items = page.files.len(),
            has_next = page.next_page_token.is_some(),
            "Received listing page"
        );

        for file in page.files {
            if seen.insert(file.id.clone()) {
                results.push(file.into_resource()?);
            } else {
                warn!(id = %file.id, "Duplicate item across listing pages, skipping");
            }
        }

        match page.next_page_token {
            Some(token) => page_token = Some(token),
            None => break,
        }
    }

    debug!(total = results.len(), pages = page_count, "Listing complete");
    Ok(results)
}
