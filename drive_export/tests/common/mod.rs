//! Shared fixtures for tests that run against a mock Drive server.

#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};

use drive_export::{Authenticator, DriveClient};

pub const ACCESS_TOKEN: &str = "test-token";

/// A client with a fixed bearer token, pointed at `server`.
pub fn client(server: &ServerGuard) -> DriveClient {
    DriveClient::new(Authenticator::from_static(ACCESS_TOKEN)).with_base_url(server.url())
}

pub fn folder(id: &str, name: &str) -> Value {
    json!({"id": id, "name": name, "mimeType": "application/vnd.google-apps.folder"})
}

pub fn file(id: &str, name: &str, mime_type: &str) -> Value {
    json!({"id": id, "name": name, "mimeType": mime_type})
}

pub fn children_query(folder_id: &str) -> Matcher {
    Matcher::UrlEncoded(
        "q".to_string(),
        format!("'{}' in parents and trashed = false", folder_id),
    )
}

/// Serve a single-page listing for `folder_id`.
pub async fn mock_folder(server: &mut ServerGuard, folder_id: &str, files: Vec<Value>) -> Mock {
    server
        .mock("GET", "/files")
        .match_query(children_query(folder_id))
        .match_header("authorization", format!("Bearer {}", ACCESS_TOKEN).as_str())
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({ "files": files }).to_string())
        .create_async()
        .await
}

/// Serve one page of a paginated listing.
///
/// The first page must be created before the pages that follow it.
pub async fn mock_folder_page(
    server: &mut ServerGuard,
    folder_id: &str,
    page_token: Option<&str>,
    files: Vec<Value>,
    next_page_token: Option<&str>,
) -> Mock {
    let query = match page_token {
        Some(token) => Matcher::AllOf(vec![
            children_query(folder_id),
            Matcher::UrlEncoded("pageToken".to_string(), token.to_string()),
        ]),
        None => children_query(folder_id),
    };

    let mut body = json!({ "files": files });
    if let Some(next) = next_page_token {
        body["nextPageToken"] = json!(next);
    }

    server
        .mock("GET", "/files")
        .match_query(query)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await
}

/// Serve a PDF export of `file_id`.
pub async fn mock_export(server: &mut ServerGuard, file_id: &str, body: &str) -> Mock {
    server
        .mock("GET", format!("/files/{}/export", file_id).as_str())
        .match_query(Matcher::UrlEncoded(
            "mimeType".to_string(),
            "application/pdf".to_string(),
        ))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

/// Serve the stored bytes of `file_id`.
pub async fn mock_media(server: &mut ServerGuard, file_id: &str, body: &str) -> Mock {
    server
        .mock("GET", format!("/files/{}", file_id).as_str())
        .match_query(Matcher::UrlEncoded("alt".to_string(), "media".to_string()))
        .with_status(200)
        .with_body(body)
        .create_async()
        .await
}

/// Answer requests for `path` with a Google error envelope.
pub async fn mock_api_error(
    server: &mut ServerGuard,
    path: &str,
    query: Matcher,
    status: usize,
    message: &str,
) -> Mock {
    server
        .mock("GET", path)
        .match_query(query)
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(json!({"error": {"code": status, "message": message}}).to_string())
        .create_async()
        .await
}
