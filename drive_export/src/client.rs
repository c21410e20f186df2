//! Google Drive API client for folder listing and file downloads.

use std::path::Path;

use futures::StreamExt;
use reqwest::{Client, RequestBuilder, Response};
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio_util::io::StreamReader;
use tracing::debug;

use crate::auth::Authenticator;
use crate::error::{DriveError, Result};
use crate::models::{ApiErrorResponse, FileListResponse, FileMetadata};

/// Base URL for Google Drive API v3.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com/drive/v3";

/// Size of the chunks a download is written and reported in (8 MiB).
pub const CHUNK_SIZE: usize = 8 * 1024 * 1024;

const LIST_FIELDS: &str = "nextPageToken, files(id, name, mimeType, size)";

const PAGE_SIZE: &str = "1000";

/// Client for reading files out of Google Drive.
pub struct DriveClient {
    auth: Authenticator,
    http: Client,
    base_url: String,
}

impl DriveClient {
    /// Create a new DriveClient talking to the public Drive endpoint.
    pub fn new(auth: Authenticator) -> Self {
        Self {
            auth,
            http: Client::new(),
            base_url: DRIVE_API_BASE.to_string(),
        }
    }

    /// Point the client at a different API base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// List the non-trashed children of a folder, following every page.
    pub async fn list_children(&self, folder_id: &str) -> Result<Vec<FileMetadata>> {
        let query = format!(
            "'{}' in parents and trashed = false",
            folder_id.replace('\'', "\\'")
        );
        self.query_files(&query).await
    }

    /// Query files using Google Drive query syntax.
    pub async fn query_files(&self, query: &str) -> Result<Vec<FileMetadata>> {
        let mut all_files = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            debug!(query, ?page_token, "listing files");
            let token = self.auth.get_access_token().await?;
            let mut request = self
                .http
                .get(format!("{}/files", self.base_url))
                .bearer_auth(&token)
                .query(&[
                    ("q", query),
                    ("fields", LIST_FIELDS),
                    ("includeItemsFromAllDrives", "true"),
                    ("supportsAllDrives", "true"),
                    ("pageSize", PAGE_SIZE),
                ]);

            if let Some(ref token) = page_token {
                request = request.query(&[("pageToken", token)]);
            }

            let response = send(request).await?;
            let list_response: FileListResponse = response.json().await?;
            debug!(count = list_response.files.len(), "page received");
            all_files.extend(list_response.files);

            match list_response.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        Ok(all_files)
    }

    /// Download a file's stored bytes to `destination`.
    ///
    /// `progress` is called after every chunk with the completed fraction.
    /// Returns the number of bytes written.
    pub async fn download_media<F>(&self, file_id: &str, destination: &Path, progress: F) -> Result<u64>
    where
        F: FnMut(f64),
    {
        let token = self.auth.get_access_token().await?;
        let request = self
            .http
            .get(format!("{}/files/{}", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("alt", "media"), ("supportsAllDrives", "true")]);

        let response = send(request).await?;
        stream_to_file(response, destination, progress).await
    }

    /// Export a Google-native file to `mime_type` and write it to `destination`.
    pub async fn export_media<F>(
        &self,
        file_id: &str,
        mime_type: &str,
        destination: &Path,
        progress: F,
    ) -> Result<u64>
    where
        F: FnMut(f64),
    {
        let token = self.auth.get_access_token().await?;
        let request = self
            .http
            .get(format!("{}/files/{}/export", self.base_url, file_id))
            .bearer_auth(&token)
            .query(&[("mimeType", mime_type)]);

        let response = send(request).await?;
        stream_to_file(response, destination, progress).await
    }
}

/// Send a request and turn non-success statuses into `ApiError`.
async fn send(request: RequestBuilder) -> Result<Response> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let error_body = response.text().await.unwrap_or_default();
    if let Ok(api_error) = serde_json::from_str::<ApiErrorResponse>(&error_body) {
        return Err(DriveError::ApiError {
            status: api_error.error.code,
            message: api_error.error.message,
        });
    }
    Err(DriveError::ApiError {
        status: status.as_u16(),
        message: error_body,
    })
}

/// Stream a response body into a freshly created file.
///
/// A failure part way through leaves the partially written file behind.
async fn stream_to_file<F>(response: Response, destination: &Path, mut progress: F) -> Result<u64>
where
    F: FnMut(f64),
{
    let total = response.content_length().filter(|len| *len > 0);
    let stream = response
        .bytes_stream()
        .map(|chunk| chunk.map_err(std::io::Error::other));
    let mut reader = StreamReader::new(Box::pin(stream));

    let mut file = File::create(destination).await?;
    let copied = copy_chunks(&mut reader, &mut file, CHUNK_SIZE, total, &mut progress).await;
    let flushed = file.flush().await;

    let written = copied?;
    flushed?;
    Ok(written)
}

/// Copy `reader` into `writer` in chunks of `chunk_size` bytes.
///
/// Every chunk is reported through `progress`. The last report is always 1.0.
pub async fn copy_chunks<R, W, F>(
    reader: &mut R,
    writer: &mut W,
    chunk_size: usize,
    total: Option<u64>,
    progress: &mut F,
) -> Result<u64>
where
    R: AsyncRead + Unpin,
    W: AsyncWrite + Unpin,
    F: FnMut(f64),
{
    let mut buf = vec![0u8; chunk_size.max(1)];
    let mut written: u64 = 0;
    let mut last_fraction = None;

    loop {
        let filled = fill_chunk(reader, &mut buf).await?;
        if filled == 0 {
            break;
        }

        writer.write_all(&buf[..filled]).await?;
        written += filled as u64;

        let done = filled < buf.len();
        let fraction = progress_fraction(written, total, done);
        debug!(written, fraction, "chunk written");
        progress(fraction);
        last_fraction = Some(fraction);

        if done {
            break;
        }
    }

    if last_fraction != Some(1.0) {
        progress(1.0);
    }

    Ok(written)
}

/// Read until `buf` is full or the reader is exhausted.
async fn fill_chunk<R>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize>
where
    R: AsyncRead + Unpin,
{
    let mut filled = 0;
    while filled < buf.len() {
        let n = reader.read(&mut buf[filled..]).await?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    Ok(filled)
}

fn progress_fraction(written: u64, total: Option<u64>, done: bool) -> f64 {
    if done {
        return 1.0;
    }
    match total {
        Some(total) => (written as f64 / total as f64).min(1.0),
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn copy(data: &[u8], chunk_size: usize, total: Option<u64>) -> (Vec<u8>, Vec<f64>) {
        let mut reader = data;
        let mut out = Vec::new();
        let mut reports = Vec::new();
        let mut record = |fraction: f64| reports.push(fraction);

        let written = copy_chunks(&mut reader, &mut out, chunk_size, total, &mut record)
            .await
            .unwrap();
        assert_eq!(written, data.len() as u64);
        (out, reports)
    }

    #[tokio::test]
    async fn test_copy_chunks_reports_known_length() {
        let data = vec![7u8; 10];
        let (out, reports) = copy(&data, 4, Some(10)).await;

        assert_eq!(out, data);
        assert_eq!(reports, vec![0.4, 0.8, 1.0]);
    }

    #[tokio::test]
    async fn test_copy_chunks_unknown_length() {
        let data = vec![1u8; 9];
        let (_, reports) = copy(&data, 4, None).await;

        assert_eq!(reports, vec![0.0, 0.0, 1.0]);
    }

    #[tokio::test]
    async fn test_copy_chunks_exact_multiple_ends_with_single_completion() {
        let data = vec![1u8; 8];
        let (_, reports) = copy(&data, 4, Some(8)).await;

        assert_eq!(reports, vec![0.5, 1.0]);
    }

    #[tokio::test]
    async fn test_copy_chunks_empty_body() {
        let (out, reports) = copy(&[], 4, None).await;

        assert!(out.is_empty());
        assert_eq!(reports, vec![1.0]);
    }

    #[test]
    fn test_with_base_url_trims_slash() {
        let client = DriveClient::new(Authenticator::from_static("t")).with_base_url("http://127.0.0.1:1234/");
        assert_eq!(client.base_url(), "http://127.0.0.1:1234");
    }
}
