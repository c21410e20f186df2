//! Content-type dispatch and the downloader that writes files to disk.

use std::path::PathBuf;

use tokio::fs;
use tracing::{error, info, warn};

use crate::client::DriveClient;
use crate::error::{DriveError, Result};
use crate::models::FileDescriptor;

pub const GOOGLE_DOCUMENT: &str = "application/vnd.google-apps.document";
pub const GOOGLE_SPREADSHEET: &str = "application/vnd.google-apps.spreadsheet";
pub const GOOGLE_PRESENTATION: &str = "application/vnd.google-apps.presentation";
pub const PDF: &str = "application/pdf";
pub const DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const XLSX: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const PPTX: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// How a remote file ends up on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Convert server-side. The extension is always appended.
    Export {
        mime_type: &'static str,
        extension: &'static str,
    },
    /// Fetch the stored bytes. The extension is appended only when missing.
    Direct { extension: &'static str },
}

/// Pick the strategy for a content type, or `None` when it is unsupported.
pub fn strategy_for(content_type: &str) -> Option<Strategy> {
    let strategy = match content_type {
        GOOGLE_DOCUMENT | GOOGLE_SPREADSHEET | GOOGLE_PRESENTATION => Strategy::Export {
            mime_type: PDF,
            extension: "pdf",
        },
        PDF => Strategy::Direct { extension: "pdf" },
        DOCX => Strategy::Direct { extension: "docx" },
        XLSX => Strategy::Direct { extension: "xlsx" },
        PPTX => Strategy::Direct { extension: "pptx" },
        _ => return None,
    };
    Some(strategy)
}

impl Strategy {
    /// Local file name for a remote item called `name`.
    pub fn file_name(&self, name: &str) -> String {
        let name = sanitize_component(name);
        match *self {
            Strategy::Export { extension, .. } => format!("{}.{}", name, extension),
            Strategy::Direct { extension } if has_extension(&name, extension) => name,
            Strategy::Direct { extension } => format!("{}.{}", name, extension),
        }
    }
}

/// Case-insensitive check for a trailing `.{extension}`.
fn has_extension(name: &str, extension: &str) -> bool {
    let suffix = format!(".{}", extension);
    let name = name.as_bytes();
    name.len() >= suffix.len()
        && name[name.len() - suffix.len()..].eq_ignore_ascii_case(suffix.as_bytes())
}

/// Turn a remote name into a single safe path component.
pub fn sanitize_component(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            c => c,
        })
        .collect();

    match cleaned.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => cleaned,
    }
}

/// A file that could not be downloaded.
#[derive(Debug)]
pub struct FailedItem {
    pub name: String,
    pub error: DriveError,
}

/// Outcome of a download batch.
#[derive(Debug, Default)]
pub struct DownloadSummary {
    pub written: Vec<PathBuf>,
    /// One notice per skipped item, as printed.
    pub skipped: Vec<String>,
    pub failed: Vec<FailedItem>,
}

impl DownloadSummary {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Writes remote files below a destination root, one at a time.
pub struct Downloader<'a> {
    client: &'a DriveClient,
    root: PathBuf,
}

impl<'a> Downloader<'a> {
    pub fn new(client: &'a DriveClient, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            root: root.into(),
        }
    }

    /// Directory a descriptor is written into: the root joined with its
    /// folder path.
    pub fn destination_dir(&self, file: &FileDescriptor) -> PathBuf {
        let mut dir = self.root.clone();
        for folder in &file.folder_path {
            dir.push(sanitize_component(folder));
        }
        dir
    }

    /// Download every descriptor in order.
    ///
    /// Unsupported content types are skipped with a notice. A failed
    /// transfer is reported and recorded, and the batch moves on. Only a
    /// failure to create the root directory aborts the call.
    pub async fn download(&self, files: &[FileDescriptor]) -> Result<DownloadSummary> {
        fs::create_dir_all(&self.root).await?;

        let mut summary = DownloadSummary::default();
        for file in files {
            let Some(strategy) = strategy_for(&file.content_type) else {
                let notice = format!("Skipping {} - unsupported type: {}", file.name, file.content_type);
                println!("{}", notice);
                warn!(id = %file.id, content_type = %file.content_type, "unsupported type skipped");
                summary.skipped.push(notice);
                continue;
            };

            match self.download_one(file, strategy).await {
                Ok(path) => {
                    info!(id = %file.id, path = %path.display(), "file written");
                    summary.written.push(path);
                }
                Err(e) => {
                    println!("Failed: {} ({})", file.name, e);
                    error!(id = %file.id, error = %e, "download failed");
                    summary.failed.push(FailedItem {
                        name: file.name.clone(),
                        error: e,
                    });
                }
            }
        }

        Ok(summary)
    }

    /// Download a single descriptor with a known strategy.
    pub async fn download_one(&self, file: &FileDescriptor, strategy: Strategy) -> Result<PathBuf> {
        let dir = self.destination_dir(file);
        fs::create_dir_all(&dir).await?;

        let file_name = strategy.file_name(&file.name);
        let path = dir.join(&file_name);
        let report = |fraction: f64| {
            println!("Downloaded: {} ({}%)", file_name, (fraction * 100.0) as u32);
        };

        match strategy {
            Strategy::Export { mime_type, .. } => {
                self.client
                    .export_media(&file.id, mime_type, &path, report)
                    .await?
            }
            Strategy::Direct { .. } => self.client.download_media(&file.id, &path, report).await?,
        };

        Ok(path)
    }
}

/// Download `files` below `destination_root`.
pub async fn download(
    client: &DriveClient,
    files: &[FileDescriptor],
    destination_root: impl Into<PathBuf>,
) -> Result<DownloadSummary> {
    Downloader::new(client, destination_root).download(files).await
}
