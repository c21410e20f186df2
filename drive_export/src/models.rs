//! Data models for Google Drive API responses and the descriptors handed
//! from the enumerator to the downloader.

use serde::{Deserialize, Serialize};

/// MIME type Google Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Metadata for a file or folder in Google Drive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileMetadata {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default, deserialize_with = "deserialize_size")]
    pub size: Option<u64>,
}

fn deserialize_size<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        Some(s) => s.parse::<u64>().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl FileMetadata {
    pub fn is_folder(&self) -> bool {
        self.mime_type.as_deref() == Some(FOLDER_MIME_TYPE)
    }
}

/// Format bytes into human-readable size.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Response from the files.list API endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListResponse {
    #[serde(default)]
    pub files: Vec<FileMetadata>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

/// Google API error response.
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorDetail {
    pub code: u16,
    pub message: String,
}

/// One remote file selected for download.
///
/// `folder_path` holds the names of the folders between the enumeration
/// root and the file's parent, outermost first. It is empty for files that
/// live directly in the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub folder_path: Vec<String>,
    pub size: Option<u64>,
}

impl FileDescriptor {
    /// Separator used by [`FileDescriptor::relative_path`].
    pub const SEPARATOR: &'static str = "/";

    /// The folder path joined with [`FileDescriptor::SEPARATOR`].
    pub fn relative_path(&self) -> String {
        self.folder_path.join(Self::SEPARATOR)
    }

    /// Record that this descriptor was found inside `folder`.
    ///
    /// Empty folder names are dropped so that joins never produce empty
    /// fragments or doubled separators.
    pub fn prepend_folder(&mut self, folder: &str) {
        if !folder.is_empty() {
            self.folder_path.insert(0, folder.to_string());
        }
    }
}

impl From<FileMetadata> for FileDescriptor {
    fn from(metadata: FileMetadata) -> Self {
        Self {
            id: metadata.id,
            name: metadata.name,
            content_type: metadata.mime_type.unwrap_or_default(),
            folder_path: Vec::new(),
            size: metadata.size,
        }
    }
}
