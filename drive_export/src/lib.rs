//! drive_export - Export a Google Drive folder to the local filesystem.
//!
//! This library provides functionality to:
//! - Authenticate through the installed-app OAuth flow with a cached token
//! - List the files in a Drive folder, optionally walking sub-folders
//! - Export Google Docs, Sheets and Slides as PDF and download PDF and
//!   Office files as they are, mirroring the folder hierarchy locally
//!
//! # Example
//!
//! ```no_run
//! use drive_export::{list_files, Authenticator, DriveClient, Downloader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let auth = Authenticator::from_files("credentials.json", "token.json").await?;
//!     let client = DriveClient::new(auth);
//!
//!     let files = list_files(&client, "folder-id", true).await?;
//!     let summary = Downloader::new(&client, "downloads").download(&files).await?;
//!     println!("{} files written", summary.written.len());
//!
//!     Ok(())
//! }
//! ```

pub mod auth;
pub mod client;
pub mod download;
pub mod enumerate;
pub mod error;
pub mod models;
pub mod url_parser;

// Re-exports for convenience
pub use auth::Authenticator;
pub use client::DriveClient;
pub use download::{download, strategy_for, DownloadSummary, Downloader, Strategy};
pub use enumerate::list_files;
pub use error::{DriveError, Result};
pub use models::FileDescriptor;
pub use url_parser::extract_id;
