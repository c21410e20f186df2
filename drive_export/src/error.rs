//! Error types for the drive_export crate.

use thiserror::Error;

/// Errors that can occur while authenticating against, listing, or
/// downloading from Google Drive.
#[derive(Error, Debug)]
pub enum DriveError {
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("Failed to read credentials file {path}: {source}")]
    CredentialsFileError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error ({status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Invalid URL or ID: {0}")]
    InvalidUrlOrId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DriveError {
    /// Whether this error means no usable credential could be obtained.
    pub fn is_authentication(&self) -> bool {
        matches!(
            self,
            DriveError::AuthenticationError(_) | DriveError::CredentialsFileError { .. }
        )
    }
}

/// Result type alias for DriveError.
pub type Result<T> = std::result::Result<T, DriveError>;
