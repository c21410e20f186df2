//! Tests for loading OAuth client secrets and handing out tokens.

mod common;

use std::io::Write;

use serde_json::json;
use tempfile::{tempdir, NamedTempFile};

use drive_export::{Authenticator, DriveError};

fn write_secrets(contents: &[u8]) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(contents).unwrap();
    temp_file
}

mod credentials {
    use super::*;

    #[tokio::test]
    async fn test_missing_secrets_file_is_auth_failure() {
        let dir = tempdir().unwrap();
        let err = Authenticator::from_files("/nonexistent/credentials.json", dir.path().join("token.json"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, DriveError::CredentialsFileError { .. }));
        assert!(err.is_authentication());
    }

    #[tokio::test]
    async fn test_invalid_secrets_json() {
        let secrets = write_secrets(b"not valid json");
        let dir = tempdir().unwrap();

        let err = Authenticator::from_files(secrets.path(), dir.path().join("token.json"))
            .await
            .err()
            .unwrap();

        assert!(
            matches!(err, DriveError::CredentialsFileError { ref path, .. } if *path == secrets.path().display().to_string())
        );
        assert!(err.is_authentication());
        assert!(!dir.path().join("token.json").exists());
    }

    #[tokio::test]
    async fn test_secrets_without_client_section() {
        let secrets = write_secrets(json!({"type": "service_account"}).to_string().as_bytes());
        let dir = tempdir().unwrap();

        let err = Authenticator::from_files(secrets.path(), dir.path().join("token.json"))
            .await
            .err()
            .unwrap();

        assert!(matches!(err, DriveError::CredentialsFileError { .. }));
        assert!(err.is_authentication());
    }
}

mod tokens {
    use super::*;

    #[tokio::test]
    async fn static_token_is_handed_out_unchanged() {
        let auth = Authenticator::from_static(common::ACCESS_TOKEN);

        assert_eq!(auth.get_access_token().await.unwrap(), common::ACCESS_TOKEN);
        assert_eq!(auth.get_access_token().await.unwrap(), common::ACCESS_TOKEN);
    }

    #[tokio::test]
    async fn clones_share_the_token_source() {
        let auth = Authenticator::from_static("shared");
        let copy = auth.clone();
        drop(auth);

        assert_eq!(copy.get_access_token().await.unwrap(), "shared");
    }
}
