//! Installed-application OAuth2 authentication for Google APIs.
//!
//! Login, token refresh and the on-disk token cache are handled by
//! `yup-oauth2`. [`Authenticator`] wraps it and hands bearer tokens to the
//! Drive client.

use std::path::Path;
use std::sync::Arc;

use futures::future::{self, BoxFuture};
use futures::FutureExt;
use tracing::debug;
use yup_oauth2::{InstalledFlowAuthenticator, InstalledFlowReturnMethod};

use crate::error::{DriveError, Result};

/// Google Drive API scopes requested at login.
pub const SCOPES: &[&str] = &[
    "https://www.googleapis.com/auth/drive.readonly",
    "https://www.googleapis.com/auth/drive.metadata.readonly",
];

type FetchToken = dyn Fn() -> BoxFuture<'static, Result<String>> + Send + Sync;

/// Source of bearer tokens for the Drive API.
#[derive(Clone)]
pub struct Authenticator {
    fetch: Arc<FetchToken>,
}

impl Authenticator {
    /// Create an authenticator from a client secrets file and a token cache.
    ///
    /// The token cache does not have to exist yet; it is written after the
    /// first successful browser login and reused on later runs.
    pub async fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(secrets_path: P, token_cache: Q) -> Result<Self> {
        let secrets_path = secrets_path.as_ref();
        let secret = yup_oauth2::read_application_secret(secrets_path)
            .await
            .map_err(|source| DriveError::CredentialsFileError {
                path: secrets_path.display().to_string(),
                source,
            })?;

        let inner = InstalledFlowAuthenticator::builder(secret, InstalledFlowReturnMethod::HTTPRedirect)
            .persist_tokens_to_disk(token_cache.as_ref().to_path_buf())
            .build()
            .await
            .map_err(|e| DriveError::AuthenticationError(format!("failed to set up OAuth flow: {}", e)))?;
        let inner = Arc::new(inner);

        Ok(Self::from_fn(move || {
            let inner = Arc::clone(&inner);
            async move {
                let token = inner
                    .token(SCOPES)
                    .await
                    .map_err(|e| DriveError::AuthenticationError(e.to_string()))?;
                token.token().map(str::to_string).ok_or_else(|| {
                    DriveError::AuthenticationError("token response carried no access token".to_string())
                })
            }
            .boxed()
        }))
    }

    /// An authenticator that always hands out `access_token`.
    pub fn from_static(access_token: impl Into<String>) -> Self {
        let access_token = access_token.into();
        Self::from_fn(move || future::ready(Ok(access_token.clone())).boxed())
    }

    fn from_fn<F>(fetch: F) -> Self
    where
        F: Fn() -> BoxFuture<'static, Result<String>> + Send + Sync + 'static,
    {
        Self {
            fetch: Arc::new(fetch),
        }
    }

    /// Get a valid access token, refreshing or logging in if necessary.
    pub async fn get_access_token(&self) -> Result<String> {
        debug!("fetching access token");
        (self.fetch)().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_token() {
        let auth = Authenticator::from_static("abc");
        assert_eq!(auth.get_access_token().await.unwrap(), "abc");
        assert_eq!(auth.clone().get_access_token().await.unwrap(), "abc");
    }
}
