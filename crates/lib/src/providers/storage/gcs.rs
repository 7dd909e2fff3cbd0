//! # Google Cloud Storage
//!
//! Uploads objects to a GCS bucket and signs V4 download URLs for them.

use super::{ObjectStore, StorageError};
use async_trait::async_trait;
use google_cloud_storage::{
    client::{google_cloud_auth::credentials::CredentialsFile, Client, ClientConfig},
    http::objects::upload::{Media, UploadObjectRequest, UploadType},
    sign::{SignedURLMethod, SignedURLOptions},
};
use std::{fmt, time::Duration};
use tracing::info;

/// An [`ObjectStore`] backed by one GCS bucket.
#[derive(Clone)]
pub struct GcsObjectStore {
    client: Client,
    bucket: String,
}

impl fmt::Debug for GcsObjectStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GcsObjectStore")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

impl GcsObjectStore {
    /// Connects to `bucket`.
    ///
    /// With `credentials_path` the service-account JSON key at that path is
    /// used; it is required for signing URLs. Without it, application default
    /// credentials are resolved from the environment.
    pub async fn connect(
        bucket: impl Into<String>,
        credentials_path: Option<&str>,
    ) -> Result<Self, StorageError> {
        let config = match credentials_path {
            Some(path) => {
                info!("Loading GCS service account credentials from '{path}'.");
                let credentials = CredentialsFile::new_from_file(path.to_string())
                    .await
                    .map_err(|e| StorageError::Credentials(format!("{path}: {e}")))?;
                ClientConfig::default()
                    .with_credentials(credentials)
                    .await
                    .map_err(|e| StorageError::Credentials(e.to_string()))?
            }
            None => {
                info!("Using application default credentials for GCS.");
                ClientConfig::default()
                    .with_auth()
                    .await
                    .map_err(|e| StorageError::Credentials(e.to_string()))?
            }
        };

        Ok(Self {
            client: Client::new(config),
            bucket: bucket.into(),
        })
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl ObjectStore for GcsObjectStore {
    async fn upload(
        &self,
        name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        let mut media = Media::new(name.to_string());
        media.content_type = content_type.to_string().into();
        let upload_type = UploadType::Simple(media);

        let request = UploadObjectRequest {
            bucket: self.bucket.clone(),
            ..Default::default()
        };

        self.client
            .upload_object(&request, data, &upload_type)
            .await
            .map_err(|e| StorageError::Upload {
                object: name.to_string(),
                message: e.to_string(),
            })?;
        Ok(())
    }

    async fn signed_url(&self, name: &str, expires_in: Duration) -> Result<String, StorageError> {
        let options = SignedURLOptions {
            method: SignedURLMethod::GET,
            expires: expires_in,
            ..Default::default()
        };

        self.client
            .signed_url(&self.bucket, name, None, None, options)
            .await
            .map_err(|e| StorageError::Sign {
                object: name.to_string(),
                message: e.to_string(),
            })
    }
}
