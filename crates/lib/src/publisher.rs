//! # Publishing
//!
//! Serializes a finished FAQ table to CSV, uploads it to the object store and
//! returns a time-limited download link for it.

use crate::{errors::FaqError, providers::storage::ObjectStore, types::FaqTable};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::{sync::Arc, time::Duration};
use tracing::info;

/// Content type recorded on uploaded tables.
pub const CSV_CONTENT_TYPE: &str = "csv";

/// Default lifetime of a signed download URL.
pub const DEFAULT_SIGNED_URL_TTL: Duration = Duration::from_secs(60 * 60);

/// The stored object and the link that grants access to it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PublishedArtifact {
    pub object_name: String,
    pub signed_url: String,
}

/// Builds the object name `{disease}-{YYYY-MM-DD-HH-MM-SS}.csv`.
pub fn object_name(disease: &str, timestamp: DateTime<Utc>) -> String {
    format!("{disease}-{}.csv", timestamp.format("%Y-%m-%d-%H-%M-%S"))
}

/// Uploads FAQ tables and signs download URLs for them.
#[derive(Debug, Clone)]
pub struct Publisher {
    store: Arc<dyn ObjectStore>,
    signed_url_ttl: Duration,
}

impl Publisher {
    pub fn new(store: Arc<dyn ObjectStore>) -> Self {
        Self {
            store,
            signed_url_ttl: DEFAULT_SIGNED_URL_TTL,
        }
    }

    pub fn with_signed_url_ttl(mut self, ttl: Duration) -> Self {
        self.signed_url_ttl = ttl;
        self
    }

    pub fn signed_url_ttl(&self) -> Duration {
        self.signed_url_ttl
    }

    /// Publishes `table` under a name derived from `disease` and the current UTC time.
    pub async fn publish(
        &self,
        table: &FaqTable,
        disease: &str,
    ) -> Result<PublishedArtifact, FaqError> {
        self.publish_at(table, disease, Utc::now()).await
    }

    /// Publishes `table` using `timestamp` for the object name.
    pub async fn publish_at(
        &self,
        table: &FaqTable,
        disease: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<PublishedArtifact, FaqError> {
        let csv = table.to_csv()?;
        let name = object_name(disease, timestamp);

        self.store
            .upload(&name, csv.into_bytes(), CSV_CONTENT_TYPE)
            .await?;
        let signed_url = self.store.signed_url(&name, self.signed_url_ttl).await?;

        info!(
            "Uploaded {} FAQ rows to '{name}'. You can access it here: {signed_url}",
            table.len()
        );

        Ok(PublishedArtifact {
            object_name: name,
            signed_url,
        })
    }
}
