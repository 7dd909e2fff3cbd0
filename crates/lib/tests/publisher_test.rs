//! # Publisher Tests
//!
//! Tests for CSV publication against an in-memory object store.

mod common;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use faqgen::providers::storage::StorageError;
use faqgen::{FaqError, FaqRow, FaqTable, Publisher};
use faqgen_test_utils::{numbered_rows, InMemoryObjectStore};
use std::{sync::Arc, time::Duration};

#[tokio::test]
async fn test_publish_uploads_csv_and_signs_url() -> Result<()> {
    common::setup_tracing();
    let store = InMemoryObjectStore::new("project1-app");
    let publisher = Publisher::new(Arc::new(store.clone()));
    let table = FaqTable::from(numbered_rows("flu", 0, 3));
    let ts = Utc.with_ymd_and_hms(2024, 10, 1, 8, 30, 0).unwrap();

    let artifact = publisher.publish_at(&table, "flu", ts).await?;

    assert_eq!(artifact.object_name, "flu-2024-10-01-08-30-00.csv");
    assert_eq!(
        artifact.signed_url,
        "https://storage.example.test/project1-app/flu-2024-10-01-08-30-00.csv?X-Goog-Expires=3600"
    );

    let stored = store.get(&artifact.object_name).expect("object was uploaded");
    assert_eq!(stored.content_type, "csv");
    let csv = String::from_utf8(stored.data)?;
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("FAQ,Answer,Source,Keyword"));
    assert_eq!(lines.count(), 3);
    assert_eq!(FaqTable::from_csv(&csv)?, table);
    Ok(())
}

#[tokio::test]
async fn test_csv_quotes_embedded_delimiters() -> Result<()> {
    let store = InMemoryObjectStore::new("bucket");
    let publisher = Publisher::new(Arc::new(store.clone()));
    let table = FaqTable::from(vec![FaqRow::new(
        "Is it \"serious\", doctor?",
        "It depends:\nsee a physician",
        "CDC, WHO",
        "severity flu",
    )]);

    let artifact = publisher.publish(&table, "flu").await?;

    let stored = store.get(&artifact.object_name).unwrap();
    let csv = String::from_utf8(stored.data)?;
    assert!(csv.contains("\"Is it \"\"serious\"\", doctor?\""));
    assert_eq!(FaqTable::from_csv(&csv)?, table);
    Ok(())
}

#[tokio::test]
async fn test_signed_url_ttl_is_configurable() -> Result<()> {
    let store = InMemoryObjectStore::new("bucket");
    let publisher =
        Publisher::new(Arc::new(store)).with_signed_url_ttl(Duration::from_secs(600));

    let artifact = publisher.publish(&FaqTable::new(), "flu").await?;
    assert!(artifact.signed_url.ends_with("X-Goog-Expires=600"));
    Ok(())
}

#[tokio::test]
async fn test_upload_failure_is_storage_error() {
    let store = InMemoryObjectStore::new("bucket").failing_uploads();
    let publisher = Publisher::new(Arc::new(store.clone()));

    let err = publisher
        .publish(&FaqTable::from(numbered_rows("flu", 0, 1)), "flu")
        .await
        .unwrap_err();

    assert!(matches!(err, FaqError::Storage(StorageError::Upload { .. })));
    assert!(store.object_names().is_empty());
}

#[tokio::test]
async fn test_signing_failure_is_storage_error() {
    let store = InMemoryObjectStore::new("bucket").failing_signing();
    let publisher = Publisher::new(Arc::new(store.clone()));

    let err = publisher
        .publish(&FaqTable::from(numbered_rows("flu", 0, 1)), "flu")
        .await
        .unwrap_err();

    assert!(matches!(err, FaqError::Storage(StorageError::Sign { .. })));
    assert!(err.to_string().contains("no signing key"));
}
