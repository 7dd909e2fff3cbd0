//! # Application State
//!
//! This module defines the shared application state (`AppState`) and the logic
//! for building it at startup. The chat model client and the object store are
//! created once here and shared by every request.

use crate::config::AppConfig;
use faqgen::{
    providers::{factory::create_provider, storage::gcs::GcsObjectStore},
    FaqGenerator, Publisher,
};
use std::sync::Arc;
use tracing::info;

/// The shared application state, accessible from all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// The application's configuration.
    pub config: Arc<AppConfig>,
    /// Generates FAQ tables with the configured chat model.
    pub generator: Arc<FaqGenerator>,
    /// Publishes finished tables to cloud storage.
    pub publisher: Arc<Publisher>,
}

impl AppState {
    pub fn new(config: AppConfig, generator: FaqGenerator, publisher: Publisher) -> Self {
        Self {
            config: Arc::new(config),
            generator: Arc::new(generator),
            publisher: Arc::new(publisher),
        }
    }
}

/// Builds the shared application state from the configuration.
///
/// This instantiates the chat provider described by `model` and connects to
/// the GCS bucket described by `storage`.
pub async fn build_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let ai_provider = create_provider(&config.model)?;
    let generator = FaqGenerator::new(ai_provider, config.generation.clone());

    let store = GcsObjectStore::connect(
        config.storage.bucket.clone(),
        config.storage.credentials_file(),
    )
    .await?;
    info!(bucket = %store.bucket(), "Initialized cloud storage publisher.");
    let publisher =
        Publisher::new(Arc::new(store)).with_signed_url_ttl(config.storage.signed_url_ttl());

    Ok(AppState::new(config, generator, publisher))
}
