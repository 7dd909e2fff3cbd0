//! # Common Test Utilities
//!
//! This module centralizes the test harness used across the `faqgen-server`
//! integration tests.
//!
//! `TestApp` spawns the real router on a random port. The chat model is an
//! `httpmock::MockServer` speaking the OpenAI-compatible protocol and the
//! object store is an in-memory fake, so no external service is contacted.

// Allow unused code because this is a test utility module, and not all
// functions might be used by every test file that includes it.
#![allow(unused)]

use anyhow::Result;
use axum::serve;
use faqgen::{providers::factory::create_provider, FaqGenerator, FaqRow, Publisher};
use faqgen_server::{config, router, state::AppState};
use faqgen_test_utils::{markdown_table, InMemoryObjectStore};
use httpmock::{Method, Mock, MockServer};
use reqwest::Client;
use serde_json::json;
use std::{fs::File, io::Write, net::SocketAddr, sync::Arc};
use tempfile::{tempdir, TempDir};
use tokio::{net::TcpListener, task::JoinHandle};

/// The chat completions path served by the mock model.
pub const CHAT_PATH: &str = "/v1/chat/completions";

// --- Full Application Test Harness ---

/// A harness for end-to-end testing of the Axum server.
pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub mock_server: MockServer,
    pub store: InMemoryObjectStore,
    pub app_state: AppState,
    _config_dir: TempDir,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestApp {
    /// Spawns the application with a working in-memory bucket.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with_store(InMemoryObjectStore::new("test-bucket")).await
    }

    /// Spawns the application publishing into `store`.
    ///
    /// Generation is configured for small sessions: 3 rows in chunks of 3,
    /// stalling after 2 consecutive empty chunks.
    pub async fn spawn_with_store(store: InMemoryObjectStore) -> Result<Self> {
        dotenvy::dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();

        let mock_server = MockServer::start_async().await;

        let config_dir = tempdir()?;
        let config_path = config_dir.path().join("config.yml");
        let config_content = format!(
            r#"
port: 0
model:
  provider: "local"
  api_url: "{}"
  api_key: null
  model_name: "gpt-4o-mini"
storage:
  bucket: "test-bucket"
  credentials_path: ""
  signed_url_ttl_secs: 3600
generation:
  target_count: 3
  chunk_size: 3
  max_iterations: 5
  max_empty_chunks: 2
"#,
            mock_server.url(CHAT_PATH)
        );
        let mut file = File::create(&config_path)?;
        file.write_all(config_content.as_bytes())?;

        let config = config::get_config(Some(config_path.to_str().unwrap()))?;
        let generator = FaqGenerator::new(create_provider(&config.model)?, config.generation.clone());
        let publisher = Publisher::new(Arc::new(store.clone()))
            .with_signed_url_ttl(config.storage.signed_url_ttl());
        let app_state = AppState::new(config, generator, publisher);
        let app_state_for_harness = app_state.clone();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr: SocketAddr = listener.local_addr()?;
        let address = format!("http://{addr}");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
        let server_handle = tokio::spawn(async move {
            let app = router::create_router(app_state);
            let server = serve(listener, app).with_graceful_shutdown(async {
                shutdown_rx.await.ok();
            });
            if let Err(e) = server.await {
                tracing::error!("[TestApp] Server error: {}", e);
            }
        });

        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Ok(Self {
            address,
            client: Client::new(),
            mock_server,
            store,
            app_state: app_state_for_harness,
            _config_dir: config_dir,
            _server_handle: server_handle,
            shutdown_tx: Some(shutdown_tx),
        })
    }

    /// Makes the mock model answer every chat request with `rows` as a markdown table.
    pub async fn mock_completion(&self, rows: &[FaqRow]) -> Mock<'_> {
        let content = markdown_table(rows);
        self.mock_server
            .mock_async(|when, then| {
                when.method(Method::POST).path(CHAT_PATH);
                then.status(200).json_body(json!({
                    "choices": [{"message": {"role": "assistant", "content": content}}]
                }));
            })
            .await
    }

    /// Sends `GET /{path}`.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}/{}", self.address, path))
            .send()
            .await?)
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            // The receiver might already be gone if the server task panicked,
            // so we ignore the result of send.
            let _ = tx.send(());
        }
    }
}
