//! # Application Configuration
//!
//! This module defines the configuration structure for the `faqgen-server` and
//! provides the logic for loading it from an optional `config.yml` file and
//! environment variables.

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use faqgen::{providers::factory::ProviderConfig, GenerationOptions};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::info;

/// A custom error type for configuration issues.
#[derive(Debug)]
pub enum ConfigError {
    /// Indicates an error from the underlying `config` crate.
    General(String),
    /// Indicates an explicitly requested configuration file was not found.
    NotFound(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::General(msg) => write!(f, "Configuration error: {msg}"),
            ConfigError::NotFound(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::General(err.to_string())
    }
}

/// The root configuration structure, mapping directly to `config.yml`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// The port for the server to listen on. Loaded from `PORT` env var.
    #[serde(default = "default_port")]
    pub port: u16,
    /// The chat model used for generation.
    #[serde(default)]
    pub model: ProviderConfig,
    /// Where finished tables are published.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Defaults for every generation session.
    #[serde(default)]
    pub generation: GenerationOptions,
}

/// Provides a default value for the `port` field if not set in the environment.
fn default_port() -> u16 {
    8001
}

/// Configuration for the cloud storage bucket.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct StorageConfig {
    #[serde(default = "default_bucket")]
    pub bucket: String,
    /// Path to a service-account JSON key. When null or empty, application
    /// default credentials are used.
    #[serde(default = "default_credentials_path")]
    pub credentials_path: Option<String>,
    #[serde(default = "default_signed_url_ttl_secs")]
    pub signed_url_ttl_secs: u64,
}

fn default_bucket() -> String {
    "project1-app".to_string()
}

fn default_credentials_path() -> Option<String> {
    Some("key.json".to_string())
}

fn default_signed_url_ttl_secs() -> u64 {
    60 * 60
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            credentials_path: default_credentials_path(),
            signed_url_ttl_secs: default_signed_url_ttl_secs(),
        }
    }
}

impl StorageConfig {
    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.signed_url_ttl_secs)
    }

    /// The configured credential file, if any.
    pub fn credentials_file(&self) -> Option<&str> {
        self.credentials_path.as_deref().filter(|p| !p.is_empty())
    }
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{(?P<var>[A-Z0-9_]+)\}").expect("env var pattern is valid")
    })
}

// Helper to read a file, substitute env vars, and return its content.
// Returns Ok(None) if the file does not exist, or an error if it fails to read.
fn read_and_substitute(path: &str) -> Result<Option<String>, ConfigError> {
    if !std::path::Path::new(path).exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::General(format!("Failed to read config file '{path}': {e}")))?;

    let expanded_content = env_var_pattern().replace_all(&content, |caps: &regex::Captures| {
        let var_name = &caps["var"];
        env::var(var_name).unwrap_or_default()
    });

    Ok(Some(expanded_content.to_string()))
}

/// Loads the application configuration from a file and environment variables.
///
/// Layers, lowest precedence first:
/// - the defaults declared on the config structs;
/// - `config.yml` next to this crate (or `config_path_override`, which must
///   exist), with `${VAR}` placeholders substituted from the environment;
/// - top-level keys from the environment, such as `PORT`;
/// - nested keys from `FAQGEN_...` variables (e.g. `FAQGEN_STORAGE__BUCKET`).
///
/// Finally, `OPENAI_API_KEY` fills in the model API key if none was set.
pub fn get_config(config_path_override: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = ConfigBuilder::builder();

    match config_path_override {
        Some(path) => {
            let content = read_and_substitute(path)?.ok_or_else(|| {
                ConfigError::NotFound(format!("Config file not found at '{path}'."))
            })?;
            info!("Loading configuration from '{path}'.");
            builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
        }
        None => {
            let default_path = format!("{}/config.yml", env!("CARGO_MANIFEST_DIR"));
            match read_and_substitute(&default_path)? {
                Some(content) => {
                    info!("Loading configuration from '{default_path}'.");
                    builder = builder.add_source(File::from_str(&content, FileFormat::Yaml));
                }
                None => info!("'{default_path}' not found. Using defaults and environment."),
            }
        }
    }

    let settings = builder
        .add_source(Environment::default().try_parsing(true))
        .add_source(
            Environment::with_prefix("FAQGEN")
                .prefix_separator("_")
                .try_parsing(true)
                .separator("__"),
        )
        .build()?;

    let mut config: AppConfig = settings.try_deserialize()?;

    if config.model.api_key.as_deref().map_or(true, str::is_empty) {
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            if !key.is_empty() {
                config.model.api_key = Some(key);
            }
        }
    }

    Ok(config)
}
