//! # AI Provider Factory
//!
//! Creates chat model clients from a declarative [`ProviderConfig`]. The
//! server uses this when building its state; tests use it to point a provider
//! at a mock server.

use crate::{
    errors::FaqError,
    providers::ai::{
        gemini::{gemini_api_url, GeminiProvider},
        openai::{OpenAiProvider, OPENAI_CHAT_COMPLETIONS_URL},
        AiProvider,
    },
};
use serde::Deserialize;
use tracing::info;

/// Settings for one chat model client.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProviderConfig {
    /// The type of provider: `"openai"`, `"local"` (an OpenAI-compatible
    /// server) or `"gemini"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// The API URL. Optional for providers whose endpoint can be derived.
    #[serde(default)]
    pub api_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_model_name")]
    pub model_name: String,
}

fn default_provider() -> String {
    "openai".to_string()
}

fn default_model_name() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            api_url: None,
            api_key: None,
            model_name: default_model_name(),
        }
    }
}

/// Instantiates the provider described by `config`.
pub fn create_provider(config: &ProviderConfig) -> Result<Box<dyn AiProvider>, FaqError> {
    let provider: Box<dyn AiProvider> = match config.provider.as_str() {
        "openai" => {
            let api_key = config.api_key.clone().filter(|k| !k.is_empty()).ok_or_else(|| {
                FaqError::MissingAiProvider(
                    "api_key (or OPENAI_API_KEY) is required for the openai provider".to_string(),
                )
            })?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| OPENAI_CHAT_COMPLETIONS_URL.to_string());
            Box::new(OpenAiProvider::new(
                api_url,
                Some(api_key),
                config.model_name.clone(),
            )?)
        }
        "local" => {
            let api_url = config.api_url.clone().ok_or_else(|| {
                FaqError::MissingAiProvider(
                    "api_url is required for the local provider".to_string(),
                )
            })?;
            Box::new(OpenAiProvider::new(
                api_url,
                config.api_key.clone().filter(|k| !k.is_empty()),
                config.model_name.clone(),
            )?)
        }
        "gemini" => {
            let api_key = config.api_key.clone().filter(|k| !k.is_empty()).ok_or_else(|| {
                FaqError::MissingAiProvider(
                    "api_key is required for the gemini provider".to_string(),
                )
            })?;
            let api_url = config
                .api_url
                .clone()
                .unwrap_or_else(|| gemini_api_url(&config.model_name));
            Box::new(GeminiProvider::new(
                api_url,
                api_key,
                config.model_name.clone(),
            )?)
        }
        other => {
            return Err(FaqError::MissingAiProvider(format!(
                "Unsupported AI provider type '{other}'"
            )))
        }
    };

    info!(
        "Configured '{}' provider for model '{}'.",
        config.provider, config.model_name
    );
    Ok(provider)
}
