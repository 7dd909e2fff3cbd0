use crate::{errors::FaqError, providers::ai::AiProvider};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// The public OpenAI chat completions endpoint.
pub const OPENAI_CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";

// --- OpenAI-compatible request and response structures ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize, Debug)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize, Debug)]
struct ChatChoice {
    message: ChatMessage,
}

// --- Provider implementation ---

/// A provider for the OpenAI chat completions API or any compatible server.
#[derive(Clone, Debug)]
pub struct OpenAiProvider {
    client: ReqwestClient,
    api_url: String,
    api_key: Option<String>,
    model: String,
}

impl OpenAiProvider {
    /// Creates a new `OpenAiProvider`.
    ///
    /// `api_key` is sent as a bearer token when present; local
    /// OpenAI-compatible servers usually run without one.
    pub fn new(api_url: String, api_key: Option<String>, model: String) -> Result<Self, FaqError> {
        let client = ReqwestClient::builder()
            .build()
            .map_err(FaqError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            api_url,
            api_key,
            model,
        })
    }
}

#[async_trait]
impl AiProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str) -> Result<String, FaqError> {
        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
        };

        let mut request_builder = self.client.post(&self.api_url);

        if let Some(key) = &self.api_key {
            request_builder = request_builder.bearer_auth(key);
        }

        let response = request_builder
            .json(&request_body)
            .send()
            .await
            .map_err(FaqError::AiRequest)?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(FaqError::AiApi(format!("{status}: {error_text}")));
        }

        let chat_response: ChatResponse = response
            .json()
            .await
            .map_err(FaqError::AiDeserialization)?;

        chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(FaqError::EmptyCompletion)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
