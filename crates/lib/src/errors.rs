use crate::providers::storage::StorageError;
use thiserror::Error;

/// Custom error types for the FAQ generation pipeline.
#[derive(Error, Debug)]
pub enum FaqError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to AI provider: {0}")]
    AiRequest(reqwest::Error),
    #[error("Failed to deserialize AI provider response: {0}")]
    AiDeserialization(reqwest::Error),
    #[error("AI provider returned an error: {0}")]
    AiApi(String),
    #[error("AI provider returned no completion text")]
    EmptyCompletion,
    #[error("AI provider is not configured: {0}")]
    MissingAiProvider(String),
    #[error("No tokenizer is known for model '{0}'")]
    UnknownModel(String),
    #[error(
        "FAQ generation for '{disease}' stalled after collecting {collected} of {target} rows"
    )]
    GenerationStalled {
        disease: String,
        collected: usize,
        target: usize,
    },
    #[error("Invalid generation options: {0}")]
    InvalidOptions(String),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("CSV output was not valid UTF-8: {0}")]
    CsvEncoding(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
