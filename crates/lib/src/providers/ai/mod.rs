pub mod gemini;
pub mod openai;

use crate::errors::FaqError;
use async_trait::async_trait;
use dyn_clone::DynClone;
use std::fmt::Debug;

/// A trait for interacting with a chat model.
///
/// Each call sends the prompt as a single user message and returns the text
/// of the model's reply.
#[async_trait]
pub trait AiProvider: Send + Sync + Debug + DynClone {
    /// Sends `prompt` to the model and returns the completion text.
    async fn generate(&self, prompt: &str) -> Result<String, FaqError>;

    /// The model identifier requests are made against. Token counts for
    /// the completions are computed with this model's tokenizer.
    fn model_name(&self) -> &str;
}

dyn_clone::clone_trait_object!(AiProvider);
