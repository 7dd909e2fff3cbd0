//! # FAQ Generation
//!
//! Drives a chat model chunk by chunk until a disease's FAQ table reaches its
//! target size. Each chunk is transformed into new, deduplicated rows; the
//! session ends when the target is met or the termination bound is hit.

use crate::{
    errors::FaqError,
    prompts::{render_faq_prompt, FAQ_GENERATION_PROMPT},
    providers::ai::AiProvider,
    tokens::TokenCounter,
    transform::{transform, CompletionParser, MarkdownTableParser},
    types::{FaqTable, SeenQuestions},
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// How many FAQs each chunk asks the model for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChunkSizing {
    /// Always request `chunk_size` FAQs.
    #[default]
    Fixed,
    /// Request `min(chunk_size, rows still missing)`.
    Remaining,
}

/// What to do when the termination bound is hit before the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StallPolicy {
    /// Fail with [`FaqError::GenerationStalled`].
    #[default]
    Fail,
    /// Return the rows collected so far.
    ReturnPartial,
}

/// Tuning for one generation session.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    pub target_count: usize,
    pub chunk_size: usize,
    /// Upper bound on model calls per session.
    pub max_iterations: usize,
    /// Consecutive chunks without a single new row before the session stalls.
    pub max_empty_chunks: usize,
    pub chunk_sizing: ChunkSizing,
    pub on_stall: StallPolicy,
    /// Overrides [`FAQ_GENERATION_PROMPT`].
    pub prompt_template: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            target_count: 500,
            chunk_size: 200,
            max_iterations: 25,
            max_empty_chunks: 3,
            chunk_sizing: ChunkSizing::Fixed,
            on_stall: StallPolicy::Fail,
            prompt_template: None,
        }
    }
}

impl GenerationOptions {
    fn validate(&self) -> Result<(), FaqError> {
        if self.chunk_size == 0 {
            return Err(FaqError::InvalidOptions(
                "chunk_size must be greater than zero".to_string(),
            ));
        }
        if self.max_iterations == 0 {
            return Err(FaqError::InvalidOptions(
                "max_iterations must be greater than zero".to_string(),
            ));
        }
        if self.max_empty_chunks == 0 {
            return Err(FaqError::InvalidOptions(
                "max_empty_chunks must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    fn chunk_request(&self, collected: usize) -> usize {
        match self.chunk_sizing {
            ChunkSizing::Fixed => self.chunk_size,
            ChunkSizing::Remaining => self
                .chunk_size
                .min(self.target_count.saturating_sub(collected)),
        }
    }
}

/// Transient state of one generation session.
#[derive(Debug, Default)]
struct Session {
    table: FaqTable,
    seen: SeenQuestions,
    total_tokens: usize,
    iterations: usize,
    empty_chunks: usize,
}

/// Generates FAQ tables by repeatedly prompting a chat model.
#[derive(Clone)]
pub struct FaqGenerator {
    ai_provider: Box<dyn AiProvider>,
    parser: Arc<dyn CompletionParser>,
    token_counter: Option<Arc<TokenCounter>>,
    options: GenerationOptions,
}

impl std::fmt::Debug for FaqGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaqGenerator")
            .field("ai_provider", &self.ai_provider)
            .field("token_counter", &self.token_counter)
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl FaqGenerator {
    /// Creates a generator using the markdown table parser.
    ///
    /// The tokenizer is resolved from the provider's model name. Models
    /// without a known tokenizer still generate; their token counts are
    /// simply not reported.
    pub fn new(ai_provider: Box<dyn AiProvider>, options: GenerationOptions) -> Self {
        let token_counter = match TokenCounter::for_model(ai_provider.model_name()) {
            Ok(counter) => Some(Arc::new(counter)),
            Err(e) => {
                warn!("{e}; token usage will not be reported.");
                None
            }
        };
        Self {
            ai_provider,
            parser: Arc::new(MarkdownTableParser::default()),
            token_counter,
            options,
        }
    }

    /// Replaces the completion parser.
    pub fn with_parser(mut self, parser: Arc<dyn CompletionParser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generates `target_count` FAQ rows for `disease` using the default options.
    pub async fn generate(&self, disease: &str) -> Result<FaqTable, FaqError> {
        self.generate_with_options(disease, &self.options).await
    }

    /// Generates FAQ rows for `disease`, overriding the generator's options.
    ///
    /// Any model failure aborts the whole session; no partial table is
    /// returned unless the session stalls under [`StallPolicy::ReturnPartial`].
    pub async fn generate_with_options(
        &self,
        disease: &str,
        options: &GenerationOptions,
    ) -> Result<FaqTable, FaqError> {
        options.validate()?;
        let template = options
            .prompt_template
            .as_deref()
            .unwrap_or(FAQ_GENERATION_PROMPT);

        let mut session = Session::default();
        info!(
            "Starting FAQ generation for '{disease}' (target: {}, chunk size: {}).",
            options.target_count, options.chunk_size
        );

        while session.table.len() < options.target_count {
            if session.iterations >= options.max_iterations
                || session.empty_chunks >= options.max_empty_chunks
            {
                warn!(
                    "FAQ generation for '{disease}' stalled after {} call(s) ({} consecutive empty): {}/{} rows.",
                    session.iterations,
                    session.empty_chunks,
                    session.table.len(),
                    options.target_count
                );
                return match options.on_stall {
                    StallPolicy::Fail => Err(FaqError::GenerationStalled {
                        disease: disease.to_string(),
                        collected: session.table.len(),
                        target: options.target_count,
                    }),
                    StallPolicy::ReturnPartial => Ok(session.table),
                };
            }
            session.iterations += 1;

            let num_faqs = options.chunk_request(session.table.len());
            let prompt = render_faq_prompt(template, disease, num_faqs, session.seen.last_n(2));

            let completion = self.ai_provider.generate(&prompt).await?;
            let chunk = transform(&completion, disease, &mut session.seen, self.parser.as_ref());

            if chunk.is_empty() {
                session.empty_chunks += 1;
            } else {
                session.empty_chunks = 0;
            }
            session.table.extend(chunk);

            match &self.token_counter {
                Some(counter) => {
                    let tokens = counter.count(&completion);
                    session.total_tokens += tokens;
                    info!(
                        "Accumulated FAQs: {}, Tokens generated in this step: {tokens}, Total tokens so far: {}",
                        session.table.len(),
                        session.total_tokens
                    );
                }
                None => info!("Accumulated FAQs: {}", session.table.len()),
            }
        }

        session.table.truncate(options.target_count);
        info!(
            "Finished FAQ generation for '{disease}': {} rows in {} call(s).",
            session.table.len(),
            session.iterations
        );
        Ok(session.table)
    }
}
