//! # Token Counting
//!
//! Counts how many tokens a model's tokenizer would consume for a piece of
//! text. The counts are reported in the generation logs and never enforced.

use crate::errors::FaqError;
use tiktoken_rs::CoreBPE;

/// Returns the number of tokens `text` encodes to with the tokenizer of `model`.
///
/// This builds the tokenizer on every call; prefer [`TokenCounter`] when
/// counting repeatedly against the same model.
pub fn count_tokens(text: &str, model: &str) -> Result<usize, FaqError> {
    Ok(TokenCounter::for_model(model)?.count(text))
}

/// A tokenizer resolved once for a given model.
pub struct TokenCounter {
    model: String,
    bpe: CoreBPE,
}

impl TokenCounter {
    /// Resolves the tokenizer for `model`.
    pub fn for_model(model: &str) -> Result<Self, FaqError> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|_| FaqError::UnknownModel(model.to_string()))?;
        Ok(Self {
            model: model.to_string(),
            bpe,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn count(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

impl std::fmt::Debug for TokenCounter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCounter")
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_tokens_known_model() {
        assert_eq!(count_tokens("", "gpt-4o-mini").unwrap(), 0);
        let n = count_tokens("What are the symptoms of influenza?", "gpt-4o-mini").unwrap();
        assert!(n > 0 && n < 20, "unexpected token count {n}");
    }

    #[test]
    fn test_count_tokens_unknown_model() {
        let err = count_tokens("hello", "gemini-2.5-flash").unwrap_err();
        assert!(matches!(err, FaqError::UnknownModel(m) if m == "gemini-2.5-flash"));
    }

    #[test]
    fn test_counter_matches_free_function() {
        let counter = TokenCounter::for_model("gpt-4").unwrap();
        let text = "| Q | A | S | K |";
        assert_eq!(counter.count(text), count_tokens(text, "gpt-4").unwrap());
        assert_eq!(counter.model(), "gpt-4");
    }
}
