//! # Disease FAQ Generation
//!
//! This crate builds disease-specific FAQ datasets with a chat model and
//! publishes them as CSV files in cloud storage.
//!
//! The pipeline for one disease is:
//!
//! 1. [`FaqGenerator`] prompts the model chunk by chunk, parsing each
//!    completion into deduplicated [`FaqRow`]s until the target count is met.
//! 2. [`Publisher`] uploads the resulting [`FaqTable`] as CSV and signs a
//!    time-limited download URL for it.

pub mod errors;
pub mod generator;
pub mod prompts;
pub mod providers;
pub mod publisher;
pub mod tokens;
pub mod transform;
pub mod types;

pub use errors::FaqError;
pub use generator::{ChunkSizing, FaqGenerator, GenerationOptions, StallPolicy};
pub use publisher::{PublishedArtifact, Publisher};
pub use types::{FaqRow, FaqTable, SeenQuestions};
