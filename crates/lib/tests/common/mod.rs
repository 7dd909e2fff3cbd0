#![allow(dead_code)]
//! # Common Test Utilities
//!
//! Shared setup for the `faqgen` integration tests. The mock providers
//! themselves live in the `faqgen-test-utils` crate.

use dotenvy::dotenv;
use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes the tracing subscriber and loads .env for tests.
pub fn setup_tracing() {
    INIT.call_once(|| {
        dotenv().ok();
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .compact()
            .try_init();
    });
}
