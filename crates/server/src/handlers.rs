//! # Route Handlers
//!
//! The greeting used as a liveness probe and the per-disease generation
//! endpoint.

use crate::{errors::AppError, state::AppState};
use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RootResponse {
    pub message: String,
}

/// The handler for the root (`/`) endpoint.
pub async fn root() -> Json<RootResponse> {
    Json(RootResponse {
        message: "Hello World".to_string(),
    })
}

/// The handler for `/{disease}`.
///
/// Generates the configured number of FAQs for `disease`, publishes them as
/// CSV and responds with the signed download URL as a JSON string.
pub async fn disease_handler(
    State(app_state): State<AppState>,
    Path(disease): Path<String>,
) -> Result<Json<String>, AppError> {
    info!("Received FAQ generation request for '{disease}'.");

    let table = app_state.generator.generate(&disease).await?;
    let artifact = app_state.publisher.publish(&table, &disease).await?;

    Ok(Json(artifact.signed_url))
}
