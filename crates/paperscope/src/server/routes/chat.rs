//! Grounded chat endpoint

use axum::{extract::State, Json};
use std::time::Instant;

use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{ChatRequest, ChatResponse};

/// POST /chat - Ask an ad-hoc question about one document
///
/// Each call is an independent grounded Q&A request; no conversation state
/// survives between calls.
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    let start = Instant::now();

    tracing::info!("Chat question for {}: \"{}\"", request.document_id, request.question);

    let response = state
        .chat()
        .answer(request.document_id, &request.question)
        .await?;

    tracing::info!(
        "Chat answered in {}ms with {} sources",
        start.elapsed().as_millis(),
        response.sources.len()
    );

    Ok(Json(response))
}
