//! API routes

pub mod chat;
pub mod sections;
pub mod upload;

use axum::{
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
    Json, Router,
};

use crate::server::state::AppState;
use crate::types::response::DocumentSummary;

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/upload_pdf",
            post(upload::upload_pdf).layer(DefaultBodyLimit::max(max_upload_size)),
        )
        .route("/analyze_sections", post(sections::analyze_sections))
        .route("/chat", post(chat::chat))
        .route("/documents", get(list_documents))
}

/// GET /documents - List uploaded documents
async fn list_documents(State(state): State<AppState>) -> Json<Vec<DocumentSummary>> {
    let documents = state
        .store()
        .list_documents()
        .iter()
        .map(DocumentSummary::from)
        .collect();
    Json(documents)
}
