//! Section analysis endpoint

use axum::{extract::State, Json};
use std::collections::BTreeMap;
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::{AnalyzeRequest, SectionResult};

/// POST /analyze_sections - Structured summaries per category
///
/// First request for a document generates and caches every configured
/// category; repeats are served from the cache without touching the model.
pub async fn analyze_sections(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<BTreeMap<String, SectionResult>>> {
    let start = Instant::now();

    if state.store().get_document(request.document_id).is_none() {
        return Err(Error::not_found(format!("document {}", request.document_id)));
    }

    let record = state.sections().get_or_generate(request.document_id).await?;

    tracing::info!(
        "Sections for {} served in {}ms",
        request.document_id,
        start.elapsed().as_millis()
    );

    Ok(Json(record.sections))
}
