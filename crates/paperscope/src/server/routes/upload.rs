//! PDF upload endpoint

use axum::{
    extract::{Multipart, State},
    Json,
};
use std::time::Instant;

use crate::error::{Error, Result};
use crate::server::state::AppState;
use crate::types::UploadResponse;

/// POST /upload_pdf - Upload a paper and build its index
///
/// Blocking pipeline for one document: convert, chunk, embed, persist.
/// Independent uploads run concurrently; nothing is shared between
/// documents beyond the registry.
pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>> {
    let start = Instant::now();

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Internal(format!("Failed to read multipart field: {}", e)))?
    {
        let filename = field
            .file_name()
            .map(|s| s.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let data = field
            .bytes()
            .await
            .map_err(|e| Error::Internal(format!("Failed to read file: {}", e)))?;
        file = Some((filename, data.to_vec()));
        break;
    }

    let (filename, data) =
        file.ok_or_else(|| Error::Internal("No file in upload request".to_string()))?;

    tracing::info!("Processing upload: {} ({} bytes)", filename, data.len());

    let ingested = state
        .pipeline()
        .ingest(state.converter(), &data, &filename)?;

    // Converted text first: the index is built from the persisted text and
    // fails NotFound without it
    let mut document = ingested.document;
    state.store().save_text(document.id, &ingested.text)?;
    document.total_chunks = state.build_index(document.id).await?;

    state.store().add_document(document.clone())?;

    tracing::info!(
        "Ingested '{}': {} chunks in {:.1}s",
        filename,
        document.total_chunks,
        start.elapsed().as_secs_f64()
    );

    Ok(Json(UploadResponse {
        document_id: document.id,
        filename: document.filename,
        total_chunks: document.total_chunks,
    }))
}
