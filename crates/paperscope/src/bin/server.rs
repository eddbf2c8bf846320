//! paperscope server binary
//!
//! Run with: cargo run -p paperscope --bin paperscope-server

use std::path::PathBuf;
use std::sync::Arc;

use paperscope::config::AppConfig;
use paperscope::ingestion::PdfConverter;
use paperscope::providers::OllamaClient;
use paperscope::server::AppServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "paperscope=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_path = std::env::var("PAPERSCOPE_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("paperscope.toml"));
    let config = AppConfig::load(&config_path)?;
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Data dir: {}", config.storage.data_dir.display());
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!("  - Generation model: {}", config.llm.generate_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.max_chunk_size,
        config.chunking.chunk_overlap
    );

    // One Ollama client serves both provider roles; constructed once and
    // injected everywhere
    let ollama = Arc::new(OllamaClient::new(&config.llm));

    tracing::info!("Checking Ollama at {}...", config.llm.base_url);
    let client = reqwest::Client::new();
    match client
        .get(format!("{}/api/tags", config.llm.base_url))
        .send()
        .await
    {
        Ok(resp) if resp.status().is_success() => {
            tracing::info!("Ollama is running");
        }
        _ => {
            tracing::warn!("Ollama not available at {}", config.llm.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!(
                "  2. Pull models: ollama pull {} && ollama pull {}",
                config.llm.embed_model,
                config.llm.generate_model
            );
        }
    }

    let server = AppServer::new(
        config,
        Arc::new(PdfConverter::new()),
        ollama.clone(),
        ollama,
    )?;

    tracing::info!("API: http://{}", server.address());
    tracing::info!("  POST /upload_pdf       - Upload a paper");
    tracing::info!("  POST /analyze_sections - Structured section summaries");
    tracing::info!("  POST /chat             - Grounded Q&A");
    tracing::info!("  GET  /documents        - List uploaded papers");

    server.start().await?;

    Ok(())
}
