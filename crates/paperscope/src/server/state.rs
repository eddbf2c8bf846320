//! Application state for the HTTP server

use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::generation::{default_section_templates, ChatAnswerer, SectionCache, SectionGenerator};
use crate::ingestion::{DocumentConverter, IngestPipeline};
use crate::providers::{GenerationProvider, TextEncoder};
use crate::retrieval::{Retriever, VectorIndex};
use crate::storage::DocumentStore;

/// Shared application state
///
/// Providers are constructed once at startup and injected here; every
/// request borrows them through the state instead of reaching for globals.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    store: DocumentStore,
    converter: Arc<dyn DocumentConverter>,
    encoder: Arc<dyn TextEncoder>,
    pipeline: IngestPipeline,
    sections: SectionGenerator,
    chat: ChatAnswerer,
    ready: RwLock<bool>,
}

impl AppState {
    /// Create application state from config and the injected providers
    pub fn new(
        config: AppConfig,
        converter: Arc<dyn DocumentConverter>,
        encoder: Arc<dyn TextEncoder>,
        llm: Arc<dyn GenerationProvider>,
    ) -> Result<Self> {
        config.validate()?;

        let store = DocumentStore::open(&config.storage.data_dir)?;
        let retriever = Arc::new(Retriever::new(store.index_dir(), Arc::clone(&encoder)));

        let sections = SectionGenerator::new(
            default_section_templates(),
            Arc::clone(&retriever),
            Arc::clone(&llm),
            SectionCache::new(store.sections_dir()),
            config.retrieval.section_top_k,
            config.retrieval.max_context_chars,
        )?;

        let chat = ChatAnswerer::new(retriever, llm, config.retrieval.chat_top_k);
        let pipeline = IngestPipeline::new(&config.chunking);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                store,
                converter,
                encoder,
                pipeline,
                sections,
                chat,
                ready: RwLock::new(true),
            }),
        })
    }

    /// Get configuration
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get the document store
    pub fn store(&self) -> &DocumentStore {
        &self.inner.store
    }

    /// Get the document converter
    pub fn converter(&self) -> &dyn DocumentConverter {
        self.inner.converter.as_ref()
    }

    /// Get the text encoder
    pub fn encoder(&self) -> &Arc<dyn TextEncoder> {
        &self.inner.encoder
    }

    /// Get the ingest pipeline
    pub fn pipeline(&self) -> &IngestPipeline {
        &self.inner.pipeline
    }

    /// Get the section generator
    pub fn sections(&self) -> &SectionGenerator {
        &self.inner.sections
    }

    /// Get the chat answerer
    pub fn chat(&self) -> &ChatAnswerer {
        &self.inner.chat
    }

    /// Build and persist the vector index for a document
    ///
    /// Reads the converted text from the store (`NotFound` if it is
    /// missing), chunks it, embeds every chunk, and writes the per-document
    /// artifact. Returns the number of indexed chunks.
    pub async fn build_index(&self, document_id: Uuid) -> Result<u32> {
        let text = self.store().load_text(document_id)?;

        let chunks = self.pipeline().chunk(&text, document_id);
        if chunks.is_empty() {
            return Err(Error::conversion(format!(
                "document {}: converted text produced no chunks",
                document_id
            )));
        }

        let index = VectorIndex::build(document_id, chunks, self.encoder().as_ref()).await?;
        index.persist(&self.store().index_dir())?;
        Ok(index.len() as u32)
    }

    /// Check if the server is ready
    pub fn is_ready(&self) -> bool {
        *self.inner.ready.read()
    }

    /// Set ready state
    pub fn set_ready(&self, ready: bool) {
        *self.inner.ready.write() = ready;
    }
}
