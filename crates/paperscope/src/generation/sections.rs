//! Section generation: category summaries grounded in retrieved chunks

use chrono::Utc;
use dashmap::DashMap;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::Result;
use crate::providers::GenerationProvider;
use crate::retrieval::{Retriever, ScoredChunk};
use crate::types::SectionResult;

use super::cache::{CachedSections, SectionCache, SECTIONS_SCHEMA_VERSION};
use super::prompt::SectionTemplate;

/// Generates and caches per-category section summaries for a document
///
/// State machine per (document, category): UNGENERATED -> GENERATING ->
/// CACHED, with no way back; a cached record is returned verbatim without
/// touching the generation capability.
pub struct SectionGenerator {
    templates: Vec<SectionTemplate>,
    retriever: Arc<Retriever>,
    llm: Arc<dyn GenerationProvider>,
    cache: SectionCache,
    top_k: usize,
    max_context_chars: usize,
    /// Per-document claim: at most one generation pass runs for a document,
    /// concurrent requests wait and then serve the fresh cache
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl SectionGenerator {
    /// Create a section generator
    ///
    /// Templates are validated here; a malformed template is a startup
    /// configuration error, not a per-request failure.
    pub fn new(
        templates: Vec<SectionTemplate>,
        retriever: Arc<Retriever>,
        llm: Arc<dyn GenerationProvider>,
        cache: SectionCache,
        top_k: usize,
        max_context_chars: usize,
    ) -> Result<Self> {
        for template in &templates {
            template.validate()?;
        }
        Ok(Self {
            templates,
            retriever,
            llm,
            cache,
            top_k,
            max_context_chars,
            locks: DashMap::new(),
        })
    }

    /// Return the document's sections, generating them on first request
    ///
    /// Cache hits short-circuit all generation. On a miss the per-document
    /// lock collapses concurrent identical requests into one generation
    /// pass plus waiters; waiters re-check the cache after acquiring.
    /// Nothing is cached if any category fails, so a broken section can
    /// never look "done".
    pub async fn get_or_generate(&self, document_id: Uuid) -> Result<CachedSections> {
        if let Some(cached) = self.cache.load(document_id) {
            tracing::debug!("Section cache hit for document {}", document_id);
            return Ok(cached);
        }

        let lock = self
            .locks
            .entry(document_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let _guard = lock.lock().await;

        if let Some(cached) = self.cache.load(document_id) {
            tracing::debug!("Section cache filled while waiting for document {}", document_id);
            return Ok(cached);
        }

        tracing::info!(
            "Generating {} sections for document {}",
            self.templates.len(),
            document_id
        );

        let mut sections = BTreeMap::new();
        for template in &self.templates {
            let result = self.generate_section(document_id, template).await?;
            sections.insert(template.category.clone(), result);
        }

        let record = CachedSections {
            schema_version: SECTIONS_SCHEMA_VERSION,
            document_id,
            generated_at: Utc::now(),
            sections,
        };
        self.cache.store(&record)?;

        Ok(record)
    }

    /// Generate one category: retrieve, bound context, prompt, generate
    async fn generate_section(
        &self,
        document_id: Uuid,
        template: &SectionTemplate,
    ) -> Result<SectionResult> {
        let retrieved = self
            .retriever
            .retrieve(document_id, &template.retrieval_query, self.top_k)
            .await?;

        let context = build_context(&retrieved, self.max_context_chars);
        let prompt = template.render(&context);
        let content = self.llm.generate(&prompt).await?;

        Ok(SectionResult {
            content,
            source_chunks: retrieved.iter().map(|r| r.chunk.chunk_index).collect(),
        })
    }
}

/// Concatenate retrieved chunks into a bounded context window
///
/// Chunks are joined in retrieval order with a blank-line separator and cut
/// at the character budget. The cut is a plain char-boundary truncation,
/// not paragraph-aware.
pub fn build_context(results: &[ScoredChunk], max_chars: usize) -> String {
    let joined = results
        .iter()
        .map(|r| r.chunk.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    if joined.len() <= max_chars {
        return joined;
    }
    let mut cut = max_chars;
    while cut > 0 && !joined.is_char_boundary(cut) {
        cut -= 1;
    }
    joined[..cut].to_string()
}
