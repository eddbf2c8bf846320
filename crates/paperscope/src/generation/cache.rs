//! Durable per-document cache of generated sections

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::Result;
use crate::types::SectionResult;

/// Cache artifact format version
pub const SECTIONS_SCHEMA_VERSION: u32 = 1;

/// The full generated section set for one document
///
/// Written once after all categories generate successfully; never mutated,
/// only fully overwritten. Cached per document as a single record
/// (all-or-nothing), matching the idempotence contract: a cache hit
/// short-circuits all generation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedSections {
    /// Artifact format version
    pub schema_version: u32,
    /// Owning document
    pub document_id: Uuid,
    /// When generation completed
    pub generated_at: DateTime<Utc>,
    /// Category -> generated result
    pub sections: BTreeMap<String, SectionResult>,
}

/// Filesystem-backed section cache, one artifact per document id
pub struct SectionCache {
    dir: PathBuf,
}

impl SectionCache {
    /// Create a cache over the given directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self, document_id: Uuid) -> PathBuf {
        self.dir.join(format!("{}.json", document_id))
    }

    /// Load the cached sections for a document, if present
    ///
    /// An unreadable or outdated artifact is treated as a miss (and will be
    /// fully overwritten by the next generation), not as an error.
    pub fn load(&self, document_id: Uuid) -> Option<CachedSections> {
        let path = self.path(document_id);
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                tracing::warn!("Failed to read section cache {}: {}", path.display(), e);
                return None;
            }
        };

        match serde_json::from_str::<CachedSections>(&content) {
            Ok(cached) if cached.schema_version == SECTIONS_SCHEMA_VERSION => Some(cached),
            Ok(cached) => {
                tracing::warn!(
                    "Section cache {} has schema version {}, regenerating",
                    path.display(),
                    cached.schema_version
                );
                None
            }
            Err(e) => {
                tracing::warn!("Section cache {} unreadable ({}), regenerating", path.display(), e);
                None
            }
        }
    }

    /// Persist a freshly generated section set
    ///
    /// Temp-file-then-rename, so readers never observe a partial record.
    pub fn store(&self, record: &CachedSections) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path(record.document_id);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(record)?;
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &path)?;
        tracing::debug!(
            "Cached {} sections for document {}",
            record.sections.len(),
            record.document_id
        );
        Ok(())
    }

    /// Directory this cache writes to
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}
