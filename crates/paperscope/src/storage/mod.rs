//! Durable storage layout, partitioned by document id
//!
//! Everything lives under the configured data dir:
//! `uploads/<id>.md` (converted text), `index/<id>.json` (vector index),
//! `sections/<id>.json` (cached sections), `documents.json` (registry).
//! Partitioning by document id is the isolation boundary for concurrent
//! requests against different documents.

use dashmap::DashMap;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::types::Document;

/// Filesystem store for converted text and the document registry
pub struct DocumentStore {
    data_dir: PathBuf,
    registry_path: PathBuf,
    documents: DashMap<Uuid, Document>,
}

impl DocumentStore {
    /// Open (or initialize) the store under `data_dir`
    pub fn open(data_dir: &Path) -> Result<Self> {
        std::fs::create_dir_all(data_dir.join("uploads"))?;
        std::fs::create_dir_all(data_dir.join("index"))?;
        std::fs::create_dir_all(data_dir.join("sections"))?;

        let registry_path = data_dir.join("documents.json");
        let documents = Self::load_registry(&registry_path);
        tracing::info!("Loaded {} documents from registry", documents.len());

        Ok(Self {
            data_dir: data_dir.to_path_buf(),
            registry_path,
            documents,
        })
    }

    fn load_registry(path: &Path) -> DashMap<Uuid, Document> {
        let documents = DashMap::new();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(content) => match serde_json::from_str::<Vec<Document>>(&content) {
                    Ok(docs) => {
                        for doc in docs {
                            documents.insert(doc.id, doc);
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse documents.json: {}", e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read documents.json: {}", e);
                }
            }
        }

        documents
    }

    fn save_registry(&self) -> Result<()> {
        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by_key(|d| d.ingested_at);

        let content = serde_json::to_string_pretty(&docs)?;
        let tmp = self.registry_path.with_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        std::fs::rename(&tmp, &self.registry_path)?;
        Ok(())
    }

    /// Directory holding per-document vector index artifacts
    pub fn index_dir(&self) -> PathBuf {
        self.data_dir.join("index")
    }

    /// Directory holding per-document cached section artifacts
    pub fn sections_dir(&self) -> PathBuf {
        self.data_dir.join("sections")
    }

    fn upload_path(&self, document_id: Uuid) -> PathBuf {
        self.data_dir.join("uploads").join(format!("{}.md", document_id))
    }

    /// Persist the converted text for a document
    pub fn save_text(&self, document_id: Uuid, text: &str) -> Result<()> {
        std::fs::write(self.upload_path(document_id), text)?;
        Ok(())
    }

    /// Load the converted text for a document
    ///
    /// `NotFound` when the document was never uploaded (or its text is
    /// gone) — required at index build time.
    pub fn load_text(&self, document_id: Uuid) -> Result<String> {
        match std::fs::read_to_string(self.upload_path(document_id)) {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::not_found(format!(
                "converted text for document {}",
                document_id
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Register a document (persisted to disk)
    pub fn add_document(&self, doc: Document) -> Result<()> {
        self.documents.insert(doc.id, doc);
        self.save_registry()
    }

    /// Look up a registered document
    pub fn get_document(&self, id: Uuid) -> Option<Document> {
        self.documents.get(&id).map(|d| d.clone())
    }

    /// List all registered documents
    pub fn list_documents(&self) -> Vec<Document> {
        let mut docs: Vec<Document> = self
            .documents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        docs.sort_by_key(|d| d.ingested_at);
        docs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_layout() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).unwrap();
        assert!(store.index_dir().is_dir());
        assert!(store.sections_dir().is_dir());
        assert!(dir.path().join("uploads").is_dir());
    }

    #[test]
    fn test_text_roundtrip_and_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = DocumentStore::open(dir.path()).unwrap();
        let id = Uuid::new_v4();

        assert!(matches!(store.load_text(id), Err(Error::NotFound(_))));
        store.save_text(id, "# Title\n\nBody.").unwrap();
        assert_eq!(store.load_text(id).unwrap(), "# Title\n\nBody.");
    }

    #[test]
    fn test_registry_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let id;
        {
            let store = DocumentStore::open(dir.path()).unwrap();
            let mut doc = Document::new("paper.pdf".to_string(), "hash".to_string());
            doc.total_chunks = 7;
            id = doc.id;
            store.add_document(doc).unwrap();
        }

        let reopened = DocumentStore::open(dir.path()).unwrap();
        let doc = reopened.get_document(id).unwrap();
        assert_eq!(doc.filename, "paper.pdf");
        assert_eq!(doc.total_chunks, 7);
        assert_eq!(reopened.list_documents().len(), 1);
    }
}
