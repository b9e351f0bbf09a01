use std::path::PathBuf;

use super::doc_store::DocumentStore;
use super::fs_backend::FsBackend;

/// Production store: the catalog document lives in one JSON file.
pub type FileStore = DocumentStore<FsBackend>;

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        DocumentStore::with_backend(FsBackend::new(path))
    }
}
