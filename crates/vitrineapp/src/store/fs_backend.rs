use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;
use uuid::Uuid;

use super::backend::DocumentBackend;
use super::document::CatalogDocument;
use crate::error::{CatalogError, Result};

/// Stores the catalog as one pretty-printed JSON file.
pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn ensure_parent(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !fs::try_exists(parent).await? {
                fs::create_dir_all(parent).await.map_err(CatalogError::Io)?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentBackend for FsBackend {
    async fn load(&self) -> Result<CatalogDocument> {
        if !fs::try_exists(&self.path).await? {
            debug!(path = %self.path.display(), "catalog file missing, starting empty");
            return Ok(CatalogDocument::default());
        }
        let content = fs::read_to_string(&self.path)
            .await
            .map_err(CatalogError::Io)?;
        let document = serde_json::from_str(&content).map_err(CatalogError::Serialization)?;
        Ok(document)
    }

    async fn save(&self, document: &CatalogDocument) -> Result<()> {
        self.ensure_parent().await?;
        let content =
            serde_json::to_string_pretty(document).map_err(CatalogError::Serialization)?;

        // Atomic write: temp file next to the target, then rename over it.
        let file_name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "catalog.json".to_string());
        let tmp = self
            .path
            .with_file_name(format!(".{}-{}.tmp", file_name, Uuid::new_v4()));
        fs::write(&tmp, content).await.map_err(CatalogError::Io)?;
        fs::rename(&tmp, &self.path).await.map_err(CatalogError::Io)?;
        debug!(path = %self.path.display(), "catalog saved");
        Ok(())
    }
}
