use async_trait::async_trait;

use super::document::CatalogDocument;
use crate::error::Result;

/// Raw document I/O.
///
/// This trait handles the "where" of storage (file vs memory), while
/// [`DocumentStore`](super::doc_store::DocumentStore) handles the "what"
/// (cascades, id assignment, counts, queries).
#[async_trait]
pub trait DocumentBackend: Send + Sync {
    /// Load the whole catalog. A backend with nothing stored yet returns an
    /// empty document, not an error.
    async fn load(&self) -> Result<CatalogDocument>;

    /// Replace the stored catalog.
    /// MUST be atomic so a failed save leaves the previous document intact.
    async fn save(&self, document: &CatalogDocument) -> Result<()>;
}
