use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use super::backend::DocumentBackend;
use super::document::CatalogDocument;
use crate::error::{CatalogError, Result};

/// In-memory document backend for tests and embedding.
///
/// Besides holding the document it can simulate a failing or slow store so
/// callers can exercise their error and concurrency paths.
#[derive(Default)]
pub struct MemBackend {
    document: Mutex<CatalogDocument>,
    simulate_read_error: AtomicBool,
    simulate_write_error: AtomicBool,
    latency: Mutex<Option<Duration>>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(document: CatalogDocument) -> Self {
        Self {
            document: Mutex::new(document),
            ..Self::default()
        }
    }

    pub fn set_simulate_read_error(&self, simulate: bool) {
        self.simulate_read_error.store(simulate, Ordering::SeqCst);
    }

    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.store(simulate, Ordering::SeqCst);
    }

    /// Delay every load and save by `latency` (tokio time, so paused test
    /// clocks apply).
    pub fn set_latency(&self, latency: Option<Duration>) {
        *self.latency.lock() = latency;
    }

    /// Direct access to the document, bypassing the store.
    pub fn edit<R>(&self, f: impl FnOnce(&mut CatalogDocument) -> R) -> R {
        f(&mut self.document.lock())
    }

    async fn wait(&self) {
        let latency = *self.latency.lock();
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }
}

#[async_trait]
impl DocumentBackend for MemBackend {
    async fn load(&self) -> Result<CatalogDocument> {
        self.wait().await;
        if self.simulate_read_error.load(Ordering::SeqCst) {
            return Err(CatalogError::Store("Simulated read error".to_string()));
        }
        Ok(self.document.lock().clone())
    }

    async fn save(&self, document: &CatalogDocument) -> Result<()> {
        self.wait().await;
        if self.simulate_write_error.load(Ordering::SeqCst) {
            return Err(CatalogError::Store("Simulated write error".to_string()));
        }
        *self.document.lock() = document.clone();
        Ok(())
    }
}
