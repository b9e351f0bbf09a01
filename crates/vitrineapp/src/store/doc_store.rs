use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use tracing::debug;
use uuid::Uuid;

use super::backend::DocumentBackend;
use super::document::CatalogDocument;
use super::{CatalogStore, ProductPage, ProductStore};
use crate::error::Result;
use crate::filter::QueryDescriptor;
use crate::model::{AttributeRow, CategoryRow, NodeCount, Product, SubcategoryRow};

/// Catalog and product store over a [`DocumentBackend`].
///
/// Writes are load-modify-save cycles on the whole document, serialized by
/// an async mutex so two mutations never interleave.
pub struct DocumentStore<B: DocumentBackend> {
    /// The underlying backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
    write_lock: tokio::sync::Mutex<()>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl<B: DocumentBackend> DocumentStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            write_lock: tokio::sync::Mutex::new(()),
            calls: Mutex::new(HashMap::new()),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// How many times the store method `name` was called.
    pub fn calls(&self, name: &str) -> usize {
        self.calls.lock().get(name).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().values().sum()
    }

    fn record(&self, name: &'static str) {
        *self.calls.lock().entry(name).or_insert(0) += 1;
    }

    async fn read(&self, name: &'static str) -> Result<CatalogDocument> {
        self.record(name);
        self.backend.load().await
    }

    async fn write<T>(
        &self,
        name: &'static str,
        apply: impl FnOnce(&mut CatalogDocument) -> Result<T> + Send,
    ) -> Result<T> {
        self.record(name);
        let _guard = self.write_lock.lock().await;
        let mut document = self.backend.load().await?;
        let out = apply(&mut document)?;
        self.backend.save(&document).await?;
        debug!(op = name, "store write committed");
        Ok(out)
    }
}

#[async_trait]
impl<B: DocumentBackend> CatalogStore for DocumentStore<B> {
    async fn fetch_categories(&self) -> Result<Vec<CategoryRow>> {
        Ok(self.read("fetch_categories").await?.categories)
    }

    async fn fetch_subcategories(&self) -> Result<Vec<SubcategoryRow>> {
        Ok(self.read("fetch_subcategories").await?.subcategories)
    }

    async fn fetch_attributes(&self) -> Result<Vec<AttributeRow>> {
        Ok(self.read("fetch_attributes").await?.attributes)
    }

    async fn create_category(&self, name: &str, value: &str) -> Result<CategoryRow> {
        self.write("create_category", |doc| Ok(doc.insert_category(name, value)))
            .await
    }

    async fn delete_category(&self, id: Uuid) -> Result<()> {
        let cascaded = self
            .write("delete_category", |doc| doc.remove_category(id))
            .await?;
        debug!(%id, subcategories = cascaded, "category deleted with cascade");
        Ok(())
    }

    async fn create_subcategory(
        &self,
        category_id: Uuid,
        name: &str,
        kind: &str,
    ) -> Result<SubcategoryRow> {
        self.write("create_subcategory", |doc| {
            doc.insert_subcategory(category_id, name, kind)
        })
        .await
    }

    async fn delete_subcategory(&self, id: Uuid) -> Result<()> {
        self.write("delete_subcategory", |doc| doc.remove_subcategory(id))
            .await
    }

    async fn create_attribute(
        &self,
        subcategory_id: Uuid,
        value: &str,
        category_id: Uuid,
    ) -> Result<AttributeRow> {
        self.write("create_attribute", |doc| {
            doc.insert_attribute(subcategory_id, value, category_id)
        })
        .await
    }

    async fn delete_attribute(
        &self,
        subcategory_id: Uuid,
        attribute_id: Uuid,
        category_id: Uuid,
    ) -> Result<()> {
        self.write("delete_attribute", |doc| {
            doc.remove_attribute(subcategory_id, attribute_id, category_id)
        })
        .await
    }

    async fn update_attribute(
        &self,
        subcategory_id: Uuid,
        attribute_id: Uuid,
        value: &str,
    ) -> Result<()> {
        self.write("update_attribute", |doc| {
            doc.rename_attribute(subcategory_id, attribute_id, value)
        })
        .await
    }
}

#[async_trait]
impl<B: DocumentBackend> ProductStore for DocumentStore<B> {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.read("list_products").await?.products)
    }

    async fn count_products_by_category(&self) -> Result<Vec<NodeCount>> {
        Ok(self.read("count_products_by_category").await?.count_by_category())
    }

    async fn count_products_by_subcategory(&self, category_id: Uuid) -> Result<Vec<NodeCount>> {
        Ok(self
            .read("count_products_by_subcategory")
            .await?
            .count_by_subcategory(category_id))
    }

    async fn count_products_by_attribute(&self, subcategory_id: Uuid) -> Result<Vec<NodeCount>> {
        Ok(self
            .read("count_products_by_attribute")
            .await?
            .count_by_attribute(subcategory_id))
    }

    async fn query_products(&self, descriptor: &QueryDescriptor) -> Result<ProductPage> {
        Ok(self.read("query_products").await?.query(descriptor))
    }
}
