//! # Storage Layer
//!
//! The catalog core never talks to a database directly. It consumes two
//! async contracts:
//!
//! - [`CatalogStore`]: the taxonomy rows and their create/delete/update calls.
//! - [`ProductStore`]: grouped product counts and the server-side product query.
//!
//! Every identifier passed *into* a store is a validated [`Uuid`]; every
//! identifier coming *out* is a [`RecordId`](crate::ids::RecordId) so rows
//! that use numeric keys still join correctly.
//!
//! ## Document Store
//!
//! The bundled implementation, [`doc_store::DocumentStore`], keeps the whole
//! catalog as one [`document::CatalogDocument`] and applies the store-side
//! rules on it:
//!
//! - **Id assignment**: new rows get a v4 UUID.
//! - **Cascades**: deleting a category removes its subcategories and their
//!   attributes; deleting a subcategory removes its attributes.
//! - **Not found**: deleting or updating an unknown id fails.
//! - **Counts and queries**: computed over the product rows.
//!
//! Where the document lives is a [`backend::DocumentBackend`] concern:
//!
//! - [`mem_backend::MemBackend`]: in memory, with failure and latency knobs for tests.
//! - [`fs_backend::FsBackend`]: a single JSON file, written atomically.
//!
//! ## Storage Layout (file backend)
//!
//! ```text
//! catalog.json
//! {
//!   "categories":    [{ "id", "name", "value" }],
//!   "subcategories": [{ "id", "category_id", "name", "type" }],
//!   "attributes":    [{ "id", "subcategory_id", "value" }],
//!   "products":      [{ "id", "name", "price", "category_id", ... }]
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::filter::QueryDescriptor;
use crate::model::{AttributeRow, CategoryRow, NodeCount, Product, SubcategoryRow};

pub mod backend;
pub mod doc_store;
pub mod document;
pub mod fs;
pub mod fs_backend;
pub mod mem_backend;
pub mod memory;

/// One page of a server-side product query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub items: Vec<Product>,
    pub total_count: usize,
}

/// Taxonomy persistence.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn fetch_categories(&self) -> Result<Vec<CategoryRow>>;
    async fn fetch_subcategories(&self) -> Result<Vec<SubcategoryRow>>;
    async fn fetch_attributes(&self) -> Result<Vec<AttributeRow>>;

    async fn create_category(&self, name: &str, value: &str) -> Result<CategoryRow>;
    /// Deletes the category together with everything it owns.
    async fn delete_category(&self, id: Uuid) -> Result<()>;

    async fn create_subcategory(
        &self,
        category_id: Uuid,
        name: &str,
        kind: &str,
    ) -> Result<SubcategoryRow>;
    /// Deletes the subcategory together with its attributes.
    async fn delete_subcategory(&self, id: Uuid) -> Result<()>;

    async fn create_attribute(
        &self,
        subcategory_id: Uuid,
        value: &str,
        category_id: Uuid,
    ) -> Result<AttributeRow>;
    async fn delete_attribute(
        &self,
        subcategory_id: Uuid,
        attribute_id: Uuid,
        category_id: Uuid,
    ) -> Result<()>;
    async fn update_attribute(
        &self,
        subcategory_id: Uuid,
        attribute_id: Uuid,
        value: &str,
    ) -> Result<()>;
}

/// Product reads.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list_products(&self) -> Result<Vec<Product>>;

    async fn count_products_by_category(&self) -> Result<Vec<NodeCount>>;
    /// Counts restricted to products filed under `category_id`.
    async fn count_products_by_subcategory(&self, category_id: Uuid) -> Result<Vec<NodeCount>>;
    /// Counts restricted to products filed under `subcategory_id`.
    async fn count_products_by_attribute(&self, subcategory_id: Uuid) -> Result<Vec<NodeCount>>;

    async fn query_products(&self, descriptor: &QueryDescriptor) -> Result<ProductPage>;
}
