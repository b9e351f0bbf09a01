use super::doc_store::DocumentStore;
use super::mem_backend::MemBackend;

pub type InMemoryStore = DocumentStore<MemBackend>;

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        DocumentStore::with_backend(MemBackend::new())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::ids::RecordId;
    use crate::model::Product;
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use uuid::Uuid;

    /// Seeds an [`InMemoryStore`] directly through its backend, so seeding
    /// never shows up in the store's call counts.
    pub struct CatalogFixture {
        pub store: Arc<InMemoryStore>,
    }

    impl Default for CatalogFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl CatalogFixture {
        pub fn new() -> Self {
            Self {
                store: Arc::new(InMemoryStore::new()),
            }
        }

        pub fn category(&self, name: &str, slug: &str) -> Uuid {
            let row = self
                .store
                .backend()
                .edit(|doc| doc.insert_category(name, slug));
            uuid_of(&row.id)
        }

        pub fn subcategory(&self, category: Uuid, name: &str, kind: &str) -> Uuid {
            let row = self
                .store
                .backend()
                .edit(|doc| doc.insert_subcategory(category, name, kind))
                .expect("fixture category exists");
            uuid_of(&row.id)
        }

        pub fn attribute(&self, category: Uuid, subcategory: Uuid, value: &str) -> Uuid {
            let row = self
                .store
                .backend()
                .edit(|doc| doc.insert_attribute(subcategory, value, category))
                .expect("fixture subcategory exists");
            uuid_of(&row.id)
        }

        pub fn product(&self, product: Product) {
            self.store.backend().edit(|doc| doc.products.push(product));
        }

        /// Adds `count` products named "Product 1".."Product N", all filed
        /// under `category`.
        pub fn with_products(self, count: usize, category: Option<Uuid>) -> Self {
            for i in 0..count {
                let mut product =
                    Product::new(format!("Product {}", i + 1), Decimal::new(100 * (i as i64 + 1), 2));
                product.category_id = category.map(RecordId::from);
                self.product(product);
            }
            self
        }
    }

    fn uuid_of(id: &RecordId) -> Uuid {
        id.as_uuid().expect("store assigns uuids")
    }
}
