//! Product counts per taxonomy node.
//!
//! Counters are computed by the product store on demand and cached per
//! scope. A failed query logs a warning and hands back the last counters
//! computed for that scope (empty if there never were any): stale counts are
//! shown rather than none.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::Result;
use crate::ids::RecordId;
use crate::model::NodeCount;
use crate::store::ProductStore;

/// Which parent a set of counters is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterScope {
    Categories,
    /// Subcategories of one category.
    Subcategories(Uuid),
    /// Attributes of one subcategory.
    Attributes(Uuid),
}

pub struct CounterService<P: ProductStore> {
    store: Arc<P>,
    cache: RwLock<HashMap<CounterScope, Vec<NodeCount>>>,
}

impl<P: ProductStore> CounterService<P> {
    pub fn new(store: Arc<P>) -> Self {
        Self {
            store,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub async fn category_counters(&self) -> Vec<NodeCount> {
        self.load(
            CounterScope::Categories,
            self.store.count_products_by_category(),
        )
        .await
    }

    pub async fn subcategory_counters(&self, category_id: Uuid) -> Vec<NodeCount> {
        self.load(
            CounterScope::Subcategories(category_id),
            self.store.count_products_by_subcategory(category_id),
        )
        .await
    }

    pub async fn attribute_counters(&self, subcategory_id: Uuid) -> Vec<NodeCount> {
        self.load(
            CounterScope::Attributes(subcategory_id),
            self.store.count_products_by_attribute(subcategory_id),
        )
        .await
    }

    /// Last counters computed for `scope`, without querying.
    pub fn cached(&self, scope: CounterScope) -> Vec<NodeCount> {
        self.cache.read().get(&scope).cloned().unwrap_or_default()
    }

    async fn load(
        &self,
        scope: CounterScope,
        query: impl Future<Output = Result<Vec<NodeCount>>>,
    ) -> Vec<NodeCount> {
        match query.await {
            Ok(counts) => {
                debug!(?scope, nodes = counts.len(), "counters loaded");
                self.cache.write().insert(scope, counts.clone());
                counts
            }
            Err(e) => {
                warn!(?scope, error = %e, "counter query failed, keeping previous counters");
                self.cached(scope)
            }
        }
    }
}

/// Count for `id` in `counts`; nodes without products are absent and count
/// as zero.
pub fn count_for(counts: &[NodeCount], id: &RecordId) -> u64 {
    counts
        .iter()
        .find(|c| &c.id == id)
        .map(|c| c.count)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;
    use crate::store::memory::fixtures::CatalogFixture;
    use rust_decimal::Decimal;

    fn filed(name: &str, category: Uuid, subcategory: Option<Uuid>, attribute: Option<Uuid>) -> Product {
        let mut product = Product::new(name, Decimal::new(1000, 2));
        product.category_id = Some(category.into());
        product.subcategory_id = subcategory.map(RecordId::from);
        product.attribute_id = attribute.map(RecordId::from);
        product
    }

    #[tokio::test]
    async fn test_counts_per_level() {
        let fixture = CatalogFixture::new();
        let shirts = fixture.category("Shirts", "shirts");
        let mugs = fixture.category("Mugs", "mugs");
        let colour = fixture.subcategory(shirts, "Colour", "color");
        let red = fixture.attribute(shirts, colour, "Red");
        fixture.product(filed("Red Shirt", shirts, Some(colour), Some(red)));
        fixture.product(filed("Red Tee", shirts, Some(colour), Some(red)));
        fixture.product(filed("Plain Shirt", shirts, None, None));
        fixture.product(filed("Mug", mugs, None, None));

        let service = CounterService::new(fixture.store.clone());

        let categories = service.category_counters().await;
        assert_eq!(count_for(&categories, &shirts.into()), 3);
        assert_eq!(count_for(&categories, &mugs.into()), 1);

        let subcategories = service.subcategory_counters(shirts).await;
        assert_eq!(subcategories.len(), 1);
        assert_eq!(count_for(&subcategories, &colour.into()), 2);

        let attributes = service.attribute_counters(colour).await;
        assert_eq!(count_for(&attributes, &red.into()), 2);
        assert_eq!(count_for(&attributes, &Uuid::new_v4().into()), 0);
    }

    #[tokio::test]
    async fn test_failure_keeps_stale_counters() {
        let fixture = CatalogFixture::new();
        let shirts = fixture.category("Shirts", "shirts");
        fixture.product(filed("Shirt", shirts, None, None));
        let service = CounterService::new(fixture.store.clone());

        let first = service.category_counters().await;
        assert_eq!(first.len(), 1);

        fixture.product(filed("Another Shirt", shirts, None, None));
        fixture.store.backend().set_simulate_read_error(true);
        assert_eq!(service.category_counters().await, first);

        fixture.store.backend().set_simulate_read_error(false);
        let fresh = service.category_counters().await;
        assert_eq!(count_for(&fresh, &shirts.into()), 2);
    }

    #[tokio::test]
    async fn test_failure_without_history_is_empty() {
        let fixture = CatalogFixture::new();
        fixture.store.backend().set_simulate_read_error(true);
        let service = CounterService::new(fixture.store.clone());
        assert!(service.attribute_counters(Uuid::new_v4()).await.is_empty());
    }
}
