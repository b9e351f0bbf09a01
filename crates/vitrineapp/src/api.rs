//! # API Facade
//!
//! [`CatalogApi`] is the single entry point a UI (the bundled CLI, a web
//! handler, a test) talks to. It owns the services over one shared store and
//! forwards to them.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Dispatches** taxonomy mutations to [`TaxonomyService`] and counter reads
//!   to [`CounterService`]
//! - **Bundles reads** that a screen needs together ([`CatalogApi::overview`])
//! - **Runs client-mode listing** over the full product collection and hands
//!   out [`ServerCatalogView`]s for server mode
//!
//! Business rules stay in `commands/*.rs` and `filter/*.rs`; nothing here
//! writes to a terminal.
//!
//! ## Generic Over the Store
//!
//! `CatalogApi<S>` works over anything implementing both [`CatalogStore`] and
//! [`ProductStore`]: `CatalogApi<FileStore>` in production,
//! `CatalogApi<InMemoryStore>` in tests.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::commands::counters::CounterService;
use crate::commands::taxonomy::{RefreshOutcome, TaxonomyService};
use crate::commands::Notifier;
use crate::error::Result;
use crate::filter::{client, FilterState, Page, ServerCatalogView};
use crate::ids::RecordId;
use crate::model::{Category, NodeCount, Product};
use crate::store::{CatalogStore, ProductStore};

/// The tree plus product counts at every level, keyed by parent id.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CatalogOverview {
    pub tree: Vec<Category>,
    pub category_counts: Vec<NodeCount>,
    /// Per category id.
    pub subcategory_counts: HashMap<RecordId, Vec<NodeCount>>,
    /// Per subcategory id.
    pub attribute_counts: HashMap<RecordId, Vec<NodeCount>>,
}

pub struct CatalogApi<S: CatalogStore + ProductStore> {
    store: Arc<S>,
    taxonomy: TaxonomyService<S>,
    counters: CounterService<S>,
}

impl<S: CatalogStore + ProductStore> CatalogApi<S> {
    pub fn new(store: S, notifier: Arc<dyn Notifier>) -> Self {
        Self::shared(Arc::new(store), notifier)
    }

    /// Builds the facade over a store that is also held elsewhere.
    pub fn shared(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            taxonomy: TaxonomyService::new(store.clone(), notifier),
            counters: CounterService::new(store.clone()),
            store,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.taxonomy = self.taxonomy.with_refresh_interval(interval);
        self
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub fn taxonomy(&self) -> &TaxonomyService<S> {
        &self.taxonomy
    }

    pub fn counters(&self) -> &CounterService<S> {
        &self.counters
    }

    pub async fn refresh(&self, force: bool) -> Result<RefreshOutcome> {
        self.taxonomy.refresh(force).await
    }

    pub fn tree(&self) -> Vec<Category> {
        self.taxonomy.tree()
    }

    pub async fn add_category(&self, name: &str, slug: &str) -> Result<()> {
        self.taxonomy.add_category(name, slug).await
    }

    pub async fn remove_category(&self, category_id: &str) -> Result<()> {
        self.taxonomy.remove_category(category_id).await
    }

    pub async fn add_subcategory(&self, category_id: &str, name: &str, kind: &str) -> Result<()> {
        self.taxonomy.add_subcategory(category_id, name, kind).await
    }

    pub async fn remove_subcategory(&self, category_id: &str, subcategory_id: &str) -> Result<()> {
        self.taxonomy
            .remove_subcategory(category_id, subcategory_id)
            .await
    }

    pub async fn add_attribute(
        &self,
        category_id: &str,
        subcategory_id: &str,
        name: &str,
    ) -> Result<()> {
        self.taxonomy
            .add_subcategory_value(category_id, subcategory_id, name)
            .await
    }

    pub async fn remove_attribute(
        &self,
        category_id: &str,
        subcategory_id: &str,
        attribute_id: &str,
    ) -> Result<()> {
        self.taxonomy
            .remove_subcategory_value(category_id, subcategory_id, attribute_id)
            .await
    }

    pub async fn rename_attribute(
        &self,
        subcategory_id: &str,
        attribute_id: &str,
        new_name: &str,
    ) -> Result<()> {
        self.taxonomy
            .update_subcategory_value(subcategory_id, attribute_id, new_name)
            .await
    }

    /// Refreshes the tree (throttled) and collects counters for every node.
    ///
    /// A dropped refresh still returns the last tree; counter failures leave
    /// stale counts in place.
    pub async fn overview(&self) -> Result<CatalogOverview> {
        self.taxonomy.refresh(false).await?;
        let tree = self.taxonomy.tree();

        let category_counts = self.counters.category_counters().await;
        let mut subcategory_counts = HashMap::new();
        let mut attribute_counts = HashMap::new();
        for category in &tree {
            let Some(category_id) = category.id.as_uuid() else {
                debug!(id = %category.id, "skipping counters for non-uuid category");
                continue;
            };
            subcategory_counts.insert(
                category.id.clone(),
                self.counters.subcategory_counters(category_id).await,
            );
            for subcategory in &category.subcategories {
                if let Some(subcategory_id) = subcategory.id.as_uuid() {
                    attribute_counts.insert(
                        subcategory.id.clone(),
                        self.counters.attribute_counters(subcategory_id).await,
                    );
                }
            }
        }

        Ok(CatalogOverview {
            tree,
            category_counts,
            subcategory_counts,
            attribute_counts,
        })
    }

    /// Client-mode listing: loads every product and pages locally.
    pub async fn list_products(&self, state: &FilterState) -> Result<Page<Product>> {
        let products = self.store.list_products().await?;
        let page = client::page(&products, state);
        Ok(Page {
            items: page.items.into_iter().cloned().collect(),
            page: page.page,
            page_count: page.page_count,
            total_count: page.total_count,
        })
    }

    /// Server-mode listing starting from `state`.
    pub fn server_view(&self, state: FilterState) -> ServerCatalogView<S> {
        ServerCatalogView::with_state(self.store.clone(), state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::counters::count_for;
    use crate::commands::NoticeLog;
    use crate::filter::FilterAction;
    use crate::store::memory::fixtures::CatalogFixture;
    use crate::store::memory::InMemoryStore;

    fn api() -> CatalogApi<InMemoryStore> {
        CatalogApi::new(InMemoryStore::new(), Arc::new(NoticeLog::new()))
    }

    #[tokio::test]
    async fn test_mutations_dispatch_to_taxonomy() {
        let api = api();
        api.add_category("Shirts", "shirts").await.unwrap();
        let shirts = api.tree()[0].id.to_string();

        api.add_subcategory(&shirts, "Colour", "color").await.unwrap();
        let colour = api.tree()[0].subcategories[0].id.to_string();

        api.add_attribute(&shirts, &colour, "Red").await.unwrap();
        let red = api.tree()[0].subcategories[0].attributes[0].id.to_string();

        api.rename_attribute(&colour, &red, "Crimson").await.unwrap();
        assert_eq!(api.tree()[0].subcategories[0].attributes[0].name, "Crimson");

        api.remove_attribute(&shirts, &colour, &red).await.unwrap();
        api.remove_subcategory(&shirts, &colour).await.unwrap();
        api.remove_category(&shirts).await.unwrap();
        assert!(api.tree().is_empty());
        assert_eq!(api.store().calls("create_category"), 1);
        assert_eq!(api.store().calls("delete_category"), 1);
    }

    #[tokio::test]
    async fn test_overview_counts() {
        let fixture = CatalogFixture::new();
        let shirts = fixture.category("Shirts", "shirts");
        fixture.subcategory(shirts, "Colour", "color");
        let fixture = fixture.with_products(4, Some(shirts));
        let api = CatalogApi::shared(fixture.store.clone(), Arc::new(NoticeLog::new()));

        let overview = api.overview().await.unwrap();
        assert_eq!(overview.tree.len(), 1);
        assert_eq!(count_for(&overview.category_counts, &shirts.into()), 4);
        assert_eq!(overview.attribute_counts.len(), 1);
    }

    #[tokio::test]
    async fn test_client_listing_pages() {
        let fixture = CatalogFixture::new().with_products(45, None);
        let api = CatalogApi::shared(fixture.store.clone(), Arc::new(NoticeLog::new()));

        let state = FilterState::default().apply(FilterAction::GoToPage(3));
        let page = api.list_products(&state).await.unwrap();
        assert_eq!(page.page_count, 3);
        assert_eq!(page.items.len(), 5);

        let mut view = api.server_view(state);
        let server_page = view.load().await.unwrap();
        assert_eq!(server_page.items.len(), 5);
    }
}
