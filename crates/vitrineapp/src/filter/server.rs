//! Server-side mode: the filter state is forwarded as a [`QueryDescriptor`]
//! and the store does the narrowing.
//!
//! [`ServerCatalogView`] keeps the last descriptor it sent and only queries
//! again when the descriptor changes. A failed query leaves the previously
//! shown page in place. A page past the end of a non-empty result falls back
//! to page 1, as in client mode.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use super::{pagination, FilterAction, FilterState, Page, SortOption, PAGE_SIZE};
use crate::error::Result;
use crate::model::{Product, PublishStatus};
use crate::store::{ProductPage, ProductStore};

/// Everything a server needs to reproduce one page of a filtered listing.
///
/// `search` is carried as typed; matching trims it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    #[serde(default)]
    pub search: String,
    #[serde(default)]
    pub category_id: Option<Uuid>,
    #[serde(default)]
    pub subcategory_ids: BTreeSet<Uuid>,
    #[serde(default)]
    pub attribute_ids: BTreeSet<Uuid>,
    #[serde(default)]
    pub status: Option<PublishStatus>,
    #[serde(default)]
    pub sort: SortOption,
    #[serde(default = "first_page")]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn first_page() -> usize {
    1
}

fn default_page_size() -> usize {
    PAGE_SIZE
}

impl QueryDescriptor {
    pub fn from_state(state: &FilterState) -> Self {
        Self {
            search: state.search_term.clone(),
            category_id: state.selected_category,
            subcategory_ids: state.selected_subcategories.clone(),
            attribute_ids: state.selected_attributes.clone(),
            status: state.status,
            sort: state.sort,
            page: state.current_page,
            page_size: PAGE_SIZE,
        }
    }

    pub fn to_state(&self) -> FilterState {
        FilterState {
            search_term: self.search.clone(),
            selected_category: self.category_id,
            selected_subcategories: self.subcategory_ids.clone(),
            selected_attributes: self.attribute_ids.clone(),
            status: self.status,
            sort: self.sort,
            current_page: self.page.max(1),
        }
    }
}

pub struct ServerCatalogView<P: ProductStore> {
    store: Arc<P>,
    state: FilterState,
    last_sent: Option<QueryDescriptor>,
    page: Page<Product>,
}

impl<P: ProductStore> ServerCatalogView<P> {
    pub fn new(store: Arc<P>) -> Self {
        Self::with_state(store, FilterState::default())
    }

    pub fn with_state(store: Arc<P>, state: FilterState) -> Self {
        Self {
            store,
            state,
            last_sent: None,
            page: Page::default(),
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// The page currently on display.
    pub fn page(&self) -> &Page<Product> {
        &self.page
    }

    pub fn last_descriptor(&self) -> Option<&QueryDescriptor> {
        self.last_sent.as_ref()
    }

    /// Applies `action` to the filter state and loads the resulting page.
    pub async fn apply(&mut self, action: FilterAction) -> Result<&Page<Product>> {
        self.state = self.state.apply(action);
        self.load().await
    }

    /// Queries the store if the current descriptor differs from the last one
    /// sent.
    pub async fn load(&mut self) -> Result<&Page<Product>> {
        let descriptor = QueryDescriptor::from_state(&self.state);
        if self.last_sent.as_ref() == Some(&descriptor) {
            debug!(page = descriptor.page, "descriptor unchanged, reusing page");
            return Ok(&self.page);
        }
        self.send(descriptor).await
    }

    /// Queries the store even when the descriptor is unchanged.
    pub async fn reload(&mut self) -> Result<&Page<Product>> {
        let descriptor = QueryDescriptor::from_state(&self.state);
        self.send(descriptor).await
    }

    async fn send(&mut self, mut descriptor: QueryDescriptor) -> Result<&Page<Product>> {
        let mut result = self.query(&descriptor).await?;
        let mut page_count = pagination::page_count(result.total_count, descriptor.page_size);

        if result.total_count > 0 && descriptor.page > page_count {
            debug!(
                requested = descriptor.page,
                page_count, "page out of range, showing page 1"
            );
            self.state = self.state.apply(FilterAction::GoToPage(1));
            descriptor = QueryDescriptor::from_state(&self.state);
            result = self.query(&descriptor).await?;
            page_count = pagination::page_count(result.total_count, descriptor.page_size);
        }

        let page_count = page_count.max(1);
        debug!(
            page = descriptor.page,
            page_count,
            total = result.total_count,
            "product page loaded"
        );
        self.page = Page {
            items: result.items,
            page: descriptor.page,
            page_count,
            total_count: result.total_count,
        };
        self.last_sent = Some(descriptor);
        Ok(&self.page)
    }

    async fn query(&self, descriptor: &QueryDescriptor) -> Result<ProductPage> {
        self.store.query_products(descriptor).await.map_err(|e| {
            warn!(error = %e, "product query failed, keeping previous page");
            e
        })
    }
}
