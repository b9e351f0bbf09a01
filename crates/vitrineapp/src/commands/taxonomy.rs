//! Taxonomy mutations and refresh.
//!
//! Every mutation runs the same two phases:
//!
//! 1. Local checks: identifier shape, required fields, pre-flight existence
//!    against the loaded tree, duplicate names. A failure here never reaches
//!    the store.
//! 2. One store call, and once it resolves, a forced refresh that replaces
//!    the whole tree.
//!
//! The tree is never patched in place. It is either the last tree fetched
//! successfully or about to be swapped for a new one. Mutations that check
//! against the tree load it first (unforced) when no fetch has succeeded yet.
//!
//! Every failure is logged, sent to the [`Notifier`] as an error notice and
//! returned. A successful mutation whose follow-up refresh fails still returns
//! `Ok`; the refresh failure becomes a warning notice.

use parking_lot::RwLock;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::{Notice, Notifier};
use crate::error::{CatalogError, Result};
use crate::ids::{parse_record_uuid, RecordId};
use crate::model::{Category, Subcategory};
use crate::ops::{OpState, Operation, OperationTracker};
use crate::store::CatalogStore;
use crate::taxonomy::{
    assemble_tree, attribute_name_exists, find_category_by_id, find_subcategory_by_id,
    group_attributes_by_subcategory, group_subcategories_by_category,
};
use crate::throttle::{FetchThrottle, Rejection};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Refreshed { categories: usize },
    Skipped(Rejection),
}

pub struct TaxonomyService<S: CatalogStore> {
    store: Arc<S>,
    tree: RwLock<Vec<Category>>,
    loaded: AtomicBool,
    throttle: FetchThrottle,
    tracker: OperationTracker,
    notifier: Arc<dyn Notifier>,
}

impl<S: CatalogStore> TaxonomyService<S> {
    pub fn new(store: Arc<S>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            store,
            tree: RwLock::new(Vec::new()),
            loaded: AtomicBool::new(false),
            throttle: FetchThrottle::default(),
            tracker: OperationTracker::new(),
            notifier,
        }
    }

    pub fn with_refresh_interval(mut self, interval: Duration) -> Self {
        self.throttle = FetchThrottle::new(interval);
        self
    }

    /// Snapshot of the last successfully fetched tree.
    pub fn tree(&self) -> Vec<Category> {
        self.tree.read().clone()
    }

    pub fn throttle(&self) -> &FetchThrottle {
        &self.throttle
    }

    pub fn operation_state(&self, op: Operation) -> OpState {
        self.tracker.state(op)
    }

    /// Refetches the whole tree, subject to the throttle.
    ///
    /// A dropped request is not an error: it returns
    /// [`RefreshOutcome::Skipped`] and leaves the tree as it is.
    pub async fn refresh(&self, force: bool) -> Result<RefreshOutcome> {
        let ticket = match self.throttle.try_begin(force) {
            Ok(ticket) => ticket,
            Err(rejection) => {
                debug!(force, ?rejection, "taxonomy refresh dropped");
                return Ok(RefreshOutcome::Skipped(rejection));
            }
        };

        let tree = match self.fetch_tree().await {
            Ok(tree) => tree,
            Err(e) => {
                warn!(error = %e, "taxonomy refresh failed, keeping last tree");
                return Err(e);
            }
        };

        let categories = tree.len();
        *self.tree.write() = tree;
        self.loaded.store(true, Ordering::Release);
        ticket.finish();
        debug!(categories, force, "taxonomy refreshed");
        Ok(RefreshOutcome::Refreshed { categories })
    }

    async fn fetch_tree(&self) -> Result<Vec<Category>> {
        let categories = self.store.fetch_categories().await?;
        let subcategories = self.store.fetch_subcategories().await?;
        let attributes = self.store.fetch_attributes().await?;
        Ok(assemble_tree(
            categories,
            group_subcategories_by_category(subcategories),
            group_attributes_by_subcategory(attributes),
        ))
    }

    pub async fn add_category(&self, name: &str, slug: &str) -> Result<()> {
        let op = Operation::AddCategory;
        let name = self.checked(op, required("Category name", name))?;
        let slug = self.checked(op, required("Category slug", slug))?;
        let _guard = self.checked(op, self.tracker.begin(op))?;

        self.commit(op, self.store.create_category(name, slug)).await?;
        self.settle(op, format!("Category added: {}", name)).await;
        Ok(())
    }

    /// Removes a category with its subcategories and their attributes.
    ///
    /// Only one removal runs at a time; a call made while another is in
    /// flight fails with [`CatalogError::InProgress`] and is not queued.
    pub async fn remove_category(&self, category_id: &str) -> Result<()> {
        let op = Operation::RemoveCategory;
        let id = self.checked(op, parse_record_uuid("category", category_id))?;
        let _guard = self.checked(op, self.tracker.begin(op))?;
        self.ensure_loaded(op).await?;
        let category = self.checked(op, self.loaded_category(id))?;

        self.commit(op, self.store.delete_category(id)).await?;
        self.settle(op, format!("Category removed: {}", category.name))
            .await;
        Ok(())
    }

    pub async fn add_subcategory(&self, category_id: &str, name: &str, kind: &str) -> Result<()> {
        let op = Operation::AddSubcategory;
        let category_id = self.checked(op, parse_record_uuid("category", category_id))?;
        let name = self.checked(op, required("Subcategory name", name))?;
        let kind = self.checked(op, required("Subcategory type", kind))?;
        let _guard = self.checked(op, self.tracker.begin(op))?;
        self.ensure_loaded(op).await?;
        let category = self.checked(op, self.loaded_category(category_id))?;

        self.commit(op, self.store.create_subcategory(category_id, name, kind))
            .await?;
        self.settle(
            op,
            format!("Subcategory added to {}: {}", category.name, name),
        )
        .await;
        Ok(())
    }

    pub async fn remove_subcategory(&self, category_id: &str, subcategory_id: &str) -> Result<()> {
        let op = Operation::RemoveSubcategory;
        let category_id = self.checked(op, parse_record_uuid("category", category_id))?;
        let subcategory_id = self.checked(op, parse_record_uuid("subcategory", subcategory_id))?;
        let _guard = self.checked(op, self.tracker.begin(op))?;
        self.ensure_loaded(op).await?;
        let subcategory = self.checked(op, self.loaded_subcategory(category_id, subcategory_id))?;

        self.commit(op, self.store.delete_subcategory(subcategory_id))
            .await?;
        self.settle(op, format!("Subcategory removed: {}", subcategory.name))
            .await;
        Ok(())
    }

    /// Adds an attribute, refusing a name already present (exact match) in
    /// the loaded subcategory.
    pub async fn add_subcategory_value(
        &self,
        category_id: &str,
        subcategory_id: &str,
        attribute_name: &str,
    ) -> Result<()> {
        let op = Operation::AddAttribute;
        let category_id = self.checked(op, parse_record_uuid("category", category_id))?;
        let subcategory_id = self.checked(op, parse_record_uuid("subcategory", subcategory_id))?;
        let name = self.checked(op, required("Attribute name", attribute_name))?;
        let _guard = self.checked(op, self.tracker.begin(op))?;
        self.ensure_loaded(op).await?;
        let subcategory = self.checked(op, self.loaded_subcategory(category_id, subcategory_id))?;
        if attribute_name_exists(&subcategory, name) {
            return Err(self.reject(
                op,
                CatalogError::Duplicate(format!(
                    "Attribute '{}' already exists in {}",
                    name, subcategory.name
                )),
            ));
        }

        self.commit(
            op,
            self.store.create_attribute(subcategory_id, name, category_id),
        )
        .await?;
        self.settle(
            op,
            format!("Attribute added to {}: {}", subcategory.name, name),
        )
        .await;
        Ok(())
    }

    pub async fn remove_subcategory_value(
        &self,
        category_id: &str,
        subcategory_id: &str,
        attribute_id: &str,
    ) -> Result<()> {
        let op = Operation::RemoveAttribute;
        let category_id = self.checked(op, parse_record_uuid("category", category_id))?;
        let subcategory_id = self.checked(op, parse_record_uuid("subcategory", subcategory_id))?;
        let attribute_id = self.checked(op, parse_record_uuid("attribute", attribute_id))?;
        let _guard = self.checked(op, self.tracker.begin(op))?;
        self.ensure_loaded(op).await?;
        let subcategory = self.checked(op, self.loaded_subcategory(category_id, subcategory_id))?;
        let attribute = match subcategory.attribute(&RecordId::from(attribute_id)) {
            Some(attribute) => attribute.name.clone(),
            None => {
                return Err(self.reject(op, CatalogError::not_found("Attribute", attribute_id)))
            }
        };

        self.commit(
            op,
            self.store
                .delete_attribute(subcategory_id, attribute_id, category_id),
        )
        .await?;
        self.settle(op, format!("Attribute removed: {}", attribute))
            .await;
        Ok(())
    }

    /// Renames an attribute. The new name must not collide with a sibling.
    pub async fn update_subcategory_value(
        &self,
        subcategory_id: &str,
        attribute_id: &str,
        new_name: &str,
    ) -> Result<()> {
        let op = Operation::UpdateAttribute;
        let subcategory_id = self.checked(op, parse_record_uuid("subcategory", subcategory_id))?;
        let attribute_id = self.checked(op, parse_record_uuid("attribute", attribute_id))?;
        let name = self.checked(op, required("Attribute name", new_name))?;
        let _guard = self.checked(op, self.tracker.begin(op))?;
        self.ensure_loaded(op).await?;

        let attribute_key = RecordId::from(attribute_id);
        let subcategory_key = RecordId::from(subcategory_id);
        let found = self
            .tree
            .read()
            .iter()
            .find_map(|c| c.subcategory(&subcategory_key))
            .and_then(|s| {
                s.attribute(&attribute_key)
                    .map(|a| (s.clone(), a.name.clone()))
            });
        let Some((subcategory, old_name)) = found else {
            return Err(self.reject(op, CatalogError::not_found("Attribute", attribute_id)));
        };
        if subcategory
            .attributes
            .iter()
            .any(|a| a.id != attribute_key && a.name == name)
        {
            return Err(self.reject(
                op,
                CatalogError::Duplicate(format!(
                    "Attribute '{}' already exists in {}",
                    name, subcategory.name
                )),
            ));
        }

        self.commit(
            op,
            self.store
                .update_attribute(subcategory_id, attribute_id, name),
        )
        .await?;
        self.settle(op, format!("Attribute renamed: {} -> {}", old_name, name))
            .await;
        Ok(())
    }

    /// Fetches the tree once if no refresh has succeeded yet.
    async fn ensure_loaded(&self, op: Operation) -> Result<()> {
        if self.loaded.load(Ordering::Acquire) {
            return Ok(());
        }
        debug!(%op, "tree not loaded yet, fetching before pre-flight checks");
        self.checked(op, self.refresh(false).await).map(|_| ())
    }

    fn loaded_category(&self, id: Uuid) -> Result<Category> {
        find_category_by_id(&self.tree.read(), &RecordId::from(id))
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Category", id))
    }

    fn loaded_subcategory(&self, category_id: Uuid, subcategory_id: Uuid) -> Result<Subcategory> {
        let tree = self.tree.read();
        let category_key = RecordId::from(category_id);
        if find_category_by_id(&tree, &category_key).is_none() {
            return Err(CatalogError::not_found("Category", category_id));
        }
        find_subcategory_by_id(&tree, &category_key, &RecordId::from(subcategory_id))
            .cloned()
            .ok_or_else(|| CatalogError::not_found("Subcategory", subcategory_id))
    }

    fn checked<T>(&self, op: Operation, result: Result<T>) -> Result<T> {
        result.map_err(|e| self.reject(op, e))
    }

    /// Logs and notifies a failed operation, handing the error back.
    fn reject(&self, op: Operation, err: CatalogError) -> CatalogError {
        match &err {
            e if e.is_store_failure() => error!(%op, error = %e, "store call failed"),
            CatalogError::InProgress(_) => info!(%op, "call dropped, operation already in flight"),
            e => warn!(%op, kind = e.kind(), error = %e, "rejected before store call"),
        }
        self.notifier.notify(Notice::error(err.to_string()));
        err
    }

    async fn commit<T>(&self, op: Operation, call: impl Future<Output = Result<T>>) -> Result<T> {
        debug!(%op, "issuing store mutation");
        self.checked(op, call.await)
    }

    /// Post-mutation refresh followed by the success notice.
    async fn settle(&self, op: Operation, message: String) {
        match self.refresh(true).await {
            Ok(RefreshOutcome::Refreshed { .. }) => {}
            Ok(RefreshOutcome::Skipped(rejection)) => {
                debug!(%op, ?rejection, "post-mutation refresh joined a fetch in flight")
            }
            Err(e) => {
                warn!(%op, error = %e, "mutation applied but tree refresh failed");
                self.notifier.notify(Notice::warning(format!(
                    "{} succeeded but the catalog could not be reloaded: {}",
                    op, e
                )));
            }
        }
        info!(%op, "{}", message);
        self.notifier.notify(Notice::success(message));
    }
}

fn required<'a>(field: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::Validation(format!("{} is required", field)));
    }
    Ok(trimmed)
}
