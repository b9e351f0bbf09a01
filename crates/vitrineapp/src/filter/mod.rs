//! # Product Filter / Sort / Paginate Engine
//!
//! Narrows a product collection by taxonomy selection, free-text search and
//! publish state, orders it, and cuts out the visible page.
//!
//! ## Filter State
//!
//! [`FilterState`] is a plain value. The only way to change it is
//! [`FilterState::apply`], which takes a [`FilterAction`] and returns the next
//! state; nothing is global and the engine can be driven without a UI.
//!
//! Every action except [`FilterAction::GoToPage`] sends the state back to
//! page 1.
//!
//! ## Two Modes, One Contract
//!
//! - [`client`]: the whole collection is already loaded; filtering, sorting and
//!   slicing happen here.
//! - [`server`]: the state is turned into a [`QueryDescriptor`] and forwarded;
//!   the server's `total_count` drives the page count.
//!
//! Both produce a [`Page`]. An empty page is a normal result ("no results"),
//! not an error. The page size is fixed at [`PAGE_SIZE`].
//!
//! ## Selections
//!
//! Subcategory and attribute selections may arrive as bare ids or as records
//! carrying an id ([`Selection`]). They are normalized into UUID sets once,
//! when the action is built, so the engine only ever sees the canonical form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::{CatalogError, Result};
use crate::model::PublishStatus;

pub mod client;
pub mod pagination;
pub mod selection;
pub mod server;

pub use pagination::PageItem;
pub use selection::{normalize_selection, Selection};
pub use server::{QueryDescriptor, ServerCatalogView};

pub const PAGE_SIZE: usize = 20;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOption {
    #[default]
    Relevance,
    PriceAsc,
    PriceDesc,
    Newest,
}

impl SortOption {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOption::Relevance => "relevance",
            SortOption::PriceAsc => "price-asc",
            SortOption::PriceDesc => "price-desc",
            SortOption::Newest => "newest",
        }
    }
}

impl fmt::Display for SortOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOption {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "relevance" => Ok(SortOption::Relevance),
            "price-asc" => Ok(SortOption::PriceAsc),
            "price-desc" => Ok(SortOption::PriceDesc),
            "newest" => Ok(SortOption::Newest),
            other => Err(CatalogError::Validation(format!(
                "Unknown sort option '{}' (expected relevance, price-asc, price-desc or newest)",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    search_term: String,
    selected_category: Option<Uuid>,
    selected_subcategories: BTreeSet<Uuid>,
    selected_attributes: BTreeSet<Uuid>,
    status: Option<PublishStatus>,
    sort: SortOption,
    current_page: usize,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            selected_category: None,
            selected_subcategories: BTreeSet::new(),
            selected_attributes: BTreeSet::new(),
            status: None,
            sort: SortOption::Relevance,
            current_page: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterAction {
    Search(String),
    /// Changing the category drops subcategory and attribute selections.
    SelectCategory(Option<Uuid>),
    ToggleSubcategory(Uuid),
    SetSubcategories(BTreeSet<Uuid>),
    ToggleAttribute(Uuid),
    SetAttributes(BTreeSet<Uuid>),
    SetStatus(Option<PublishStatus>),
    Sort(SortOption),
    GoToPage(usize),
    Clear,
}

impl FilterAction {
    /// Builds [`FilterAction::SetSubcategories`] from mixed selection input.
    pub fn subcategories<I>(inputs: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Selection>,
    {
        Ok(FilterAction::SetSubcategories(normalize_selection(
            "subcategory",
            inputs,
        )?))
    }

    /// Builds [`FilterAction::SetAttributes`] from mixed selection input.
    pub fn attributes<I>(inputs: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Into<Selection>,
    {
        Ok(FilterAction::SetAttributes(normalize_selection(
            "attribute", inputs,
        )?))
    }
}

impl FilterState {
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn selected_category(&self) -> Option<&Uuid> {
        self.selected_category.as_ref()
    }

    pub fn selected_subcategories(&self) -> &BTreeSet<Uuid> {
        &self.selected_subcategories
    }

    pub fn selected_attributes(&self) -> &BTreeSet<Uuid> {
        &self.selected_attributes
    }

    pub fn status(&self) -> Option<PublishStatus> {
        self.status
    }

    pub fn sort(&self) -> SortOption {
        self.sort
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    /// True when anything narrows the result set (sort and page do not).
    pub fn has_active_filters(&self) -> bool {
        !self.search_term.trim().is_empty()
            || self.selected_category.is_some()
            || !self.selected_subcategories.is_empty()
            || !self.selected_attributes.is_empty()
            || self.status.is_some()
    }

    pub fn apply(&self, action: FilterAction) -> FilterState {
        let mut next = self.clone();
        match action {
            FilterAction::GoToPage(page) => {
                next.current_page = page.max(1);
                return next;
            }
            FilterAction::Clear => return FilterState::default(),
            FilterAction::Search(term) => next.search_term = term,
            FilterAction::SelectCategory(category) => {
                if next.selected_category != category {
                    next.selected_subcategories.clear();
                    next.selected_attributes.clear();
                }
                next.selected_category = category;
            }
            FilterAction::ToggleSubcategory(id) => toggle(&mut next.selected_subcategories, id),
            FilterAction::SetSubcategories(ids) => next.selected_subcategories = ids,
            FilterAction::ToggleAttribute(id) => toggle(&mut next.selected_attributes, id),
            FilterAction::SetAttributes(ids) => next.selected_attributes = ids,
            FilterAction::SetStatus(status) => next.status = status,
            FilterAction::Sort(sort) => next.sort = sort,
        }
        next.current_page = 1;
        next
    }
}

fn toggle(set: &mut BTreeSet<Uuid>, id: Uuid) {
    if !set.remove(&id) {
        set.insert(id);
    }
}

/// One page of results plus the numbers needed to render pagination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// 1-based page actually returned.
    pub page: usize,
    pub page_count: usize,
    pub total_count: usize,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            page_count: 0,
            total_count: 0,
        }
    }
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.total_count == 0
    }

    pub fn numbers(&self) -> Vec<PageItem> {
        pagination::page_numbers(self.page, self.page_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn busy_state() -> FilterState {
        FilterState::default()
            .apply(FilterAction::SelectCategory(Some(Uuid::new_v4())))
            .apply(FilterAction::ToggleSubcategory(Uuid::new_v4()))
            .apply(FilterAction::Search("mug".into()))
            .apply(FilterAction::GoToPage(4))
    }

    #[test]
    fn test_default_state() {
        let state = FilterState::default();
        assert_eq!(state.current_page(), 1);
        assert_eq!(state.sort(), SortOption::Relevance);
        assert!(!state.has_active_filters());
    }

    #[test]
    fn test_every_filter_change_resets_page() {
        let actions = vec![
            FilterAction::Search("cup".into()),
            FilterAction::Search("mug".into()),
            FilterAction::SelectCategory(None),
            FilterAction::ToggleSubcategory(Uuid::new_v4()),
            FilterAction::SetSubcategories(BTreeSet::new()),
            FilterAction::ToggleAttribute(Uuid::new_v4()),
            FilterAction::SetAttributes(BTreeSet::new()),
            FilterAction::SetStatus(Some(PublishStatus::Draft)),
            FilterAction::Sort(SortOption::Newest),
            FilterAction::Clear,
        ];
        for action in actions {
            let next = busy_state().apply(action.clone());
            assert_eq!(next.current_page(), 1, "{action:?} kept the page");
        }
    }

    #[test]
    fn test_go_to_page_keeps_filters() {
        let state = busy_state();
        let next = state.apply(FilterAction::GoToPage(2));
        assert_eq!(next.current_page(), 2);
        assert_eq!(next.search_term(), "mug");
        assert_eq!(state.apply(FilterAction::GoToPage(0)).current_page(), 1);
    }

    #[test]
    fn test_changing_category_drops_deeper_selections() {
        let state = busy_state();
        let same = state.apply(FilterAction::SelectCategory(state.selected_category().copied()));
        assert_eq!(same.selected_subcategories().len(), 1);

        let other = state.apply(FilterAction::SelectCategory(Some(Uuid::new_v4())));
        assert!(other.selected_subcategories().is_empty());
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let id = Uuid::new_v4();
        let on = FilterState::default().apply(FilterAction::ToggleAttribute(id));
        assert!(on.selected_attributes().contains(&id));
        let off = on.apply(FilterAction::ToggleAttribute(id));
        assert!(off.selected_attributes().is_empty());
    }

    #[test]
    fn test_clear_restores_defaults() {
        let cleared = busy_state()
            .apply(FilterAction::Sort(SortOption::PriceDesc))
            .apply(FilterAction::Clear);
        assert_eq!(cleared, FilterState::default());
    }

    #[test]
    fn test_sort_option_parsing() {
        for option in [
            SortOption::Relevance,
            SortOption::PriceAsc,
            SortOption::PriceDesc,
            SortOption::Newest,
        ] {
            assert_eq!(option.as_str().parse::<SortOption>().unwrap(), option);
        }
        assert!("cheapest".parse::<SortOption>().is_err());
        assert_eq!(
            serde_json::to_string(&SortOption::PriceAsc).unwrap(),
            "\"price-asc\""
        );
    }
}
