//! Client-side mode: the full product collection is in memory.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use uuid::Uuid;

use super::{pagination, FilterState, Page, SortOption, PAGE_SIZE};
use crate::ids::RecordId;
use crate::model::Product;

/// Whether `product` passes every active filter in `state`.
///
/// The search term is trimmed before the caseless substring test, so
/// surrounding spaces never narrow or widen a match.
pub fn matches(product: &Product, state: &FilterState) -> bool {
    matches_term(product, state, &state.search_term().trim().to_lowercase())
}

fn matches_term(product: &Product, state: &FilterState, term: &str) -> bool {
    if !term.is_empty() && !product.name.to_lowercase().contains(term) {
        return false;
    }
    if let Some(category) = state.selected_category() {
        if !product.category_id.as_ref().is_some_and(|id| id.is(category)) {
            return false;
        }
    }
    if let Some(status) = state.status() {
        if product.status() != status {
            return false;
        }
    }
    in_selection(product.subcategory_id.as_ref(), state.selected_subcategories())
        && in_selection(product.attribute_id.as_ref(), state.selected_attributes())
}

// An empty selection does not narrow.
fn in_selection(id: Option<&RecordId>, selected: &BTreeSet<Uuid>) -> bool {
    selected.is_empty()
        || id
            .and_then(RecordId::as_uuid)
            .is_some_and(|uuid| selected.contains(&uuid))
}

/// Caseless, accent-insensitive key: "Écharpe" sorts with "echarpe".
fn name_key(name: &str) -> impl Iterator<Item = char> + '_ {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
}

fn compare_names(a: &str, b: &str) -> Ordering {
    name_key(a).cmp(name_key(b))
}

/// Stable sort; equal keys keep their incoming order.
pub fn sort_products(products: &mut [&Product], sort: SortOption) {
    match sort {
        SortOption::Relevance => products.sort_by(|a, b| compare_names(&a.name, &b.name)),
        SortOption::PriceAsc => products.sort_by(|a, b| {
            a.effective_price()
                .cmp(&b.effective_price())
                .then_with(|| compare_names(&a.name, &b.name))
        }),
        SortOption::PriceDesc => products.sort_by(|a, b| {
            b.effective_price()
                .cmp(&a.effective_price())
                .then_with(|| compare_names(&a.name, &b.name))
        }),
        SortOption::Newest => products.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
    }
}

/// Filters and sorts without paginating.
pub fn filter_products<'a>(products: &'a [Product], state: &FilterState) -> Vec<&'a Product> {
    let term = state.search_term().trim().to_lowercase();
    let mut matched: Vec<&Product> = products
        .iter()
        .filter(|product| matches_term(product, state, &term))
        .collect();
    sort_products(&mut matched, state.sort());
    matched
}

/// Filters, sorts and slices out the page named by `state`.
///
/// A page past the end of a non-empty result falls back to page 1.
pub fn page<'a>(products: &'a [Product], state: &FilterState) -> Page<&'a Product> {
    let matched = filter_products(products, state);
    let total_count = matched.len();
    let page_count = pagination::page_count(total_count, PAGE_SIZE);

    let mut page = state.current_page();
    if total_count > 0 && page > page_count {
        debug!(requested = page, page_count, "page out of range, showing page 1");
        page = 1;
    }

    let range = pagination::page_bounds(page, PAGE_SIZE, total_count);
    let items = matched
        .into_iter()
        .skip(range.start)
        .take(range.len())
        .collect();

    Page {
        items,
        page,
        page_count,
        total_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterAction;
    use crate::model::PublishStatus;
    use chrono::{Duration, Utc};
    use rust_decimal::Decimal;

    fn product(name: &str, cents: i64) -> Product {
        Product::new(name, Decimal::new(cents, 2))
    }

    fn names(items: &[&Product]) -> Vec<String> {
        items.iter().map(|p| p.name.clone()).collect()
    }

    fn numbered(count: usize) -> Vec<Product> {
        (1..=count)
            .map(|i| product(&format!("Product {:02}", i), 100))
            .collect()
    }

    #[test]
    fn test_search_is_caseless_substring() {
        let products = vec![product("Blue Mug", 900), product("Red Shirt", 1500)];
        let state = FilterState::default().apply(FilterAction::Search("  mUG ".into()));
        assert_eq!(names(&filter_products(&products, &state)), vec!["Blue Mug"]);
    }

    #[test]
    fn test_search_ignores_surrounding_spaces() {
        let products = vec![product("Mugshot Poster", 900), product("Blue Mug", 900)];
        let padded = FilterState::default().apply(FilterAction::Search(" mug".into()));
        let bare = FilterState::default().apply(FilterAction::Search("mug".into()));
        assert_eq!(
            names(&filter_products(&products, &padded)),
            names(&filter_products(&products, &bare))
        );
        assert!(matches(&products[0], &padded));
    }

    #[test]
    fn test_name_sort_folds_accents() {
        let products = vec![
            product("zip hoodie", 100),
            product("Écharpe", 100),
            product("denim", 100),
            product("echarpe", 100),
        ];
        let sorted = filter_products(&products, &FilterState::default());
        assert_eq!(
            names(&sorted),
            vec!["denim", "Écharpe", "echarpe", "zip hoodie"]
        );
    }

    #[test]
    fn test_category_and_deeper_selections() {
        let shirts = Uuid::new_v4();
        let colour = Uuid::new_v4();
        let red = Uuid::new_v4();

        let mut red_shirt = product("Red Shirt", 1500);
        red_shirt.category_id = Some(shirts.into());
        red_shirt.subcategory_id = Some(colour.into());
        red_shirt.attribute_id = Some(red.into());
        let mut plain_shirt = product("Plain Shirt", 1200);
        plain_shirt.category_id = Some(shirts.into());
        let mug = product("Mug", 900);
        let products = vec![red_shirt, plain_shirt, mug];

        let by_category = FilterState::default().apply(FilterAction::SelectCategory(Some(shirts)));
        assert_eq!(
            names(&filter_products(&products, &by_category)),
            vec!["Plain Shirt", "Red Shirt"]
        );

        let by_attribute = by_category.apply(FilterAction::ToggleAttribute(red));
        assert_eq!(
            names(&filter_products(&products, &by_attribute)),
            vec!["Red Shirt"]
        );
    }

    #[test]
    fn test_status_filter() {
        let mut draft = product("Draft Mug", 900);
        draft.published = false;
        let products = vec![draft, product("Live Mug", 900)];
        let state = FilterState::default().apply(FilterAction::SetStatus(Some(PublishStatus::Draft)));
        assert_eq!(names(&filter_products(&products, &state)), vec!["Draft Mug"]);
    }

    #[test]
    fn test_price_sorts_use_sale_price_and_break_ties_by_name() {
        let mut discounted = product("Zebra", 2000);
        discounted.sale_price = Some(Decimal::new(500, 2));
        let products = vec![product("beta", 1000), discounted, product("Alpha", 1000)];

        let asc = FilterState::default().apply(FilterAction::Sort(SortOption::PriceAsc));
        assert_eq!(
            names(&filter_products(&products, &asc)),
            vec!["Zebra", "Alpha", "beta"]
        );

        let desc = FilterState::default().apply(FilterAction::Sort(SortOption::PriceDesc));
        assert_eq!(
            names(&filter_products(&products, &desc)),
            vec!["Alpha", "beta", "Zebra"]
        );
    }

    #[test]
    fn test_newest_first() {
        let mut old = product("Old", 100);
        old.created_at = Utc::now() - Duration::days(3);
        let products = vec![old, product("New", 100)];
        let state = FilterState::default().apply(FilterAction::Sort(SortOption::Newest));
        assert_eq!(names(&filter_products(&products, &state)), vec!["New", "Old"]);
    }

    #[test]
    fn test_forty_five_products_make_three_pages() {
        let products = numbered(45);
        let state = FilterState::default().apply(FilterAction::GoToPage(3));
        let page = page(&products, &state);
        assert_eq!(page.page_count, 3);
        assert_eq!(page.total_count, 45);
        assert_eq!(page.page, 3);
        assert_eq!(page.items.len(), 5);
        assert_eq!(page.items[0].name, "Product 41");
    }

    #[test]
    fn test_out_of_range_page_falls_back_to_first() {
        let products = numbered(5);
        let state = FilterState::default().apply(FilterAction::GoToPage(9));
        let page = page(&products, &state);
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 5);
    }

    #[test]
    fn test_no_results_is_an_empty_page() {
        let products = numbered(5);
        let state = FilterState::default().apply(FilterAction::Search("nothing".into()));
        let page = page(&products, &state);
        assert!(page.is_empty());
        assert_eq!(page.page_count, 0);
        assert!(page.items.is_empty());
    }

    #[test]
    fn test_filtering_is_idempotent() {
        let products = numbered(30);
        let state = FilterState::default().apply(FilterAction::Search("1".into()));
        let once: Vec<Product> = filter_products(&products, &state)
            .into_iter()
            .cloned()
            .collect();
        let twice = filter_products(&once, &state);
        assert_eq!(names(&twice), once.iter().map(|p| p.name.clone()).collect::<Vec<_>>());
    }
}
