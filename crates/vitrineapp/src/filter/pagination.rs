//! Page arithmetic and the page-number widget.
//!
//! Below [`FULL_WIDGET_LIMIT`] pages every number is shown. From there on the
//! widget always shows the first and last page plus a window of one page on
//! each side of the current one, with an ellipsis wherever the window does not
//! touch an end:
//!
//! ```text
//! current = 1,  total = 10:   1 2 … 10
//! current = 5,  total = 10:   1 … 4 5 6 … 10
//! current = 10, total = 10:   1 … 9 10
//! ```

use serde::Serialize;
use std::ops::Range;

/// Page counts strictly below this render every page number.
pub const FULL_WIDGET_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "page")]
pub enum PageItem {
    Page(usize),
    Ellipsis,
}

/// `ceil(total / page_size)`; zero when there is nothing to show.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Index range of 1-based `page` within `total` items. Pages past the end
/// yield an empty range.
pub fn page_bounds(page: usize, page_size: usize, total: usize) -> Range<usize> {
    let start = page
        .max(1)
        .saturating_sub(1)
        .saturating_mul(page_size)
        .min(total);
    let end = start.saturating_add(page_size).min(total);
    start..end
}

pub fn page_numbers(current: usize, total: usize) -> Vec<PageItem> {
    if total == 0 {
        return Vec::new();
    }
    if total < FULL_WIDGET_LIMIT {
        return (1..=total).map(PageItem::Page).collect();
    }

    let current = current.clamp(1, total);
    let start = current.saturating_sub(1).max(2);
    let end = (current + 1).min(total - 1);

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::Ellipsis);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total - 1 {
        items.push(PageItem::Ellipsis);
    }
    items.push(PageItem::Page(total));
    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use PageItem::{Ellipsis, Page};

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(0, 20), 0);
        assert_eq!(page_count(1, 20), 1);
        assert_eq!(page_count(20, 20), 1);
        assert_eq!(page_count(45, 20), 3);
    }

    #[test]
    fn test_last_partial_page() {
        assert_eq!(page_bounds(3, 20, 45), 40..45);
        assert_eq!(page_bounds(4, 20, 45), 45..45);
        assert_eq!(page_bounds(0, 20, 45), 0..20);
    }

    #[test]
    fn test_small_totals_show_everything() {
        assert!(page_numbers(1, 0).is_empty());
        assert_eq!(page_numbers(3, 3), vec![Page(1), Page(2), Page(3)]);
        assert_eq!(page_numbers(4, 7).len(), 7);
    }

    #[test]
    fn test_windowed_widget() {
        assert_eq!(
            page_numbers(1, 10),
            vec![Page(1), Page(2), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(5, 10),
            vec![Page(1), Ellipsis, Page(4), Page(5), Page(6), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(3, 10),
            vec![Page(1), Page(2), Page(3), Page(4), Ellipsis, Page(10)]
        );
        assert_eq!(
            page_numbers(10, 10),
            vec![Page(1), Ellipsis, Page(9), Page(10)]
        );
    }

    proptest! {
        #[test]
        fn prop_pages_partition_items(total in 0usize..500, size in 1usize..50) {
            let count = page_count(total, size);
            let mut next = 0;
            for page in 1..=count {
                let range = page_bounds(page, size, total);
                prop_assert_eq!(range.start, next);
                prop_assert!(!range.is_empty());
                prop_assert!(range.len() <= size);
                next = range.end;
            }
            prop_assert_eq!(next, total);
        }

        #[test]
        fn prop_widget_shape(total in 1usize..200, current in 1usize..200) {
            let current = current.min(total);
            let items = page_numbers(current, total);

            prop_assert_eq!(items.first(), Some(&Page(1)));
            prop_assert_eq!(items.last(), Some(&Page(total)));
            prop_assert!(items.contains(&Page(current)));

            let pages: Vec<usize> = items
                .iter()
                .filter_map(|item| match item {
                    Page(n) => Some(*n),
                    Ellipsis => None,
                })
                .collect();
            prop_assert!(pages.windows(2).all(|w| w[0] < w[1]));
            prop_assert!(!items.windows(2).any(|w| w[0] == Ellipsis && w[1] == Ellipsis));

            if total >= FULL_WIDGET_LIMIT {
                prop_assert!(items.len() <= 7);
            } else {
                prop_assert_eq!(pages.len(), total);
            }
        }
    }
}
