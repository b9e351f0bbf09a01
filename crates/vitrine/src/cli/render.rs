//! # Rendering
//!
//! Plain string builders for the terminal, plus the notifier that prints
//! library notices as they happen.
//!
//! Styling goes through a handful of semantic helpers (`id`, `muted`,
//! `count`, ...) so the rest of the module never picks colors itself.
//! `console` drops the escape codes when stdout is not a terminal.

use console::{style, StyledObject};
use std::fmt::Write;
use vitrineapp::api::CatalogOverview;
use vitrineapp::commands::counters::count_for;
use vitrineapp::commands::{Notice, NoticeLevel, Notifier};
use vitrineapp::filter::{FilterState, Page, PageItem};
use vitrineapp::ids::RecordId;
use vitrineapp::model::{Product, PublishStatus};

pub const EMPTY_CATALOG: &str = "No categories yet. Add one with `vitrine category add`.";
pub const NO_PRODUCTS: &str = "No products yet.";
pub const NO_MATCHES: &str = "No products match these filters. Drop some to widen the search.";

// --- Semantic styles ---

fn name(text: &str) -> StyledObject<&str> {
    style(text).bold()
}

fn id(record: &RecordId) -> StyledObject<String> {
    style(record.to_string()).dim()
}

fn muted<T>(value: T) -> StyledObject<T> {
    style(value).dim()
}

fn count(n: u64) -> StyledObject<String> {
    style(format!("({})", n)).cyan()
}

fn current<T>(value: T) -> StyledObject<T> {
    style(value).black().on_yellow()
}

// --- Notices ---

/// Prints notices as they are raised: success and info on stdout, warnings
/// and errors on stderr.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        let line = render_notice(&notice);
        match notice.level {
            NoticeLevel::Info | NoticeLevel::Success => println!("{}", line),
            NoticeLevel::Warning | NoticeLevel::Error => eprintln!("{}", line),
        }
    }
}

pub fn render_notice(notice: &Notice) -> String {
    let marker = match notice.level {
        NoticeLevel::Info => style("•").blue(),
        NoticeLevel::Success => style("✓").green(),
        NoticeLevel::Warning => style("!").yellow(),
        NoticeLevel::Error => style("✗").red(),
    };
    format!("{} {}", marker, notice.content)
}

// --- Taxonomy ---

pub fn render_tree(overview: &CatalogOverview) -> String {
    if overview.tree.is_empty() {
        return format!("{}\n", muted(EMPTY_CATALOG));
    }

    let mut out = String::new();
    for category in &overview.tree {
        let _ = writeln!(
            out,
            "{} {} {}  {}",
            name(&category.name),
            muted(format!("/{}", category.value)),
            count(count_for(&overview.category_counts, &category.id)),
            id(&category.id),
        );
        let sub_counts = overview
            .subcategory_counts
            .get(&category.id)
            .map(Vec::as_slice)
            .unwrap_or_default();
        for subcategory in &category.subcategories {
            let _ = writeln!(
                out,
                "  {} {} {}  {}",
                subcategory.name,
                muted(format!("[{}]", subcategory.kind)),
                count(count_for(sub_counts, &subcategory.id)),
                id(&subcategory.id),
            );
            let attr_counts = overview
                .attribute_counts
                .get(&subcategory.id)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for attribute in &subcategory.attributes {
                let _ = writeln!(
                    out,
                    "    - {} {}  {}",
                    attribute.name,
                    count(count_for(attr_counts, &attribute.id)),
                    id(&attribute.id),
                );
            }
        }
    }
    out
}

// --- Products ---

pub fn render_products(page: &Page<Product>, state: &FilterState) -> String {
    if page.is_empty() {
        let hint = if state.has_active_filters() {
            NO_MATCHES
        } else {
            NO_PRODUCTS
        };
        return format!("{}\n", muted(hint));
    }

    let mut out = String::new();
    for product in &page.items {
        let _ = writeln!(out, "{}", render_product_line(product));
    }
    let total = muted(format!("{} products", page.total_count));
    let widget = render_page_widget(page);
    if widget.is_empty() {
        let _ = writeln!(out, "\n{}", total);
    } else {
        let _ = writeln!(out, "\n{}  {}", widget, total);
    }
    out
}

fn render_product_line(product: &Product) -> String {
    let price = match product.sale_price {
        Some(sale) => format!("{} {}", style(sale).green(), muted(product.price)),
        None => product.price.to_string(),
    };
    let status = match product.status() {
        PublishStatus::Published => String::new(),
        PublishStatus::Draft => format!(" {}", style("draft").yellow()),
    };
    format!("{}  {}{}  {}", name(&product.name), price, status, id(&product.id))
}

/// `1 … 4 [5] 6 … 12`; nothing when there is a single page.
pub fn render_page_widget<T>(page: &Page<T>) -> String {
    if page.page_count <= 1 {
        return String::new();
    }
    page.numbers()
        .into_iter()
        .map(|item| match item {
            PageItem::Page(n) if n == page.page => current(format!("[{}]", n)).to_string(),
            PageItem::Page(n) => n.to_string(),
            PageItem::Ellipsis => muted("…").to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use vitrineapp::filter::FilterAction;
    use vitrineapp::model::{Attribute, Category, NodeCount, Subcategory};

    const CATEGORY_ID: &str = "0d8a3c5e-7b1f-4a2e-9c3d-5e6f7a8b9c0d";
    const SUBCATEGORY_ID: &str = "1e9b4d6f-8c2a-4b3f-8d4e-6f7a8b9c0d1e";

    fn plain() {
        console::set_colors_enabled(false);
    }

    fn page_of(count: usize, current: usize, page_count: usize) -> Page<Product> {
        Page {
            items: (0..count)
                .map(|i| Product::new(format!("Tee {}", i), Decimal::new(1999, 2)))
                .collect(),
            page: current,
            page_count,
            total_count: count,
        }
    }

    #[test]
    fn test_tree_shows_names_counts_and_ids() {
        plain();
        let category_id = RecordId::new(CATEGORY_ID);
        let subcategory_id = RecordId::new(SUBCATEGORY_ID);
        let overview = CatalogOverview {
            tree: vec![Category {
                id: category_id.clone(),
                name: "Shirts".into(),
                value: "shirts".into(),
                subcategories: vec![Subcategory {
                    id: subcategory_id.clone(),
                    name: "Colour".into(),
                    kind: "color".into(),
                    attributes: vec![Attribute {
                        id: RecordId::new("7"),
                        name: "Red".into(),
                    }],
                }],
            }],
            category_counts: vec![NodeCount {
                id: category_id.clone(),
                count: 4,
            }],
            subcategory_counts: [(
                category_id,
                vec![NodeCount {
                    id: subcategory_id,
                    count: 3,
                }],
            )]
            .into_iter()
            .collect(),
            attribute_counts: Default::default(),
        };

        let out = render_tree(&overview);

        assert!(out.contains("Shirts /shirts (4)"));
        assert!(out.contains(CATEGORY_ID));
        assert!(out.contains("  Colour [color] (3)"));
        assert!(out.contains("    - Red (0)"));
    }

    #[test]
    fn test_empty_tree_hint() {
        plain();
        let out = render_tree(&CatalogOverview::default());
        assert_eq!(out.trim(), EMPTY_CATALOG);
    }

    #[test]
    fn test_no_results_hint_depends_on_filters() {
        plain();
        let empty = Page::<Product>::default();

        let idle = render_products(&empty, &FilterState::default());
        let searching = render_products(
            &empty,
            &FilterState::default().apply(FilterAction::Search("tee".into())),
        );

        assert_eq!(idle.trim(), NO_PRODUCTS);
        assert_eq!(searching.trim(), NO_MATCHES);
    }

    #[test]
    fn test_page_widget_marks_current_page() {
        plain();
        let page = page_of(1, 5, 12);
        assert_eq!(render_page_widget(&page), "1 … 4 [5] 6 … 12");
    }

    #[test]
    fn test_single_page_has_no_widget() {
        plain();
        let out = render_products(&page_of(2, 1, 1), &FilterState::default());
        assert!(out.contains("Tee 0  19.99"));
        assert!(out.contains("2 products"));
        assert!(!out.contains('['));
    }

    #[test]
    fn test_sale_price_and_draft_marker() {
        plain();
        let mut product = Product::new("Mug", Decimal::new(1200, 2));
        product.sale_price = Some(Decimal::new(900, 2));
        product.published = false;

        let line = render_product_line(&product);

        assert!(line.starts_with("Mug  9.00 12.00 draft"));
    }

    #[test]
    fn test_notice_markers() {
        plain();
        assert_eq!(render_notice(&Notice::success("Category added")), "✓ Category added");
        assert_eq!(render_notice(&Notice::error("Boom")), "✗ Boom");
    }
}
