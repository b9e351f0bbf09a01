//! # Taxonomy Tree
//!
//! Pure functions that turn the three flat row sets the store returns into
//! the nested Category → Subcategory → Attribute tree, plus lookups over it.
//!
//! ## Assembly
//!
//! ```text
//! subcategory rows ──group_subcategories_by_category──┐
//! attribute rows ────group_attributes_by_subcategory──┼──assemble_tree──> Vec<Category>
//! category rows ──────────────────────────────────────┘
//! ```
//!
//! Grouping is tolerant: a row whose parent id matches nothing simply opens a
//! new bucket, and buckets nobody claims are dropped at assembly. Input order
//! is preserved at every level.
//!
//! ## Lookups
//!
//! Lookups are linear scans. A catalog holds tens of nodes, and the whole
//! tree is rebuilt after every mutation, so no index is maintained.

use std::collections::HashMap;

use crate::ids::RecordId;
use crate::model::{Attribute, AttributeRow, Category, CategoryRow, Subcategory, SubcategoryRow};

pub type SubcategoriesByCategory = HashMap<RecordId, Vec<SubcategoryRow>>;
pub type AttributesBySubcategory = HashMap<RecordId, Vec<Attribute>>;

pub fn group_subcategories_by_category(rows: Vec<SubcategoryRow>) -> SubcategoriesByCategory {
    let mut grouped: SubcategoriesByCategory = HashMap::new();
    for row in rows {
        grouped.entry(row.category_id.clone()).or_default().push(row);
    }
    grouped
}

pub fn group_attributes_by_subcategory(rows: Vec<AttributeRow>) -> AttributesBySubcategory {
    let mut grouped: AttributesBySubcategory = HashMap::new();
    for row in rows {
        grouped.entry(row.subcategory_id).or_default().push(Attribute {
            id: row.id,
            name: row.value,
        });
    }
    grouped
}

pub fn assemble_tree(
    categories: Vec<CategoryRow>,
    mut subcategories: SubcategoriesByCategory,
    mut attributes: AttributesBySubcategory,
) -> Vec<Category> {
    categories
        .into_iter()
        .map(|row| {
            let subcategories = subcategories
                .remove(&row.id)
                .unwrap_or_default()
                .into_iter()
                .map(|sub| Subcategory {
                    attributes: attributes.remove(&sub.id).unwrap_or_default(),
                    id: sub.id,
                    name: sub.name,
                    kind: sub.kind,
                })
                .collect();
            Category {
                id: row.id,
                name: row.name,
                value: row.value,
                subcategories,
            }
        })
        .collect()
}

pub fn find_category_by_id<'a>(tree: &'a [Category], id: &RecordId) -> Option<&'a Category> {
    tree.iter().find(|c| &c.id == id)
}

pub fn find_subcategory_by_id<'a>(
    tree: &'a [Category],
    category_id: &RecordId,
    subcategory_id: &RecordId,
) -> Option<&'a Subcategory> {
    find_category_by_id(tree, category_id)?.subcategory(subcategory_id)
}

/// Finds an attribute by its own id and its subcategory's id, searching all
/// categories (attribute updates do not carry a category id).
pub fn find_attribute_by_id<'a>(
    tree: &'a [Category],
    subcategory_id: &RecordId,
    attribute_id: &RecordId,
) -> Option<&'a Attribute> {
    tree.iter()
        .filter_map(|c| c.subcategory(subcategory_id))
        .find_map(|s| s.attribute(attribute_id))
}

/// Exact, case-sensitive match against the attributes already loaded for the
/// subcategory.
pub fn attribute_name_exists(subcategory: &Subcategory, name: &str) -> bool {
    subcategory.attributes.iter().any(|a| a.name == name)
}

/// Distinct subcategory `type` values, in first-seen order.
pub fn subcategory_types(tree: &[Category]) -> Vec<&str> {
    let mut kinds: Vec<&str> = Vec::new();
    for sub in tree.iter().flat_map(|c| &c.subcategories) {
        if !kinds.contains(&sub.kind.as_str()) {
            kinds.push(&sub.kind);
        }
    }
    kinds
}
