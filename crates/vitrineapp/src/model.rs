//! # Domain Model
//!
//! Two shapes of the same catalog live here:
//!
//! - **Rows**: the flat records the store hands back ([`CategoryRow`],
//!   [`SubcategoryRow`], [`AttributeRow`]). Children point at their parent by
//!   id (`category_id`, `subcategory_id`). That back-reference is a lookup
//!   relation only.
//! - **Tree**: the nested shape the rest of the crate works with
//!   ([`Category`] → [`Subcategory`] → [`Attribute`]). A category exclusively
//!   owns its subcategories, a subcategory exclusively owns its attributes.
//!   The tree is assembled from rows by [`crate::taxonomy::assemble_tree`]
//!   and is never patched in place.
//!
//! [`Product`] is consumed, not owned: the core only reads its foreign keys
//! for filtering and counting and never checks that they point at live nodes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ids::RecordId;

// --- Store rows ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRow {
    pub id: RecordId,
    pub name: String,
    /// URL slug
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubcategoryRow {
    pub id: RecordId,
    pub category_id: RecordId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeRow {
    pub id: RecordId,
    pub subcategory_id: RecordId,
    // Older rows carry the label under `name`.
    #[serde(alias = "name")]
    pub value: String,
}

// --- Tree ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub id: RecordId,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Subcategory {
    pub id: RecordId,
    pub name: String,
    /// Free-form classifier ("color", "size", ...).
    #[serde(rename = "type")]
    pub kind: String,
    pub attributes: Vec<Attribute>,
}

impl Subcategory {
    pub fn attribute(&self, id: &RecordId) -> Option<&Attribute> {
        self.attributes.iter().find(|a| &a.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    /// URL slug
    pub value: String,
    pub subcategories: Vec<Subcategory>,
}

impl Category {
    pub fn subcategory(&self, id: &RecordId) -> Option<&Subcategory> {
        self.subcategories.iter().find(|s| &s.id == id)
    }
}

// --- Products ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishStatus {
    Published,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: RecordId,
    pub name: String,
    pub price: Decimal,
    #[serde(default)]
    pub sale_price: Option<Decimal>,
    #[serde(default)]
    pub category_id: Option<RecordId>,
    #[serde(default)]
    pub subcategory_id: Option<RecordId>,
    #[serde(default)]
    pub attribute_id: Option<RecordId>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(name: impl Into<String>, price: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: RecordId::from(uuid::Uuid::new_v4()),
            name: name.into(),
            price,
            sale_price: None,
            category_id: None,
            subcategory_id: None,
            attribute_id: None,
            published: true,
            featured: false,
            stock_quantity: 0,
            images: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn status(&self) -> PublishStatus {
        if self.published {
            PublishStatus::Published
        } else {
            PublishStatus::Draft
        }
    }

    /// The price a shopper pays: the sale price when one is set.
    pub fn effective_price(&self) -> Decimal {
        self.sale_price.unwrap_or(self.price)
    }
}

// --- Counters ---

/// Number of products filed under one taxonomy node.
///
/// Derived on demand and never persisted. Which level `id` refers to is
/// decided by the query that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeCount {
    #[serde(alias = "category_id", alias = "subcategory_id", alias = "attribute_id")]
    pub id: RecordId,
    pub count: u64,
}
