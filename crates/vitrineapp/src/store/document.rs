use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ProductPage;
use crate::error::{CatalogError, Result};
use crate::filter::{client, pagination, QueryDescriptor};
use crate::ids::RecordId;
use crate::model::{AttributeRow, CategoryRow, NodeCount, Product, SubcategoryRow};

/// The whole catalog as the store sees it: four flat row sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    #[serde(default)]
    pub categories: Vec<CategoryRow>,
    #[serde(default)]
    pub subcategories: Vec<SubcategoryRow>,
    #[serde(default)]
    pub attributes: Vec<AttributeRow>,
    #[serde(default)]
    pub products: Vec<Product>,
}

impl CatalogDocument {
    pub fn insert_category(&mut self, name: &str, value: &str) -> CategoryRow {
        let row = CategoryRow {
            id: RecordId::from(Uuid::new_v4()),
            name: name.to_string(),
            value: value.to_string(),
        };
        self.categories.push(row.clone());
        row
    }

    /// Removes the category, its subcategories and their attributes.
    /// Returns how many subcategories went with it.
    pub fn remove_category(&mut self, id: Uuid) -> Result<usize> {
        let before = self.categories.len();
        self.categories.retain(|c| !c.id.is(&id));
        if self.categories.len() == before {
            return Err(CatalogError::not_found("Category", id));
        }

        let owned: Vec<RecordId> = self
            .subcategories
            .iter()
            .filter(|s| s.category_id.is(&id))
            .map(|s| s.id.clone())
            .collect();
        self.subcategories.retain(|s| !s.category_id.is(&id));
        self.attributes
            .retain(|a| !owned.contains(&a.subcategory_id));
        Ok(owned.len())
    }

    pub fn insert_subcategory(
        &mut self,
        category_id: Uuid,
        name: &str,
        kind: &str,
    ) -> Result<SubcategoryRow> {
        if !self.categories.iter().any(|c| c.id.is(&category_id)) {
            return Err(CatalogError::not_found("Category", category_id));
        }
        let row = SubcategoryRow {
            id: RecordId::from(Uuid::new_v4()),
            category_id: RecordId::from(category_id),
            name: name.to_string(),
            kind: kind.to_string(),
        };
        self.subcategories.push(row.clone());
        Ok(row)
    }

    pub fn remove_subcategory(&mut self, id: Uuid) -> Result<()> {
        let before = self.subcategories.len();
        self.subcategories.retain(|s| !s.id.is(&id));
        if self.subcategories.len() == before {
            return Err(CatalogError::not_found("Subcategory", id));
        }
        self.attributes.retain(|a| !a.subcategory_id.is(&id));
        Ok(())
    }

    pub fn insert_attribute(
        &mut self,
        subcategory_id: Uuid,
        value: &str,
        category_id: Uuid,
    ) -> Result<AttributeRow> {
        self.owned_subcategory(subcategory_id, category_id)?;
        let row = AttributeRow {
            id: RecordId::from(Uuid::new_v4()),
            subcategory_id: RecordId::from(subcategory_id),
            value: value.to_string(),
        };
        self.attributes.push(row.clone());
        Ok(row)
    }

    pub fn remove_attribute(
        &mut self,
        subcategory_id: Uuid,
        attribute_id: Uuid,
        category_id: Uuid,
    ) -> Result<()> {
        self.owned_subcategory(subcategory_id, category_id)?;
        let before = self.attributes.len();
        self.attributes
            .retain(|a| !(a.id.is(&attribute_id) && a.subcategory_id.is(&subcategory_id)));
        if self.attributes.len() == before {
            return Err(CatalogError::not_found("Attribute", attribute_id));
        }
        Ok(())
    }

    pub fn rename_attribute(
        &mut self,
        subcategory_id: Uuid,
        attribute_id: Uuid,
        value: &str,
    ) -> Result<()> {
        let attribute = self
            .attributes
            .iter_mut()
            .find(|a| a.id.is(&attribute_id) && a.subcategory_id.is(&subcategory_id))
            .ok_or_else(|| CatalogError::not_found("Attribute", attribute_id))?;
        attribute.value = value.to_string();
        Ok(())
    }

    fn owned_subcategory(&self, subcategory_id: Uuid, category_id: Uuid) -> Result<()> {
        let owned = self
            .subcategories
            .iter()
            .any(|s| s.id.is(&subcategory_id) && s.category_id.is(&category_id));
        if owned {
            Ok(())
        } else {
            Err(CatalogError::not_found("Subcategory", subcategory_id))
        }
    }

    // --- Product reads ---

    pub fn count_by_category(&self) -> Vec<NodeCount> {
        count_by(self.products.iter(), |p| p.category_id.as_ref())
    }

    pub fn count_by_subcategory(&self, category_id: Uuid) -> Vec<NodeCount> {
        count_by(
            self.products
                .iter()
                .filter(|p| p.category_id.as_ref().is_some_and(|c| c.is(&category_id))),
            |p| p.subcategory_id.as_ref(),
        )
    }

    pub fn count_by_attribute(&self, subcategory_id: Uuid) -> Vec<NodeCount> {
        count_by(
            self.products.iter().filter(|p| {
                p.subcategory_id
                    .as_ref()
                    .is_some_and(|s| s.is(&subcategory_id))
            }),
            |p| p.attribute_id.as_ref(),
        )
    }

    pub fn query(&self, descriptor: &QueryDescriptor) -> ProductPage {
        let state = descriptor.to_state();
        let matched = client::filter_products(&self.products, &state);
        let range = pagination::page_bounds(descriptor.page, descriptor.page_size, matched.len());
        ProductPage {
            total_count: matched.len(),
            items: matched[range].iter().map(|p| (*p).clone()).collect(),
        }
    }
}

/// Groups by the key `key_of` extracts, in first-seen order. Products
/// without a key are not counted.
fn count_by<'a, I, F>(products: I, key_of: F) -> Vec<NodeCount>
where
    I: Iterator<Item = &'a Product>,
    F: Fn(&'a Product) -> Option<&'a RecordId>,
{
    let mut counts: Vec<NodeCount> = Vec::new();
    for id in products.filter_map(key_of) {
        match counts.iter_mut().find(|c| &c.id == id) {
            Some(existing) => existing.count += 1,
            None => counts.push(NodeCount {
                id: id.clone(),
                count: 1,
            }),
        }
    }
    counts
}
