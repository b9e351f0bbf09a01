//! Selection normalization.
//!
//! Callers hand over subcategory and attribute selections either as bare
//! identifier strings or as records that carry an `id`. Both shapes collapse
//! to one canonical `BTreeSet<Uuid>` before the filter state sees them.

use serde::Deserialize;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::error::Result;
use crate::ids::parse_record_uuid;
use crate::model::{Attribute, Subcategory};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Selection {
    Id(String),
    Record { id: String },
}

impl Selection {
    pub fn raw_id(&self) -> &str {
        match self {
            Selection::Id(id) | Selection::Record { id } => id,
        }
    }
}

impl From<&str> for Selection {
    fn from(raw: &str) -> Self {
        Selection::Id(raw.to_string())
    }
}

impl From<String> for Selection {
    fn from(raw: String) -> Self {
        Selection::Id(raw)
    }
}

impl From<Uuid> for Selection {
    fn from(id: Uuid) -> Self {
        Selection::Id(id.to_string())
    }
}

impl From<&Subcategory> for Selection {
    fn from(subcategory: &Subcategory) -> Self {
        Selection::Record {
            id: subcategory.id.to_string(),
        }
    }
}

impl From<&Attribute> for Selection {
    fn from(attribute: &Attribute) -> Self {
        Selection::Record {
            id: attribute.id.to_string(),
        }
    }
}

/// Collapses mixed selection input into a set of UUIDs.
///
/// Duplicates fold together. Any entry that is not a version-4 UUID fails the
/// whole selection with `InvalidIdentifier`, naming `kind`.
pub fn normalize_selection<I>(kind: &'static str, inputs: I) -> Result<BTreeSet<Uuid>>
where
    I: IntoIterator,
    I::Item: Into<Selection>,
{
    inputs
        .into_iter()
        .map(|input| parse_record_uuid(kind, input.into().raw_id()))
        .collect()
}
