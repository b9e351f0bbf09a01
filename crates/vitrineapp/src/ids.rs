//! Identifiers.
//!
//! Two concerns live here:
//!
//! - [`RecordId`]: the canonical string form of an identifier read from the
//!   store. Stores may hand back identifiers as strings or as numbers; every
//!   identifier is coerced to one string form so equality is stable no matter
//!   which representation a row used.
//! - [`parse_record_uuid`]: the gate every identifier passes before it is used
//!   in a removal or update call. Only the hyphenated RFC-4122, version-4 form
//!   is accepted; anything else is rejected before any store call is made.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::{Uuid, Variant};

/// Canonical identifier of a store record.
///
/// UUID-shaped input is normalized to lowercase hyphenated form; anything
/// else is kept verbatim (trimmed).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(raw: &str) -> Self {
        let trimmed = raw.trim();
        match Uuid::try_parse(trimmed) {
            Ok(uuid) => Self::from(uuid),
            Err(_) => Self(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The identifier as a UUID, if it is one.
    pub fn as_uuid(&self) -> Option<Uuid> {
        Uuid::try_parse(&self.0).ok()
    }

    /// True when this identifier refers to the given UUID.
    pub fn is(&self, uuid: &Uuid) -> bool {
        self.as_uuid().as_ref() == Some(uuid)
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }
}

impl From<&str> for RecordId {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RecordId::new(&s),
            Raw::Signed(n) => RecordId(n.to_string()),
            Raw::Unsigned(n) => RecordId(n.to_string()),
        })
    }
}

/// Checks that `raw` is a syntactically valid version-4 UUID.
///
/// # Examples
/// ```
/// use vitrineapp::ids::is_uuid_v4;
///
/// assert!(is_uuid_v4("9b2f6c1e-3d4a-4f5b-8c6d-7e8f9a0b1c2d"));
/// assert!(is_uuid_v4("9B2F6C1E-3D4A-4F5B-BC6D-7E8F9A0B1C2D"));
///
/// assert!(!is_uuid_v4("abc"));
/// assert!(!is_uuid_v4("123"));
/// assert!(!is_uuid_v4("9b2f6c1e-3d4a-1f5b-8c6d-7e8f9a0b1c2d")); // version 1
/// assert!(!is_uuid_v4("9b2f6c1e-3d4a-4f5b-cc6d-7e8f9a0b1c2d")); // variant c
/// assert!(!is_uuid_v4("9b2f6c1e3d4a4f5b8c6d7e8f9a0b1c2d")); // no hyphens
/// ```
pub fn is_uuid_v4(raw: &str) -> bool {
    // Uuid::try_parse also takes the simple, braced and urn forms.
    if raw.len() != 36 {
        return false;
    }
    match Uuid::try_parse(raw) {
        Ok(uuid) => uuid.get_version_num() == 4 && uuid.get_variant() == Variant::RFC4122,
        Err(_) => false,
    }
}

/// Parses an identifier at the mutation boundary.
///
/// `kind` names the entity for the error message ("category", "subcategory",
/// "attribute").
pub fn parse_record_uuid(kind: &'static str, raw: &str) -> Result<Uuid> {
    if !is_uuid_v4(raw) {
        return Err(CatalogError::invalid_id(kind, raw));
    }
    Uuid::try_parse(raw).map_err(|_| CatalogError::invalid_id(kind, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "0d8a3c5e-7b1f-4a2e-9c3d-5e6f7a8b9c0d";

    #[test]
    fn test_accepts_each_variant_marker() {
        for marker in ['8', '9', 'a', 'b', 'A', 'B'] {
            let id = format!("0d8a3c5e-7b1f-4a2e-{}c3d-5e6f7a8b9c0d", marker);
            assert!(is_uuid_v4(&id), "variant marker {} rejected", marker);
        }
    }

    #[test]
    fn test_rejects_bad_variant_markers() {
        for marker in ['0', '7', 'c', 'f'] {
            let id = format!("0d8a3c5e-7b1f-4a2e-{}c3d-5e6f7a8b9c0d", marker);
            assert!(!is_uuid_v4(&id), "variant marker {} accepted", marker);
        }
    }

    #[test]
    fn test_rejects_other_versions() {
        assert!(!is_uuid_v4("0d8a3c5e-7b1f-1a2e-9c3d-5e6f7a8b9c0d"));
        assert!(!is_uuid_v4("0d8a3c5e-7b1f-7a2e-9c3d-5e6f7a8b9c0d"));
    }

    #[test]
    fn test_rejects_alternate_uuid_spellings() {
        assert!(!is_uuid_v4(&format!("{{{}}}", VALID)));
        assert!(!is_uuid_v4(&format!("urn:uuid:{}", VALID)));
        assert!(!is_uuid_v4(&VALID.replace('-', "")));
        assert!(!is_uuid_v4(&format!(" {}", VALID)));
    }

    #[test]
    fn test_parse_record_uuid_error_names_kind() {
        let err = parse_record_uuid("attribute", "123").unwrap_err();
        match err {
            CatalogError::InvalidIdentifier { kind, value } => {
                assert_eq!(kind, "attribute");
                assert_eq!(value, "123");
            }
            other => panic!("Expected InvalidIdentifier, got {other:?}"),
        }
        assert!(parse_record_uuid("category", VALID).is_ok());
    }

    #[test]
    fn test_record_id_canonicalizes_uuids() {
        let upper = RecordId::new(&VALID.to_uppercase());
        assert_eq!(upper.as_str(), VALID);
        assert_eq!(upper, RecordId::from(Uuid::try_parse(VALID).unwrap()));
    }

    #[test]
    fn test_record_id_deserializes_numbers_and_strings() {
        let ids: Vec<RecordId> = serde_json::from_str(r#"[42, "42", " abc "]"#).unwrap();
        assert_eq!(ids[0], ids[1]);
        assert_eq!(ids[2].as_str(), "abc");
    }

    #[test]
    fn test_record_id_is_matches_uuid() {
        let uuid = Uuid::new_v4();
        let id = RecordId::new(&uuid.to_string().to_uppercase());
        assert!(id.is(&uuid));
        assert!(!RecordId::new("7").is(&uuid));
    }
}
