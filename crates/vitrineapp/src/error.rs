use crate::ops::Operation;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid {kind} identifier: '{value}'")]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Store error: {0}")]
    Store(String),

    #[error("{0} already in progress")]
    InProgress(Operation),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CatalogError {
    pub fn invalid_id(kind: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            kind,
            value: value.into(),
        }
    }

    pub fn not_found(kind: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    /// True when the failure came from the external store rather than
    /// from local validation.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            CatalogError::Store(_) | CatalogError::Io(_) | CatalogError::Serialization(_)
        )
    }

    /// Stable, machine-readable name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            CatalogError::Validation(_) => "validation",
            CatalogError::InvalidIdentifier { .. } => "invalid_identifier",
            CatalogError::Duplicate(_) => "duplicate",
            CatalogError::NotFound { .. } => "not_found",
            CatalogError::InProgress(_) => "in_progress",
            CatalogError::Config(_) => "config",
            CatalogError::Store(_) | CatalogError::Io(_) | CatalogError::Serialization(_) => {
                "store"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
