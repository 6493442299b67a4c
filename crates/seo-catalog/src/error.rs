//! Catalog error type.

use crate::EntityType;

/// Error returned by repositories and the template store.
///
/// Only [`CatalogError::NotFound`] is expected to reach callers; every other
/// variant describes a backend problem that the engine logs and works around.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The requested entity does not exist.
    #[error("{entity_type} with {key} not found")]
    NotFound {
        /// Kind of entity requested.
        entity_type: EntityType,
        /// Lookup key, e.g. `id 42` or `identifier "about-us"`.
        key: String,
    },
    /// Stored data could not be decoded.
    #[error("invalid catalog data: {0}")]
    InvalidData(String),
    /// Backend is temporarily unavailable.
    #[error("catalog backend unavailable: {0}")]
    Unavailable(String),
    /// I/O error while reading fixtures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// JSON decoding error while reading fixtures.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CatalogError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(entity_type: EntityType, id: u64) -> Self {
        Self::NotFound {
            entity_type,
            key: format!("id {id}"),
        }
    }

    /// Create a not found error for a lookup by URL identifier.
    #[must_use]
    pub fn identifier_not_found(entity_type: EntityType, identifier: &str) -> Self {
        Self::NotFound {
            entity_type,
            key: format!("identifier {identifier:?}"),
        }
    }

    /// Whether the entity truly does not exist.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
