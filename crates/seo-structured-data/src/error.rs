//! Generator error type.

use seo_catalog::CatalogError;

/// Failure while building structured data for one entity.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    /// The entity lacks a field the schema type cannot do without.
    #[error("{schema_type} requires a non-empty {field}")]
    MissingField {
        schema_type: &'static str,
        field: &'static str,
    },

    /// A related entity could not be loaded.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}
