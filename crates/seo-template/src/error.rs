//! Template engine error type.

use seo_catalog::CatalogError;

/// Error raised while resolving a single template property.
///
/// Never escapes [`crate::VariableProcessor::process`]: the failing property
/// resolves to an empty string and the error is logged.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// A related entity could not be loaded.
    #[error("entity lookup failed: {0}")]
    Catalog(#[from] CatalogError),
    /// No processor exists for the requested entity type.
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),
}
