//! Meta tag resolution errors.

use seo_catalog::{CatalogError, EntityType};

/// Reason a template could not be applied.
///
/// Logged at the template loop and never returned to callers.
#[derive(Debug, thiserror::Error)]
pub enum MetaError {
    /// The template targets another kind of entity.
    #[error("template {template_id} targets {expected} entities, got {actual}")]
    EntityMismatch {
        template_id: u64,
        expected: EntityType,
        actual: EntityType,
    },
    /// The template store could not be queried.
    #[error("template store failed: {0}")]
    Store(#[from] CatalogError),
}
