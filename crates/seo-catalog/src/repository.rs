//! Collaborator interfaces consumed by the SEO engine.

use crate::{Category, CatalogError, CmsPage, EntityType, Product, Template, TemplateType};

/// Source of meta tag templates.
pub trait TemplateStore: Send + Sync {
    /// Active templates of `template_type` for `entity_type`, visible in
    /// `store_id` (templates bound to store 0 apply to every store).
    ///
    /// Implementations must return the list ordered by priority, highest
    /// first. The Meta Tag Manager relies on that order and does not sort.
    fn get_by_type_and_entity_type(
        &self,
        template_type: TemplateType,
        entity_type: EntityType,
        store_id: u32,
    ) -> Result<Vec<Template>, CatalogError>;
}

/// Product lookup.
pub trait ProductRepository: Send + Sync {
    /// Load a product by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no such product exists.
    fn get_by_id(&self, id: u64) -> Result<Product, CatalogError>;
}

/// Category lookup.
pub trait CategoryRepository: Send + Sync {
    /// Load a category by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no such category exists.
    fn get_by_id(&self, id: u64) -> Result<Category, CatalogError>;
}

/// CMS page lookup.
pub trait CmsPageRepository: Send + Sync {
    /// Load a CMS page by id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] if no such page exists.
    fn get_by_id(&self, id: u64) -> Result<CmsPage, CatalogError>;
}
