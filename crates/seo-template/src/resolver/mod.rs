//! Entity-specific variable resolution.
//!
//! One resolver exists per entity kind. Each one owns a fixed property table
//! for its prefixes and falls back to the entity's custom attributes and data
//! bag for anything not in the table.

mod category;
mod cms;
mod product;

use seo_catalog::{Entity, EntityType};

use crate::{ProcessorContext, RequestScope, TemplateError};
use crate::value::{to_text, traverse};

pub use category::{CategoryResolver, category_url};
pub use cms::{CmsPageResolver, page_url};
pub use product::{ProductResolver, media_url, product_url};

/// Resolves `prefix.property` paths against one kind of entity.
pub trait EntityResolver: Send + Sync {
    /// Entity kind this resolver serves.
    fn entity_type(&self) -> EntityType;

    /// Whether the resolver can serve `entity`.
    fn can_process(&self, entity: &Entity) -> bool {
        entity.entity_type() == self.entity_type()
    }

    /// Whether `prefix` (the first path segment) belongs to this resolver.
    fn is_entity_prefix(&self, prefix: &str) -> bool;

    /// Resolve a full path such as `["product", "name"]`.
    ///
    /// Returns `Ok(None)` when the property is unknown or empty-valued.
    ///
    /// # Errors
    ///
    /// Returns an error when a related entity lookup fails. The caller
    /// degrades that property to an empty string.
    fn entity_value(
        &self,
        ctx: &ProcessorContext,
        scope: &mut RequestScope,
        entity: &Entity,
        segments: &[&str],
    ) -> Result<Option<String>, TemplateError>;

    /// Variables this resolver understands, as `(variable, label)` pairs.
    fn entity_variables(&self) -> &'static [(&'static str, &'static str)];
}

/// Resolver for an entity kind.
#[must_use]
pub fn resolver_for(entity_type: EntityType) -> Box<dyn EntityResolver> {
    match entity_type {
        EntityType::Product => Box::new(ProductResolver),
        EntityType::Category => Box::new(CategoryResolver),
        EntityType::CmsPage => Box::new(CmsPageResolver),
    }
}

/// Custom attribute / data bag fallback, descending into `rest`.
fn attribute_fallback(entity: &Entity, property: &str, rest: &[&str]) -> Option<String> {
    let value = entity.attribute(property)?;
    traverse(&value, rest).map(to_text)
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn opt_text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_owned()
}

fn flag(value: bool) -> String {
    String::from(if value { "1" } else { "0" })
}
