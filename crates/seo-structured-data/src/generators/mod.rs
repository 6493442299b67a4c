//! Built-in schema.org generators.

mod breadcrumb;
mod collection;
mod organization;
mod product;
mod webpage;
mod website;

pub use breadcrumb::BreadcrumbGenerator;
pub use collection::CollectionPageGenerator;
pub use organization::OrganizationGenerator;
pub use product::ProductGenerator;
pub use webpage::WebPageGenerator;
pub use website::WebSiteGenerator;

use seo_catalog::Entity;

/// Identifier of the CMS page served at the store root.
const HOME_IDENTIFIER: &str = "home";

fn is_home_page(entity: &Entity) -> bool {
    entity.as_cms_page().is_some_and(|p| p.identifier == HOME_IDENTIFIER)
}

#[cfg(test)]
pub(crate) fn test_context() -> crate::GeneratorContext {
    test_context_with(seo_catalog::MemoryCatalog::new())
}

#[cfg(test)]
pub(crate) fn test_context_with(catalog: seo_catalog::MemoryCatalog) -> crate::GeneratorContext {
    use std::sync::Arc;

    use seo_catalog::{StoreContext, WebsiteContext};
    use seo_template::ProcessorContext;

    let processors = ProcessorContext::new(
        StoreContext::default(),
        WebsiteContext::default(),
        Arc::new(catalog),
    );
    crate::GeneratorContext::new(processors)
}
