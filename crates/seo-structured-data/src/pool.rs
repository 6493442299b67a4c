//! Registry that runs every applicable generator for an entity.

use std::sync::OnceLock;

use seo_catalog::Entity;

use crate::context::GeneratorContext;
use crate::generator::{GenerationContext, Generator, GeneratorExt, StructuredData};
use crate::generators::{
    BreadcrumbGenerator, CollectionPageGenerator, OrganizationGenerator, ProductGenerator,
    WebPageGenerator, WebSiteGenerator,
};

type Factory = Box<dyn Fn(GeneratorContext) -> Box<dyn Generator> + Send + Sync>;

struct Entry {
    name: String,
    factory: Factory,
    instance: OnceLock<Box<dyn Generator>>,
}

/// Ordered set of named generators, built on first use.
///
/// Registering only stores a factory. Each generator is constructed the
/// first time the pool needs it and reused afterwards.
pub struct GeneratorPool {
    ctx: GeneratorContext,
    entries: Vec<Entry>,
}

impl GeneratorPool {
    /// An empty pool.
    #[must_use]
    pub fn new(ctx: GeneratorContext) -> Self {
        Self {
            ctx,
            entries: Vec::new(),
        }
    }

    /// A pool with every built-in generator.
    ///
    /// Order: organization, website, webpage, collection page, product,
    /// breadcrumbs.
    #[must_use]
    pub fn with_defaults(ctx: GeneratorContext) -> Self {
        let mut pool = Self::new(ctx);
        pool.register("organization", |ctx| Box::new(OrganizationGenerator::new(ctx)))
            .register("website", |ctx| Box::new(WebSiteGenerator::new(ctx)))
            .register("webpage", |ctx| Box::new(WebPageGenerator::new(ctx)))
            .register("collection_page", |ctx| {
                Box::new(CollectionPageGenerator::new(ctx))
            })
            .register("product", |ctx| Box::new(ProductGenerator::new(ctx)))
            .register("breadcrumb", |ctx| Box::new(BreadcrumbGenerator::new(ctx)));
        pool
    }

    /// Register a generator factory under `name`.
    ///
    /// Re-registering a name replaces the earlier entry in place.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        F: Fn(GeneratorContext) -> Box<dyn Generator> + Send + Sync + 'static,
    {
        let entry = Entry {
            name: name.into(),
            factory: Box::new(factory),
            instance: OnceLock::new(),
        };
        match self.entries.iter_mut().find(|e| e.name == entry.name) {
            Some(existing) => *existing = entry,
            None => self.entries.push(entry),
        }
        self
    }

    /// Registered names, in run order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// The generator registered as `name`, constructing it if needed.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|entry| self.instance(entry))
    }

    /// Number of generators constructed so far.
    #[must_use]
    pub fn instantiated(&self) -> usize {
        self.entries.iter().filter(|e| e.instance.get().is_some()).count()
    }

    /// Run every generator that handles `entity` and is enabled for the
    /// context's store, keeping the non-empty documents in run order.
    pub fn generate(&self, entity: &Entity, context: &GenerationContext) -> Vec<StructuredData> {
        let store_id = self.ctx.store().id;
        let mut documents = Vec::new();
        for entry in &self.entries {
            let generator = self.instance(entry);
            if !generator.can_handle(entity) || !generator.is_enabled(store_id) {
                continue;
            }
            let data = generator.generate(entity, context);
            if data.is_empty() {
                tracing::debug!(generator = %entry.name, "Generator produced no data");
            } else {
                documents.push(data);
            }
        }
        documents
    }

    fn instance<'a>(&self, entry: &'a Entry) -> &'a dyn Generator {
        entry
            .instance
            .get_or_init(|| (entry.factory)(self.ctx.clone()))
            .as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use static_assertions::assert_impl_all;

    use seo_catalog::{Category, CmsPage, Product};

    use crate::context::SchemaSettings;
    use crate::generators::test_context;

    assert_impl_all!(GeneratorPool: Send, Sync);

    fn product() -> Entity {
        Entity::from(Product {
            id: 1,
            name: "Duffle".to_owned(),
            url_key: Some("duffle".to_owned()),
            price: Some(10.0),
            ..Product::default()
        })
    }

    fn types(documents: &[StructuredData]) -> Vec<&str> {
        documents
            .iter()
            .map(|d| d["@type"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn test_generators_are_built_lazily() {
        let pool = GeneratorPool::with_defaults(test_context());
        assert_eq!(pool.instantiated(), 0);

        assert_eq!(pool.get("product").unwrap().schema_type(), "Product");
        assert_eq!(pool.instantiated(), 1);
        assert!(pool.get("missing").is_none());

        pool.generate(&product(), &GenerationContext::new());
        assert_eq!(pool.instantiated(), 6);
    }

    #[test]
    fn test_product_documents_in_order() {
        let pool = GeneratorPool::with_defaults(test_context());
        let documents = pool.generate(&product(), &GenerationContext::new());
        assert_eq!(types(&documents), vec!["Product", "BreadcrumbList"]);
        assert_eq!(documents[1]["itemListElement"][1]["name"], json!("Duffle"));
    }

    #[test]
    fn test_home_page_documents() {
        let pool = GeneratorPool::with_defaults(test_context());
        let home = Entity::from(CmsPage {
            id: 2,
            identifier: "home".to_owned(),
            title: "Home".to_owned(),
            ..CmsPage::default()
        });
        // No organization configured: it contributes nothing
        let documents = pool.generate(&home, &GenerationContext::new());
        assert_eq!(types(&documents), vec!["WebSite", "WebPage"]);
    }

    #[test]
    fn test_failing_and_disabled_generators_are_skipped() {
        let ctx = test_context().with_settings(SchemaSettings {
            disabled: vec!["CollectionPage".to_owned()],
            ..SchemaSettings::default()
        });
        let pool = GeneratorPool::with_defaults(ctx);
        // Collection page is switched off, breadcrumbs still render
        let category = Entity::from(Category {
            id: 4,
            name: "Bags".to_owned(),
            level: 2,
            url_key: Some("bags".to_owned()),
            ..Category::default()
        });
        assert_eq!(
            types(&pool.generate(&category, &GenerationContext::new())),
            vec!["BreadcrumbList"]
        );

        let nameless = Entity::from(Product {
            id: 9,
            ..Product::default()
        });
        assert_eq!(
            types(&pool.generate(&nameless, &GenerationContext::new())),
            vec!["BreadcrumbList"]
        );
    }

    #[test]
    fn test_register_replaces_by_name() {
        let mut pool = GeneratorPool::with_defaults(test_context());
        pool.register("product", |ctx| Box::new(WebPageGenerator::new(ctx)));
        assert_eq!(pool.names().count(), 6);
        assert_eq!(pool.get("product").unwrap().schema_type(), "WebPage");
    }
}
