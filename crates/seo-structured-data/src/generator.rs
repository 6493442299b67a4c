//! Generator trait and the shared generation pipeline.

use std::collections::BTreeMap;

use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use seo_cache::CacheExt;
use seo_catalog::Entity;

use crate::context::{GeneratorContext, SCHEMA_CONTEXT, STRUCTURED_DATA_CACHE_TAG};
use crate::error::GenerateError;

/// One schema.org document as an ordered JSON object.
pub type StructuredData = Map<String, Value>;

/// Page-level inputs that change the generated document (for example the
/// browsed `category_id`). Part of the cache key.
pub type GenerationContext = BTreeMap<String, Value>;

/// Builds one schema.org type for the entities it handles.
///
/// Implementors only describe the type-specific body. Caching, `@context`
/// and `@type` handling and error recovery live in
/// [`GeneratorExt::generate`].
pub trait Generator: Send + Sync {
    /// Schema.org type name (`"Product"`).
    fn schema_type(&self) -> &'static str;

    fn context(&self) -> &GeneratorContext;

    /// Whether this generator describes `entity`.
    fn can_handle(&self, entity: &Entity) -> bool;

    /// Whether this generator runs for `store_id`.
    ///
    /// Settings describe the context's store view only, so any other view
    /// reads as switched off.
    fn is_enabled(&self, store_id: u32) -> bool {
        let ctx = self.context();
        store_id == ctx.store().id && ctx.settings().is_enabled(self.schema_type())
    }

    /// Type-specific body. An empty map means "nothing to describe".
    fn build(
        &self,
        entity: &Entity,
        context: &GenerationContext,
    ) -> Result<StructuredData, GenerateError>;
}

/// The generation pipeline, available on every [`Generator`].
pub trait GeneratorExt: Generator {
    /// Generate the document for `entity`, served from cache when possible.
    ///
    /// Returns an empty map when the entity is not handled, when there is
    /// nothing to describe or when building fails (the failure is logged).
    fn generate(&self, entity: &Entity, context: &GenerationContext) -> StructuredData {
        if !self.can_handle(entity) {
            return StructuredData::new();
        }

        let ctx = self.context();
        let schema_type = self.schema_type();
        let key = cache_key(schema_type, entity, ctx.store().id, context);
        if let Some(cached) = ctx.cache().load_json::<StructuredData>(&key) {
            return cached;
        }

        match self.build(entity, context) {
            Ok(data) if data.is_empty() => data,
            Ok(data) => {
                let data = with_common_fields(schema_type, data);
                ctx.cache().save_json(
                    &key,
                    &data,
                    &[STRUCTURED_DATA_CACHE_TAG, schema_type],
                    Some(ctx.ttl()),
                );
                data
            }
            Err(e) => {
                tracing::warn!(
                    schema_type,
                    entity = %entity.identity(),
                    error = %e,
                    "Structured data generation failed"
                );
                StructuredData::new()
            }
        }
    }
}

impl<G: Generator + ?Sized> GeneratorExt for G {}

/// Put `@context` first and `@type` second, defaulting both.
fn with_common_fields(schema_type: &str, mut data: StructuredData) -> StructuredData {
    let mut merged = StructuredData::new();
    merged.insert(
        "@context".to_owned(),
        data.remove("@context")
            .unwrap_or_else(|| Value::from(SCHEMA_CONTEXT)),
    );
    merged.insert(
        "@type".to_owned(),
        data.remove("@type").unwrap_or_else(|| Value::from(schema_type)),
    );
    merged.extend(data);
    merged
}

fn cache_key(
    schema_type: &str,
    entity: &Entity,
    store_id: u32,
    context: &GenerationContext,
) -> String {
    let context_json = serde_json::to_string(context).unwrap_or_default();
    let mut hasher = Sha256::new();
    hasher.update(schema_type.as_bytes());
    hasher.update(b"\0");
    hasher.update(entity.identity().as_bytes());
    hasher.update(b"\0");
    hasher.update(store_id.to_le_bytes());
    hasher.update(b"\0");
    hasher.update(context_json.as_bytes());
    format!("seo_sd_{}", hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use seo_cache::{Cache, MemoryCache};
    use seo_catalog::{
        CatalogError, CmsPage, MemoryCatalog, Product, StoreContext, WebsiteContext,
    };
    use seo_template::ProcessorContext;

    use crate::context::SchemaSettings;

    struct Counting {
        ctx: GeneratorContext,
        builds: AtomicUsize,
        fail: bool,
    }

    impl Counting {
        fn new(ctx: GeneratorContext) -> Self {
            Self {
                ctx,
                builds: AtomicUsize::new(0),
                fail: false,
            }
        }
    }

    impl Generator for Counting {
        fn schema_type(&self) -> &'static str {
            "Thing"
        }

        fn context(&self) -> &GeneratorContext {
            &self.ctx
        }

        fn can_handle(&self, entity: &Entity) -> bool {
            entity.as_product().is_some()
        }

        fn build(
            &self,
            entity: &Entity,
            _context: &GenerationContext,
        ) -> Result<StructuredData, GenerateError> {
            self.builds.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(CatalogError::Unavailable("offline".to_owned()).into());
            }
            let mut data = StructuredData::new();
            data.insert("name".to_owned(), json!(entity.id()));
            Ok(data)
        }
    }

    fn context(cache: Arc<dyn Cache>) -> GeneratorContext {
        let processors = ProcessorContext::new(
            StoreContext::default(),
            WebsiteContext::default(),
            Arc::new(MemoryCatalog::new()),
        )
        .with_cache(cache);
        GeneratorContext::new(processors)
    }

    fn product(id: u64) -> Entity {
        Entity::from(Product {
            id,
            ..Product::default()
        })
    }

    #[test]
    fn test_context_and_type_come_first() {
        let generator = Counting::new(context(Arc::new(MemoryCache::new())));
        let data = generator.generate(&product(3), &GenerationContext::new());

        let keys: Vec<_> = data.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["@context", "@type", "name"]);
        assert_eq!(data["@context"], json!("https://schema.org"));
        assert_eq!(data["@type"], json!("Thing"));
    }

    #[test]
    fn test_builder_may_override_type() {
        let data = with_common_fields(
            "Thing",
            [("@type".to_owned(), json!("Store"))].into_iter().collect(),
        );
        assert_eq!(data["@type"], json!("Store"));
    }

    #[test]
    fn test_unhandled_entity_is_empty() {
        let generator = Counting::new(context(Arc::new(MemoryCache::new())));
        let page = Entity::from(CmsPage::default());
        assert!(generator.generate(&page, &GenerationContext::new()).is_empty());
        assert_eq!(generator.builds.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_results_are_cached_per_context() {
        let cache = Arc::new(MemoryCache::new());
        let generator = Counting::new(context(Arc::clone(&cache) as Arc<dyn Cache>));

        let first = generator.generate(&product(1), &GenerationContext::new());
        let second = generator.generate(&product(1), &GenerationContext::new());
        assert_eq!(first, second);
        assert_eq!(generator.builds.load(Ordering::SeqCst), 1);

        let browsing = GenerationContext::from([("category_id".to_owned(), json!(7))]);
        generator.generate(&product(1), &browsing);
        assert_eq!(generator.builds.load(Ordering::SeqCst), 2);

        cache.clean(&[STRUCTURED_DATA_CACHE_TAG]).unwrap();
        generator.generate(&product(1), &GenerationContext::new());
        assert_eq!(generator.builds.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_build_failure_is_empty_and_uncached() {
        let cache = Arc::new(MemoryCache::new());
        let mut generator = Counting::new(context(Arc::clone(&cache) as Arc<dyn Cache>));
        generator.fail = true;

        assert!(generator.generate(&product(1), &GenerationContext::new()).is_empty());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_is_enabled_follows_settings_and_store() {
        let ctx = context(Arc::new(MemoryCache::new())).with_settings(SchemaSettings {
            disabled: vec!["Thing".to_owned()],
            ..SchemaSettings::default()
        });
        let generator = Counting::new(ctx);
        assert!(!generator.is_enabled(1));

        let generator = Counting::new(context(Arc::new(MemoryCache::new())));
        assert!(generator.is_enabled(1));
        assert!(!generator.is_enabled(2));
    }
}
