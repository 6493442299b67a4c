//! Template selection and application.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use seo_cache::{Cache, CacheExt};
use seo_catalog::{Entity, EntityType, MetaField, Template, TemplateStore, TemplateType};
use seo_template::{ProcessorFactory, RequestScope, VariableProcessor};
use sha2::{Digest, Sha256};

use crate::{Conditions, MetaError, ResolvedTags};

/// Cache tag attached to every resolved tag set.
pub const META_CACHE_TAG: &str = "seo_meta_tags";

/// Resolves meta tags for entities from prioritized templates.
///
/// For a given entity the manager walks the active templates of the
/// requested type from highest to lowest priority. The first template whose
/// conditions hold and that produces at least one value wins outright: lower
/// priority templates are never consulted, even for fields the winner left
/// empty.
///
/// Results are memoized in the [`RequestScope`] and cached persistently
/// under [`META_CACHE_TAG`].
pub struct MetaTagManager {
    templates: Arc<dyn TemplateStore>,
    processors: ProcessorFactory,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl MetaTagManager {
    /// Create a manager. Cache and TTL are shared with `processors`.
    #[must_use]
    pub fn new(templates: Arc<dyn TemplateStore>, processors: ProcessorFactory) -> Self {
        let cache = processors.context().cache_handle();
        let ttl = processors.context().ttl();
        Self {
            templates,
            processors,
            cache,
            ttl,
        }
    }

    /// Resolve the tag set of `template_type` for `entity`.
    ///
    /// Never fails: a failing template store, a template that does not fit
    /// the entity, or a template with no matching conditions all lead to
    /// fewer (possibly zero) resolved fields.
    pub fn apply_templates(
        &self,
        scope: &mut RequestScope,
        entity: &Entity,
        entity_type: EntityType,
        template_type: TemplateType,
    ) -> ResolvedTags {
        let key = self.cache_key(entity, entity_type, template_type);

        if let Some(tags) = scope.meta_tags(&key) {
            return ResolvedTags::from(tags.clone());
        }

        if let Some(tags) = self.cache.load_json::<BTreeMap<MetaField, String>>(&key) {
            scope.memo_meta_tags(key, tags.clone());
            return ResolvedTags::from(tags);
        }

        let store_id = self.processors.context().store().id;
        let templates = match self
            .templates
            .get_by_type_and_entity_type(template_type, entity_type, store_id)
        {
            Ok(templates) => templates,
            Err(e) => {
                tracing::warn!(
                    entity = %entity.identity(),
                    %template_type,
                    error = %MetaError::from(e),
                    "Failed to load meta templates"
                );
                return ResolvedTags::default();
            }
        };

        let processor = self.processors.for_entity_type(entity_type);
        let mut result = BTreeMap::new();

        for template in &templates {
            if !template.is_active {
                continue;
            }
            if !Conditions::parse(template.conditions.as_deref()).matches(entity) {
                tracing::debug!(template_id = template.id, "Template conditions not met");
                continue;
            }
            match apply_template(scope, &processor, template, template_type, entity) {
                Ok(fields) if !fields.is_empty() => {
                    result = fields;
                    break;
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(template_id = template.id, error = %e, "Skipping meta template");
                }
            }
        }

        self.cache
            .save_json(&key, &result, &[META_CACHE_TAG], Some(self.ttl));
        scope.memo_meta_tags(key, result.clone());
        ResolvedTags::from(result)
    }

    /// Drop the cached tag sets of every template type for `entity` in the
    /// current store.
    pub fn clear_cache_for_entity(
        &self,
        scope: &mut RequestScope,
        entity: &Entity,
        entity_type: EntityType,
    ) {
        for template_type in TemplateType::ALL {
            let key = self.cache_key(entity, entity_type, template_type);
            self.cache.remove_logged(&key);
            scope.forget_meta_tags(&key);
        }
    }

    /// Drop every cached tag set.
    pub fn clear_all_cache(&self, scope: &mut RequestScope) {
        self.cache.clean_logged(&[META_CACHE_TAG]);
        scope.clear();
    }

    fn cache_key(
        &self,
        entity: &Entity,
        entity_type: EntityType,
        template_type: TemplateType,
    ) -> String {
        let store_id = self.processors.context().store().id;
        let mut hasher = Sha256::new();
        hasher.update(entity_type.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(entity.identity().as_bytes());
        hasher.update(b"\0");
        hasher.update(template_type.as_str().as_bytes());
        hasher.update(b"\0");
        hasher.update(store_id.to_le_bytes());
        format!("seo_meta_{}", hex::encode(hasher.finalize()))
    }
}

/// Fill the fields `template_type` governs from one template.
///
/// Title, description, keywords and the Open Graph title, description and
/// image go through the template engine; robots and Open Graph type are
/// copied as written.
fn apply_template(
    scope: &mut RequestScope,
    processor: &VariableProcessor,
    template: &Template,
    template_type: TemplateType,
    entity: &Entity,
) -> Result<BTreeMap<MetaField, String>, MetaError> {
    if !processor.can_process(entity) {
        return Err(MetaError::EntityMismatch {
            template_id: template.id,
            expected: processor.entity_type(),
            actual: entity.entity_type(),
        });
    }

    let vars = BTreeMap::new();
    let mut fields = BTreeMap::new();
    for &field in template_type.fields() {
        let Some(text) = template.field(field).filter(|t| !t.is_empty()) else {
            continue;
        };
        let value = if field.is_processed() {
            processor.process(scope, text, entity, &vars)
        } else {
            text.to_owned()
        };
        if !value.is_empty() {
            fields.insert(field, value);
        }
    }
    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use seo_cache::MemoryCache;
    use seo_catalog::{CatalogError, Category, MemoryCatalog, Product, StoreContext, WebsiteContext};
    use seo_template::ProcessorContext;

    static_assertions::assert_impl_all!(MetaTagManager: Send, Sync);

    /// Returns its templates verbatim, without filtering.
    struct FixedTemplates(Vec<Template>);

    impl TemplateStore for FixedTemplates {
        fn get_by_type_and_entity_type(
            &self,
            _template_type: TemplateType,
            _entity_type: EntityType,
            _store_id: u32,
        ) -> Result<Vec<Template>, CatalogError> {
            Ok(self.0.clone())
        }
    }

    struct BrokenTemplates;

    impl TemplateStore for BrokenTemplates {
        fn get_by_type_and_entity_type(
            &self,
            _template_type: TemplateType,
            _entity_type: EntityType,
            _store_id: u32,
        ) -> Result<Vec<Template>, CatalogError> {
            Err(CatalogError::Unavailable("timeout".to_owned()))
        }
    }

    fn template(id: u64, priority: i32) -> Template {
        Template {
            id,
            priority,
            is_active: true,
            template_type: TemplateType::Comprehensive,
            entity_type: EntityType::Product,
            ..Template::default()
        }
    }

    fn manager(store: Arc<dyn TemplateStore>) -> MetaTagManager {
        let catalog = Arc::new(MemoryCatalog::new().with_category(Category {
            id: 3,
            name: "Headphones".to_owned(),
            level: 2,
            ..Category::default()
        }));
        let ctx = ProcessorContext::new(StoreContext::default(), WebsiteContext::default(), catalog)
            .with_cache(Arc::new(MemoryCache::new()));
        MetaTagManager::new(store, ProcessorFactory::new(ctx))
    }

    fn product(price: f64) -> Entity {
        Entity::from(Product {
            id: 42,
            name: "Wireless Headphones".to_owned(),
            price: Some(price),
            category_ids: vec![3],
            ..Product::default()
        })
    }

    fn apply(manager: &MetaTagManager, entity: &Entity) -> ResolvedTags {
        let mut scope = RequestScope::new();
        manager.apply_templates(&mut scope, entity, EntityType::Product, TemplateType::Comprehensive)
    }

    #[test]
    fn test_highest_priority_template_wins_outright() {
        let catalog = Arc::new(
            MemoryCatalog::new()
                .with_template(Template {
                    meta_title: Some("Low {{product.name}}".to_owned()),
                    meta_description: Some("Low description".to_owned()),
                    ..template(1, 5)
                })
                .with_template(Template {
                    meta_title: Some("{{product.name}} | {{category.name}}".to_owned()),
                    ..template(2, 10)
                }),
        );
        let tags = apply(&manager(catalog), &product(20.0));

        assert_eq!(tags.get(MetaField::MetaTitle), Some("Wireless Headphones | Headphones"));
        assert_eq!(tags.get(MetaField::MetaDescription), None);
        assert_eq!(tags.len(), 1);
    }

    #[test]
    fn test_empty_result_falls_through_to_next_template() {
        let catalog = Arc::new(
            MemoryCatalog::new()
                .with_template(Template {
                    meta_title: Some("{{product.missing}}".to_owned()),
                    ..template(1, 10)
                })
                .with_template(Template {
                    meta_title: Some("Fallback".to_owned()),
                    ..template(2, 5)
                }),
        );
        let tags = apply(&manager(catalog), &product(20.0));
        assert_eq!(tags.get(MetaField::MetaTitle), Some("Fallback"));
    }

    #[test]
    fn test_price_range_condition() {
        let store = Arc::new(MemoryCatalog::new().with_template(Template {
            conditions: Some(r#"{"price": {"min": 10, "max": 50}}"#.to_owned()),
            meta_title: Some("Affordable {{product.name}}".to_owned()),
            ..template(1, 1)
        }));
        let manager = manager(store);

        // Distinct ids keep the cache keys apart
        let entity = |id: u64, price: f64| {
            let mut entity = product(price);
            if let Entity::Product(p) = &mut entity {
                p.id = id;
            }
            entity
        };

        assert!(apply(&manager, &entity(1, 5.0)).is_empty());
        assert!(apply(&manager, &entity(2, 60.0)).is_empty());
        assert_eq!(
            apply(&manager, &entity(3, 25.0)).get(MetaField::MetaTitle),
            Some("Affordable Wireless Headphones")
        );
    }

    #[test]
    fn test_second_call_served_from_cache() {
        let catalog = Arc::new(MemoryCatalog::new().with_template(Template {
            meta_title: Some("{{product.name}}".to_owned()),
            ..template(1, 1)
        }));
        let manager = manager(Arc::clone(&catalog) as Arc<dyn TemplateStore>);
        let entity = product(20.0);

        let first = apply(&manager, &entity);
        let second = apply(&manager, &entity);

        assert_eq!(first, second);
        assert_eq!(catalog.template_calls(), 1);

        // Same request: memo answers without touching the cache
        let mut scope = RequestScope::new();
        let a = manager.apply_templates(&mut scope, &entity, EntityType::Product, TemplateType::Comprehensive);
        let b = manager.apply_templates(&mut scope, &entity, EntityType::Product, TemplateType::Comprehensive);
        assert_eq!(a, b);
        assert_eq!(catalog.template_calls(), 1);
    }

    #[test]
    fn test_clear_cache_for_entity_forces_reload() {
        let catalog = Arc::new(MemoryCatalog::new().with_template(Template {
            meta_title: Some("{{product.name}}".to_owned()),
            ..template(1, 1)
        }));
        let manager = manager(Arc::clone(&catalog) as Arc<dyn TemplateStore>);
        let entity = product(20.0);
        let mut scope = RequestScope::new();

        manager.apply_templates(&mut scope, &entity, EntityType::Product, TemplateType::Comprehensive);
        manager.clear_cache_for_entity(&mut scope, &entity, EntityType::Product);
        manager.apply_templates(&mut scope, &entity, EntityType::Product, TemplateType::Comprehensive);
        assert_eq!(catalog.template_calls(), 2);

        manager.clear_all_cache(&mut scope);
        manager.apply_templates(&mut scope, &entity, EntityType::Product, TemplateType::Comprehensive);
        assert_eq!(catalog.template_calls(), 3);
    }

    #[test]
    fn test_template_type_selects_fields() {
        let store = Arc::new(FixedTemplates(vec![Template {
            template_type: TemplateType::OpenGraph,
            meta_title: Some("ignored".to_owned()),
            og_title: Some("{{product.name}}".to_owned()),
            og_type: Some("product".to_owned()),
            ..template(1, 1)
        }]));
        let manager = manager(store);
        let mut scope = RequestScope::new();

        let tags = manager.apply_templates(&mut scope, &product(1.0), EntityType::Product, TemplateType::OpenGraph);
        assert_eq!(tags.get(MetaField::MetaTitle), None);
        assert_eq!(tags.get(MetaField::OgTitle), Some("Wireless Headphones"));
        assert_eq!(tags.get(MetaField::OgType), Some("product"));
    }

    #[test]
    fn test_robots_and_og_type_copied_verbatim() {
        let store = Arc::new(FixedTemplates(vec![Template {
            meta_robots: Some("NOINDEX,{{product.name}}".to_owned()),
            og_type: Some("{{upper(product.name)}}".to_owned()),
            ..template(1, 1)
        }]));
        let tags = apply(&manager(store), &product(1.0));
        assert_eq!(tags.get(MetaField::MetaRobots), Some("NOINDEX,{{product.name}}"));
        assert_eq!(tags.get(MetaField::OgType), Some("{{upper(product.name)}}"));
    }

    #[test]
    fn test_inactive_and_mismatched_templates_skipped() {
        let store = Arc::new(FixedTemplates(vec![
            Template {
                is_active: false,
                meta_title: Some("inactive".to_owned()),
                ..template(1, 30)
            },
            Template {
                meta_title: Some("malformed conditions pass".to_owned()),
                conditions: Some("{broken".to_owned()),
                ..template(2, 20)
            },
        ]));
        let tags = apply(&manager(store), &product(1.0));
        assert_eq!(tags.get(MetaField::MetaTitle), Some("malformed conditions pass"));

        let store = Arc::new(FixedTemplates(vec![Template {
            meta_title: Some("for products".to_owned()),
            ..template(1, 1)
        }]));
        let manager = manager(store);
        let mut scope = RequestScope::new();
        let category = Entity::from(Category {
            id: 3,
            ..Category::default()
        });
        // Entity type says product, entity is a category
        let tags = manager.apply_templates(&mut scope, &category, EntityType::Product, TemplateType::Comprehensive);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_failing_store_yields_empty_uncached_result() {
        let manager = manager(Arc::new(BrokenTemplates));
        let mut scope = RequestScope::new();
        let entity = product(1.0);
        let tags = manager.apply_templates(&mut scope, &entity, EntityType::Product, TemplateType::Comprehensive);
        assert!(tags.is_empty());
        let key = manager.cache_key(&entity, EntityType::Product, TemplateType::Comprehensive);
        assert!(scope.meta_tags(&key).is_none());
    }
}
