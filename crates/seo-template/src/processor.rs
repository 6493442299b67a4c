//! Template processing.

use std::collections::BTreeMap;

use regex::Captures;
use seo_cache::CacheExt;
use seo_catalog::{Entity, EntityType};
use serde_json::Value;

use crate::context::TEMPLATE_CACHE_TAG;
use crate::directive::Directive;
use crate::key::TemplateKey;
use crate::parser::{DIRECTIVE_PATTERN, VARIABLE_PATTERN, is_quoted, segments, split_args, strip_quotes};
use crate::resolver::EntityResolver;
use crate::value::{to_text, traverse};
use crate::{ProcessorContext, RequestScope};

const COMMON_VARIABLES: &[(&str, &str)] = &[
    ("store.id", "Store ID"),
    ("store.name", "Store Name"),
    ("store.code", "Store Code"),
    ("store.url", "Store URL"),
    ("store.base_url", "Store Base URL"),
    ("store.secure_base_url", "Store Secure Base URL"),
    ("store.currency", "Store Currency"),
    ("website.id", "Website ID"),
    ("website.name", "Website Name"),
    ("website.code", "Website Code"),
    ("website.default_group_id", "Website Default Group ID"),
];

/// Fills `{{ }}` placeholders in a template for one kind of entity.
///
/// Processing runs two passes. The first replaces every plain variable
/// (`{{ product.name }}`). The second evaluates directives
/// (`{{ upper(product.name) }}`) over the result; a directive's first
/// argument is resolved directly as a variable path, or taken literally
/// when quoted.
///
/// Variable paths resolve, in order, against the additional variables, the
/// store and website, and finally the entity. Anything unresolved becomes an
/// empty string.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use std::sync::Arc;
/// use seo_catalog::{Entity, MemoryCatalog, Product, StoreContext, WebsiteContext};
/// use seo_template::{ProcessorContext, ProcessorFactory, RequestScope};
///
/// let ctx = ProcessorContext::new(
///     StoreContext::default(),
///     WebsiteContext::default(),
///     Arc::new(MemoryCatalog::new()),
/// );
/// let factory = ProcessorFactory::new(ctx);
/// let entity = Entity::from(Product {
///     id: 1,
///     name: "Trail Runner".to_owned(),
///     ..Product::default()
/// });
///
/// let processor = factory.create(&entity);
/// let mut scope = RequestScope::new();
/// let title = processor.process(&mut scope, "Buy {{ upper(product.name) }}", &entity, &BTreeMap::new());
/// assert_eq!(title, "Buy TRAIL RUNNER");
/// ```
pub struct VariableProcessor {
    ctx: ProcessorContext,
    resolver: Box<dyn EntityResolver>,
}

impl VariableProcessor {
    /// Create a processor around an entity resolver.
    #[must_use]
    pub fn new(ctx: ProcessorContext, resolver: Box<dyn EntityResolver>) -> Self {
        Self { ctx, resolver }
    }

    /// Entity kind this processor serves.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        self.resolver.entity_type()
    }

    /// Whether the processor can fill templates for `entity`.
    #[must_use]
    pub fn can_process(&self, entity: &Entity) -> bool {
        self.resolver.can_process(entity)
    }

    /// Fill a template for `entity`.
    ///
    /// Returns `template` unchanged when it is empty or the entity is of the
    /// wrong kind. Results are memoized in `scope` and written through to the
    /// persistent cache.
    pub fn process(
        &self,
        scope: &mut RequestScope,
        template: &str,
        entity: &Entity,
        vars: &BTreeMap<String, Value>,
    ) -> String {
        if template.is_empty() || !self.can_process(entity) {
            return template.to_owned();
        }

        let key = TemplateKey::new(template, &entity.identity(), self.ctx.store().id, vars)
            .to_string();

        if let Some(hit) = scope.template(&key) {
            return hit.to_owned();
        }

        if let Some(hit) = self.ctx.cache().load_string(&key) {
            scope.memo_template(key, hit.clone());
            return hit;
        }

        let result = self.render(scope, template, entity, vars);
        self.ctx
            .cache()
            .save_string(&key, &result, &[TEMPLATE_CACHE_TAG], Some(self.ctx.ttl()));
        scope.memo_template(key, result.clone());
        result
    }

    /// Resolve a single variable path such as `product.name`.
    pub fn resolve_variable(
        &self,
        scope: &mut RequestScope,
        path: &str,
        entity: &Entity,
        vars: &BTreeMap<String, Value>,
    ) -> String {
        let segments = segments(path);
        let Some((first, rest)) = segments.split_first() else {
            return String::new();
        };

        if let Some(value) = vars.get(*first) {
            return traverse(value, rest).map(to_text).unwrap_or_default();
        }

        if let Some(value) = self.context_value(first, rest) {
            return value;
        }

        if self.resolver.is_entity_prefix(first) {
            return match self.resolver.entity_value(&self.ctx, scope, entity, &segments) {
                Ok(value) => value.unwrap_or_default(),
                Err(e) => {
                    tracing::warn!(
                        path,
                        entity = %entity.identity(),
                        error = %e,
                        "Failed to resolve template variable"
                    );
                    String::new()
                }
            };
        }

        String::new()
    }

    /// Every variable this processor understands, mapped to a label.
    #[must_use]
    pub fn available_variables(&self) -> BTreeMap<String, String> {
        COMMON_VARIABLES
            .iter()
            .chain(self.resolver.entity_variables())
            .map(|(name, label)| ((*name).to_owned(), (*label).to_owned()))
            .collect()
    }

    fn render(
        &self,
        scope: &mut RequestScope,
        template: &str,
        entity: &Entity,
        vars: &BTreeMap<String, Value>,
    ) -> String {
        let substituted = VARIABLE_PATTERN.replace_all(template, |caps: &Captures<'_>| {
            self.resolve_variable(scope, &caps[1], entity, vars)
        });

        DIRECTIVE_PATTERN
            .replace_all(&substituted, |caps: &Captures<'_>| {
                self.apply_directive(scope, &caps[1], &caps[2], entity, vars)
            })
            .into_owned()
    }

    fn apply_directive(
        &self,
        scope: &mut RequestScope,
        name: &str,
        raw_args: &str,
        entity: &Entity,
        vars: &BTreeMap<String, Value>,
    ) -> String {
        let Some(directive) = Directive::from_name(name) else {
            tracing::debug!(directive = name, "Unknown template directive");
            return String::new();
        };

        let args = split_args(raw_args);
        let Some((subject, rest)) = args.split_first() else {
            return String::new();
        };

        let value = if is_quoted(subject) {
            strip_quotes(subject).to_owned()
        } else {
            self.resolve_variable(scope, subject, entity, vars)
        };
        directive.apply(&value, rest)
    }

    /// `store.*` and `website.*` lookups. Unknown properties fall through.
    fn context_value(&self, first: &str, rest: &[&str]) -> Option<String> {
        let [property] = rest else {
            return None;
        };
        match first {
            "store" => {
                let store = self.ctx.store();
                let value = match *property {
                    "id" => store.id.to_string(),
                    "name" => store.name.clone(),
                    "code" => store.code.clone(),
                    "url" | "base_url" => store.base_url.clone(),
                    "secure_base_url" => store.secure_base_url.clone(),
                    "currency" => store.currency.clone(),
                    _ => return None,
                };
                Some(value)
            }
            "website" => {
                let website = self.ctx.website();
                let value = match *property {
                    "id" => website.id.to_string(),
                    "name" => website.name.clone(),
                    "code" => website.code.clone(),
                    "default_group_id" => website.default_group_id.to_string(),
                    _ => return None,
                };
                Some(value)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::ProcessorFactory;
    use pretty_assertions::assert_eq;
    use seo_cache::{Cache, MemoryCache};
    use seo_catalog::{
        CatalogError, Category, CategoryRepository, CmsPage, MemoryCatalog, Product, StoreContext,
        WebsiteContext,
    };
    use serde_json::json;

    static_assertions::assert_impl_all!(VariableProcessor: Send, Sync);

    struct FailingCategories;

    impl CategoryRepository for FailingCategories {
        fn get_by_id(&self, _id: u64) -> Result<Category, CatalogError> {
            Err(CatalogError::Unavailable("connection refused".to_owned()))
        }
    }

    fn category(id: u64, name: &str, level: u32) -> Category {
        Category {
            id,
            name: name.to_owned(),
            level,
            url_key: Some(name.to_lowercase()),
            ..Category::default()
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_category(category(2, "Default Category", 1))
            .with_category(category(3, "Gear", 2))
            .with_category(category(4, "shoes", 3))
            .with_category(category(5, "Sale", 2))
    }

    fn store() -> StoreContext {
        StoreContext {
            name: "Luma".to_owned(),
            base_url: "https://shop.example/".to_owned(),
            media_url: "https://shop.example/media/".to_owned(),
            ..StoreContext::default()
        }
    }

    fn factory_with(cache: Arc<dyn Cache>) -> ProcessorFactory {
        let ctx = ProcessorContext::new(store(), WebsiteContext::default(), Arc::new(catalog()))
            .with_cache(cache);
        ProcessorFactory::new(ctx)
    }

    fn factory() -> ProcessorFactory {
        factory_with(Arc::new(MemoryCache::new()))
    }

    fn headphones() -> Entity {
        Entity::from(Product {
            id: 42,
            sku: "WH-1000".to_owned(),
            name: "Wireless Headphones".to_owned(),
            price: Some(199.0),
            description: Some("<p>Deep&nbsp;bass</p>\n<p>All-day comfort</p>".to_owned()),
            url_key: Some("wireless-headphones".to_owned()),
            image: Some("/w/h/wh.jpg".to_owned()),
            category_ids: vec![2, 3, 4, 5],
            custom_attributes: BTreeMap::from([("color".to_owned(), json!("black"))]),
            ..Product::default()
        })
    }

    fn process(factory: &ProcessorFactory, template: &str, entity: &Entity) -> String {
        let mut scope = RequestScope::new();
        factory
            .create(entity)
            .process(&mut scope, template, entity, &BTreeMap::new())
    }

    #[test]
    fn test_substitution_matches_manual_and_is_stable() {
        let factory = factory();
        let entity = headphones();
        let template = "Buy {{product.name}} ({{ product.sku }}) at {{store.name}}";

        let first = process(&factory, template, &entity);
        let second = process(&factory, template, &entity);

        assert_eq!(first, "Buy Wireless Headphones (WH-1000) at Luma");
        assert_eq!(first, second);
    }

    #[test]
    fn test_directive_composition() {
        let factory = factory();
        let entity = headphones();

        assert_eq!(process(&factory, "{{truncate(product.name, 5)}}", &entity), "Wirel...");
        assert_eq!(process(&factory, "{{upper(category.name)}}", &entity), "SHOES");

        let shoes = Entity::from(category(4, "shoes", 3));
        assert_eq!(process(&factory, "{{ upper(category.name) }}", &shoes), "SHOES");
    }

    #[test]
    fn test_unknown_directive_yields_empty() {
        let factory = factory();
        let entity = headphones();
        assert_eq!(process(&factory, "[{{unknownfunc(product.name)}}]", &entity), "[]");
    }

    #[test]
    fn test_quoted_directive_subject_is_literal() {
        let factory = factory();
        let entity = headphones();
        assert_eq!(process(&factory, "{{upper('free shipping')}}", &entity), "FREE SHIPPING");
        assert_eq!(
            process(&factory, "{{replace(product.sku, '-', '')}}", &entity),
            "WH1000"
        );
    }

    #[test]
    fn test_empty_template_and_foreign_entity_returned_unchanged() {
        let factory = factory();
        let entity = headphones();
        let processor = factory.create(&entity);
        let mut scope = RequestScope::new();
        let page = Entity::from(CmsPage::default());

        assert_eq!(processor.process(&mut scope, "", &entity, &BTreeMap::new()), "");
        assert_eq!(
            processor.process(&mut scope, "{{product.name}}", &page, &BTreeMap::new()),
            "{{product.name}}"
        );
    }

    #[test]
    fn test_malformed_placeholders_left_verbatim() {
        let factory = factory();
        let entity = headphones();
        assert_eq!(
            process(&factory, "{{ product name }} {{product.name", &entity),
            "{{ product name }} {{product.name"
        );
    }

    #[test]
    fn test_additional_vars_take_precedence() {
        let factory = factory();
        let entity = headphones();
        let processor = factory.create(&entity);
        let mut scope = RequestScope::new();
        let vars = BTreeMap::from([
            ("product".to_owned(), json!({"name": "Override"})),
            ("promo".to_owned(), json!({"codes": ["SAVE10", "SAVE20"]})),
        ]);

        let result = processor.process(
            &mut scope,
            "{{product.name}} {{promo.codes.1}} [{{promo.missing}}]",
            &entity,
            &vars,
        );
        assert_eq!(result, "Override SAVE20 []");
    }

    #[test]
    fn test_store_and_website_values() {
        let factory = factory();
        let entity = headphones();
        assert_eq!(
            process(&factory, "{{store.url}}|{{website.name}}|{{store.unknown}}", &entity),
            "https://shop.example/|Main Website|"
        );
    }

    #[test]
    fn test_product_properties() {
        let factory = factory();
        let entity = headphones();
        assert_eq!(process(&factory, "{{product.price}}", &entity), "199.00");
        assert_eq!(process(&factory, "{{product.description}}", &entity), "Deep bass All-day comfort");
        assert_eq!(
            process(&factory, "{{product.url}}", &entity),
            "https://shop.example/wireless-headphones.html"
        );
        assert_eq!(
            process(&factory, "{{product.image}}", &entity),
            "https://shop.example/media/catalog/product/w/h/wh.jpg"
        );
        assert_eq!(process(&factory, "{{product.categories}}", &entity), "Gear, shoes, Sale");
        assert_eq!(process(&factory, "{{product.color}}", &entity), "black");
        assert_eq!(process(&factory, "[{{product.nothing}}]", &entity), "[]");
    }

    #[test]
    fn test_current_category_preferred_when_assigned() {
        let factory = factory();
        let entity = headphones();
        let processor = factory.create(&entity);

        let mut browsing_sale = RequestScope::with_current_category(category(5, "Sale", 2));
        assert_eq!(
            processor.process(&mut browsing_sale, "{{category.name}}", &entity, &BTreeMap::new()),
            "Sale"
        );

        let mut browsing_other = RequestScope::with_current_category(category(9, "Other", 2));
        assert_eq!(
            processor.resolve_variable(&mut browsing_other, "category.name", &entity, &BTreeMap::new()),
            "shoes"
        );
    }

    #[test]
    fn test_category_lookup_failure_degrades_single_property() {
        let ctx = ProcessorContext::new(store(), WebsiteContext::default(), Arc::new(FailingCategories));
        let factory = ProcessorFactory::new(ctx);
        let entity = headphones();
        assert_eq!(
            process(&factory, "{{product.name}} - {{category.name}}", &entity),
            "Wireless Headphones - "
        );
    }

    #[test]
    fn test_parent_category() {
        let factory = factory();
        let shoes = Entity::from(Category {
            parent_id: Some(3),
            ..category(4, "shoes", 3)
        });
        assert_eq!(process(&factory, "{{parent_category.name}} / {{category.name}}", &shoes), "Gear / shoes");
    }

    #[test]
    fn test_cms_page_values() {
        let factory = factory();
        let page = Entity::from(CmsPage {
            id: 7,
            identifier: "about-us".to_owned(),
            title: "About Us".to_owned(),
            content: Some("<h2>Our story</h2>".to_owned()),
            ..CmsPage::default()
        });
        assert_eq!(
            process(&factory, "{{page.title}}: {{cms_page.content}} {{cms_page.url}}", &page),
            "About Us: Our story https://shop.example/about-us"
        );
    }

    #[test]
    fn test_results_written_through_to_cache() {
        let cache = Arc::new(MemoryCache::new());
        let factory = factory_with(Arc::clone(&cache) as Arc<dyn Cache>);
        let entity = headphones();

        assert_eq!(process(&factory, "{{product.name}}", &entity), "Wireless Headphones");
        assert_eq!(cache.len(), 1);

        // Same identity, different data: the persistent cache answers
        let renamed = Entity::from(Product {
            name: "Renamed".to_owned(),
            ..headphones().as_product().unwrap().clone()
        });
        assert_eq!(process(&factory, "{{product.name}}", &renamed), "Wireless Headphones");

        cache.clean(&[TEMPLATE_CACHE_TAG]).unwrap();
        assert_eq!(process(&factory, "{{product.name}}", &renamed), "Renamed");
    }

    #[test]
    fn test_available_variables() {
        let factory = factory();
        let vars = factory.for_entity_type(EntityType::Product).available_variables();
        assert_eq!(vars.get("store.name").map(String::as_str), Some("Store Name"));
        assert!(vars.contains_key("product.sku"));
        assert!(!vars.contains_key("cms_page.title"));
    }
}
