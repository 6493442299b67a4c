//! Request-scoped memoization.

use std::collections::{BTreeMap, HashMap};

use seo_catalog::{CatalogError, Category, CategoryRepository, MetaField};

/// State that lives for exactly one request.
///
/// Holds the category the shopper is browsing, memoized template results,
/// memoized category lookups and memoized meta tag sets. Create one per
/// request and pass it down the call chain; drop it when the response is
/// rendered.
#[derive(Debug, Default)]
pub struct RequestScope {
    current_category: Option<Category>,
    templates: HashMap<String, String>,
    categories: HashMap<u64, Option<Category>>,
    main_categories: HashMap<String, Option<u64>>,
    meta_tags: HashMap<String, BTreeMap<MetaField, String>>,
}

impl RequestScope {
    /// Create an empty scope.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a scope for a request browsing `category`.
    #[must_use]
    pub fn with_current_category(category: Category) -> Self {
        Self {
            current_category: Some(category),
            ..Self::default()
        }
    }

    /// The category being browsed, if any.
    #[must_use]
    pub fn current_category(&self) -> Option<&Category> {
        self.current_category.as_ref()
    }

    /// Set the category being browsed.
    pub fn set_current_category(&mut self, category: Option<Category>) {
        self.current_category = category;
        self.main_categories.clear();
    }

    pub(crate) fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    pub(crate) fn memo_template(&mut self, key: String, value: String) {
        self.templates.insert(key, value);
    }

    /// Memoized resolved tag set.
    #[must_use]
    pub fn meta_tags(&self, key: &str) -> Option<&BTreeMap<MetaField, String>> {
        self.meta_tags.get(key)
    }

    /// Memoize a resolved tag set.
    pub fn memo_meta_tags(&mut self, key: String, tags: BTreeMap<MetaField, String>) {
        self.meta_tags.insert(key, tags);
    }

    /// Forget a memoized tag set.
    pub fn forget_meta_tags(&mut self, key: &str) {
        self.meta_tags.remove(key);
    }

    /// Drop every memoized result, keeping the current category.
    pub fn clear(&mut self) {
        self.templates.clear();
        self.categories.clear();
        self.main_categories.clear();
        self.meta_tags.clear();
    }

    /// Load a category once per request.
    ///
    /// A missing category is memoized as absent, so it costs one repository
    /// call per request. Backend failures are returned and not memoized.
    pub fn load_category(
        &mut self,
        repository: &dyn CategoryRepository,
        id: u64,
    ) -> Result<Option<Category>, CatalogError> {
        if let Some(memo) = self.categories.get(&id) {
            return Ok(memo.clone());
        }
        let loaded = match repository.get_by_id(id) {
            Ok(category) => Some(category),
            Err(e) if e.is_not_found() => {
                tracing::debug!(category_id = id, "Category not found");
                None
            }
            Err(e) => return Err(e),
        };
        self.categories.insert(id, loaded.clone());
        Ok(loaded)
    }

    pub(crate) fn main_category(&self, product_identity: &str) -> Option<Option<u64>> {
        self.main_categories.get(product_identity).copied()
    }

    pub(crate) fn memo_main_category(&mut self, product_identity: String, id: Option<u64>) {
        self.main_categories.insert(product_identity, id);
    }
}
