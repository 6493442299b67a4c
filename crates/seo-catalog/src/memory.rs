//! In-memory catalog implementation.
//!
//! Provides [`MemoryCatalog`], which implements every repository trait and the
//! template store over plain maps. It backs the CLI (loaded from a JSON
//! fixture file) and the unit tests of the downstream crates, where its
//! template-store call counter verifies cache behavior.

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Deserialize;

use crate::{
    Category, CategoryRepository, CatalogError, CmsPage, CmsPageRepository, EntityType, Product,
    ProductRepository, Template, TemplateStore, TemplateType,
};

/// JSON fixture layout accepted by [`MemoryCatalog::from_json`].
///
/// ```json
/// {
///   "products": [{"id": 1, "sku": "A", "name": "Alpha"}],
///   "categories": [],
///   "cms_pages": [],
///   "templates": [{"type": "comprehensive", "entity_type": "product", "is_active": true}]
/// }
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFixture {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub cms_pages: Vec<CmsPage>,
    pub templates: Vec<Template>,
}

/// In-memory catalog and template store.
///
/// Use the builder methods to configure it with test data.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    products: HashMap<u64, Product>,
    categories: HashMap<u64, Category>,
    pages: HashMap<u64, CmsPage>,
    templates: Vec<Template>,
    template_calls: AtomicUsize,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a decoded fixture.
    #[must_use]
    pub fn from_fixture(fixture: CatalogFixture) -> Self {
        let mut catalog = Self::new();
        for product in fixture.products {
            catalog.products.insert(product.id, product);
        }
        for category in fixture.categories {
            catalog.categories.insert(category.id, category);
        }
        for page in fixture.cms_pages {
            catalog.pages.insert(page.id, page);
        }
        catalog.templates = fixture.templates;
        catalog
    }

    /// Parse a JSON fixture.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Json`] if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let fixture: CatalogFixture = serde_json::from_str(json)?;
        Ok(Self::from_fixture(fixture))
    }

    /// Read and parse a JSON fixture file.
    ///
    /// # Errors
    ///
    /// Returns an I/O or JSON error.
    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = std::fs::read_to_string(path)?;
        let catalog = Self::from_json(&content)?;
        tracing::debug!(
            path = %path.display(),
            products = catalog.products.len(),
            categories = catalog.categories.len(),
            pages = catalog.pages.len(),
            templates = catalog.templates.len(),
            "Loaded catalog fixture"
        );
        Ok(catalog)
    }

    /// Add a product.
    #[must_use]
    pub fn with_product(mut self, product: Product) -> Self {
        self.products.insert(product.id, product);
        self
    }

    /// Add a category.
    #[must_use]
    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.insert(category.id, category);
        self
    }

    /// Add a CMS page.
    #[must_use]
    pub fn with_cms_page(mut self, page: CmsPage) -> Self {
        self.pages.insert(page.id, page);
        self
    }

    /// Add a template.
    #[must_use]
    pub fn with_template(mut self, template: Template) -> Self {
        self.templates.push(template);
        self
    }

    /// Number of [`TemplateStore`] queries served so far.
    #[must_use]
    pub fn template_calls(&self) -> usize {
        self.template_calls.load(Ordering::SeqCst)
    }

    /// Find a CMS page by URL identifier.
    #[must_use]
    pub fn cms_page_by_identifier(&self, identifier: &str) -> Option<&CmsPage> {
        self.pages.values().find(|p| p.identifier == identifier)
    }
}

impl TemplateStore for MemoryCatalog {
    fn get_by_type_and_entity_type(
        &self,
        template_type: TemplateType,
        entity_type: EntityType,
        store_id: u32,
    ) -> Result<Vec<Template>, CatalogError> {
        self.template_calls.fetch_add(1, Ordering::SeqCst);

        let mut matching: Vec<Template> = self
            .templates
            .iter()
            .filter(|t| {
                t.is_active
                    && t.template_type == template_type
                    && t.entity_type == entity_type
                    && t.applies_to_store(store_id)
            })
            .cloned()
            .collect();
        // Stable sort keeps insertion order among equal priorities
        matching.sort_by(|a, b| b.priority.cmp(&a.priority));
        Ok(matching)
    }
}

impl ProductRepository for MemoryCatalog {
    fn get_by_id(&self, id: u64) -> Result<Product, CatalogError> {
        self.products
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(EntityType::Product, id))
    }
}

impl CategoryRepository for MemoryCatalog {
    fn get_by_id(&self, id: u64) -> Result<Category, CatalogError> {
        self.categories
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(EntityType::Category, id))
    }
}

impl CmsPageRepository for MemoryCatalog {
    fn get_by_id(&self, id: u64) -> Result<CmsPage, CatalogError> {
        self.pages
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::not_found(EntityType::CmsPage, id))
    }
}
