//! Settings and collaborators shared by generators.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use seo_cache::Cache;
use seo_catalog::{CategoryRepository, StoreContext};
use seo_template::ProcessorContext;

/// Default lifetime of cached structured data.
pub const DEFAULT_STRUCTURED_DATA_TTL: Duration = Duration::from_secs(86_400);

/// Cache tag attached to every generated document.
pub const STRUCTURED_DATA_CACHE_TAG: &str = "seo_structured_data";

/// Value of `@context` when a generator does not set one.
pub const SCHEMA_CONTEXT: &str = "https://schema.org";

/// The business publishing the site.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrganizationInfo {
    pub name: String,
    pub url: Option<String>,
    pub logo: Option<String>,
    /// Profile URLs (social networks, directories).
    pub same_as: Vec<String>,
    pub telephone: Option<String>,
    pub email: Option<String>,
}

/// Structured-data switches for one store view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SchemaSettings {
    /// Master switch.
    pub enabled: bool,
    /// Schema types switched off individually (`"Product"`, ...).
    pub disabled: Vec<String>,
    /// Product attribute holding the brand name.
    pub brand_attribute: String,
    pub organization: Option<OrganizationInfo>,
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled: Vec::new(),
            brand_attribute: "manufacturer".to_owned(),
            organization: None,
        }
    }
}

impl SchemaSettings {
    /// Whether `schema_type` is switched on.
    #[must_use]
    pub fn is_enabled(&self, schema_type: &str) -> bool {
        self.enabled && !self.disabled.iter().any(|d| d.eq_ignore_ascii_case(schema_type))
    }
}

/// Everything a generator needs besides the entity.
///
/// Wraps the template engine's [`ProcessorContext`] for store data, URL
/// building, category lookups and the cache, and adds schema settings and
/// a separate cache lifetime.
#[derive(Clone)]
pub struct GeneratorContext {
    processors: ProcessorContext,
    settings: Arc<SchemaSettings>,
    ttl: Duration,
}

impl GeneratorContext {
    #[must_use]
    pub fn new(processors: ProcessorContext) -> Self {
        Self {
            processors,
            settings: Arc::new(SchemaSettings::default()),
            ttl: DEFAULT_STRUCTURED_DATA_TTL,
        }
    }

    #[must_use]
    pub fn with_settings(mut self, settings: SchemaSettings) -> Self {
        self.settings = Arc::new(settings);
        self
    }

    /// Set the lifetime of cached documents.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    #[must_use]
    pub fn processors(&self) -> &ProcessorContext {
        &self.processors
    }

    #[must_use]
    pub fn store(&self) -> &StoreContext {
        self.processors.store()
    }

    #[must_use]
    pub fn categories(&self) -> &dyn CategoryRepository {
        self.processors.categories()
    }

    #[must_use]
    pub fn cache(&self) -> &dyn Cache {
        self.processors.cache()
    }

    #[must_use]
    pub fn settings(&self) -> &SchemaSettings {
        &self.settings
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
