//! Shared collaborators of every processor.

use std::sync::Arc;
use std::time::Duration;

use seo_cache::{Cache, NullCache};
use seo_catalog::{CategoryRepository, StoreContext, WebsiteContext};

/// Default lifetime of a cached template result.
pub const DEFAULT_TEMPLATE_TTL: Duration = Duration::from_secs(3600);

/// Cache tag attached to every processed template.
pub const TEMPLATE_CACHE_TAG: &str = "seo_template";

/// URL suffixes appended to catalog request paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UrlSuffixes {
    pub product: String,
    pub category: String,
}

impl Default for UrlSuffixes {
    fn default() -> Self {
        Self {
            product: ".html".to_owned(),
            category: ".html".to_owned(),
        }
    }
}

/// Store, website, repositories and cache shared by processors.
///
/// Cloning is cheap: every heavy member sits behind an [`Arc`].
#[derive(Clone)]
pub struct ProcessorContext {
    store: Arc<StoreContext>,
    website: Arc<WebsiteContext>,
    suffixes: Arc<UrlSuffixes>,
    categories: Arc<dyn CategoryRepository>,
    cache: Arc<dyn Cache>,
    ttl: Duration,
}

impl ProcessorContext {
    /// Create a context with a [`NullCache`] and default TTL and suffixes.
    #[must_use]
    pub fn new(
        store: StoreContext,
        website: WebsiteContext,
        categories: Arc<dyn CategoryRepository>,
    ) -> Self {
        Self {
            store: Arc::new(store),
            website: Arc::new(website),
            suffixes: Arc::new(UrlSuffixes::default()),
            categories,
            cache: Arc::new(NullCache),
            ttl: DEFAULT_TEMPLATE_TTL,
        }
    }

    /// Use `cache` for processed templates.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn Cache>) -> Self {
        self.cache = cache;
        self
    }

    /// Set the lifetime of cached template results.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set product and category URL suffixes.
    #[must_use]
    pub fn with_url_suffixes(mut self, suffixes: UrlSuffixes) -> Self {
        self.suffixes = Arc::new(suffixes);
        self
    }

    #[must_use]
    pub fn store(&self) -> &StoreContext {
        &self.store
    }

    #[must_use]
    pub fn website(&self) -> &WebsiteContext {
        &self.website
    }

    #[must_use]
    pub fn suffixes(&self) -> &UrlSuffixes {
        &self.suffixes
    }

    #[must_use]
    pub fn categories(&self) -> &dyn CategoryRepository {
        self.categories.as_ref()
    }

    #[must_use]
    pub fn cache(&self) -> &dyn Cache {
        self.cache.as_ref()
    }

    /// Shared handle to the cache, for services built on the same context.
    #[must_use]
    pub fn cache_handle(&self) -> Arc<dyn Cache> {
        Arc::clone(&self.cache)
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}
