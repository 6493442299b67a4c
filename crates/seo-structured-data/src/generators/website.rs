use serde_json::{Value, json};

use seo_catalog::Entity;

use crate::context::GeneratorContext;
use crate::error::GenerateError;
use crate::generator::{GenerationContext, Generator, StructuredData};
use crate::generators::is_home_page;

/// Storefront search path; `{search_term_string}` is the query placeholder.
const SEARCH_PATH: &str = "catalogsearch/result/?q={search_term_string}";

/// `WebSite` with a sitelinks `SearchAction`, for the home page.
pub struct WebSiteGenerator {
    ctx: GeneratorContext,
}

impl WebSiteGenerator {
    #[must_use]
    pub fn new(ctx: GeneratorContext) -> Self {
        Self { ctx }
    }
}

impl Generator for WebSiteGenerator {
    fn schema_type(&self) -> &'static str {
        "WebSite"
    }

    fn context(&self) -> &GeneratorContext {
        &self.ctx
    }

    fn can_handle(&self, entity: &Entity) -> bool {
        is_home_page(entity)
    }

    fn build(
        &self,
        _entity: &Entity,
        _context: &GenerationContext,
    ) -> Result<StructuredData, GenerateError> {
        let store = self.ctx.store();
        let name = self
            .ctx
            .settings()
            .organization
            .as_ref()
            .map(|org| org.name.trim())
            .filter(|name| !name.is_empty())
            .unwrap_or(store.name.as_str());

        let mut data = StructuredData::new();
        data.insert("name".to_owned(), Value::from(name));
        data.insert("url".to_owned(), Value::from(store.base_url.as_str()));
        data.insert(
            "potentialAction".to_owned(),
            json!({
                "@type": "SearchAction",
                "target": {
                    "@type": "EntryPoint",
                    "urlTemplate": store.url(SEARCH_PATH),
                },
                "query-input": "required name=search_term_string",
            }),
        );
        Ok(data)
    }
}
