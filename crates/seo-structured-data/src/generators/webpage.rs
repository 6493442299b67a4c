use serde_json::{Value, json};

use seo_catalog::Entity;
use seo_template::page_url;

use crate::context::GeneratorContext;
use crate::error::GenerateError;
use crate::generator::{GenerationContext, Generator, StructuredData};
use crate::helpers::{DescriptionLimit, clean_description, clean_url, iso_date};

/// `WebPage` for CMS pages.
pub struct WebPageGenerator {
    ctx: GeneratorContext,
}

impl WebPageGenerator {
    #[must_use]
    pub fn new(ctx: GeneratorContext) -> Self {
        Self { ctx }
    }
}

impl Generator for WebPageGenerator {
    fn schema_type(&self) -> &'static str {
        "WebPage"
    }

    fn context(&self) -> &GeneratorContext {
        &self.ctx
    }

    fn can_handle(&self, entity: &Entity) -> bool {
        entity.as_cms_page().is_some()
    }

    fn build(
        &self,
        entity: &Entity,
        _context: &GenerationContext,
    ) -> Result<StructuredData, GenerateError> {
        let Some(page) = entity.as_cms_page() else {
            return Ok(StructuredData::new());
        };
        let name = page
            .meta_title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .unwrap_or(page.title.trim());
        if name.is_empty() {
            return Err(GenerateError::MissingField {
                schema_type: "WebPage",
                field: "title",
            });
        }

        let store = self.ctx.store();
        let mut data = StructuredData::new();
        data.insert("name".to_owned(), Value::from(name));
        data.insert(
            "url".to_owned(),
            Value::from(clean_url(&page_url(self.ctx.processors(), page))),
        );
        let description = page
            .meta_description
            .as_deref()
            .and_then(|d| clean_description(d, DescriptionLimit::Short))
            .or_else(|| {
                page.content
                    .as_deref()
                    .and_then(|c| clean_description(c, DescriptionLimit::Short))
            });
        if let Some(description) = description {
            data.insert("description".to_owned(), Value::from(description));
        }
        if let Some(published) = page.created_at.as_deref().and_then(iso_date) {
            data.insert("datePublished".to_owned(), Value::from(published));
        }
        if let Some(modified) = page.updated_at.as_deref().and_then(iso_date) {
            data.insert("dateModified".to_owned(), Value::from(modified));
        }
        data.insert(
            "isPartOf".to_owned(),
            json!({
                "@type": "WebSite",
                "name": store.name,
                "url": store.base_url,
            }),
        );
        Ok(data)
    }
}
