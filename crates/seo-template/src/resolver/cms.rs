use seo_catalog::{CmsPage, Entity, EntityType};

use super::{EntityResolver, attribute_fallback, flag, non_empty, opt_text};
use crate::html::clean_html;
use crate::{ProcessorContext, RequestScope, TemplateError};

const VARIABLES: &[(&str, &str)] = &[
    ("cms_page.id", "Page ID"),
    ("cms_page.title", "Page Title"),
    ("cms_page.identifier", "Page URL Identifier"),
    ("cms_page.content", "Page Content"),
    ("cms_page.content_heading", "Page Content Heading"),
    ("cms_page.meta_title", "Page Meta Title"),
    ("cms_page.meta_description", "Page Meta Description"),
    ("cms_page.meta_keywords", "Page Meta Keywords"),
    ("cms_page.url", "Page URL"),
    ("cms_page.created_at", "Page Created Date"),
    ("cms_page.updated_at", "Page Updated Date"),
    ("cms_page.is_active", "Page Is Active"),
    ("cms_page.page_layout", "Page Layout"),
];

/// Resolves `cms_page.*` and `page.*` against a CMS page.
#[derive(Clone, Copy, Debug, Default)]
pub struct CmsPageResolver;

impl EntityResolver for CmsPageResolver {
    fn entity_type(&self) -> EntityType {
        EntityType::CmsPage
    }

    fn is_entity_prefix(&self, prefix: &str) -> bool {
        matches!(prefix, "cms_page" | "page")
    }

    fn entity_value(
        &self,
        ctx: &ProcessorContext,
        _scope: &mut RequestScope,
        entity: &Entity,
        segments: &[&str],
    ) -> Result<Option<String>, TemplateError> {
        let Some(page) = entity.as_cms_page() else {
            return Ok(None);
        };
        let Some((property, rest)) = segments.get(1..).and_then(<[&str]>::split_first) else {
            return Ok(None);
        };

        let value = match *property {
            "id" | "page_id" => page.id.to_string(),
            "title" => page.title.clone(),
            "identifier" => page.identifier.clone(),
            "content" => page.content.as_deref().map(clean_html).unwrap_or_default(),
            "content_heading" => opt_text(page.content_heading.as_deref()),
            "meta_title" => opt_text(page.meta_title.as_deref()),
            "meta_description" => opt_text(page.meta_description.as_deref()),
            "meta_keywords" | "meta_keyword" => opt_text(page.meta_keywords.as_deref()),
            "url" => page_url(ctx, page),
            "created_at" | "creation_time" => opt_text(page.created_at.as_deref()),
            "updated_at" | "update_time" => opt_text(page.updated_at.as_deref()),
            "is_active" => flag(page.is_active),
            "page_layout" => opt_text(page.page_layout.as_deref()),
            _ => return Ok(attribute_fallback(entity, property, rest).and_then(non_empty)),
        };
        Ok(non_empty(value))
    }

    fn entity_variables(&self) -> &'static [(&'static str, &'static str)] {
        VARIABLES
    }
}

/// Storefront URL of a CMS page. The `home` page lives at the base URL.
pub fn page_url(ctx: &ProcessorContext, page: &CmsPage) -> String {
    if page.identifier == "home" {
        return ctx.store().base_url.clone();
    }
    ctx.store().url(&page.identifier)
}
