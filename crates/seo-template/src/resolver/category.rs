use seo_catalog::{Category, Entity, EntityType};

use super::{EntityResolver, flag, non_empty, opt_text};
use crate::html::clean_html;
use crate::value::{to_text, traverse};
use crate::{ProcessorContext, RequestScope, TemplateError};

const VARIABLES: &[(&str, &str)] = &[
    ("category.id", "Category ID"),
    ("category.name", "Category Name"),
    ("category.url_key", "Category URL Key"),
    ("category.url", "Category URL"),
    ("category.description", "Category Description"),
    ("category.meta_title", "Category Meta Title"),
    ("category.meta_description", "Category Meta Description"),
    ("category.meta_keywords", "Category Meta Keywords"),
    ("category.level", "Category Level"),
    ("category.position", "Category Position"),
    ("category.product_count", "Number of Products"),
    ("category.is_active", "Category Is Active"),
    ("parent_category.name", "Parent Category Name"),
    ("parent_category.url", "Parent Category URL"),
];

/// Resolves `category.*` and `parent_category.*` against a category.
#[derive(Clone, Copy, Debug, Default)]
pub struct CategoryResolver;

impl EntityResolver for CategoryResolver {
    fn entity_type(&self) -> EntityType {
        EntityType::Category
    }

    fn is_entity_prefix(&self, prefix: &str) -> bool {
        matches!(prefix, "category" | "parent_category")
    }

    fn entity_value(
        &self,
        ctx: &ProcessorContext,
        scope: &mut RequestScope,
        entity: &Entity,
        segments: &[&str],
    ) -> Result<Option<String>, TemplateError> {
        let Some(category) = entity.as_category() else {
            return Ok(None);
        };
        let Some((prefix, path)) = segments.split_first() else {
            return Ok(None);
        };
        let Some((property, rest)) = path.split_first() else {
            return Ok(None);
        };

        match *prefix {
            "category" => Ok(category_value(ctx, category, property, rest)),
            "parent_category" => {
                let Some(parent_id) = category.parent_id else {
                    return Ok(None);
                };
                let parent = scope.load_category(ctx.categories(), parent_id)?;
                Ok(parent.and_then(|p| category_value(ctx, &p, property, rest)))
            }
            _ => Ok(None),
        }
    }

    fn entity_variables(&self) -> &'static [(&'static str, &'static str)] {
        VARIABLES
    }
}

/// Resolve one category property.
///
/// Shared with the product resolver, whose `category.*` paths resolve
/// against the product's current category.
pub(crate) fn category_value(
    ctx: &ProcessorContext,
    category: &Category,
    property: &str,
    rest: &[&str],
) -> Option<String> {
    let value = match property {
        "id" | "entity_id" => category.id.to_string(),
        "name" => category.name.clone(),
        "url_key" => opt_text(category.url_key.as_deref()),
        "url" => category_url(ctx, category),
        "description" => category.description.as_deref().map(clean_html).unwrap_or_default(),
        "meta_title" => opt_text(category.meta_title.as_deref()),
        "meta_description" => opt_text(category.meta_description.as_deref()),
        "meta_keywords" | "meta_keyword" => opt_text(category.meta_keywords.as_deref()),
        "level" => category.level.to_string(),
        "position" => category.position.to_string(),
        "product_count" => category.product_count.to_string(),
        "is_active" => flag(category.is_active),
        "path" => category.path.clone(),
        _ => {
            return category
                .custom_attributes
                .get(property)
                .or_else(|| category.data.get(property))
                .and_then(|value| traverse(value, rest))
                .map(to_text)
                .and_then(non_empty);
        }
    };
    non_empty(value)
}

/// Storefront URL of a category.
pub fn category_url(ctx: &ProcessorContext, category: &Category) -> String {
    category
        .url_path
        .as_deref()
        .or(category.url_key.as_deref())
        .filter(|path| !path.is_empty())
        .map(|path| ctx.store().url(&format!("{path}{}", ctx.suffixes().category)))
        .unwrap_or_default()
}
