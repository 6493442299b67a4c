use seo_catalog::{Category, Entity, EntityType, Product};

use super::category::category_value;
use super::{EntityResolver, attribute_fallback, flag, non_empty, opt_text};
use crate::html::clean_html;
use crate::value::format_price;
use crate::{ProcessorContext, RequestScope, TemplateError};

const VARIABLES: &[(&str, &str)] = &[
    ("product.id", "Product ID"),
    ("product.name", "Product Name"),
    ("product.sku", "Product SKU"),
    ("product.url_key", "Product URL Key"),
    ("product.url", "Product URL"),
    ("product.description", "Product Description"),
    ("product.short_description", "Product Short Description"),
    ("product.price", "Product Price"),
    ("product.final_price", "Product Final Price"),
    ("product.special_price", "Product Special Price"),
    ("product.weight", "Product Weight"),
    ("product.status", "Product Status"),
    ("product.visibility", "Product Visibility"),
    ("product.type_id", "Product Type"),
    ("product.attribute_set_id", "Attribute Set ID"),
    ("product.meta_title", "Product Meta Title"),
    ("product.meta_description", "Product Meta Description"),
    ("product.meta_keywords", "Product Meta Keywords"),
    ("product.categories", "Product Category Names"),
    ("product.main_category", "Product Main Category"),
    ("product.image", "Product Image URL"),
    ("product.small_image", "Product Small Image URL"),
    ("product.thumbnail", "Product Thumbnail URL"),
    ("product.gallery_images", "Product Gallery Image URLs"),
    ("product.created_at", "Product Created Date"),
    ("product.updated_at", "Product Updated Date"),
    ("product.in_stock", "Product In Stock"),
    ("product.stock_status", "Product Stock Status"),
    ("product.qty", "Product Quantity"),
    ("category.name", "Current Category Name"),
    ("category.url", "Current Category URL"),
];

/// Resolves `product.*` and `category.*` against a product.
///
/// `category.*` refers to the product's current category: the category being
/// browsed when the product is assigned to it, otherwise the deepest non-root
/// category the product is assigned to.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProductResolver;

impl EntityResolver for ProductResolver {
    fn entity_type(&self) -> EntityType {
        EntityType::Product
    }

    fn is_entity_prefix(&self, prefix: &str) -> bool {
        matches!(prefix, "product" | "category")
    }

    fn entity_value(
        &self,
        ctx: &ProcessorContext,
        scope: &mut RequestScope,
        entity: &Entity,
        segments: &[&str],
    ) -> Result<Option<String>, TemplateError> {
        let Some(product) = entity.as_product() else {
            return Ok(None);
        };
        let Some((prefix, path)) = segments.split_first() else {
            return Ok(None);
        };

        match *prefix {
            "product" => {
                let Some((property, rest)) = path.split_first() else {
                    return Ok(None);
                };
                product_value(ctx, scope, entity, product, property, rest)
            }
            "category" => {
                let Some(category) = current_category(ctx, scope, entity, product)? else {
                    return Ok(None);
                };
                match path.split_first() {
                    Some((property, rest)) => Ok(category_value(ctx, &category, property, rest)),
                    None => Ok(non_empty(category.name)),
                }
            }
            _ => Ok(None),
        }
    }

    fn entity_variables(&self) -> &'static [(&'static str, &'static str)] {
        VARIABLES
    }
}

fn product_value(
    ctx: &ProcessorContext,
    scope: &mut RequestScope,
    entity: &Entity,
    product: &Product,
    property: &str,
    rest: &[&str],
) -> Result<Option<String>, TemplateError> {
    let value = match property {
        "id" | "entity_id" => product.id.to_string(),
        "name" => product.name.clone(),
        "sku" => product.sku.clone(),
        "url_key" => opt_text(product.url_key.as_deref()),
        "url" => product_url(ctx, product),
        "description" => product.description.as_deref().map(clean_html).unwrap_or_default(),
        "short_description" => product
            .short_description
            .as_deref()
            .map(clean_html)
            .unwrap_or_default(),
        "price" => product.price.map(format_price).unwrap_or_default(),
        "final_price" => product.effective_price().map(format_price).unwrap_or_default(),
        "special_price" => product.special_price.map(format_price).unwrap_or_default(),
        "weight" => product.weight.map(|w| w.to_string()).unwrap_or_default(),
        "status" => product.status.to_string(),
        "visibility" => product.visibility.to_string(),
        "type_id" => product.type_id.clone(),
        "attribute_set_id" => product.attribute_set_id.to_string(),
        "meta_title" => opt_text(product.meta_title.as_deref()),
        "meta_description" => opt_text(product.meta_description.as_deref()),
        "meta_keyword" | "meta_keywords" => opt_text(product.meta_keyword.as_deref()),
        "categories" | "category_names" => category_names(ctx, scope, product)?.join(", "),
        "main_category" => current_category(ctx, scope, entity, product)?
            .map(|c| c.name)
            .unwrap_or_default(),
        "image" => product
            .image
            .as_deref()
            .map(|path| media_url(ctx, path))
            .unwrap_or_default(),
        "small_image" => product
            .small_image
            .as_deref()
            .map(|path| media_url(ctx, path))
            .unwrap_or_default(),
        "thumbnail" => product
            .thumbnail
            .as_deref()
            .map(|path| media_url(ctx, path))
            .unwrap_or_default(),
        "gallery_images" => product
            .gallery
            .iter()
            .map(|path| media_url(ctx, path))
            .filter(|url| !url.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        "created_at" => opt_text(product.created_at.as_deref()),
        "updated_at" => opt_text(product.updated_at.as_deref()),
        "in_stock" | "is_in_stock" => flag(product.in_stock),
        "stock_status" => String::from(if product.in_stock { "In Stock" } else { "Out of Stock" }),
        "qty" => product.qty.to_string(),
        _ => return Ok(attribute_fallback(entity, property, rest).and_then(non_empty)),
    };
    Ok(non_empty(value))
}

/// Storefront URL of a product.
pub fn product_url(ctx: &ProcessorContext, product: &Product) -> String {
    if let Some(path) = product.url_path.as_deref().filter(|p| !p.is_empty()) {
        return ctx.store().url(path);
    }
    product
        .url_key
        .as_deref()
        .filter(|key| !key.is_empty())
        .map(|key| ctx.store().url(&format!("{key}{}", ctx.suffixes().product)))
        .unwrap_or_default()
}

/// Media URL of a product image path relative to `catalog/product`.
pub fn media_url(ctx: &ProcessorContext, path: &str) -> String {
    if path.is_empty() || path == "no_selection" {
        return String::new();
    }
    ctx.store()
        .media(&format!("catalog/product/{}", path.trim_start_matches('/')))
}

/// Names of the non-root categories a product is assigned to.
fn category_names(
    ctx: &ProcessorContext,
    scope: &mut RequestScope,
    product: &Product,
) -> Result<Vec<String>, TemplateError> {
    let mut names = Vec::new();
    for id in &product.category_ids {
        if let Some(category) = scope.load_category(ctx.categories(), *id)?
            && !category.is_root()
        {
            names.push(category.name);
        }
    }
    Ok(names)
}

/// The category `category.*` paths resolve against for `product`.
///
/// The browsed category wins when the product is assigned to it. Otherwise
/// the deepest assigned non-root category is picked (first one on ties) and
/// the choice is memoized for the rest of the request.
fn current_category(
    ctx: &ProcessorContext,
    scope: &mut RequestScope,
    entity: &Entity,
    product: &Product,
) -> Result<Option<Category>, TemplateError> {
    if let Some(current) = scope.current_category()
        && product.category_ids.contains(&current.id)
    {
        return Ok(Some(current.clone()));
    }

    let identity = entity.identity();
    let main_id = if let Some(memo) = scope.main_category(&identity) {
        memo
    } else {
        let mut deepest: Option<Category> = None;
        for id in &product.category_ids {
            let Some(category) = scope.load_category(ctx.categories(), *id)? else {
                continue;
            };
            if category.is_root() {
                continue;
            }
            if deepest.as_ref().is_none_or(|d| category.level > d.level) {
                deepest = Some(category);
            }
        }
        let main_id = deepest.map(|c| c.id);
        scope.memo_main_category(identity, main_id);
        main_id
    };

    match main_id {
        Some(id) => Ok(scope.load_category(ctx.categories(), id)?),
        None => Ok(None),
    }
}
