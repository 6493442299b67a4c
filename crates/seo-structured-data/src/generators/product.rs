use serde_json::{Value, json};

use seo_catalog::{Entity, Product};
use seo_template::{format_price, media_url, product_url};

use crate::context::GeneratorContext;
use crate::error::GenerateError;
use crate::generator::{GenerationContext, Generator, StructuredData};
use crate::helpers::{DescriptionLimit, clean_description, clean_url};

const IN_STOCK: &str = "https://schema.org/InStock";
const OUT_OF_STOCK: &str = "https://schema.org/OutOfStock";
const NEW_CONDITION: &str = "https://schema.org/NewCondition";

/// `Product` with offer, brand, images and aggregate rating.
pub struct ProductGenerator {
    ctx: GeneratorContext,
}

impl ProductGenerator {
    #[must_use]
    pub fn new(ctx: GeneratorContext) -> Self {
        Self { ctx }
    }

    fn images(&self, product: &Product) -> Vec<String> {
        let mut images: Vec<String> = Vec::new();
        let paths = product.image.iter().chain(&product.gallery);
        for url in paths.map(|path| media_url(self.ctx.processors(), path)) {
            if !url.is_empty() && !images.contains(&url) {
                images.push(url);
            }
        }
        images
    }

    fn brand(&self, entity: &Entity) -> Option<Value> {
        let code = &self.ctx.settings().brand_attribute;
        let name = match entity.attribute(code)? {
            Value::String(s) => s,
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let name = name.trim();
        (!name.is_empty()).then(|| json!({ "@type": "Brand", "name": name }))
    }

    fn offer(&self, product: &Product, url: &str) -> Option<Value> {
        let price = product.effective_price()?;
        let mut offer = json!({
            "@type": "Offer",
            "price": format_price(price),
            "priceCurrency": self.ctx.store().currency,
            "availability": if product.in_stock { IN_STOCK } else { OUT_OF_STOCK },
            "itemCondition": NEW_CONDITION,
        });
        if !url.is_empty() {
            offer["url"] = Value::from(url);
        }
        Some(offer)
    }
}

/// Rating summary is a 0-100 percentage; schema.org wants 1-5 stars.
fn aggregate_rating(product: &Product) -> Option<Value> {
    let summary = product.rating_summary.filter(|r| *r > 0.0)?;
    if product.review_count == 0 {
        return None;
    }
    let stars = (summary / 20.0 * 10.0).round() / 10.0;
    Some(json!({
        "@type": "AggregateRating",
        "ratingValue": stars,
        "reviewCount": product.review_count,
        "bestRating": 5,
        "worstRating": 1,
    }))
}

impl Generator for ProductGenerator {
    fn schema_type(&self) -> &'static str {
        "Product"
    }

    fn context(&self) -> &GeneratorContext {
        &self.ctx
    }

    fn can_handle(&self, entity: &Entity) -> bool {
        entity.as_product().is_some()
    }

    fn build(
        &self,
        entity: &Entity,
        _context: &GenerationContext,
    ) -> Result<StructuredData, GenerateError> {
        let Some(product) = entity.as_product() else {
            return Ok(StructuredData::new());
        };
        let name = product.name.trim();
        if name.is_empty() {
            return Err(GenerateError::MissingField {
                schema_type: "Product",
                field: "name",
            });
        }

        let url = clean_url(&product_url(self.ctx.processors(), product));
        let mut data = StructuredData::new();
        data.insert("name".to_owned(), Value::from(name));
        if !product.sku.is_empty() {
            data.insert("sku".to_owned(), Value::from(product.sku.as_str()));
        }
        let description = product
            .description
            .as_deref()
            .and_then(|d| clean_description(d, DescriptionLimit::Long))
            .or_else(|| {
                product
                    .short_description
                    .as_deref()
                    .and_then(|d| clean_description(d, DescriptionLimit::Long))
            });
        if let Some(description) = description {
            data.insert("description".to_owned(), Value::from(description));
        }
        if !url.is_empty() {
            data.insert("url".to_owned(), Value::from(url.as_str()));
        }
        let images = self.images(product);
        if !images.is_empty() {
            data.insert("image".to_owned(), Value::from(images));
        }
        if let Some(brand) = self.brand(entity) {
            data.insert("brand".to_owned(), brand);
        }
        if let Some(offer) = self.offer(product, &url) {
            data.insert("offers".to_owned(), offer);
        }
        if let Some(rating) = aggregate_rating(product) {
            data.insert("aggregateRating".to_owned(), rating);
        }
        Ok(data)
    }
}
