use serde_json::{Value, json};

use seo_catalog::Entity;
use seo_template::category_url;

use crate::context::GeneratorContext;
use crate::error::GenerateError;
use crate::generator::{GenerationContext, Generator, StructuredData};
use crate::helpers::{DescriptionLimit, clean_description, clean_url};

/// `CollectionPage` for a shopper-visible category.
pub struct CollectionPageGenerator {
    ctx: GeneratorContext,
}

impl CollectionPageGenerator {
    #[must_use]
    pub fn new(ctx: GeneratorContext) -> Self {
        Self { ctx }
    }
}

impl Generator for CollectionPageGenerator {
    fn schema_type(&self) -> &'static str {
        "CollectionPage"
    }

    fn context(&self) -> &GeneratorContext {
        &self.ctx
    }

    fn can_handle(&self, entity: &Entity) -> bool {
        entity.as_category().is_some_and(|c| !c.is_root())
    }

    fn build(
        &self,
        entity: &Entity,
        _context: &GenerationContext,
    ) -> Result<StructuredData, GenerateError> {
        let Some(category) = entity.as_category() else {
            return Ok(StructuredData::new());
        };
        if category.name.trim().is_empty() {
            return Err(GenerateError::MissingField {
                schema_type: "CollectionPage",
                field: "name",
            });
        }

        let mut data = StructuredData::new();
        data.insert("name".to_owned(), Value::from(category.name.trim()));
        let url = clean_url(&category_url(self.ctx.processors(), category));
        if !url.is_empty() {
            data.insert("url".to_owned(), Value::from(url));
        }
        let description = category
            .meta_description
            .as_deref()
            .and_then(|d| clean_description(d, DescriptionLimit::Short))
            .or_else(|| {
                category
                    .description
                    .as_deref()
                    .and_then(|d| clean_description(d, DescriptionLimit::Short))
            });
        if let Some(description) = description {
            data.insert("description".to_owned(), Value::from(description));
        }
        if let Some(image) = category.image.as_deref().filter(|i| !i.is_empty()) {
            let image = self
                .ctx
                .store()
                .media(&format!("catalog/category/{}", image.trim_start_matches('/')));
            data.insert("image".to_owned(), Value::from(image));
        }
        if category.product_count > 0 {
            data.insert(
                "mainEntity".to_owned(),
                json!({
                    "@type": "ItemList",
                    "numberOfItems": category.product_count,
                }),
            );
        }
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_context;
    use pretty_assertions::assert_eq;
    use seo_catalog::Category;

    #[test]
    fn test_collection_page() {
        let bags = Entity::from(Category {
            id: 4,
            name: "Bags".to_owned(),
            level: 3,
            url_path: Some("gear/bags".to_owned()),
            description: Some("<p>Bags for <em>every</em> trip</p>".to_owned()),
            image: Some("bags.jpg".to_owned()),
            product_count: 14,
            ..Category::default()
        });
        let data = CollectionPageGenerator::new(test_context())
            .build(&bags, &GenerationContext::new())
            .unwrap();

        assert_eq!(
            Value::Object(data),
            json!({
                "name": "Bags",
                "url": "http://localhost/gear/bags.html",
                "description": "Bags for every trip",
                "image": "http://localhost/media/catalog/category/bags.jpg",
                "mainEntity": { "@type": "ItemList", "numberOfItems": 14 }
            })
        );
    }

    #[test]
    fn test_root_categories_are_skipped() {
        let generator = CollectionPageGenerator::new(test_context());
        let root = Entity::from(Category {
            id: 2,
            level: 1,
            ..Category::default()
        });
        assert!(!generator.can_handle(&root));
    }
}
