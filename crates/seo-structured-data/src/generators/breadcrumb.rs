use serde_json::{Value, json};

use seo_catalog::{Category, Entity, Product};
use seo_template::{category_url, product_url};

use crate::context::GeneratorContext;
use crate::error::GenerateError;
use crate::generator::{GenerationContext, Generator, StructuredData};
use crate::helpers::clean_url;

/// `BreadcrumbList` from the home page through the category path.
///
/// Products hang below the browsed category (`category_id` in the
/// generation context) when they are assigned to it, otherwise below their
/// deepest assigned category.
pub struct BreadcrumbGenerator {
    ctx: GeneratorContext,
}

impl BreadcrumbGenerator {
    #[must_use]
    pub fn new(ctx: GeneratorContext) -> Self {
        Self { ctx }
    }

    /// Load a category, treating a missing one as absent.
    fn category(&self, id: u64) -> Result<Option<Category>, GenerateError> {
        match self.ctx.categories().get_by_id(id) {
            Ok(category) => Ok(Some(category)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn push_category_path(
        &self,
        trail: &mut Vec<(String, String)>,
        category: &Category,
    ) -> Result<(), GenerateError> {
        for id in category.ancestor_ids() {
            if let Some(ancestor) = self.category(id)?
                && !ancestor.is_root()
            {
                let url = category_url(self.ctx.processors(), &ancestor);
                trail.push((ancestor.name, url));
            }
        }
        if !category.is_root() {
            let url = category_url(self.ctx.processors(), category);
            trail.push((category.name.clone(), url));
        }
        Ok(())
    }

    fn product_category(
        &self,
        product: &Product,
        context: &GenerationContext,
    ) -> Result<Option<Category>, GenerateError> {
        if let Some(id) = context.get("category_id").and_then(Value::as_u64)
            && product.category_ids.contains(&id)
            && let Some(category) = self.category(id)?
        {
            return Ok(Some(category));
        }

        let mut deepest: Option<Category> = None;
        for id in &product.category_ids {
            let Some(category) = self.category(*id)? else {
                continue;
            };
            if !category.is_root() && deepest.as_ref().is_none_or(|d| category.level > d.level) {
                deepest = Some(category);
            }
        }
        Ok(deepest)
    }
}

impl Generator for BreadcrumbGenerator {
    fn schema_type(&self) -> &'static str {
        "BreadcrumbList"
    }

    fn context(&self) -> &GeneratorContext {
        &self.ctx
    }

    fn can_handle(&self, entity: &Entity) -> bool {
        matches!(entity, Entity::Product(_) | Entity::Category(_))
    }

    fn build(
        &self,
        entity: &Entity,
        context: &GenerationContext,
    ) -> Result<StructuredData, GenerateError> {
        let mut trail = vec![("Home".to_owned(), self.ctx.store().base_url.clone())];
        match entity {
            Entity::Category(category) => self.push_category_path(&mut trail, category)?,
            Entity::Product(product) => {
                if let Some(category) = self.product_category(product, context)? {
                    self.push_category_path(&mut trail, &category)?;
                }
                trail.push((
                    product.name.clone(),
                    product_url(self.ctx.processors(), product),
                ));
            }
            Entity::CmsPage(_) => return Ok(StructuredData::new()),
        }
        if trail.len() < 2 {
            return Ok(StructuredData::new());
        }

        let items: Vec<Value> = trail
            .into_iter()
            .enumerate()
            .map(|(index, (name, url))| {
                let mut item = json!({
                    "@type": "ListItem",
                    "position": index + 1,
                    "name": name,
                });
                let url = clean_url(&url);
                if !url.is_empty() {
                    item["item"] = Value::from(url);
                }
                item
            })
            .collect();

        let mut data = StructuredData::new();
        data.insert("itemListElement".to_owned(), Value::from(items));
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::test_context_with;
    use pretty_assertions::assert_eq;
    use seo_catalog::MemoryCatalog;

    fn category(id: u64, name: &str, level: u32, path: &str) -> Category {
        Category {
            id,
            name: name.to_owned(),
            level,
            path: path.to_owned(),
            url_path: Some(path_slug(name, level)),
            is_active: true,
            ..Category::default()
        }
    }

    fn path_slug(name: &str, level: u32) -> String {
        match level {
            2 => name.to_lowercase(),
            _ => format!("gear/{}", name.to_lowercase()),
        }
    }

    fn catalog() -> MemoryCatalog {
        MemoryCatalog::new()
            .with_category(category(2, "Default Category", 1, "1/2"))
            .with_category(category(3, "Gear", 2, "1/2/3"))
            .with_category(category(4, "Bags", 3, "1/2/3/4"))
            .with_category(category(5, "Sale", 2, "1/2/5"))
    }

    fn names(data: &StructuredData) -> Vec<String> {
        data["itemListElement"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap().to_owned())
            .collect()
    }

    #[test]
    fn test_category_trail() {
        let generator = BreadcrumbGenerator::new(test_context_with(catalog()));
        let bags = Entity::from(category(4, "Bags", 3, "1/2/3/4"));
        let data = generator.build(&bags, &GenerationContext::new()).unwrap();

        assert_eq!(names(&data), vec!["Home", "Gear", "Bags"]);
        assert_eq!(
            data["itemListElement"][2],
            json!({
                "@type": "ListItem",
                "position": 3,
                "name": "Bags",
                "item": "http://localhost/gear/bags.html"
            })
        );
        assert_eq!(data["itemListElement"][0]["item"], json!("http://localhost/"));
    }

    #[test]
    fn test_product_uses_deepest_category() {
        let generator = BreadcrumbGenerator::new(test_context_with(catalog()));
        let product = Entity::from(Product {
            id: 1,
            name: "Duffle".to_owned(),
            url_key: Some("duffle".to_owned()),
            category_ids: vec![2, 5, 4],
            ..Product::default()
        });
        let data = generator.build(&product, &GenerationContext::new()).unwrap();
        assert_eq!(names(&data), vec!["Home", "Gear", "Bags", "Duffle"]);

        let browsing = GenerationContext::from([("category_id".to_owned(), json!(5))]);
        let data = generator.build(&product, &browsing).unwrap();
        assert_eq!(names(&data), vec!["Home", "Sale", "Duffle"]);
    }

    #[test]
    fn test_unassigned_browsed_category_is_ignored() {
        let generator = BreadcrumbGenerator::new(test_context_with(catalog()));
        let product = Entity::from(Product {
            id: 1,
            name: "Duffle".to_owned(),
            category_ids: vec![4],
            ..Product::default()
        });
        let browsing = GenerationContext::from([("category_id".to_owned(), json!(5))]);
        let data = generator.build(&product, &browsing).unwrap();
        assert_eq!(names(&data), vec!["Home", "Gear", "Bags", "Duffle"]);
        // No URL key: the last crumb has no link
        assert!(data["itemListElement"][3].get("item").is_none());
    }

    #[test]
    fn test_root_category_has_no_trail() {
        let generator = BreadcrumbGenerator::new(test_context_with(catalog()));
        let root = Entity::from(category(2, "Default Category", 1, "1/2"));
        assert!(generator.build(&root, &GenerationContext::new()).unwrap().is_empty());
    }
}
