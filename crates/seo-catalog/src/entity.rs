//! Catalog and content entities.
//!
//! Each entity carries a fixed set of typed fields plus two open maps:
//! `custom_attributes` (EAV attributes such as `manufacturer` or `color`) and
//! `data` (anything else loaded alongside the entity). [`Entity::attribute`]
//! looks a code up in that order: typed field, custom attribute, data bag.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Kind of entity a template or processor applies to.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Catalog product.
    #[default]
    Product,
    /// Catalog category.
    Category,
    /// CMS content page.
    CmsPage,
}

impl EntityType {
    /// All entity types.
    pub const ALL: [Self; 3] = [Self::Product, Self::Category, Self::CmsPage];

    /// Stable string code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Product => "product",
            Self::Category => "category",
            Self::CmsPage => "cms_page",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(Self::Product),
            "category" => Ok(Self::Category),
            "cms_page" | "cms" | "page" => Ok(Self::CmsPage),
            other => Err(format!("unknown entity type: {other}")),
        }
    }
}

/// Catalog product.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    pub id: u64,
    pub sku: String,
    pub name: String,
    /// Product type code (`simple`, `configurable`, ...).
    pub type_id: String,
    pub attribute_set_id: u32,
    /// 1 = enabled, 2 = disabled.
    pub status: u8,
    /// 1 = not visible, 2 = catalog, 3 = search, 4 = both.
    pub visibility: u8,
    pub price: Option<f64>,
    pub special_price: Option<f64>,
    /// Precomputed final price; derived from price and special price when absent.
    pub final_price: Option<f64>,
    pub weight: Option<f64>,
    pub description: Option<String>,
    pub short_description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keyword: Option<String>,
    pub url_key: Option<String>,
    /// Rewritten request path, if any (`gear/bags/joust-duffle-bag.html`).
    pub url_path: Option<String>,
    /// Base image path relative to `catalog/product`.
    pub image: Option<String>,
    pub small_image: Option<String>,
    pub thumbnail: Option<String>,
    pub gallery: Vec<String>,
    pub category_ids: Vec<u64>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub in_stock: bool,
    pub qty: f64,
    /// Average rating as a percentage (0-100).
    pub rating_summary: Option<f64>,
    pub review_count: u32,
    pub custom_attributes: BTreeMap<String, Value>,
    pub data: BTreeMap<String, Value>,
}

impl Product {
    /// Effective selling price.
    ///
    /// Uses `final_price` when set, otherwise the lower of `price` and
    /// `special_price`.
    #[must_use]
    pub fn effective_price(&self) -> Option<f64> {
        if let Some(final_price) = self.final_price {
            return Some(final_price);
        }
        match (self.price, self.special_price) {
            (Some(price), Some(special)) => Some(price.min(special)),
            (price, special) => price.or(special),
        }
    }

    fn field(&self, code: &str) -> Option<Value> {
        let value = match code {
            "id" | "entity_id" => Value::from(self.id),
            "sku" => Value::from(self.sku.as_str()),
            "name" => Value::from(self.name.as_str()),
            "type_id" => Value::from(self.type_id.as_str()),
            "attribute_set_id" => Value::from(self.attribute_set_id),
            "status" => Value::from(self.status),
            "visibility" => Value::from(self.visibility),
            "price" => opt_f64(self.price),
            "special_price" => opt_f64(self.special_price),
            "final_price" => opt_f64(self.effective_price()),
            "weight" => opt_f64(self.weight),
            "description" => opt_str(self.description.as_deref()),
            "short_description" => opt_str(self.short_description.as_deref()),
            "meta_title" => opt_str(self.meta_title.as_deref()),
            "meta_description" => opt_str(self.meta_description.as_deref()),
            "meta_keyword" => opt_str(self.meta_keyword.as_deref()),
            "url_key" => opt_str(self.url_key.as_deref()),
            "image" => opt_str(self.image.as_deref()),
            "small_image" => opt_str(self.small_image.as_deref()),
            "thumbnail" => opt_str(self.thumbnail.as_deref()),
            "category_ids" => Value::from(self.category_ids.clone()),
            "created_at" => opt_str(self.created_at.as_deref()),
            "updated_at" => opt_str(self.updated_at.as_deref()),
            "is_in_stock" | "in_stock" => Value::from(self.in_stock),
            "qty" => Value::from(self.qty),
            _ => return None,
        };
        Some(value)
    }
}

/// Catalog category.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Category {
    pub id: u64,
    pub parent_id: Option<u64>,
    pub name: String,
    pub url_key: Option<String>,
    /// Full request path without suffix (`gear/bags`).
    pub url_path: Option<String>,
    pub description: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    /// Tree depth: 0 = catalog root, 1 = store root category.
    pub level: u32,
    pub position: u32,
    /// Slash-separated id path from the root (`1/2/5`).
    pub path: String,
    pub is_active: bool,
    pub product_count: u32,
    pub image: Option<String>,
    pub custom_attributes: BTreeMap<String, Value>,
    pub data: BTreeMap<String, Value>,
}

impl Category {
    /// Root categories (levels 0 and 1) are never shown to shoppers.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.level <= 1
    }

    /// Ancestor ids from the path, excluding the category itself.
    #[must_use]
    pub fn ancestor_ids(&self) -> Vec<u64> {
        self.path
            .split('/')
            .filter_map(|id| id.parse().ok())
            .filter(|id| *id != self.id)
            .collect()
    }

    fn field(&self, code: &str) -> Option<Value> {
        let value = match code {
            "id" | "entity_id" => Value::from(self.id),
            "parent_id" => self.parent_id.map_or(Value::Null, Value::from),
            "name" => Value::from(self.name.as_str()),
            "url_key" => opt_str(self.url_key.as_deref()),
            "url_path" => opt_str(self.url_path.as_deref()),
            "description" => opt_str(self.description.as_deref()),
            "meta_title" => opt_str(self.meta_title.as_deref()),
            "meta_description" => opt_str(self.meta_description.as_deref()),
            "meta_keywords" => opt_str(self.meta_keywords.as_deref()),
            "level" => Value::from(self.level),
            "position" => Value::from(self.position),
            "path" => Value::from(self.path.as_str()),
            "is_active" => Value::from(self.is_active),
            "product_count" => Value::from(self.product_count),
            "image" => opt_str(self.image.as_deref()),
            _ => return None,
        };
        Some(value)
    }
}

/// CMS content page.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CmsPage {
    pub id: u64,
    /// URL identifier (`about-us`, `home`).
    pub identifier: String,
    pub title: String,
    pub content: Option<String>,
    pub content_heading: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub page_layout: Option<String>,
    pub is_active: bool,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
    pub data: BTreeMap<String, Value>,
}

impl CmsPage {
    fn field(&self, code: &str) -> Option<Value> {
        let value = match code {
            "id" | "page_id" => Value::from(self.id),
            "identifier" => Value::from(self.identifier.as_str()),
            "title" => Value::from(self.title.as_str()),
            "content" => opt_str(self.content.as_deref()),
            "content_heading" => opt_str(self.content_heading.as_deref()),
            "meta_title" => opt_str(self.meta_title.as_deref()),
            "meta_description" => opt_str(self.meta_description.as_deref()),
            "meta_keywords" => opt_str(self.meta_keywords.as_deref()),
            "page_layout" => opt_str(self.page_layout.as_deref()),
            "is_active" => Value::from(self.is_active),
            "creation_time" | "created_at" => opt_str(self.created_at.as_deref()),
            "update_time" | "updated_at" => opt_str(self.updated_at.as_deref()),
            _ => return None,
        };
        Some(value)
    }
}

/// An entity the SEO engine can describe.
///
/// Dispatch on the variant replaces runtime capability probing: processors
/// and generators match on the tag once instead of testing every candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "entity_type", rename_all = "snake_case")]
pub enum Entity {
    Product(Product),
    Category(Category),
    CmsPage(CmsPage),
}

impl Entity {
    /// Kind tag of this entity.
    #[must_use]
    pub fn entity_type(&self) -> EntityType {
        match self {
            Self::Product(_) => EntityType::Product,
            Self::Category(_) => EntityType::Category,
            Self::CmsPage(_) => EntityType::CmsPage,
        }
    }

    /// Persisted id (0 for entities that were never saved).
    #[must_use]
    pub fn id(&self) -> u64 {
        match self {
            Self::Product(p) => p.id,
            Self::Category(c) => c.id,
            Self::CmsPage(p) => p.id,
        }
    }

    /// Stable identity used in cache keys.
    ///
    /// Saved entities are identified by type and id. Unsaved entities (id 0)
    /// fall back to a hash of their serialized content.
    #[must_use]
    pub fn identity(&self) -> String {
        let id = self.id();
        if id != 0 {
            return format!("{}:{id}", self.entity_type());
        }
        let bytes = serde_json::to_vec(self).unwrap_or_default();
        let digest = Sha256::digest(&bytes);
        format!("{}:anon-{}", self.entity_type(), &hex::encode(digest)[..16])
    }

    /// Look up an attribute by code.
    ///
    /// Typed fields win, then custom attributes, then the data bag. Returns
    /// `None` when the code is unknown everywhere.
    #[must_use]
    pub fn attribute(&self, code: &str) -> Option<Value> {
        match self {
            Self::Product(p) => p
                .field(code)
                .or_else(|| p.custom_attributes.get(code).cloned())
                .or_else(|| p.data.get(code).cloned()),
            Self::Category(c) => c
                .field(code)
                .or_else(|| c.custom_attributes.get(code).cloned())
                .or_else(|| c.data.get(code).cloned()),
            Self::CmsPage(p) => p.field(code).or_else(|| p.data.get(code).cloned()),
        }
    }

    /// Product payload, if this is a product.
    #[must_use]
    pub fn as_product(&self) -> Option<&Product> {
        match self {
            Self::Product(p) => Some(p),
            _ => None,
        }
    }

    /// Category payload, if this is a category.
    #[must_use]
    pub fn as_category(&self) -> Option<&Category> {
        match self {
            Self::Category(c) => Some(c),
            _ => None,
        }
    }

    /// CMS page payload, if this is a CMS page.
    #[must_use]
    pub fn as_cms_page(&self) -> Option<&CmsPage> {
        match self {
            Self::CmsPage(p) => Some(p),
            _ => None,
        }
    }
}

impl From<Product> for Entity {
    fn from(product: Product) -> Self {
        Self::Product(product)
    }
}

impl From<Category> for Entity {
    fn from(category: Category) -> Self {
        Self::Category(category)
    }
}

impl From<CmsPage> for Entity {
    fn from(page: CmsPage) -> Self {
        Self::CmsPage(page)
    }
}

fn opt_str(value: Option<&str>) -> Value {
    value.map_or(Value::Null, Value::from)
}

fn opt_f64(value: Option<f64>) -> Value {
    value.map_or(Value::Null, Value::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product() -> Product {
        Product {
            id: 42,
            sku: "WH-1000".to_owned(),
            name: "Wireless Headphones".to_owned(),
            price: Some(99.0),
            custom_attributes: BTreeMap::from([("color".to_owned(), json!("black"))]),
            data: BTreeMap::from([
                ("color".to_owned(), json!("shadowed")),
                ("warehouse".to_owned(), json!("north")),
            ]),
            ..Product::default()
        }
    }

    #[test]
    fn test_entity_type_roundtrip() {
        for ty in EntityType::ALL {
            assert_eq!(ty.as_str().parse::<EntityType>().unwrap(), ty);
        }
        assert!("widget".parse::<EntityType>().is_err());
    }

    #[test]
    fn test_attribute_lookup_order() {
        let entity = Entity::from(product());

        assert_eq!(entity.attribute("sku"), Some(json!("WH-1000")));
        // Custom attribute wins over data bag
        assert_eq!(entity.attribute("color"), Some(json!("black")));
        assert_eq!(entity.attribute("warehouse"), Some(json!("north")));
        assert_eq!(entity.attribute("missing"), None);
    }

    #[test]
    fn test_effective_price() {
        let mut p = product();
        assert_eq!(p.effective_price(), Some(99.0));

        p.special_price = Some(79.0);
        assert_eq!(p.effective_price(), Some(79.0));

        p.special_price = Some(120.0);
        assert_eq!(p.effective_price(), Some(99.0));

        p.final_price = Some(50.0);
        assert_eq!(p.effective_price(), Some(50.0));
    }

    #[test]
    fn test_identity_saved_and_unsaved() {
        let saved = Entity::from(product());
        assert_eq!(saved.identity(), "product:42");

        let unsaved = Entity::from(Product {
            name: "Draft".to_owned(),
            ..Product::default()
        });
        let identity = unsaved.identity();
        assert!(identity.starts_with("product:anon-"));
        assert_eq!(identity, unsaved.identity());
    }

    #[test]
    fn test_category_ancestors_and_root() {
        let category = Category {
            id: 5,
            level: 3,
            path: "1/2/4/5".to_owned(),
            ..Category::default()
        };
        assert_eq!(category.ancestor_ids(), vec![1, 2, 4]);
        assert!(!category.is_root());

        let root = Category {
            id: 2,
            level: 1,
            ..Category::default()
        };
        assert!(root.is_root());
    }

    #[test]
    fn test_entity_deserialize_tagged() {
        let entity: Entity = serde_json::from_value(json!({
            "entity_type": "cms_page",
            "id": 7,
            "identifier": "about-us",
            "title": "About Us"
        }))
        .unwrap();
        assert_eq!(entity.entity_type(), EntityType::CmsPage);
        assert_eq!(entity.attribute("identifier"), Some(json!("about-us")));
    }
}
