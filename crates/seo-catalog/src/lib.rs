//! Catalog entity model and repository abstractions for the SEO engine.
//!
//! The SEO engine never talks to a database. Everything it reads arrives
//! through the types and traits in this crate:
//!
//! - [`Entity`]: tagged union over [`Product`], [`Category`] and [`CmsPage`]
//! - [`StoreContext`] / [`WebsiteContext`]: the current store view and website
//! - [`Template`]: a persisted meta tag template record
//! - [`TemplateStore`], [`ProductRepository`], [`CategoryRepository`],
//!   [`CmsPageRepository`]: the collaborator interfaces
//! - [`MemoryCatalog`]: in-memory implementation of every trait, loadable
//!   from a JSON fixture file
//!
//! # Example
//!
//! ```
//! use seo_catalog::{CategoryRepository, MemoryCatalog, Category};
//!
//! let catalog = MemoryCatalog::new().with_category(Category {
//!     id: 3,
//!     name: "Shoes".to_owned(),
//!     level: 2,
//!     ..Category::default()
//! });
//! assert_eq!(catalog.get_by_id(3).unwrap().name, "Shoes");
//! assert!(catalog.get_by_id(99).unwrap_err().is_not_found());
//! ```

mod context;
mod entity;
mod error;
mod memory;
mod repository;
mod template;

pub use context::{StoreContext, WebsiteContext};
pub use entity::{Category, CmsPage, Entity, EntityType, Product};
pub use error::CatalogError;
pub use memory::{CatalogFixture, MemoryCatalog};
pub use repository::{CategoryRepository, CmsPageRepository, ProductRepository, TemplateStore};
pub use template::{MetaField, Template, TemplateType};
