//! Meta tag resolution for catalog and content entities.
//!
//! [`MetaTagManager::apply_templates`] picks the highest-priority template
//! whose [`Conditions`] hold for an entity, fills its fields through the
//! template engine and returns a [`ResolvedTags`] set, which renders to HTML
//! head elements with [`ResolvedTags::to_head_html`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use seo_catalog::{
//!     Entity, EntityType, MemoryCatalog, MetaField, Product, StoreContext, Template,
//!     TemplateType, WebsiteContext,
//! };
//! use seo_meta::MetaTagManager;
//! use seo_template::{ProcessorContext, ProcessorFactory, RequestScope};
//!
//! let catalog = Arc::new(MemoryCatalog::new().with_template(Template {
//!     is_active: true,
//!     entity_type: EntityType::Product,
//!     meta_title: Some("{{product.name}} | {{store.name}}".to_owned()),
//!     ..Template::default()
//! }));
//! let ctx = ProcessorContext::new(StoreContext::default(), WebsiteContext::default(), Arc::<MemoryCatalog>::clone(&catalog));
//! let manager = MetaTagManager::new(catalog, ProcessorFactory::new(ctx));
//!
//! let entity = Entity::from(Product { id: 1, name: "Tote".to_owned(), ..Product::default() });
//! let mut scope = RequestScope::new();
//! let tags = manager.apply_templates(&mut scope, &entity, EntityType::Product, TemplateType::Comprehensive);
//! assert_eq!(tags.get(MetaField::MetaTitle), Some("Tote | Default Store View"));
//! ```

mod conditions;
mod error;
mod manager;
mod tags;

pub use conditions::{Condition, Conditions};
pub use error::MetaError;
pub use manager::{META_CACHE_TAG, MetaTagManager};
pub use tags::ResolvedTags;
