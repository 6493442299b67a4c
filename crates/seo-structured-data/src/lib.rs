//! Schema.org structured data for catalog and content entities.
//!
//! A [`Generator`] describes one schema.org type. The blanket
//! [`GeneratorExt::generate`] wraps every generator with caching, `@context`
//! and `@type` defaults and failure logging. A [`GeneratorPool`] runs all
//! registered generators for an entity; [`JsonLd`] turns the documents into
//! `<script type="application/ld+json">` tags and [`SchemaValidator`] checks
//! them against schema.org expectations.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use seo_catalog::{Entity, MemoryCatalog, Product, StoreContext, WebsiteContext};
//! use seo_structured_data::{GenerationContext, GeneratorContext, GeneratorPool, JsonLd};
//! use seo_template::ProcessorContext;
//!
//! let processors = ProcessorContext::new(
//!     StoreContext::default(),
//!     WebsiteContext::default(),
//!     Arc::new(MemoryCatalog::new()),
//! );
//! let pool = GeneratorPool::with_defaults(GeneratorContext::new(processors));
//!
//! let bag = Entity::from(Product { id: 1, name: "Duffle".to_owned(), price: Some(34.0), ..Product::default() });
//! let documents = pool.generate(&bag, &GenerationContext::new());
//! let html = JsonLd::render_multiple(&documents);
//! assert_eq!(html.matches("<script").count(), 2);
//! ```

mod context;
mod error;
mod generator;
pub mod generators;
mod helpers;
mod jsonld;
mod pool;
mod validator;

pub use context::{
    DEFAULT_STRUCTURED_DATA_TTL, GeneratorContext, OrganizationInfo, SCHEMA_CONTEXT,
    STRUCTURED_DATA_CACHE_TAG, SchemaSettings,
};
pub use error::GenerateError;
pub use generator::{GenerationContext, Generator, GeneratorExt, StructuredData};
pub use helpers::{DescriptionLimit, clean_description, clean_url, iso_date};
pub use jsonld::JsonLd;
pub use pool::GeneratorPool;
pub use validator::SchemaValidator;
