//! Variable-substitution template engine for SEO meta tags.
//!
//! Templates are plain strings with `{{ }}` placeholders:
//!
//! - `{{ product.name }}`, `{{ store.name }}`: variables
//! - `{{ truncate(product.description, 160) }}`: directives
//!
//! A [`ProcessorFactory`] hands out the [`VariableProcessor`] for an entity;
//! the processor fills templates, memoizing results in a [`RequestScope`]
//! and writing them through to the persistent cache.
//!
//! # Directives
//!
//! | Directive | Effect |
//! |-----------|--------|
//! | `lower(v)`, `upper(v)` | Case conversion |
//! | `ucfirst(v)`, `ucwords(v)` | Capitalize first letter / every word |
//! | `truncate(v[, len][, suffix])` | Cut to `len` characters (default 255, suffix `...`) |
//! | `strip_tags(v)` | Remove HTML tags |
//! | `escape(v)` | HTML-escape |
//! | `url_encode(v)` | Form-style URL encoding |
//! | `replace(v, search, replace)` | Literal replacement |
//!
//! Unknown directives produce an empty string.

mod context;
mod directive;
mod error;
mod factory;
mod html;
mod key;
mod parser;
mod processor;
mod resolver;
mod scope;
mod value;

pub use context::{DEFAULT_TEMPLATE_TTL, ProcessorContext, TEMPLATE_CACHE_TAG, UrlSuffixes};
pub use directive::Directive;
pub use error::TemplateError;
pub use factory::ProcessorFactory;
pub use html::{clean_html, escape_html, strip_tags, truncate_chars};
pub use key::TemplateKey;
pub use processor::VariableProcessor;
pub use resolver::{
    CategoryResolver, CmsPageResolver, EntityResolver, ProductResolver, category_url, media_url,
    page_url, product_url, resolver_for,
};
pub use scope::RequestScope;
pub use value::format_price;
