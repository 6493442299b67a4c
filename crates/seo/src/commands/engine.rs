//! Wiring of config, catalog fixtures and cache into engine services.

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use seo_cache::{Cache, FileCache, NullCache};
use seo_catalog::{
    CatalogError, CategoryRepository, CmsPageRepository, Entity, EntityType, MemoryCatalog,
    ProductRepository, StoreContext, TemplateStore, WebsiteContext,
};
use seo_config::{CliSettings, Config};
use seo_meta::MetaTagManager;
use seo_structured_data::{GeneratorContext, OrganizationInfo, SchemaSettings};
use seo_template::{ProcessorContext, ProcessorFactory, UrlSuffixes};

use crate::GlobalArgs;
use crate::error::CliError;

/// Entity reference given on the command line: `product:42`,
/// `category:7`, `cms_page:5` or `cms_page:about-us`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct EntityRef {
    pub entity_type: EntityType,
    pub key: EntityKey,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum EntityKey {
    Id(u64),
    /// CMS page URL identifier.
    Identifier(String),
}

impl FromStr for EntityRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, key) = s
            .split_once(':')
            .ok_or_else(|| format!("expected <type>:<id>, got {s:?}"))?;
        let entity_type: EntityType = kind.parse()?;
        let key = match key.parse::<u64>() {
            Ok(id) => EntityKey::Id(id),
            Err(_) if entity_type == EntityType::CmsPage && !key.is_empty() => {
                EntityKey::Identifier(key.to_owned())
            }
            Err(_) => return Err(format!("invalid {entity_type} id: {key:?}")),
        };
        Ok(Self { entity_type, key })
    }
}

/// Loaded configuration, catalog and the services built on them.
pub(crate) struct Engine {
    config: Config,
    catalog: Arc<MemoryCatalog>,
    processors: ProcessorContext,
}

impl Engine {
    /// Load configuration and, when given, a catalog fixture file.
    pub(crate) fn load(
        global: &GlobalArgs,
        catalog: Option<&Path>,
        version: &str,
    ) -> Result<Self, CliError> {
        let cli_settings = CliSettings {
            store_id: global.store_id,
            cache_enabled: global.no_cache.then_some(false),
        };
        let config = Config::load(global.config.as_deref(), Some(&cli_settings))?;

        let catalog = Arc::new(match catalog {
            Some(path) => MemoryCatalog::from_path(path)?,
            None => MemoryCatalog::new(),
        });

        let cache: Arc<dyn Cache> = if config.cache_resolved.enabled {
            tracing::info!(dir = %config.cache_resolved.dir.display(), "Using file cache");
            Arc::new(FileCache::new(config.cache_resolved.dir.clone(), version))
        } else {
            Arc::new(NullCache)
        };

        let processors = ProcessorContext::new(
            store_context(&config),
            website_context(&config),
            Arc::clone(&catalog) as Arc<dyn CategoryRepository>,
        )
        .with_cache(cache)
        .with_ttl(config.cache_resolved.ttl)
        .with_url_suffixes(UrlSuffixes {
            product: config.urls.product_suffix.clone(),
            category: config.urls.category_suffix.clone(),
        });

        Ok(Self {
            config,
            catalog,
            processors,
        })
    }

    /// Drop the persistent cache for the rest of this run.
    #[must_use]
    pub(crate) fn without_cache(mut self) -> Self {
        self.processors = self.processors.with_cache(Arc::new(NullCache));
        self
    }

    pub(crate) fn catalog(&self) -> &MemoryCatalog {
        &self.catalog
    }

    pub(crate) fn processors(&self) -> ProcessorFactory {
        ProcessorFactory::new(self.processors.clone())
    }

    pub(crate) fn meta_manager(&self) -> MetaTagManager {
        MetaTagManager::new(
            Arc::clone(&self.catalog) as Arc<dyn TemplateStore>,
            self.processors(),
        )
    }

    pub(crate) fn generator_context(&self) -> GeneratorContext {
        let structured = &self.config.structured_data;
        let settings = SchemaSettings {
            enabled: structured.enabled,
            disabled: structured.disabled.clone(),
            brand_attribute: structured.brand_attribute.clone(),
            organization: structured.organization.as_ref().map(|org| OrganizationInfo {
                name: org.name.clone(),
                url: org.url.clone(),
                logo: org.logo.clone(),
                same_as: org.same_as.clone(),
                telephone: org.telephone.clone(),
                email: org.email.clone(),
            }),
        };
        GeneratorContext::new(self.processors.clone())
            .with_settings(settings)
            .with_ttl(self.config.cache_resolved.structured_data_ttl)
    }

    /// Load the referenced entity from the catalog.
    pub(crate) fn entity(&self, reference: &EntityRef) -> Result<Entity, CatalogError> {
        let catalog = self.catalog.as_ref();
        match (&reference.key, reference.entity_type) {
            (EntityKey::Id(id), EntityType::Product) => {
                ProductRepository::get_by_id(catalog, *id).map(Entity::from)
            }
            (EntityKey::Id(id), EntityType::Category) => {
                CategoryRepository::get_by_id(catalog, *id).map(Entity::from)
            }
            (EntityKey::Id(id), EntityType::CmsPage) => {
                CmsPageRepository::get_by_id(catalog, *id).map(Entity::from)
            }
            (EntityKey::Identifier(identifier), _) => catalog
                .cms_page_by_identifier(identifier)
                .cloned()
                .map(Entity::from)
                .ok_or_else(|| {
                    CatalogError::identifier_not_found(EntityType::CmsPage, identifier)
                }),
        }
    }
}

fn store_context(config: &Config) -> StoreContext {
    let store = &config.store;
    StoreContext {
        id: store.id,
        code: store.code.clone(),
        name: store.name.clone(),
        base_url: store.base_url.clone(),
        secure_base_url: store.secure_base_url().to_owned(),
        media_url: store.media_url(),
        currency: store.currency.clone(),
    }
}

fn website_context(config: &Config) -> WebsiteContext {
    let website = &config.website;
    WebsiteContext {
        id: website.id,
        code: website.code.clone(),
        name: website.name.clone(),
        default_group_id: website.default_group_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_entity_ref() {
        assert_eq!(
            "product:42".parse::<EntityRef>().unwrap(),
            EntityRef {
                entity_type: EntityType::Product,
                key: EntityKey::Id(42),
            }
        );
        assert_eq!(
            "cms_page:about-us".parse::<EntityRef>().unwrap().key,
            EntityKey::Identifier("about-us".to_owned())
        );
        assert!("product:abc".parse::<EntityRef>().is_err());
        assert!("widget:1".parse::<EntityRef>().is_err());
        assert!("42".parse::<EntityRef>().is_err());
    }

    #[test]
    fn test_engine_loads_fixture() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("seo.toml");
        std::fs::write(
            &config_path,
            "[store]\nname = \"Luma\"\ncurrency = \"EUR\"\n\n[cache]\nenabled = false\n",
        )
        .unwrap();
        let catalog_path = dir.path().join("catalog.json");
        std::fs::write(
            &catalog_path,
            r#"{"products": [{"id": 42, "name": "Duffle"}], "cms_pages": [{"id": 2, "identifier": "home"}]}"#,
        )
        .unwrap();

        let global = GlobalArgs {
            config: Some(config_path),
            store_id: None,
            no_cache: false,
            verbose: false,
        };
        let engine = Engine::load(&global, Some(&catalog_path), "test").unwrap();

        let product = engine.entity(&"product:42".parse().unwrap()).unwrap();
        assert_eq!(product.id(), 42);
        let home = engine.entity(&"cms_page:home".parse().unwrap()).unwrap();
        assert_eq!(home.id(), 2);
        assert!(engine.entity(&"product:7".parse().unwrap()).unwrap_err().is_not_found());
        assert!(
            engine
                .entity(&"cms_page:missing".parse().unwrap())
                .unwrap_err()
                .is_not_found()
        );

        assert_eq!(engine.generator_context().store().currency, "EUR");
        assert_eq!(engine.generator_context().store().name, "Luma");
    }
}
