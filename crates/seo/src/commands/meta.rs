//! `seo meta` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde_json::json;

use seo_catalog::{Entity, TemplateType};
use seo_meta::ResolvedTags;
use seo_template::RequestScope;

use super::engine::{Engine, EntityRef};
use super::load_entity;
use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the meta command.
#[derive(Args)]
pub(crate) struct MetaArgs {
    /// Catalog fixture file (JSON).
    #[arg(long)]
    catalog: PathBuf,

    /// Entity to resolve, e.g. `product:42` or `cms_page:home`.
    #[arg(short, long)]
    entity: EntityRef,

    /// Template type to apply.
    #[arg(long = "type", default_value = "comprehensive")]
    template_type: TemplateType,

    /// Id of the category being browsed.
    #[arg(long)]
    current_category: Option<u64>,

    /// Print HTML head elements instead of JSON.
    #[arg(long)]
    html: bool,
}

impl MetaArgs {
    /// Execute the meta command.
    pub(crate) fn execute(self, global: &GlobalArgs, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let (entity, tags) = self.resolve(global, version, &output)?;
        if tags.is_empty() {
            output.warning("No template produced any meta tags");
        }

        if self.html {
            output.data(&tags.to_head_html());
        } else {
            let result = json!({
                "success": true,
                "entity": entity.identity(),
                "template_type": self.template_type.as_str(),
                "tags": tags,
            });
            output.data(&serde_json::to_string_pretty(&result)?);
        }
        Ok(())
    }

    fn resolve(
        &self,
        global: &GlobalArgs,
        version: &str,
        output: &Output,
    ) -> Result<(Entity, ResolvedTags), CliError> {
        let mut engine = Engine::load(global, Some(&self.catalog), version)?;
        // Cache keys leave the browsed category out
        if self.current_category.is_some() {
            engine = engine.without_cache();
        }
        let entity = load_entity(&engine, &self.entity, output)?;

        let mut scope = RequestScope::new();
        if let Some(id) = self.current_category {
            let category = scope.load_category(engine.catalog(), id)?;
            if category.is_none() {
                output.warning(&format!("Category {id} not found, ignoring"));
            }
            scope.set_current_category(category);
        }

        let tags = engine.meta_manager().apply_templates(
            &mut scope,
            &entity,
            entity.entity_type(),
            self.template_type,
        );
        Ok((entity, tags))
    }
}
