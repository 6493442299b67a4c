//! `seo jsonld` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;

use seo_structured_data::{GenerationContext, GeneratorPool, JsonLd, SchemaValidator};

use super::engine::{Engine, EntityRef};
use super::load_entity;
use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the jsonld command.
#[derive(Args)]
pub(crate) struct JsonLdArgs {
    /// Catalog fixture file (JSON).
    #[arg(long)]
    catalog: PathBuf,

    /// Entity to describe, e.g. `product:42` or `cms_page:home`.
    #[arg(short, long)]
    entity: EntityRef,

    /// Id of the category being browsed.
    #[arg(long)]
    current_category: Option<u64>,

    /// Validate every generated document.
    #[arg(long)]
    validate: bool,
}

impl JsonLdArgs {
    /// Execute the jsonld command.
    pub(crate) fn execute(self, global: &GlobalArgs, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let engine = Engine::load(global, Some(&self.catalog), version)?;
        let entity = load_entity(&engine, &self.entity, &output)?;

        let mut context = GenerationContext::new();
        if let Some(id) = self.current_category {
            context.insert("category_id".to_owned(), Value::from(id));
        }

        let pool = GeneratorPool::with_defaults(engine.generator_context());
        let documents = pool.generate(&entity, &context);
        if documents.is_empty() {
            output.warning("No structured data generated");
            return Ok(());
        }
        output.data(&JsonLd::render_multiple(&documents));

        if !self.validate {
            return Ok(());
        }
        let mut validator = SchemaValidator::new();
        let mut error_count = 0;
        for document in &documents {
            let schema_type = document.get("@type").and_then(Value::as_str).unwrap_or("?");
            let valid = validator.validate(&Value::Object(document.clone()));
            if valid {
                output.success(&format!("{schema_type}: valid"));
            } else {
                output.highlight(&format!("{schema_type}: invalid"));
            }
            for error in validator.errors() {
                output.error(&format!("  error: {error}"));
            }
            for warning in validator.warnings() {
                output.warning(&format!("  warning: {warning}"));
            }
            error_count += validator.errors().len();
        }
        if error_count > 0 {
            return Err(CliError::Validation(format!(
                "structured data has {error_count} error(s)"
            )));
        }
        Ok(())
    }
}
