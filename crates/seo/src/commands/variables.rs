//! `seo variables` command implementation.

use clap::Args;

use seo_catalog::EntityType;

use super::engine::Engine;
use crate::GlobalArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the variables command.
#[derive(Args)]
pub(crate) struct VariablesArgs {
    /// Entity type: product, category or cms_page.
    #[arg(long)]
    entity_type: EntityType,
}

impl VariablesArgs {
    /// Execute the variables command.
    pub(crate) fn execute(self, global: &GlobalArgs, version: &str) -> Result<(), CliError> {
        let output = Output::new();
        let engine = Engine::load(global, None, version)?;
        let processor = engine.processors().for_entity_type(self.entity_type);

        let variables = processor.available_variables();
        let width = variables.keys().map(String::len).max().unwrap_or(0) + 6;
        output.highlight(&format!("Variables for {}", self.entity_type));
        for (name, label) in &variables {
            output.data(&format!("{:<width$}{label}", format!("{{{{{name}}}}}")));
        }
        Ok(())
    }
}
