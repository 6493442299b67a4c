//! `seo validate` command implementation.

use std::path::PathBuf;

use clap::Args;
use serde_json::Value;

use seo_structured_data::{JsonLd, SchemaValidator};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the validate command.
#[derive(Args)]
pub(crate) struct ValidateArgs {
    /// JSON file holding one document, a list, or an `@graph` wrapper.
    file: PathBuf,
}

impl ValidateArgs {
    /// Execute the validate command.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();
        let content = std::fs::read_to_string(&self.file)?;
        let data: Value = serde_json::from_str(&content)?;

        let mut validator = SchemaValidator::new();
        let valid = validator.validate(&data);
        for warning in validator.warnings() {
            output.warning(&format!("warning: {warning}"));
        }
        for error in validator.errors() {
            output.error(&format!("error: {error}"));
        }
        if !valid {
            return Err(CliError::Validation(format!(
                "{} is invalid: {} error(s)",
                self.file.display(),
                validator.errors().len()
            )));
        }

        output.success(&format!("{} is valid", self.file.display()));
        if JsonLd::validate(&data) {
            output.data(&JsonLd::render(&data));
        }
        Ok(())
    }
}
