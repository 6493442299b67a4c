//! CLI command implementations.

pub(crate) mod engine;
pub(crate) mod jsonld;
pub(crate) mod meta;
pub(crate) mod validate;
pub(crate) mod variables;

pub(crate) use jsonld::JsonLdArgs;
pub(crate) use meta::MetaArgs;
pub(crate) use validate::ValidateArgs;
pub(crate) use variables::VariablesArgs;

use serde_json::json;

use seo_catalog::Entity;

use crate::error::CliError;
use crate::output::Output;
use engine::{Engine, EntityRef};

/// Load the referenced entity, reporting a failure as a JSON result.
fn load_entity(engine: &Engine, reference: &EntityRef, output: &Output) -> Result<Entity, CliError> {
    engine.entity(reference).map_err(|e| {
        output.data(&json!({ "success": false, "message": e.to_string() }).to_string());
        CliError::from(e)
    })
}
