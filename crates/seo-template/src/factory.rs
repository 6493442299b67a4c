//! Processor selection.

use seo_catalog::{Entity, EntityType};

use crate::resolver::resolver_for;
use crate::{ProcessorContext, TemplateError, VariableProcessor};

/// Builds the [`VariableProcessor`] for an entity.
///
/// Selection is a single match on the entity's kind tag.
#[derive(Clone)]
pub struct ProcessorFactory {
    ctx: ProcessorContext,
}

impl ProcessorFactory {
    /// Create a factory sharing `ctx` with every processor it builds.
    #[must_use]
    pub fn new(ctx: ProcessorContext) -> Self {
        Self { ctx }
    }

    /// Shared processor context.
    #[must_use]
    pub fn context(&self) -> &ProcessorContext {
        &self.ctx
    }

    /// Processor for `entity`.
    #[must_use]
    pub fn create(&self, entity: &Entity) -> VariableProcessor {
        self.for_entity_type(entity.entity_type())
    }

    /// Processor for an entity kind.
    #[must_use]
    pub fn for_entity_type(&self, entity_type: EntityType) -> VariableProcessor {
        VariableProcessor::new(self.ctx.clone(), resolver_for(entity_type))
    }

    /// Processor for an entity kind given by name (`product`, `category`,
    /// `cms_page`).
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::UnknownEntityType`] for any other name.
    pub fn create_by_entity_type(&self, entity_type: &str) -> Result<VariableProcessor, TemplateError> {
        let entity_type = entity_type
            .parse::<EntityType>()
            .map_err(|_| TemplateError::UnknownEntityType(entity_type.to_owned()))?;
        Ok(self.for_entity_type(entity_type))
    }
}
