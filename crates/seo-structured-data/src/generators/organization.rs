use serde_json::{Value, json};

use seo_catalog::Entity;

use crate::context::GeneratorContext;
use crate::error::GenerateError;
use crate::generator::{GenerationContext, Generator, StructuredData};
use crate::generators::is_home_page;

/// `Organization` for the home page, from the configured business details.
///
/// Generates nothing until an organization is configured.
pub struct OrganizationGenerator {
    ctx: GeneratorContext,
}

impl OrganizationGenerator {
    #[must_use]
    pub fn new(ctx: GeneratorContext) -> Self {
        Self { ctx }
    }
}

impl Generator for OrganizationGenerator {
    fn schema_type(&self) -> &'static str {
        "Organization"
    }

    fn context(&self) -> &GeneratorContext {
        &self.ctx
    }

    fn can_handle(&self, entity: &Entity) -> bool {
        is_home_page(entity)
    }

    fn build(
        &self,
        _entity: &Entity,
        _context: &GenerationContext,
    ) -> Result<StructuredData, GenerateError> {
        let Some(org) = self.ctx.settings().organization.as_ref() else {
            return Ok(StructuredData::new());
        };
        if org.name.trim().is_empty() {
            return Err(GenerateError::MissingField {
                schema_type: "Organization",
                field: "name",
            });
        }

        let mut data = StructuredData::new();
        data.insert("name".to_owned(), Value::from(org.name.trim()));
        let url = org
            .url
            .clone()
            .unwrap_or_else(|| self.ctx.store().base_url.clone());
        data.insert("url".to_owned(), Value::from(url));
        if let Some(logo) = org.logo.as_deref().filter(|l| !l.is_empty()) {
            data.insert("logo".to_owned(), Value::from(logo));
        }
        if !org.same_as.is_empty() {
            data.insert("sameAs".to_owned(), Value::from(org.same_as.clone()));
        }
        if org.telephone.is_some() || org.email.is_some() {
            let mut contact = json!({
                "@type": "ContactPoint",
                "contactType": "customer service",
            });
            if let Some(telephone) = &org.telephone {
                contact["telephone"] = Value::from(telephone.as_str());
            }
            if let Some(email) = &org.email {
                contact["email"] = Value::from(email.as_str());
            }
            data.insert("contactPoint".to_owned(), contact);
        }
        Ok(data)
    }
}
