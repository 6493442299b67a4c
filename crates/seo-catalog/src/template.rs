//! Meta tag template records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::EntityType;

/// Which subset of meta fields a template governs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TemplateType {
    /// Every field.
    #[default]
    Comprehensive,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    MetaRobots,
    /// The four Open Graph fields.
    OpenGraph,
}

impl TemplateType {
    /// All template types.
    pub const ALL: [Self; 6] = [
        Self::Comprehensive,
        Self::MetaTitle,
        Self::MetaDescription,
        Self::MetaKeywords,
        Self::MetaRobots,
        Self::OpenGraph,
    ];

    /// Stable string code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Comprehensive => "comprehensive",
            Self::MetaTitle => "meta_title",
            Self::MetaDescription => "meta_description",
            Self::MetaKeywords => "meta_keywords",
            Self::MetaRobots => "meta_robots",
            Self::OpenGraph => "open_graph",
        }
    }

    /// Fields a template of this type is allowed to fill.
    #[must_use]
    pub fn fields(self) -> &'static [MetaField] {
        match self {
            Self::Comprehensive => &MetaField::ALL,
            Self::MetaTitle => &[MetaField::MetaTitle],
            Self::MetaDescription => &[MetaField::MetaDescription],
            Self::MetaKeywords => &[MetaField::MetaKeywords],
            Self::MetaRobots => &[MetaField::MetaRobots],
            Self::OpenGraph => &[
                MetaField::OgTitle,
                MetaField::OgDescription,
                MetaField::OgType,
                MetaField::OgImage,
            ],
        }
    }
}

impl fmt::Display for TemplateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TemplateType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown template type: {s}"))
    }
}

/// One key of a resolved tag set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetaField {
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    MetaRobots,
    OgTitle,
    OgDescription,
    OgType,
    OgImage,
}

impl MetaField {
    /// All fields, in head-rendering order.
    pub const ALL: [Self; 8] = [
        Self::MetaTitle,
        Self::MetaDescription,
        Self::MetaKeywords,
        Self::MetaRobots,
        Self::OgTitle,
        Self::OgDescription,
        Self::OgType,
        Self::OgImage,
    ];

    /// Stable string code.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MetaTitle => "meta_title",
            Self::MetaDescription => "meta_description",
            Self::MetaKeywords => "meta_keywords",
            Self::MetaRobots => "meta_robots",
            Self::OgTitle => "og_title",
            Self::OgDescription => "og_description",
            Self::OgType => "og_type",
            Self::OgImage => "og_image",
        }
    }

    /// Whether the field's template text goes through the template engine.
    ///
    /// `meta_robots` and `og_type` hold plain configuration strings
    /// (`NOINDEX,FOLLOW`, `product`) and are copied verbatim.
    #[must_use]
    pub fn is_processed(self) -> bool {
        !matches!(self, Self::MetaRobots | Self::OgType)
    }
}

/// A persisted meta tag template.
///
/// `conditions` keeps the stored JSON text; it is decoded at apply time so a
/// malformed value only affects the template that carries it.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Template {
    pub id: u64,
    pub name: String,
    #[serde(rename = "type")]
    pub template_type: TemplateType,
    pub entity_type: EntityType,
    /// 0 = all stores.
    pub store_id: u32,
    pub is_active: bool,
    /// Higher wins.
    pub priority: i32,
    #[serde(deserialize_with = "deserialize_conditions")]
    pub conditions: Option<String>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub meta_keywords: Option<String>,
    pub meta_robots: Option<String>,
    pub og_title: Option<String>,
    pub og_description: Option<String>,
    pub og_type: Option<String>,
    pub og_image: Option<String>,
}

impl Template {
    /// Template text stored for `field`, if any.
    #[must_use]
    pub fn field(&self, field: MetaField) -> Option<&str> {
        match field {
            MetaField::MetaTitle => self.meta_title.as_deref(),
            MetaField::MetaDescription => self.meta_description.as_deref(),
            MetaField::MetaKeywords => self.meta_keywords.as_deref(),
            MetaField::MetaRobots => self.meta_robots.as_deref(),
            MetaField::OgTitle => self.og_title.as_deref(),
            MetaField::OgDescription => self.og_description.as_deref(),
            MetaField::OgType => self.og_type.as_deref(),
            MetaField::OgImage => self.og_image.as_deref(),
        }
    }

    /// Whether the template applies to `store_id`.
    #[must_use]
    pub fn applies_to_store(&self, store_id: u32) -> bool {
        self.store_id == 0 || self.store_id == store_id
    }
}

/// Accept conditions either as stored JSON text or as an inline JSON value.
fn deserialize_conditions<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_template_type_parse() {
        assert_eq!("open_graph".parse::<TemplateType>().unwrap(), TemplateType::OpenGraph);
        assert!("og".parse::<TemplateType>().is_err());
    }

    #[test]
    fn test_fields_per_type() {
        assert_eq!(TemplateType::Comprehensive.fields().len(), 8);
        assert_eq!(TemplateType::MetaRobots.fields(), &[MetaField::MetaRobots]);
        assert!(TemplateType::OpenGraph.fields().contains(&MetaField::OgImage));
        assert!(!TemplateType::OpenGraph.fields().contains(&MetaField::MetaTitle));
    }

    #[test]
    fn test_processed_fields() {
        assert!(MetaField::MetaTitle.is_processed());
        assert!(MetaField::OgImage.is_processed());
        assert!(!MetaField::MetaRobots.is_processed());
        assert!(!MetaField::OgType.is_processed());
    }

    #[test]
    fn test_conditions_accept_inline_json() {
        let template: Template = serde_json::from_value(json!({
            "type": "comprehensive",
            "entity_type": "product",
            "conditions": {"price": {"min": 10, "max": 50}}
        }))
        .unwrap();
        let conditions: Value = serde_json::from_str(template.conditions.as_deref().unwrap()).unwrap();
        assert_eq!(conditions, json!({"price": {"min": 10, "max": 50}}));
    }

    #[test]
    fn test_conditions_accept_stored_text() {
        let template: Template = serde_json::from_value(json!({
            "conditions": "{\"type_id\":\"simple\"}"
        }))
        .unwrap();
        assert_eq!(template.conditions.as_deref(), Some("{\"type_id\":\"simple\"}"));
    }

    #[test]
    fn test_applies_to_store() {
        let global = Template::default();
        assert!(global.applies_to_store(3));

        let scoped = Template {
            store_id: 2,
            ..Template::default()
        };
        assert!(scoped.applies_to_store(2));
        assert!(!scoped.applies_to_store(3));
    }
}
