//! Resolved tag sets.

use std::collections::BTreeMap;
use std::fmt::Write;

use serde::{Deserialize, Serialize};

use seo_catalog::MetaField;
use seo_template::escape_html;

/// Meta tag values produced for one entity.
///
/// Only fields some template produced are present.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResolvedTags(BTreeMap<MetaField, String>);

impl ResolvedTags {
    /// Value of `field`, if resolved.
    #[must_use]
    pub fn get(&self, field: MetaField) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Resolved fields in head-rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (MetaField, &str)> {
        self.0.iter().map(|(field, value)| (*field, value.as_str()))
    }

    /// Consume into the underlying map.
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<MetaField, String> {
        self.0
    }

    /// Render the tags as HTML head elements, one per line.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use seo_catalog::MetaField;
    /// use seo_meta::ResolvedTags;
    ///
    /// let tags = ResolvedTags::from(BTreeMap::from([
    ///     (MetaField::MetaTitle, "Shoes & Boots".to_owned()),
    ///     (MetaField::OgType, "product".to_owned()),
    /// ]));
    /// assert_eq!(
    ///     tags.to_head_html(),
    ///     "<title>Shoes &amp; Boots</title>\n<meta property=\"og:type\" content=\"product\">"
    /// );
    /// ```
    #[must_use]
    pub fn to_head_html(&self) -> String {
        let mut html = String::new();
        for (field, value) in self.iter() {
            if !html.is_empty() {
                html.push('\n');
            }
            let value = escape_html(value);
            // Writing to a String cannot fail
            let _ = match field {
                MetaField::MetaTitle => write!(html, "<title>{value}</title>"),
                MetaField::MetaDescription => meta_name(&mut html, "description", &value),
                MetaField::MetaKeywords => meta_name(&mut html, "keywords", &value),
                MetaField::MetaRobots => meta_name(&mut html, "robots", &value),
                MetaField::OgTitle => meta_property(&mut html, "og:title", &value),
                MetaField::OgDescription => meta_property(&mut html, "og:description", &value),
                MetaField::OgType => meta_property(&mut html, "og:type", &value),
                MetaField::OgImage => meta_property(&mut html, "og:image", &value),
            };
        }
        html
    }
}

impl From<BTreeMap<MetaField, String>> for ResolvedTags {
    fn from(map: BTreeMap<MetaField, String>) -> Self {
        Self(map)
    }
}

fn meta_name(html: &mut String, name: &str, content: &str) -> std::fmt::Result {
    write!(html, "<meta name=\"{name}\" content=\"{content}\">")
}

fn meta_property(html: &mut String, property: &str, content: &str) -> std::fmt::Result {
    write!(html, "<meta property=\"{property}\" content=\"{content}\">")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn tags() -> ResolvedTags {
        ResolvedTags::from(BTreeMap::from([
            (MetaField::OgImage, "https://x.test/a.jpg".to_owned()),
            (MetaField::MetaDescription, "Say \"hi\"".to_owned()),
            (MetaField::MetaRobots, "NOINDEX,FOLLOW".to_owned()),
        ]))
    }

    #[test]
    fn test_head_html_order_and_escaping() {
        assert_eq!(
            tags().to_head_html(),
            "<meta name=\"description\" content=\"Say &quot;hi&quot;\">\n\
             <meta name=\"robots\" content=\"NOINDEX,FOLLOW\">\n\
             <meta property=\"og:image\" content=\"https://x.test/a.jpg\">"
        );
    }

    #[test]
    fn test_serializes_as_flat_object() {
        let json = serde_json::to_string(&tags()).unwrap();
        assert_eq!(
            json,
            r#"{"meta_description":"Say \"hi\"","meta_robots":"NOINDEX,FOLLOW","og_image":"https://x.test/a.jpg"}"#
        );
        let back: ResolvedTags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, tags());
    }

    #[test]
    fn test_empty() {
        let empty = ResolvedTags::default();
        assert!(empty.is_empty());
        assert_eq!(empty.to_head_html(), "");
        assert_eq!(tags().len(), 3);
        assert_eq!(tags().get(MetaField::MetaRobots), Some("NOINDEX,FOLLOW"));
    }
}
