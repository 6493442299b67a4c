//! Store and website context.

use serde::{Deserialize, Serialize};

/// The store view a request is served for.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreContext {
    /// Store id (0 is the global scope).
    pub id: u32,
    /// Store code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Unsecure base URL, with trailing slash.
    pub base_url: String,
    /// Secure base URL, with trailing slash.
    pub secure_base_url: String,
    /// Media base URL, with trailing slash.
    pub media_url: String,
    /// ISO 4217 currency code.
    pub currency: String,
}

impl Default for StoreContext {
    fn default() -> Self {
        Self {
            id: 1,
            code: "default".to_owned(),
            name: "Default Store View".to_owned(),
            base_url: "http://localhost/".to_owned(),
            secure_base_url: "http://localhost/".to_owned(),
            media_url: "http://localhost/media/".to_owned(),
            currency: "USD".to_owned(),
        }
    }
}

impl StoreContext {
    /// Join a relative path onto the base URL.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Join a relative path onto the media URL.
    #[must_use]
    pub fn media(&self, path: &str) -> String {
        format!("{}{}", self.media_url, path.trim_start_matches('/'))
    }
}

/// The website a store view belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebsiteContext {
    /// Website id.
    pub id: u32,
    /// Website code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Default store group id.
    pub default_group_id: u32,
}

impl Default for WebsiteContext {
    fn default() -> Self {
        Self {
            id: 1,
            code: "base".to_owned(),
            name: "Main Website".to_owned(),
            default_group_id: 1,
        }
    }
}
