//! Configuration management for the SEO engine.
//!
//! Parses `seo.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `store.base_url`
//! - `store.secure_base_url`
//! - `store.media_url`
//! - `structured_data.organization.url`
//! - `structured_data.organization.logo`

mod expand;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the current store id.
    pub store_id: Option<u32>,
    /// Override cache enabled flag.
    pub cache_enabled: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "seo.toml";

/// Default cache lifetime for resolved templates and tag sets.
const DEFAULT_TTL_SECS: u64 = 3600;

/// Default cache lifetime for structured data.
const DEFAULT_STRUCTURED_DATA_TTL_SECS: u64 = 86400;

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Current store view.
    pub store: StoreConfig,
    /// Website the store belongs to.
    pub website: WebsiteConfig,
    /// Cache configuration (paths are relative strings from TOML).
    cache: CacheConfigRaw,
    /// URL suffixes for catalog entities.
    pub urls: UrlConfig,
    /// Structured data configuration.
    pub structured_data: StructuredDataConfig,

    /// Resolved cache configuration (set after loading).
    #[serde(skip)]
    pub cache_resolved: CacheConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Store view configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Store id (0 is the admin/global scope).
    pub id: u32,
    /// Store code.
    pub code: String,
    /// Store display name.
    pub name: String,
    /// Unsecure base URL, with trailing slash.
    pub base_url: String,
    /// Secure base URL (defaults to `base_url`).
    pub secure_base_url: Option<String>,
    /// Media base URL (defaults to `{base_url}media/`).
    pub media_url: Option<String>,
    /// ISO 4217 currency code used for prices.
    pub currency: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            id: 1,
            code: "default".to_owned(),
            name: "Default Store View".to_owned(),
            base_url: "http://localhost/".to_owned(),
            secure_base_url: None,
            media_url: None,
            currency: "USD".to_owned(),
        }
    }
}

impl StoreConfig {
    /// Secure base URL, falling back to the unsecure one.
    #[must_use]
    pub fn secure_base_url(&self) -> &str {
        self.secure_base_url.as_deref().unwrap_or(&self.base_url)
    }

    /// Media base URL, falling back to `{base_url}media/`.
    #[must_use]
    pub fn media_url(&self) -> String {
        self.media_url
            .clone()
            .unwrap_or_else(|| format!("{}media/", self.base_url))
    }
}

/// Website configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct WebsiteConfig {
    /// Website id.
    pub id: u32,
    /// Website code.
    pub code: String,
    /// Website display name.
    pub name: String,
    /// Default store group id.
    pub default_group_id: u32,
}

impl Default for WebsiteConfig {
    fn default() -> Self {
        Self {
            id: 1,
            code: "base".to_owned(),
            name: "Main Website".to_owned(),
            default_group_id: 1,
        }
    }
}

/// Raw cache configuration as parsed from TOML (paths as strings).
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct CacheConfigRaw {
    enabled: Option<bool>,
    dir: Option<String>,
    ttl: Option<u64>,
    structured_data_ttl: Option<u64>,
}

/// Resolved cache configuration with absolute paths.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether the persistent cache is enabled.
    pub enabled: bool,
    /// Directory of the file cache.
    pub dir: PathBuf,
    /// Lifetime of resolved templates and tag sets.
    pub ttl: Duration,
    /// Lifetime of generated structured data.
    pub structured_data_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: PathBuf::from(".seo/cache"),
            ttl: Duration::from_secs(DEFAULT_TTL_SECS),
            structured_data_ttl: Duration::from_secs(DEFAULT_STRUCTURED_DATA_TTL_SECS),
        }
    }
}

/// URL suffix configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UrlConfig {
    /// Suffix appended to product URL keys.
    pub product_suffix: String,
    /// Suffix appended to category URL paths.
    pub category_suffix: String,
}

impl Default for UrlConfig {
    fn default() -> Self {
        Self {
            product_suffix: ".html".to_owned(),
            category_suffix: ".html".to_owned(),
        }
    }
}

/// Structured data configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StructuredDataConfig {
    /// Master switch for all generators.
    pub enabled: bool,
    /// Schema types whose generators are disabled (e.g. `["WebSite"]`).
    pub disabled: Vec<String>,
    /// Product attribute holding the brand name.
    pub brand_attribute: String,
    /// Organization published on every page.
    pub organization: Option<OrganizationConfig>,
}

impl Default for StructuredDataConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            disabled: Vec::new(),
            brand_attribute: "manufacturer".to_owned(),
            organization: None,
        }
    }
}

/// Organization details for the `Organization` schema.
#[derive(Debug, Deserialize)]
pub struct OrganizationConfig {
    /// Legal or brand name.
    pub name: String,
    /// Homepage URL.
    pub url: Option<String>,
    /// Logo URL.
    pub logo: Option<String>,
    /// Social profile URLs.
    #[serde(default)]
    pub same_as: Vec<String>,
    /// Customer service phone number.
    pub telephone: Option<String>,
    /// Customer service email.
    pub email: Option<String>,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`store.base_url`").
        field: String,
        /// Error message (e.g., "${`SHOP_HOST`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a base URL to use http(s) and end with a slash.
fn require_base_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    if !url.ends_with('/') {
        return Err(ConfigError::Validation(format!(
            "{field} must end with a trailing slash"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `seo.toml` in current directory and parents.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist or parsing fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(store_id) = settings.store_id {
            self.store.id = store_id;
        }
        if let Some(cache_enabled) = settings.cache_enabled {
            self.cache_resolved.enabled = cache_enabled;
        }
    }

    /// Whether a structured-data schema type is switched on.
    #[must_use]
    pub fn is_schema_enabled(&self, schema_type: &str) -> bool {
        self.structured_data.enabled
            && !self
                .structured_data
                .disabled
                .iter()
                .any(|t| t.eq_ignore_ascii_case(schema_type))
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            store: StoreConfig::default(),
            website: WebsiteConfig::default(),
            cache: CacheConfigRaw::default(),
            urls: UrlConfig::default(),
            structured_data: StructuredDataConfig::default(),
            cache_resolved: CacheConfig {
                dir: base.join(".seo/cache"),
                ..CacheConfig::default()
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_store()?;
        self.validate_cache()?;
        if let Some(org) = &self.structured_data.organization {
            require_non_empty(&org.name, "structured_data.organization.name")?;
        }
        Ok(())
    }

    fn validate_store(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.store.code, "store.code")?;
        require_base_url(&self.store.base_url, "store.base_url")?;
        if let Some(secure) = &self.store.secure_base_url {
            require_base_url(secure, "store.secure_base_url")?;
        }
        if let Some(media) = &self.store.media_url {
            require_base_url(media, "store.media_url")?;
        }

        let currency = &self.store.currency;
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "store.currency must be a three-letter ISO code, got {currency:?}"
            )));
        }
        Ok(())
    }

    fn validate_cache(&self) -> Result<(), ConfigError> {
        if self.cache_resolved.ttl.is_zero() {
            return Err(ConfigError::Validation(
                "cache.ttl must be greater than 0".to_owned(),
            ));
        }
        if self.cache_resolved.structured_data_ttl.is_zero() {
            return Err(ConfigError::Validation(
                "cache.structured_data_ttl must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.store.base_url = expand::expand_env(&self.store.base_url, "store.base_url")?;
        expand::expand_opt(&mut self.store.secure_base_url, "store.secure_base_url")?;
        expand::expand_opt(&mut self.store.media_url, "store.media_url")?;

        if let Some(ref mut org) = self.structured_data.organization {
            expand::expand_opt(&mut org.url, "structured_data.organization.url")?;
            expand::expand_opt(&mut org.logo, "structured_data.organization.logo")?;
        }

        Ok(())
    }

    /// Resolve relative paths and durations from the raw cache section.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let defaults = CacheConfig::default();
        self.cache_resolved = CacheConfig {
            enabled: self.cache.enabled.unwrap_or(true),
            dir: config_dir.join(self.cache.dir.as_deref().unwrap_or(".seo/cache")),
            ttl: self.cache.ttl.map_or(defaults.ttl, Duration::from_secs),
            structured_data_ttl: self
                .cache
                .structured_data_ttl
                .map_or(defaults.structured_data_ttl, Duration::from_secs),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.store.id, 1);
        assert_eq!(config.store.base_url, "http://localhost/");
        assert_eq!(config.store.media_url(), "http://localhost/media/");
        assert_eq!(config.store.secure_base_url(), "http://localhost/");
        assert_eq!(config.cache_resolved.dir, PathBuf::from("/test/.seo/cache"));
        assert!(config.cache_resolved.enabled);
        assert_eq!(config.cache_resolved.ttl, Duration::from_secs(3600));
        assert_eq!(config.urls.product_suffix, ".html");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.store.code, "default");
        assert_eq!(config.website.code, "base");
        assert_eq!(config.structured_data.brand_attribute, "manufacturer");
    }

    #[test]
    fn test_parse_store_and_website() {
        let toml = r#"
[store]
id = 2
code = "fr"
name = "French Store"
base_url = "https://shop.example.com/fr/"
media_url = "https://cdn.example.com/media/"
currency = "EUR"

[website]
id = 3
code = "europe"
name = "Europe"
default_group_id = 4
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.store.id, 2);
        assert_eq!(config.store.name, "French Store");
        assert_eq!(config.store.media_url(), "https://cdn.example.com/media/");
        assert_eq!(config.store.currency, "EUR");
        assert_eq!(config.website.default_group_id, 4);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_structured_data() {
        let toml = r#"
[structured_data]
disabled = ["WebSite"]
brand_attribute = "brand"

[structured_data.organization]
name = "Acme"
logo = "https://acme.test/logo.png"
same_as = ["https://twitter.com/acme"]
"#;
        let config: Config = toml::from_str(toml).unwrap();
        let org = config.structured_data.organization.as_ref().unwrap();
        assert_eq!(org.name, "Acme");
        assert_eq!(org.same_as, vec!["https://twitter.com/acme".to_owned()]);
        assert!(config.is_schema_enabled("Product"));
        assert!(!config.is_schema_enabled("WebSite"));
        assert!(!config.is_schema_enabled("website"));
    }

    #[test]
    fn test_master_switch_disables_everything() {
        let config: Config = toml::from_str("[structured_data]\nenabled = false").unwrap();
        assert!(!config.is_schema_enabled("Product"));
    }

    #[test]
    fn test_resolve_cache_paths() {
        let toml = r#"
[cache]
dir = "var/seo"
ttl = 60
structured_data_ttl = 120
"#;
        let mut config: Config = toml::from_str(toml).unwrap();
        config.resolve_paths(Path::new("/project"));

        assert_eq!(config.cache_resolved.dir, PathBuf::from("/project/var/seo"));
        assert_eq!(config.cache_resolved.ttl, Duration::from_secs(60));
        assert_eq!(
            config.cache_resolved.structured_data_ttl,
            Duration::from_secs(120)
        );
    }

    #[test]
    fn test_base_url_requires_trailing_slash() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.store.base_url = "https://shop.example.com".to_owned();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("store.base_url"));
    }

    #[test]
    fn test_base_url_requires_http_scheme() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.store.base_url = "ftp://shop.example.com/".to_owned();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_currency() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.store.currency = "usd".to_owned();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("store.currency"));
    }

    #[test]
    fn test_zero_ttl_rejected() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.cache_resolved.ttl = Duration::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_organization_name_rejected() {
        let toml = "[structured_data.organization]\nname = \"\"";
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            store_id: Some(5),
            cache_enabled: Some(false),
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.store.id, 5);
        assert!(!config.cache_resolved.enabled);
        assert_eq!(config.store.code, "default"); // Unchanged
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let result = Config::load(Some(Path::new("/nonexistent/seo.toml")), None);
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_load_from_file_resolves_relative_to_config() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("seo.toml");
        std::fs::write(
            &path,
            "[store]\nbase_url = \"https://shop.example.com/\"\n\n[cache]\ndir = \"cache\"\n",
        )
        .unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.store.base_url, "https://shop.example.com/");
        assert_eq!(config.cache_resolved.dir, tmp.path().join("cache"));
        assert_eq!(config.config_path, Some(path));
    }

    #[test]
    fn test_load_invalid_toml() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("seo.toml");
        std::fs::write(&path, "[store\n").unwrap();

        let result = Config::load(Some(&path), None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }
}
