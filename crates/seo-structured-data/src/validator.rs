//! Schema.org structured-data validation.
//!
//! [`SchemaValidator::validate`] accepts a single typed object, a list of
//! them, or a `{"@graph": [...]}` wrapper. For every typed item it checks:
//!
//! - `@type` is present (otherwise an error, and the item is not checked
//!   further) and known (otherwise a warning)
//! - required fields are present and non-empty (errors)
//! - recommended fields are present (warnings)
//! - type-specific rules for `Product`, `Offer`, `Organization`, `Review`
//!   and `AggregateRating`
//!
//! Nested typed objects are validated the same way, with messages prefixed
//! by their path (`offers[0]: ...`).

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::{Map, Value};
use url::Url;

static CURRENCY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());

const KNOWN_TYPES: &[&str] = &[
    "AggregateOffer",
    "AggregateRating",
    "Answer",
    "Article",
    "Brand",
    "BreadcrumbList",
    "CollectionPage",
    "ContactPoint",
    "EntryPoint",
    "FAQPage",
    "ImageObject",
    "ItemList",
    "ListItem",
    "LocalBusiness",
    "Offer",
    "Organization",
    "Person",
    "PostalAddress",
    "Product",
    "PropertyValue",
    "Question",
    "Rating",
    "Review",
    "SearchAction",
    "Store",
    "WebPage",
    "WebSite",
];

const AVAILABILITY: &[&str] = &[
    "https://schema.org/InStock",
    "https://schema.org/OutOfStock",
    "https://schema.org/PreOrder",
    "https://schema.org/BackOrder",
    "https://schema.org/Discontinued",
    "https://schema.org/InStoreOnly",
    "https://schema.org/OnlineOnly",
    "https://schema.org/LimitedAvailability",
];

fn required_fields(schema_type: &str) -> &'static [&'static str] {
    match schema_type {
        "Product" => &["name", "offers"],
        "Offer" => &["price", "priceCurrency"],
        "AggregateOffer" => &["lowPrice", "priceCurrency"],
        "Organization" | "LocalBusiness" | "Store" | "Brand" | "Person" => &["name"],
        "Review" => &["author", "reviewRating"],
        "AggregateRating" => &["ratingValue", "reviewCount"],
        "Rating" => &["ratingValue"],
        "BreadcrumbList" | "ItemList" => &["itemListElement"],
        "ListItem" => &["position"],
        "WebSite" => &["name", "url"],
        "WebPage" | "CollectionPage" => &["name"],
        "SearchAction" => &["target", "query-input"],
        "ImageObject" => &["url"],
        "Question" => &["name", "acceptedAnswer"],
        "Answer" => &["text"],
        "Article" => &["headline"],
        _ => &[],
    }
}

fn recommended_fields(schema_type: &str) -> &'static [&'static str] {
    match schema_type {
        "Product" => &["description", "image", "sku", "brand"],
        "Offer" => &["availability", "url"],
        "Organization" => &["url", "logo"],
        "LocalBusiness" | "Store" => &["address", "telephone"],
        "Review" => &["datePublished"],
        "AggregateRating" => &["bestRating"],
        "ListItem" => &["name", "item"],
        "WebSite" => &["potentialAction"],
        "WebPage" | "CollectionPage" => &["description", "url"],
        "Article" => &["author", "datePublished", "image"],
        _ => &[],
    }
}

/// Collects errors and warnings for structured-data documents.
#[derive(Debug, Default)]
pub struct SchemaValidator {
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl SchemaValidator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `data`, replacing earlier findings.
    ///
    /// Returns `true` when no errors were found. Warnings never fail
    /// validation.
    pub fn validate(&mut self, data: &Value) -> bool {
        self.clear();
        match data {
            Value::Array(items) => self.validate_list(items, ""),
            Value::Object(map) => match map.get("@graph") {
                Some(Value::Array(items)) => self.validate_list(items, "@graph"),
                _ => self.validate_item(data, ""),
            },
            _ => self.error("", "Structured data must be an object or a list of objects"),
        }
        self.errors.is_empty()
    }

    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Forget all findings.
    pub fn clear(&mut self) {
        self.errors.clear();
        self.warnings.clear();
    }

    fn validate_list(&mut self, items: &[Value], path: &str) {
        if items.is_empty() {
            self.error(path, "Structured data list is empty");
        }
        for (index, item) in items.iter().enumerate() {
            self.validate_item(item, &format!("{path}[{index}]"));
        }
    }

    fn validate_item(&mut self, item: &Value, path: &str) {
        let Value::Object(map) = item else {
            self.error(path, "Item must be an object");
            return;
        };
        let Some(schema_type) = type_name(map) else {
            self.error(path, "Missing required field: @type");
            return;
        };
        if !KNOWN_TYPES.contains(&schema_type) {
            self.warning(path, &format!("Unknown schema type: {schema_type}"));
        }

        for field in required_fields(schema_type) {
            if map.get(*field).is_none_or(is_empty) {
                self.error(
                    path,
                    &format!("Missing required field '{field}' for type {schema_type}"),
                );
            }
        }
        for field in recommended_fields(schema_type) {
            if map.get(*field).is_none_or(is_empty) {
                self.warning(
                    path,
                    &format!("Missing recommended field '{field}' for type {schema_type}"),
                );
            }
        }

        match schema_type {
            "Product" => self.check_product(map, path),
            "Offer" => self.check_offer(map, path),
            "Organization" => self.check_organization(map, path),
            "Review" => self.check_review(map, path),
            "AggregateRating" => self.check_rating(map, path),
            _ => {}
        }

        self.validate_nested(map, path);
    }

    /// Validate typed values below `map`: objects, lists of objects and
    /// lists of lists.
    fn validate_nested(&mut self, map: &Map<String, Value>, path: &str) {
        for (key, value) in map {
            if key.starts_with('@') {
                continue;
            }
            let child = join(path, key);
            match value {
                Value::Object(nested) if nested.contains_key("@type") => {
                    self.validate_item(value, &child);
                }
                Value::Array(items) => {
                    for (index, element) in items.iter().enumerate() {
                        let element_path = format!("{child}[{index}]");
                        match element {
                            Value::Object(nested) if nested.contains_key("@type") => {
                                self.validate_item(element, &element_path);
                            }
                            Value::Array(inner) => {
                                for (inner_index, inner_element) in inner.iter().enumerate() {
                                    if has_type(inner_element) {
                                        self.validate_item(
                                            inner_element,
                                            &format!("{element_path}[{inner_index}]"),
                                        );
                                    }
                                }
                            }
                            _ => {}
                        }
                    }
                }
                _ => {}
            }
        }
    }

    fn check_product(&mut self, map: &Map<String, Value>, path: &str) {
        if let Some(offers) = map.get("offers")
            && !offers.is_object()
            && !offers.is_array()
        {
            self.error(path, "Product offers must be an object or a list");
        }
        match map.get("image") {
            Some(Value::String(url)) => self.check_url(url, path, "image"),
            Some(Value::Array(images)) => {
                for (index, image) in images.iter().enumerate() {
                    match image {
                        Value::String(url) => self.check_url(url, path, &format!("image[{index}]")),
                        Value::Object(object) => {
                            if let Some(Value::String(url)) = object.get("url") {
                                self.check_url(url, path, &format!("image[{index}].url"));
                            }
                        }
                        _ => self.error(path, &format!("Invalid image at index {index}")),
                    }
                }
            }
            _ => {}
        }
        if let Some(sku) = map.get("sku")
            && is_empty(sku)
        {
            self.warning(path, "Product sku is empty");
        }
    }

    fn check_offer(&mut self, map: &Map<String, Value>, path: &str) {
        if let Some(price) = map.get("price").filter(|p| !is_empty(p)) {
            match number(price) {
                Some(value) if value < 0.0 => {
                    self.warning(path, &format!("Offer price is negative: {value}"));
                }
                Some(_) => {}
                None => self.error(path, &format!("Offer price must be numeric, got {price}")),
            }
        }
        if let Some(currency) = map.get("priceCurrency").filter(|c| !is_empty(c)) {
            let valid = currency.as_str().is_some_and(|c| CURRENCY.is_match(c));
            if !valid {
                self.error(
                    path,
                    &format!("Offer priceCurrency must be a 3-letter ISO 4217 code, got {currency}"),
                );
            }
        }
        if let Some(availability) = map.get("availability").filter(|a| !is_empty(a)) {
            let valid = availability
                .as_str()
                .is_some_and(|a| AVAILABILITY.contains(&a));
            if !valid {
                self.error(
                    path,
                    &format!("Offer availability is not a schema.org availability URI: {availability}"),
                );
            }
        }
        if let Some(Value::String(url)) = map.get("url") {
            self.check_url(url, path, "url");
        }
    }

    fn check_organization(&mut self, map: &Map<String, Value>, path: &str) {
        if let Some(Value::String(url)) = map.get("url") {
            self.check_url(url, path, "url");
        }
        match map.get("logo") {
            Some(Value::String(url)) => self.check_url(url, path, "logo"),
            Some(Value::Object(logo)) => {
                if let Some(Value::String(url)) = logo.get("url") {
                    self.check_url(url, path, "logo.url");
                }
            }
            _ => {}
        }
        match map.get("sameAs") {
            Some(Value::String(url)) => self.check_url(url, path, "sameAs"),
            Some(Value::Array(urls)) => {
                for (index, url) in urls.iter().enumerate() {
                    match url.as_str() {
                        Some(url) => self.check_url(url, path, &format!("sameAs[{index}]")),
                        None => self.error(path, &format!("sameAs[{index}] must be a URL")),
                    }
                }
            }
            _ => {}
        }
    }

    fn check_review(&mut self, map: &Map<String, Value>, path: &str) {
        if let Some(Value::Object(author)) = map.get("author")
            && author.get("name").is_none_or(is_empty)
        {
            self.warning(path, "Review author should have a name");
        }
        if let Some(date) = map.get("datePublished").filter(|d| !is_empty(d)) {
            let valid = date.as_str().is_some_and(parses_as_date);
            if !valid {
                self.error(path, &format!("Review datePublished is not a valid date: {date}"));
            }
        }
    }

    fn check_rating(&mut self, map: &Map<String, Value>, path: &str) {
        let worst = map.get("worstRating").and_then(number).unwrap_or(1.0);
        let best = map.get("bestRating").and_then(number).unwrap_or(5.0);
        if let Some(rating) = map.get("ratingValue").filter(|r| !is_empty(r)) {
            match number(rating) {
                Some(value) if value < worst || value > best => self.error(
                    path,
                    &format!("AggregateRating ratingValue {value} is outside {worst}-{best}"),
                ),
                Some(_) => {}
                None => self.error(path, &format!("AggregateRating ratingValue must be numeric, got {rating}")),
            }
        }
        if let Some(count) = map.get("reviewCount").filter(|c| !is_empty(c))
            && number(count).is_none_or(|c| c < 0.0)
        {
            self.error(
                path,
                &format!("AggregateRating reviewCount must be a non-negative number, got {count}"),
            );
        }
    }

    fn check_url(&mut self, url: &str, path: &str, field: &str) {
        if !is_valid_url(url) {
            self.error(path, &format!("Invalid URL in {field}: {url}"));
        }
    }

    fn error(&mut self, path: &str, message: &str) {
        self.errors.push(prefixed(path, message));
    }

    fn warning(&mut self, path: &str, message: &str) {
        self.warnings.push(prefixed(path, message));
    }
}

fn prefixed(path: &str, message: &str) -> String {
    if path.is_empty() {
        message.to_owned()
    } else {
        format!("{path}: {message}")
    }
}

fn join(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_owned()
    } else {
        format!("{path}.{key}")
    }
}

/// `@type` as a name; for a list of types the first one is used.
fn type_name(map: &Map<String, Value>) -> Option<&str> {
    match map.get("@type")? {
        Value::String(name) => Some(name.as_str()).filter(|n| !n.trim().is_empty()),
        Value::Array(names) => names.first().and_then(Value::as_str).filter(|n| !n.trim().is_empty()),
        _ => None,
    }
}

fn has_type(value: &Value) -> bool {
    value.as_object().is_some_and(|map| map.contains_key("@type"))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn is_valid_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.has_host())
}

fn parses_as_date(raw: &str) -> bool {
    DateTime::parse_from_rfc3339(raw).is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").is_ok()
        || NaiveDate::parse_from_str(raw, "%Y-%m-%d").is_ok()
}
