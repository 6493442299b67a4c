//! Formatting helpers shared by generators.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use url::Url;

use seo_template::{clean_html, truncate_chars};

/// Maximum length of a generated description.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DescriptionLimit {
    /// 300 characters, for summaries.
    Short,
    /// 5000 characters, for full descriptions.
    Long,
    Unlimited,
}

impl DescriptionLimit {
    fn max_chars(self) -> Option<usize> {
        match self {
            Self::Short => Some(300),
            Self::Long => Some(5000),
            Self::Unlimited => None,
        }
    }
}

/// Drop the query string and fragment from a URL.
///
/// Text that does not parse as an absolute URL is cut at the first `?` or
/// `#` instead.
#[must_use]
pub fn clean_url(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(mut url) = Url::parse(raw) {
        url.set_query(None);
        url.set_fragment(None);
        return url.into();
    }
    raw.split(['?', '#']).next().unwrap_or_default().to_owned()
}

/// ISO 8601 form of a stored date or timestamp.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS` (read as UTC) and plain dates.
/// Returns `None` for anything else.
#[must_use]
pub fn iso_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.to_rfc3339());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.and_utc().to_rfc3339());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|date| date.format("%Y-%m-%d").to_string())
}

/// Plain-text description from stored HTML, capped at `limit` with `...`.
///
/// Returns `None` when nothing but markup was left.
#[must_use]
pub fn clean_description(html: &str, limit: DescriptionLimit) -> Option<String> {
    let text = clean_html(html);
    if text.is_empty() {
        return None;
    }
    Some(match limit.max_chars() {
        Some(max) => truncate_chars(&text, max, "..."),
        None => text,
    })
}
