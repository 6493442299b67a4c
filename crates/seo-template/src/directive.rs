//! Directive functions available inside templates.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

use crate::html::{escape_html, strip_tags, truncate_chars};
use crate::parser::strip_quotes;

/// Characters left alone by form-style URL encoding.
const FORM_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

const DEFAULT_TRUNCATE_LENGTH: usize = 255;
const DEFAULT_TRUNCATE_SUFFIX: &str = "...";

/// A template function such as `upper` or `truncate`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Directive {
    Lower,
    Upper,
    /// First character upper-cased.
    UcFirst,
    /// First character of every word upper-cased.
    UcWords,
    /// `truncate(value[, length][, suffix])`
    Truncate,
    StripTags,
    /// HTML-escape, quotes included.
    Escape,
    /// Form-style URL encoding (space becomes `+`).
    UrlEncode,
    /// `replace(value, search, replace)`
    Replace,
}

impl Directive {
    /// Look a directive up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let directive = match name {
            "lower" => Self::Lower,
            "upper" => Self::Upper,
            "ucfirst" => Self::UcFirst,
            "ucwords" => Self::UcWords,
            "truncate" => Self::Truncate,
            "strip_tags" => Self::StripTags,
            "escape" => Self::Escape,
            "url_encode" => Self::UrlEncode,
            "replace" => Self::Replace,
            _ => return None,
        };
        Some(directive)
    }

    /// Apply the directive to an already resolved value.
    ///
    /// `args` are the raw arguments after the value, still quoted.
    #[must_use]
    pub fn apply(self, value: &str, args: &[&str]) -> String {
        match self {
            Self::Lower => value.to_lowercase(),
            Self::Upper => value.to_uppercase(),
            Self::UcFirst => upper_first(value),
            Self::UcWords => upper_words(value),
            Self::Truncate => {
                let length = args
                    .first()
                    .and_then(|arg| strip_quotes(arg).parse().ok())
                    .unwrap_or(DEFAULT_TRUNCATE_LENGTH);
                let suffix = args.get(1).map_or(DEFAULT_TRUNCATE_SUFFIX, |arg| strip_quotes(arg));
                truncate_chars(value, length, suffix)
            }
            Self::StripTags => strip_tags(value),
            Self::Escape => escape_html(value),
            Self::UrlEncode => url_encode(value),
            Self::Replace => {
                let search = args.first().map_or("", |arg| strip_quotes(arg));
                if search.is_empty() {
                    return value.to_owned();
                }
                let replacement = args.get(1).map_or("", |arg| strip_quotes(arg));
                value.replace(search, replacement)
            }
        }
    }
}

fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_words(value: &str) -> String {
    let mut result = String::with_capacity(value.len());
    let mut at_word_start = true;
    for c in value.chars() {
        if at_word_start && !c.is_whitespace() {
            result.extend(c.to_uppercase());
        } else {
            result.push(c);
        }
        at_word_start = c.is_whitespace();
    }
    result
}

fn url_encode(value: &str) -> String {
    utf8_percent_encode(value, FORM_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}
