//! Template syntax.
//!
//! Two shapes are recognized inside `{{ }}`:
//!
//! - variables: `{{ product.name }}` (letters, digits, `_` and `.`)
//! - directives: `{{ truncate(product.description, 160) }}`
//!
//! Anything else between braces is left as written.

use std::sync::LazyLock;

use regex::Regex;

/// `{{ path.to.value }}`
pub(crate) static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*([a-zA-Z0-9_.]+)\s*\}\}").unwrap());

/// `{{ name(arg, arg) }}`
pub(crate) static DIRECTIVE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([a-zA-Z_][a-zA-Z0-9_]*)\(([^)]*)\)\s*\}\}").unwrap()
});

/// Split a directive argument list on commas and trim each argument.
///
/// An empty or blank list yields no arguments.
pub(crate) fn split_args(raw: &str) -> Vec<&str> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    raw.split(',').map(str::trim).collect()
}

/// Whether an argument is wrapped in a matching pair of quotes.
pub(crate) fn is_quoted(arg: &str) -> bool {
    arg.len() >= 2
        && ((arg.starts_with('\'') && arg.ends_with('\''))
            || (arg.starts_with('"') && arg.ends_with('"')))
}

/// Remove one matching pair of surrounding quotes, if present.
pub(crate) fn strip_quotes(arg: &str) -> &str {
    if is_quoted(arg) {
        &arg[1..arg.len() - 1]
    } else {
        arg
    }
}

/// Split a variable path into its non-empty segments.
pub(crate) fn segments(path: &str) -> Vec<&str> {
    path.split('.').filter(|s| !s.is_empty()).collect()
}
