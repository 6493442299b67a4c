//! HTML cleaning and escaping helpers.

use std::sync::LazyLock;

use regex::Regex;

static TAG_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());

static SCRIPT_STYLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>|<style\b[^>]*>.*?</style>").unwrap()
});

static WIDGET_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{\{.*?\}\}").unwrap());

static BRACKET_DIRECTIVE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[/?[a-zA-Z_][^\[\]]*\]").unwrap());

static ATTRIBUTE_NOISE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\b(?:id|class|style|data-[a-z-]+)="[^"]*""#).unwrap());

static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Escape HTML special characters, including both quote styles.
///
/// ```
/// use seo_template::escape_html;
///
/// assert_eq!(escape_html(r#"<a href="x">Tom's</a>"#), "&lt;a href=&quot;x&quot;&gt;Tom&#039;s&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#039;"),
            _ => result.push(c),
        }
    }
    result
}

/// Remove HTML tags, keeping the text between them untouched.
#[must_use]
pub fn strip_tags(s: &str) -> String {
    let without_blocks = SCRIPT_STYLE_PATTERN.replace_all(s, "");
    TAG_PATTERN.replace_all(&without_blocks, "").into_owned()
}

/// Reduce rich content to a single line of plain text.
///
/// Drops leftover `{{...}}` widget calls, tags, bracketed page-builder
/// directives (`[row]`, `[/column]`) and `id="..."`/`class="..."` noise,
/// decodes entities, then collapses whitespace.
///
/// ```
/// use seo_template::clean_html;
///
/// let html = r#"<p class="lead">Fast &amp; light</p>[vc_row]{{widget type="x"}}<p>shoes</p>"#;
/// assert_eq!(clean_html(html), "Fast & light shoes");
/// ```
#[must_use]
pub fn clean_html(s: &str) -> String {
    let text = WIDGET_PATTERN.replace_all(s, " ");
    let text = SCRIPT_STYLE_PATTERN.replace_all(&text, " ");
    let text = TAG_PATTERN.replace_all(&text, " ");
    let text = html_escape::decode_html_entities(&text);
    let text = BRACKET_DIRECTIVE_PATTERN.replace_all(&text, " ");
    let text = ATTRIBUTE_NOISE_PATTERN.replace_all(&text, " ");
    WHITESPACE_PATTERN.replace_all(&text, " ").trim().to_owned()
}

/// Truncate to `max_chars` characters, appending `suffix` only when the input
/// was longer.
#[must_use]
pub fn truncate_chars(s: &str, max_chars: usize, suffix: &str) -> String {
    if s.chars().count() <= max_chars {
        return s.to_owned();
    }
    let mut result: String = s.chars().take(max_chars).collect();
    result.push_str(suffix);
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("'quoted'"), "&#039;quoted&#039;");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<b>Bold</b> text"), "Bold text");
        assert_eq!(strip_tags("a<script>alert(1)</script>b"), "ab");
        assert_eq!(strip_tags("no tags"), "no tags");
    }

    #[test]
    fn test_clean_html_collapses_whitespace() {
        assert_eq!(clean_html("<p>One</p>\n\n<p>Two</p>"), "One Two");
        assert_eq!(clean_html("   "), "");
    }

    #[test]
    fn test_clean_html_decodes_entities() {
        assert_eq!(clean_html("Caf&eacute; &lt;3"), "Café <3");
    }

    #[test]
    fn test_clean_html_strips_page_builder_artifacts() {
        let html = r#"[row id="r1"][column]<div id="main" class="x">Hello</div>[/column][/row]"#;
        assert_eq!(clean_html(html), "Hello");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("Wireless Headphones", 5, "..."), "Wirel...");
        assert_eq!(truncate_chars("short", 5, "..."), "short");
        assert_eq!(truncate_chars("Äpfel und Birnen", 5, "…"), "Äpfel…");
    }
}
