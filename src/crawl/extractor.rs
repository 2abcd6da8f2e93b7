//! Tag-shaped HTML extraction
//!
//! Title text, paragraph text, and outbound hrefs are pulled out of raw HTML
//! with three fixed regular expressions, case-insensitive and dot-matches-
//! newline. This is deliberately not conformant HTML parsing: which exact
//! substrings become tokens is observable through term frequencies and thus
//! through ranking, so the capture boundaries of these patterns are part of
//! the engine's contract. Do not swap in a real HTML parser without
//! re-characterising every ranking expectation.

use fancy_regex::Regex;
use std::sync::OnceLock;

/// Title used for pages whose HTML has no title tag
pub const UNTITLED: &str = "<Untitled Page>";

static TITLE_RE: OnceLock<Regex> = OnceLock::new();
static TEXT_RE: OnceLock<Regex> = OnceLock::new();
static HREF_RE: OnceLock<Regex> = OnceLock::new();

fn title_re() -> &'static Regex {
    TITLE_RE.get_or_init(|| Regex::new(r#"(?is)<[^>]*title[^>]*>(.+)<[^>]*/title[^>]*>"#).unwrap())
}

fn text_re() -> &'static Regex {
    // The lookahead keeps <pre> and <pic...> tags from opening a text block.
    TEXT_RE.get_or_init(|| Regex::new(r#"(?is)<[^>]*p(?!re|ic)[^>]*>(.+)<[^>]*/p[^>]*>"#).unwrap())
}

fn href_re() -> &'static Regex {
    HREF_RE.get_or_init(|| Regex::new(r#"(?is)<\s*a[^>]+href\s*=\s*"(.+?)"[^>]*>"#).unwrap())
}

/// Extract the first title capture, or [`UNTITLED`] when the page has none.
pub fn extract_title(html: &str) -> String {
    title_re()
        .captures(html)
        .ok()
        .flatten()
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| UNTITLED.to_string())
}

/// Extract and space-join every paragraph-text capture.
///
/// The capture group is greedy, so a page with several paragraph blocks
/// usually yields one capture spanning from the first opening tag to the last
/// closing tag, intermediate markup included. The tokenizer downstream turns
/// that markup into (observable) tokens; this matches the fixed contract.
pub fn extract_paragraphs(html: &str) -> String {
    text_re()
        .captures_iter(html)
        .filter_map(|c| c.ok())
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the href value of every anchor tag, in document order.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    href_re()
        .captures_iter(html)
        .filter_map(|c| c.ok())
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
