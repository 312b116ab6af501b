pub mod price;

pub use price::*;

use html_escape::decode_html_entities;
use scraper::{Html, Selector};

/// Clean and normalize text: decode HTML entities, collapse whitespace runs
/// to single spaces, trim. Currency symbols and Arabic script pass through
/// untouched.
pub fn clean_text(text: &str) -> String {
    let decoded = decode_html_entities(text);
    decoded
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}

/// Resolve a field by trying each selector in order and returning the
/// cleaned text of the first match that is non-empty.
///
/// Selector lists are site-specific configuration supplied by the caller;
/// a selector that matches nothing (or matches an empty element) simply
/// falls through to the next candidate. An exhausted list returns `default`
/// — absent fields are expected, not an error.
pub fn extract_field(document: &Html, selectors: &[&str], default: &str) -> String {
    for candidate in selectors {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let text = clean_text(&element.text().collect::<String>());
            if !text.is_empty() {
                return text;
            }
        }
    }
    default.to_string()
}
