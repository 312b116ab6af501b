use chrono::Utc;
use url::Url;

use crate::classifier::classify;
use crate::error::BuildError;
use crate::fetcher::canonicalize;
use crate::models::ProductRecord;
use crate::parsers::{detect_currency, parse_price_amount};

/// Bound on stored description length.
pub const DESCRIPTION_MAX_CHARS: usize = 200;

/// Host substring -> human-readable site name. Unmatched hosts fall back to
/// the literal domain.
const SOURCE_SITES: &[(&str, &str)] = &[
    ("leaders.jo", "Leaders Center Jordan"),
    ("smartbuy", "SmartBuy Jordan"),
];

/// Raw field values handed over by a site scraper. Everything but the title
/// may be empty.
#[derive(Debug, Clone, Default)]
pub struct ExtractedFields {
    pub title: String,
    pub price: String,
    pub brand: String,
    pub description: String,
}

/// Assemble a normalized `ProductRecord` from extracted fields.
///
/// An empty title makes the record invalid: it is never persisted and the
/// caller counts it as an error. Every other field tolerates absence.
pub fn build_record(url: &str, fields: ExtractedFields) -> Result<ProductRecord, BuildError> {
    let canonical = canonicalize(url);

    if fields.title.is_empty() {
        return Err(BuildError::MissingTitle { url: canonical });
    }

    let currency = detect_currency(&fields.price);
    let price_amount = parse_price_amount(&fields.price);
    let category = classify(&canonical, &fields.title).to_string();
    let source_website = detect_source_website(&canonical);
    let description = truncate_chars(&fields.description, DESCRIPTION_MAX_CHARS);
    let now = Utc::now();

    Ok(ProductRecord {
        url: canonical,
        title: fields.title,
        price: fields.price,
        price_amount,
        currency,
        brand: fields.brand,
        description,
        category,
        source_website,
        scraped_at: now,
        last_updated: now,
    })
}

/// Match the URL host against the known-site table, falling back to the
/// literal host for anything unrecognized.
pub fn detect_source_website(url: &str) -> String {
    let url_lower = url.to_lowercase();
    for (marker, name) in SOURCE_SITES {
        if url_lower.contains(marker) {
            return name.to_string();
        }
    }
    Url::parse(url)
        .ok()
        .and_then(|parsed| parsed.host_str().map(str::to_string))
        .unwrap_or_default()
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
