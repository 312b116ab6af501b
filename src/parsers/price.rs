use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::Currency;

static AMOUNT_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d[\d.,]*\d|\d").expect("invalid amount regex"));

/// Detect the currency from raw price text. Markers are checked in a fixed
/// priority: local dinar first, then USD, then EUR. Unknown or empty text
/// defaults to JOD.
pub fn detect_currency(price_text: &str) -> Currency {
    if price_text.is_empty() {
        return Currency::Jod;
    }

    let upper = price_text.to_uppercase();

    if price_text.contains("د.ا") || upper.contains("JOD") {
        Currency::Jod
    } else if price_text.contains('$') || upper.contains("USD") {
        Currency::Usd
    } else if price_text.contains('€') || upper.contains("EUR") {
        Currency::Eur
    } else {
        Currency::Jod
    }
}

/// Extract the numeric amount from raw price text like "439.000 JOD".
///
/// Separator handling: with both `,` and `.` present the comma is treated
/// as a thousands separator; a lone comma is a decimal separator only when
/// it is followed by at most two digits. JOD prices commonly carry three
/// decimal places ("439.000" is 439 dinars), which `f64` parsing already
/// handles.
pub fn parse_price_amount(price_text: &str) -> Option<f64> {
    // Pull the first numeric token; currency markers like "د.ا" carry
    // literal dots and must not leak into the number.
    let mut cleaned = AMOUNT_TOKEN.find(price_text)?.as_str().to_string();

    if cleaned.contains(',') && cleaned.contains('.') {
        // Format like "1,234.56"
        cleaned = cleaned.replace(',', "");
    } else if cleaned.contains(',') {
        let parts: Vec<&str> = cleaned.split(',').collect();
        if parts.len() == 2 && parts[1].len() <= 2 {
            cleaned = cleaned.replace(',', ".");
        } else {
            cleaned = cleaned.replace(',', "");
        }
    }

    cleaned.parse::<f64>().ok()
}
