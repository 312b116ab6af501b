use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Currency detected from raw price text. JOD is the default for Jordanian
/// storefronts when no marker is present.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    #[default]
    #[serde(rename = "JOD")]
    Jod,
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "EUR")]
    Eur,
}

impl Currency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::Jod => "JOD",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "JOD" => Ok(Currency::Jod),
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            other => Err(format!("unknown currency code `{other}`")),
        }
    }
}

/// A normalized product listing keyed by canonical URL.
///
/// All string fields except `url` and `title` may legitimately be empty:
/// site markup varies and absent fields are tolerated. The storage layer
/// merges by presence, so an empty field never clobbers a previously
/// scraped value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub url: String,
    pub title: String,
    /// Raw display text, e.g. "439.000 JOD".
    pub price: String,
    /// Numeric amount derived from `price`, when parseable.
    pub price_amount: Option<f64>,
    pub currency: Currency,
    pub brand: String,
    /// Truncated to `DESCRIPTION_MAX_CHARS`.
    pub description: String,
    pub category: String,
    pub source_website: String,
    pub scraped_at: DateTime<Utc>,
    pub last_updated: DateTime<Utc>,
}
