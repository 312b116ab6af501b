use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use url::Url;

use crate::config::SiteConfig;
use crate::fetcher::PoliteFetcher;
use crate::models::ProductRecord;

mod leaders;
mod smartbuy;

pub use leaders::LeadersScraper;
pub use smartbuy::SmartBuyScraper;

/// A named category landing page.
pub type CategoryLink = (String, String);

/// Capability interface implemented once per target site.
///
/// Site scrapers own only site-specific knowledge (selector lists, link
/// patterns); the politeness-aware fetcher, the field extractor and the
/// record builder are shared and injected at call sites. `scrape_product`
/// returns `Ok(None)` when the URL was already fetched in this run.
#[async_trait]
pub trait SiteScraper: Send + Sync {
    fn site(&self) -> &SiteConfig;

    async fn find_category_links(&self, fetcher: &PoliteFetcher) -> Result<Vec<CategoryLink>>;

    async fn find_product_links(
        &self,
        fetcher: &PoliteFetcher,
        category_url: &str,
        max_products: usize,
    ) -> Result<Vec<String>>;

    async fn scrape_product(
        &self,
        fetcher: &PoliteFetcher,
        url: &str,
    ) -> Result<Option<ProductRecord>>;
}

/// Collect `(text, absolute url)` pairs from the first selector tier that
/// yields anything, applying an href filter and deduplicating by URL.
///
/// Mirrors the fallback style of the per-site selector lists: selectors are
/// ordered from most to least specific, and later tiers are only consulted
/// when earlier ones come up empty.
pub(crate) fn select_links<F>(
    html: &str,
    selectors: &[&str],
    base_url: &str,
    limit: usize,
    mut keep: F,
) -> Vec<(String, String)>
where
    F: FnMut(&str, &str) -> bool,
{
    let document = Html::parse_document(html);
    let base = Url::parse(base_url).ok();

    for candidate in selectors {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };

        let mut found: Vec<(String, String)> = Vec::new();
        for element in document.select(&selector) {
            if found.len() >= limit {
                break;
            }
            let Some(href) = element.value().attr("href") else {
                continue;
            };
            let text = crate::parsers::clean_text(&element.text().collect::<String>());
            if !keep(href, &text) {
                continue;
            }
            let Some(absolute) = absolutize(base.as_ref(), href) else {
                continue;
            };
            if found.iter().any(|(_, existing)| existing == &absolute) {
                continue;
            }
            found.push((text, absolute));
        }

        if !found.is_empty() {
            return found;
        }
    }

    Vec::new()
}

fn absolutize(base: Option<&Url>, href: &str) -> Option<String> {
    if href.starts_with("http") {
        return Some(href.to_string());
    }
    base.and_then(|b| b.join(href).ok()).map(|u| u.to_string())
}
