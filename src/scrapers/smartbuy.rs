use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;
use tracing::info;

use crate::builder::{build_record, ExtractedFields};
use crate::config::SiteConfig;
use crate::fetcher::{FetchOutcome, PoliteFetcher};
use crate::models::ProductRecord;
use crate::parsers::extract_field;
use crate::scrapers::{select_links, CategoryLink, SiteScraper};

const NAV_SELECTORS: &[&str] = &[
    r#"nav a[href*="/collections/"]"#,
    r#".navigation a[href*="/collections/"]"#,
    r#".menu a[href*="/collections/"]"#,
    r#"a[href*="/collections/"]"#,
];

const PRODUCT_LINK_SELECTORS: &[&str] = &[
    r#"a[href*="/products/"]"#,
    ".product-item a",
    ".product-card a",
    ".product a",
];

const TITLE_SELECTORS: &[&str] = &["h1", ".product-title", ".product-name", "[data-product-title]"];

const PRICE_SELECTORS: &[&str] = &[".price", ".product-price", "[data-price]", ".money"];

const DESC_SELECTORS: &[&str] = &[".product-description", ".description", ".product-info p"];

/// Scraper for smartbuy-me.com. Shopify-style markup: categories are
/// `/collections/` pages, products live under `/products/`. The site exposes
/// no reliable brand element, so `brand` is left to the merge layer.
pub struct SmartBuyScraper {
    site: SiteConfig,
}

impl SmartBuyScraper {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }
}

#[async_trait]
impl SiteScraper for SmartBuyScraper {
    fn site(&self) -> &SiteConfig {
        &self.site
    }

    async fn find_category_links(&self, fetcher: &PoliteFetcher) -> Result<Vec<CategoryLink>> {
        let html = match fetcher.fetch(&self.site.base_url).await? {
            FetchOutcome::Fresh(html) => html,
            FetchOutcome::AlreadyFetched => return Ok(Vec::new()),
        };

        let categories = select_links(&html, NAV_SELECTORS, &self.site.base_url, 5, |href, text| {
            href.contains("/collections/") && !text.is_empty()
        });

        for (name, url) in &categories {
            info!(category = %name, url = %url, "found category");
        }
        Ok(categories)
    }

    async fn find_product_links(
        &self,
        fetcher: &PoliteFetcher,
        category_url: &str,
        max_products: usize,
    ) -> Result<Vec<String>> {
        let html = match fetcher.fetch(category_url).await? {
            FetchOutcome::Fresh(html) => html,
            FetchOutcome::AlreadyFetched => return Ok(Vec::new()),
        };

        let links = select_links(&html, PRODUCT_LINK_SELECTORS, &self.site.base_url, max_products, |href, _| {
            href.contains("/products/")
        })
        .into_iter()
        .map(|(_, url)| url)
        .collect();

        Ok(links)
    }

    async fn scrape_product(
        &self,
        fetcher: &PoliteFetcher,
        url: &str,
    ) -> Result<Option<ProductRecord>> {
        let html = match fetcher.fetch(url).await? {
            FetchOutcome::Fresh(html) => html,
            FetchOutcome::AlreadyFetched => return Ok(None),
        };

        let fields = extract_product_fields(&html);
        let record = build_record(url, fields)?;
        info!(title = %record.title, price = %record.price, "scraped product");
        Ok(Some(record))
    }
}

fn extract_product_fields(html: &str) -> ExtractedFields {
    let document = Html::parse_document(html);
    ExtractedFields {
        title: extract_field(&document, TITLE_SELECTORS, ""),
        price: extract_field(&document, PRICE_SELECTORS, ""),
        brand: String::new(),
        description: extract_field(&document, DESC_SELECTORS, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collection_links_are_discovered_and_absolutized() {
        let html = r#"
            <html><body><nav>
                <a href="/collections/mobiles">Mobiles</a>
                <a href="/collections/home-appliances">Home Appliances</a>
                <a href="/pages/about">About</a>
            </nav></body></html>"#;

        let links = select_links(html, NAV_SELECTORS, "https://smartbuy-me.com", 5, |href, text| {
            href.contains("/collections/") && !text.is_empty()
        });

        assert_eq!(
            links,
            vec![
                ("Mobiles".to_string(), "https://smartbuy-me.com/collections/mobiles".to_string()),
                (
                    "Home Appliances".to_string(),
                    "https://smartbuy-me.com/collections/home-appliances".to_string()
                ),
            ]
        );
    }

    #[test]
    fn product_fields_tolerate_missing_description() {
        let html = r#"
            <html><body>
                <h1>JBL Flip 6</h1>
                <div class="price">59.000 JOD</div>
            </body></html>"#;

        let fields = extract_product_fields(html);
        assert_eq!(fields.title, "JBL Flip 6");
        assert_eq!(fields.price, "59.000 JOD");
        assert_eq!(fields.description, "");
    }
}
