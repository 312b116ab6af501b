use anyhow::Result;
use async_trait::async_trait;
use scraper::Html;
use tracing::{debug, info};

use crate::builder::{build_record, ExtractedFields};
use crate::config::SiteConfig;
use crate::fetcher::{FetchOutcome, PoliteFetcher};
use crate::models::ProductRecord;
use crate::parsers::extract_field;
use crate::scrapers::{select_links, CategoryLink, SiteScraper};

/// Navigation link text/href must mention one of these for the link to be
/// treated as an electronics category.
const CATEGORY_KEYWORDS: &[&str] = &[
    "laptop",
    "computer",
    "mobile",
    "phone",
    "tablet",
    "electronics",
    "gaming",
    "audio",
    "camera",
    "tv",
    "monitor",
    "printer",
    "accessories",
    "apple",
    "samsung",
];

const NAV_SELECTORS: &[&str] = &[
    "nav a",
    ".navigation a",
    ".menu a",
    ".navbar a",
    ".main-menu a",
    ".category-menu a",
    "header a",
];

const PRODUCT_LINK_SELECTORS: &[&str] = &[
    r#"a[href*="/product/"]"#,
    r#".product a[href*="/product/"]"#,
    r#".product-item a[href*="/product/"]"#,
    r#".product-card a[href*="/product/"]"#,
];

const TITLE_SELECTORS: &[&str] = &[
    "h1",
    ".product-title",
    ".product-name",
    ".title",
    "[data-product-title]",
    ".product-info h1",
    ".product-details h1",
];

const PRICE_SELECTORS: &[&str] = &[
    ".price",
    ".product-price",
    ".cost",
    ".amount",
    "[data-price]",
    ".money",
    ".price-current",
    ".sale-price",
];

const BRAND_SELECTORS: &[&str] = &[".brand", ".manufacturer", ".product-brand", "[data-brand]"];

const DESC_SELECTORS: &[&str] = &[
    ".product-description",
    ".description",
    ".product-info p",
    ".details",
    ".product-details p",
];

/// Scraper for leaders.jo. WooCommerce-style markup: product pages live
/// under `/product/`, category listings under `/product-category/`.
pub struct LeadersScraper {
    site: SiteConfig,
}

impl LeadersScraper {
    pub fn new(site: SiteConfig) -> Self {
        Self { site }
    }

    fn products_page_url(&self) -> String {
        format!("{}/products/", self.site.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl SiteScraper for LeadersScraper {
    fn site(&self) -> &SiteConfig {
        &self.site
    }

    async fn find_category_links(&self, fetcher: &PoliteFetcher) -> Result<Vec<CategoryLink>> {
        let html = match fetcher.fetch(&self.site.base_url).await? {
            FetchOutcome::Fresh(html) => html,
            FetchOutcome::AlreadyFetched => return Ok(Vec::new()),
        };

        let categories = select_links(&html, NAV_SELECTORS, &self.site.base_url, 10, |href, text| {
            let href_lower = href.to_lowercase();
            let text_lower = text.to_lowercase();
            !text.is_empty()
                && CATEGORY_KEYWORDS
                    .iter()
                    .any(|kw| text_lower.contains(kw) || href_lower.contains(kw))
        });

        if !categories.is_empty() {
            for (name, url) in &categories {
                info!(category = %name, url = %url, "found category");
            }
            return Ok(categories);
        }

        // No recognizable navigation; fall back to any product-bearing pages.
        debug!("no categories in navigation, falling back to product links");
        let fallback = select_links(
            &html,
            &[r#"a[href*="product"]"#],
            &self.site.base_url,
            3,
            |_, _| true,
        )
        .into_iter()
        .map(|(text, url)| {
            let name = if text.is_empty() { "Product Page".to_string() } else { text };
            (name, url)
        })
        .collect();

        Ok(fallback)
    }

    async fn find_product_links(
        &self,
        fetcher: &PoliteFetcher,
        category_url: &str,
        max_products: usize,
    ) -> Result<Vec<String>> {
        let mut links = match fetcher.fetch(category_url).await? {
            FetchOutcome::Fresh(html) => product_links_in(&html, &self.site.base_url, max_products),
            FetchOutcome::AlreadyFetched => Vec::new(),
        };

        // Sparse category pages are common; the main products page is a
        // reliable backstop.
        if links.is_empty() {
            debug!(category = %category_url, "no products in category, trying main products page");
            if let FetchOutcome::Fresh(html) = fetcher.fetch(&self.products_page_url()).await? {
                links = product_links_in(&html, &self.site.base_url, max_products);
            }
        }

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

fn product_links_in(html: &str, base_url: &str, max_products: usize) -> Vec<String> {
    select_links(html, PRODUCT_LINK_SELECTORS, base_url, max_products, |href, _| {
        href.contains("/product/") && !href.contains("/product-category/")
    })
    .into_iter()
    .map(|(_, url)| url)
    .collect()
}

fn extract_product_fields(html: &str) -> ExtractedFields {
    let document = Html::parse_document(html);
    ExtractedFields {
        title: extract_field(&document, TITLE_SELECTORS, ""),
        price: extract_field(&document, PRICE_SELECTORS, ""),
        brand: extract_field(&document, BRAND_SELECTORS, ""),
        description: extract_field(&document, DESC_SELECTORS, ""),
    }
}
