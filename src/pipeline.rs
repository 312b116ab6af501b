use tracing::{debug, error, info, warn};

use crate::fetcher::PoliteFetcher;
use crate::models::{ScrapeSession, SessionStatus};
use crate::scrapers::SiteScraper;
use crate::storage::Storage;

/// Run-wide scraping limits, kept deliberately small to stay polite.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub max_categories_per_site: usize,
    pub max_products_per_category: usize,
}

/// Per-site outcome surfaced to the orchestrator, which decides process
/// exit status from the aggregated counts.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub website: String,
    pub products_saved: u32,
    pub errors: u32,
    pub status: SessionStatus,
}

/// Drive one site end-to-end: discover categories, collect product links,
/// scrape, build and persist each record.
///
/// Failures are caught at URL granularity — one bad product never aborts
/// the batch. The session entry appended at the end is best-effort
/// telemetry; its failure never rolls back or masks the product upserts.
pub async fn run_site(
    scraper: &dyn SiteScraper,
    fetcher: &PoliteFetcher,
    storage: &dyn Storage,
    limits: Limits,
) -> RunSummary {
    let website = scraper.site().name.clone();
    info!(site = %website, "processing site");

    let mut products_saved: u32 = 0;
    let mut errors: u32 = 0;

    let categories = match scraper.find_category_links(fetcher).await {
        Ok(categories) => categories,
        Err(e) => {
            error!(site = %website, error = %e, "failed to discover categories");
            errors += 1;
            Vec::new()
        }
    };

    for (category_name, category_url) in categories.iter().take(limits.max_categories_per_site) {
        info!(site = %website, category = %category_name, "processing category");

        let product_urls = match scraper
            .find_product_links(fetcher, category_url, limits.max_products_per_category)
            .await
        {
            Ok(urls) => urls,
            Err(e) => {
                warn!(category = %category_name, error = %e, "failed to list products");
                errors += 1;
                continue;
            }
        };

        if product_urls.is_empty() {
            debug!(category = %category_name, "no products found in category");
            continue;
        }

        for product_url in &product_urls {
            match scraper.scrape_product(fetcher, product_url).await {
                Ok(Some(record)) => match storage.upsert_product(&record).await {
                    Ok(created) => {
                        products_saved += 1;
                        if created {
                            info!(title = %record.title, "new product saved");
                        } else {
                            info!(title = %record.title, "product updated");
                        }
                    }
                    Err(e) => {
                        errors += 1;
                        error!(url = %product_url, error = %e, "failed to save product");
                    }
                },
                Ok(None) => {
                    debug!(url = %product_url, "already fetched in this run, skipping");
                }
                Err(e) => {
                    errors += 1;
                    warn!(url = %product_url, error = %e, "failed to scrape product");
                }
            }
        }
    }

    let (status, notes) = summarize(products_saved, errors, categories.len());
    info!(site = %website, saved = products_saved, errors, status = %status, "site run finished");

    let session = ScrapeSession::new(website.clone(), status, products_saved, notes);
    if let Err(e) = storage.append_session(&session).await {
        // Session logging is telemetry only.
        warn!(site = %website, error = %e, "failed to log scrape session");
    }

    RunSummary {
        website,
        products_saved,
        errors,
        status,
    }
}

/// A clean zero-product run (everything already up to date) must stay
/// distinguishable from a run that saved nothing because of errors.
fn summarize(products_saved: u32, errors: u32, categories: usize) -> (SessionStatus, String) {
    if products_saved == 0 {
        if errors == 0 {
            (SessionStatus::Success, "no new products found".to_string())
        } else {
            (
                SessionStatus::Failed,
                format!("no products saved, {errors} errors"),
            )
        }
    } else if errors > 0 {
        (
            SessionStatus::Partial,
            format!("scraped {categories} categories, {products_saved} products saved, {errors} errors"),
        )
    } else {
        (
            SessionStatus::Success,
            format!("scraped {categories} categories, {products_saved} products saved"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_empty_run_is_distinguishable_from_a_failed_one() {
        let (clean_status, clean_notes) = summarize(0, 0, 2);
        let (failed_status, failed_notes) = summarize(0, 3, 2);

        assert_eq!(clean_status, SessionStatus::Success);
        assert_eq!(failed_status, SessionStatus::Failed);
        assert_ne!(clean_notes, failed_notes);
        assert!(failed_notes.contains("3 errors"));
    }

    #[test]
    fn partial_runs_carry_both_counts() {
        let (status, notes) = summarize(4, 1, 2);
        assert_eq!(status, SessionStatus::Partial);
        assert!(notes.contains("4 products"));
        assert!(notes.contains("1 errors"));
    }
}
