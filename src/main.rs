use anyhow::Result;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use jordan_electronics_scraper::config::Config;
use jordan_electronics_scraper::fetcher::{create_client, PoliteFetcher};
use jordan_electronics_scraper::pipeline::{run_site, Limits, RunSummary};
use jordan_electronics_scraper::scrapers::{LeadersScraper, SiteScraper, SmartBuyScraper};
use jordan_electronics_scraper::storage::{SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("jordan_electronics_scraper=info".parse()?),
        )
        .init();

    info!("starting Jordan electronics scraper");

    let config = Arc::new(Config::load()?);

    let storage = Arc::new(SqliteStorage::new(&config.database_path)?);
    storage.migrate().await?;

    // One pooled client for everything; politeness state is per fetcher.
    let client = create_client(
        &config.user_agent,
        Duration::from_secs(config.request_timeout_secs),
    )?;

    let limits = Limits {
        max_categories_per_site: config.max_categories_per_site,
        max_products_per_category: config.max_products_per_category,
    };

    let mut scrapers: Vec<Box<dyn SiteScraper>> = Vec::new();
    for (key, site) in &config.sites {
        match key.as_str() {
            "leaders" => scrapers.push(Box::new(LeadersScraper::new(site.clone()))),
            "smartbuy" => scrapers.push(Box::new(SmartBuyScraper::new(site.clone()))),
            other => warn!(site = other, "no scraper implementation for configured site"),
        }
    }

    // Each site gets its own fetcher: its own politeness interval and its
    // own seen-URL set, unaffected by concurrent activity on other sites.
    let site_futures = scrapers.into_iter().map(|scraper| {
        let client = client.clone();
        let storage = storage.clone();
        let config = config.clone();

        async move {
            let delay = Duration::from_secs(scraper.site().delay_seconds);
            let fetcher = PoliteFetcher::new(client, delay, &config.debug_html_dir);
            run_site(scraper.as_ref(), &fetcher, storage.as_ref(), limits).await
        }
    });

    let summaries: Vec<RunSummary> = join_all(site_futures).await;

    let mut total_saved: u32 = 0;
    let mut total_errors: u32 = 0;
    for summary in &summaries {
        info!(
            site = %summary.website,
            saved = summary.products_saved,
            errors = summary.errors,
            status = %summary.status,
            "site summary"
        );
        total_saved += summary.products_saved;
        total_errors += summary.errors;
    }

    info!(total_saved, total_errors, "scraping run completed");

    // Fail the process only when nothing was saved AND something went
    // wrong; a clean run with zero new products is not a failure.
    if total_saved == 0 && total_errors > 0 {
        error!("no products saved and errors were encountered");
        std::process::exit(1);
    }

    Ok(())
}
