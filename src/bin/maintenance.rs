//! Operational maintenance for the scraper database: purges session log
//! entries past the retention window and prints a short status report.
//! Run manually or from a scheduled job; the pipeline itself never purges.

use anyhow::Result;

use jordan_electronics_scraper::config::Config;
use jordan_electronics_scraper::storage::{SqliteStorage, Storage};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = Config::load()?;
    let storage = SqliteStorage::new(&config.database_path)?;
    storage.migrate().await?;

    let deleted = storage
        .purge_sessions_older_than(config.session_retention_days)
        .await?;
    println!(
        "Purged {} session entries older than {} days",
        deleted, config.session_retention_days
    );

    let products = storage.count_products().await?;
    println!("Stored products: {}", products);

    println!("\nRecent sessions:");
    for session in storage.recent_sessions(None, 10).await? {
        println!(
            "  {} | {:<24} | {:<7} | {:>3} products | {}",
            session.timestamp.format("%Y-%m-%d %H:%M:%S"),
            session.website,
            session.status.as_str(),
            session.products_scraped,
            session.notes
        );
    }

    Ok(())
}
