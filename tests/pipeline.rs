use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use jordan_electronics_scraper::config::SiteConfig;
use jordan_electronics_scraper::fetcher::{create_client, PoliteFetcher};
use jordan_electronics_scraper::models::{Currency, SessionStatus};
use jordan_electronics_scraper::pipeline::{run_site, Limits};
use jordan_electronics_scraper::scrapers::SmartBuyScraper;
use jordan_electronics_scraper::storage::{SqliteStorage, Storage};

const LIMITS: Limits = Limits {
    max_categories_per_site: 2,
    max_products_per_category: 5,
};

fn site_config(base_url: String) -> SiteConfig {
    SiteConfig {
        name: "SmartBuy Jordan".to_string(),
        base_url,
        delay_seconds: 0,
    }
}

fn test_fetcher() -> PoliteFetcher {
    let client = create_client("Test Bot/1.0", Duration::from_secs(5)).unwrap();
    let debug_dir = std::env::temp_dir().join(format!("jes-pipeline-{}", std::process::id()));
    PoliteFetcher::new(client, Duration::from_millis(10), debug_dir)
}

async fn storage() -> SqliteStorage {
    let storage = SqliteStorage::in_memory().unwrap();
    storage.migrate().await.unwrap();
    storage
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_run_scrapes_classifies_and_persists() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body><nav>
            <a href="/collections/mobiles">Mobiles</a>
        </nav></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/collections/mobiles",
        r#"<html><body>
            <a href="/products/galaxy-s24">Samsung Galaxy S24</a>
        </body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/products/galaxy-s24",
        r#"<html><body>
            <h1>Samsung Galaxy S24 5G 256GB</h1>
            <div class="price">439.000 JOD</div>
            <div class="description">Flagship phone with 256GB of storage.</div>
        </body></html>"#,
    )
    .await;

    let scraper = SmartBuyScraper::new(site_config(server.uri()));
    let fetcher = test_fetcher();
    let storage = storage().await;

    let summary = run_site(&scraper, &fetcher, &storage, LIMITS).await;

    assert_eq!(summary.products_saved, 1);
    assert_eq!(summary.errors, 0);
    assert_eq!(summary.status, SessionStatus::Success);

    let url = format!("{}/products/galaxy-s24", server.uri());
    let record = storage.get_product(&url).await.unwrap().unwrap();
    assert_eq!(record.title, "Samsung Galaxy S24 5G 256GB");
    assert_eq!(record.category, "Mobile Phones");
    assert_eq!(record.currency, Currency::Jod);
    assert_eq!(record.price_amount, Some(439.0));

    let sessions = storage
        .recent_sessions(Some("SmartBuy Jordan"), 5)
        .await
        .unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].status, SessionStatus::Success);
    assert_eq!(sessions[0].products_scraped, 1);
}

#[tokio::test]
async fn products_without_a_title_are_rejected_not_persisted() {
    let server = MockServer::start().await;

    mount_page(
        &server,
        "/",
        r#"<html><body><nav>
            <a href="/collections/audio">Audio</a>
        </nav></body></html>"#,
    )
    .await;
    mount_page(
        &server,
        "/collections/audio",
        r#"<html><body>
            <a href="/products/mystery-item">???</a>
        </body></html>"#,
    )
    .await;
    // Product page with no recognizable title element.
    mount_page(
        &server,
        "/products/mystery-item",
        r#"<html><body><div class="price">10.000 JOD</div></body></html>"#,
    )
    .await;

    let scraper = SmartBuyScraper::new(site_config(server.uri()));
    let fetcher = test_fetcher();
    let storage = storage().await;

    let summary = run_site(&scraper, &fetcher, &storage, LIMITS).await;

    assert_eq!(summary.products_saved, 0);
    assert_eq!(summary.errors, 1);
    assert_eq!(summary.status, SessionStatus::Failed);
    assert_eq!(storage.count_products().await.unwrap(), 0);

    let sessions = storage.recent_sessions(None, 5).await.unwrap();
    assert_eq!(sessions.len(), 1);
    assert!(sessions[0].notes.contains("1 errors"));
}

#[tokio::test]
async fn unreachable_site_logs_a_failed_session() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let scraper = SmartBuyScraper::new(site_config(server.uri()));
    let fetcher = test_fetcher();
    let storage = storage().await;

    let summary = run_site(&scraper, &fetcher, &storage, LIMITS).await;

    assert_eq!(summary.products_saved, 0);
    assert!(summary.errors > 0);
    assert_eq!(summary.status, SessionStatus::Failed);
}
