use std::collections::HashSet;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use chrono::Utc;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{Client, ClientBuilder};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::FetchError;

/// Build the shared HTTP client. The user agent is a stable, descriptive
/// identifier so sites can recognize and rate-limit the bot if they choose.
pub fn create_client(user_agent: &str, timeout: Duration) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(
        ACCEPT,
        HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8"),
    );
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_static("en-US,en;q=0.9,ar;q=0.8"),
    );

    ClientBuilder::new()
        .user_agent(user_agent)
        .default_headers(headers)
        .timeout(timeout)
        .pool_max_idle_per_host(6)
        .build()
}

/// Result of a fetch attempt that did not fail.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Body of a freshly fetched page.
    Fresh(String),
    /// The URL was already fetched in this run; no network call was made.
    AlreadyFetched,
}

struct FetchState {
    last_request: Option<Instant>,
    seen: HashSet<String>,
}

/// Rate-limited HTTP fetcher with in-run URL deduplication.
///
/// One instance per site: the politeness interval and the seen-URL set are
/// both per-instance state, so concurrent activity on another site never
/// relaxes this site's delay. Holding the state lock across the delay and
/// the request itself keeps fetches on one instance strictly sequential.
pub struct PoliteFetcher {
    client: Client,
    delay: Duration,
    state: Mutex<FetchState>,
    debug_dir: PathBuf,
}

impl PoliteFetcher {
    pub fn new(client: Client, delay: Duration, debug_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            delay,
            state: Mutex::new(FetchState {
                last_request: None,
                seen: HashSet::new(),
            }),
            debug_dir: debug_dir.into(),
        }
    }

    /// Fetch a page, enforcing the politeness delay before every network
    /// call. Duplicate URLs within a run return `AlreadyFetched` without
    /// touching the network. Non-2xx responses fail with `FetchError::Status`
    /// after their body has been persisted to the debug sink.
    pub async fn fetch(&self, url: &str) -> Result<FetchOutcome, FetchError> {
        let parsed = parse_fetchable_url(url)?;
        let canonical = canonical_url(&parsed);

        let mut state = self.state.lock().await;

        if state.seen.contains(&canonical) {
            debug!(url = %canonical, "already fetched in this run, skipping");
            return Ok(FetchOutcome::AlreadyFetched);
        }

        if let Some(last) = state.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                sleep(self.delay - elapsed).await;
            }
        }
        state.last_request = Some(Instant::now());

        info!(url = %canonical, "fetching");

        let response = self
            .client
            .get(parsed.clone())
            .send()
            .await
            .map_err(|e| FetchError::Http {
                url: canonical.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(url = %canonical, status = status.as_u16(), "abnormal response");
            if let Ok(body) = response.text().await {
                self.save_debug_html(&parsed, status.as_u16(), &body);
            }
            return Err(FetchError::Status {
                url: canonical,
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Http {
            url: canonical.clone(),
            reason: e.to_string(),
        })?;

        state.seen.insert(canonical);
        Ok(FetchOutcome::Fresh(body))
    }

    /// Persist an abnormal response body for later selector tuning. This is
    /// a diagnostic side channel: write failures are logged and swallowed.
    fn save_debug_html(&self, url: &Url, status: u16, body: &str) {
        let filename = debug_filename(url);
        let html_path = self.debug_dir.join(format!("{filename}.html"));
        let meta_path = self.debug_dir.join(format!("{filename}.json"));

        if let Err(e) = std::fs::create_dir_all(&self.debug_dir) {
            warn!(error = %e, "failed to create debug directory");
            return;
        }
        if let Err(e) = std::fs::write(&html_path, body) {
            warn!(error = %e, path = %html_path.display(), "failed to save debug HTML");
            return;
        }

        let meta = serde_json::json!({
            "url": url.as_str(),
            "status": status,
            "fetched_at": Utc::now().to_rfc3339(),
        });
        if let Err(e) = std::fs::write(&meta_path, meta.to_string()) {
            warn!(error = %e, path = %meta_path.display(), "failed to save debug metadata");
        }

        info!(path = %html_path.display(), "saved debug HTML");
    }
}

fn parse_fetchable_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl(url.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        return Err(FetchError::InvalidUrl(url.to_string()));
    }
    Ok(parsed)
}

/// Canonical form used as the dedup and upsert key: absolute URL with the
/// fragment stripped, query preserved.
pub fn canonical_url(url: &Url) -> String {
    let mut canonical = url.clone();
    canonical.set_fragment(None);
    canonical.to_string()
}

/// Canonicalize a URL string, returning it unchanged if it does not parse.
pub fn canonicalize(url: &str) -> String {
    match Url::parse(url) {
        Ok(parsed) => canonical_url(&parsed),
        Err(_) => url.to_string(),
    }
}

/// Filename for the debug sink, derived from the URL path with a short
/// digest suffix so distinct URLs sharing a path never collide.
fn debug_filename(url: &Url) -> String {
    let path_part = url.path().trim_matches('/').replace('/', "_");
    let path_part = if path_part.is_empty() {
        "root".to_string()
    } else {
        path_part
    };
    let digest = md5::compute(url.as_str().as_bytes());
    let digest_hex = format!("{:x}", digest);
    format!("{}_{}", path_part, &digest_hex[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_urls_without_scheme_or_host() {
        assert!(parse_fetchable_url("not a url").is_err());
        assert!(parse_fetchable_url("ftp://example.com/file").is_err());
        assert!(parse_fetchable_url("file:///etc/passwd").is_err());
        assert!(parse_fetchable_url("https://example.com/p/1").is_ok());
    }

    #[test]
    fn canonical_form_strips_fragment_and_keeps_query() {
        assert_eq!(
            canonicalize("https://example.com/product/x?color=red#reviews"),
            "https://example.com/product/x?color=red"
        );
    }

    #[test]
    fn debug_filenames_are_path_keyed_and_distinct() {
        let a = Url::parse("https://example.com/en/product/oppo-reno/").unwrap();
        let b = Url::parse("https://example.com/en/product/oppo-reno/?v=2").unwrap();
        let name_a = debug_filename(&a);
        let name_b = debug_filename(&b);
        assert!(name_a.starts_with("en_product_oppo-reno_"));
        assert_ne!(name_a, name_b);
    }
}
