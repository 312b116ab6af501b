use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Run-wide configuration. Defaults cover both known sites; an optional
/// `scraper.toml` next to the binary and `SCRAPER_*` environment variables
/// (double underscore as the nesting separator) can override any field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub database_path: String,
    pub debug_html_dir: String,
    /// Identifying agent string so sites can recognize and rate-limit us.
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub max_categories_per_site: usize,
    pub max_products_per_category: usize,
    pub session_retention_days: i64,
    pub sites: HashMap<String, SiteConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    pub base_url: String,
    /// Politeness interval between requests to this site, in seconds.
    pub delay_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        let mut sites = HashMap::new();

        sites.insert(
            "leaders".to_string(),
            SiteConfig {
                name: "Leaders Center Jordan".to_string(),
                base_url: "https://leaders.jo/en/".to_string(),
                delay_seconds: 3,
            },
        );

        sites.insert(
            "smartbuy".to_string(),
            SiteConfig {
                name: "SmartBuy Jordan".to_string(),
                base_url: "https://smartbuy-me.com".to_string(),
                delay_seconds: 2,
            },
        );

        Config {
            database_path: "jordan_electronics.db".to_string(),
            debug_html_dir: "debug_html".to_string(),
            user_agent: "Jordan Electronics Research Bot/1.0 (+research@example.com)".to_string(),
            request_timeout_secs: 30,
            max_categories_per_site: 2,
            max_products_per_category: 5,
            session_retention_days: 30,
            sites,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("scraper").required(false))
            .add_source(config::Environment::with_prefix("SCRAPER").separator("__"))
            .build()
            .context("failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("invalid configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_both_sites() {
        let config = Config::default();
        assert!(config.sites.contains_key("leaders"));
        assert!(config.sites.contains_key("smartbuy"));
        assert_eq!(config.sites["leaders"].delay_seconds, 3);
        assert!(config.user_agent.contains("Research Bot"));
    }
}
