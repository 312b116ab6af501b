use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::sync::{Arc, Mutex};
use tracing::info;

use crate::error::StoreError;
use crate::models::{Currency, ProductRecord, ScrapeSession, SessionStatus};
use crate::storage::Storage;

pub struct SqliteStorage {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStorage {
    pub fn new(db_path: &str) -> Result<Self, StoreError> {
        let conn = Connection::open(db_path)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Private in-process database, used by tests.
    pub fn in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }
}

#[async_trait]
impl Storage for SqliteStorage {
    async fn migrate(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        // Uniqueness on `url` is enforced here, at the storage layer.
        conn.execute(
            "CREATE TABLE IF NOT EXISTS products (
                url TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                price TEXT NOT NULL DEFAULT '',
                price_amount REAL,
                currency TEXT NOT NULL DEFAULT 'JOD',
                brand TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                category TEXT NOT NULL DEFAULT 'Electronics',
                source_website TEXT NOT NULL DEFAULT '',
                scraped_at TEXT NOT NULL,
                last_updated TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_products_category ON products(category)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_products_source ON products(source_website)",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_products_scraped_at ON products(scraped_at)",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS scrape_sessions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                website TEXT NOT NULL,
                status TEXT NOT NULL,
                products_scraped INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                notes TEXT NOT NULL DEFAULT '',
                schema_version TEXT NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_sessions_website_time
             ON scrape_sessions(website, timestamp)",
            [],
        )?;

        info!("database migration completed");
        Ok(())
    }

    async fn upsert_product(&self, record: &ProductRecord) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();

        let existed: Option<i32> = conn
            .query_row(
                "SELECT 1 FROM products WHERE url = ?1",
                params![record.url],
                |row| row.get(0),
            )
            .optional()?;

        // Merge by presence: an empty incoming field keeps the stored value.
        // Currency and the numeric amount follow the presence of the raw
        // price text, since both are derived from it.
        conn.execute(
            "INSERT INTO products (
                url, title, price, price_amount, currency, brand, description,
                category, source_website, scraped_at, last_updated
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            ON CONFLICT(url) DO UPDATE SET
                title = CASE WHEN excluded.title <> '' THEN excluded.title ELSE products.title END,
                price = CASE WHEN excluded.price <> '' THEN excluded.price ELSE products.price END,
                price_amount = CASE WHEN excluded.price <> '' THEN excluded.price_amount ELSE products.price_amount END,
                currency = CASE WHEN excluded.price <> '' THEN excluded.currency ELSE products.currency END,
                brand = CASE WHEN excluded.brand <> '' THEN excluded.brand ELSE products.brand END,
                description = CASE WHEN excluded.description <> '' THEN excluded.description ELSE products.description END,
                category = excluded.category,
                source_website = excluded.source_website,
                scraped_at = excluded.scraped_at,
                last_updated = excluded.last_updated",
            params![
                record.url,
                record.title,
                record.price,
                record.price_amount,
                record.currency.as_str(),
                record.brand,
                record.description,
                record.category,
                record.source_website,
                record.scraped_at.to_rfc3339(),
                record.last_updated.to_rfc3339(),
            ],
        )?;

        Ok(existed.is_none())
    }

    async fn get_product(&self, url: &str) -> Result<Option<ProductRecord>, StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.query_row(
            "SELECT url, title, price, price_amount, currency, brand, description,
                    category, source_website, scraped_at, last_updated
             FROM products WHERE url = ?1",
            params![url],
            row_to_product,
        )
        .optional()
        .map_err(StoreError::from)
    }

    async fn count_products(&self) -> Result<u64, StoreError> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    async fn append_session(&self, session: &ScrapeSession) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();

        conn.execute(
            "INSERT INTO scrape_sessions
                (website, status, products_scraped, timestamp, notes, schema_version)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                session.website,
                session.status.as_str(),
                session.products_scraped,
                session.timestamp.to_rfc3339(),
                session.notes,
                session.schema_version,
            ],
        )?;

        Ok(())
    }

    async fn recent_sessions(
        &self,
        website: Option<&str>,
        limit: u32,
    ) -> Result<Vec<ScrapeSession>, StoreError> {
        let conn = self.conn.lock().unwrap();

        let mut sessions = Vec::new();
        match website {
            Some(site) => {
                let mut stmt = conn.prepare(
                    "SELECT website, status, products_scraped, timestamp, notes, schema_version
                     FROM scrape_sessions WHERE website = ?1
                     ORDER BY timestamp DESC LIMIT ?2",
                )?;
                let rows = stmt.query_map(params![site, limit], row_to_session)?;
                for row in rows {
                    sessions.push(row?);
                }
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT website, status, products_scraped, timestamp, notes, schema_version
                     FROM scrape_sessions ORDER BY timestamp DESC LIMIT ?1",
                )?;
                let rows = stmt.query_map(params![limit], row_to_session)?;
                for row in rows {
                    sessions.push(row?);
                }
            }
        }

        Ok(sessions)
    }

    async fn purge_sessions_older_than(&self, days: i64) -> Result<usize, StoreError> {
        let conn = self.conn.lock().unwrap();

        let cutoff = (Utc::now() - Duration::days(days)).to_rfc3339();
        let deleted = conn.execute(
            "DELETE FROM scrape_sessions WHERE timestamp < ?1",
            params![cutoff],
        )?;

        info!(deleted, "purged old session entries");
        Ok(deleted)
    }
}

fn row_to_product(row: &Row<'_>) -> rusqlite::Result<ProductRecord> {
    let url: String = row.get(0)?;
    let currency: String = row.get(4)?;
    let scraped_at: String = row.get(9)?;
    let last_updated: String = row.get(10)?;

    Ok(ProductRecord {
        url,
        title: row.get(1)?,
        price: row.get(2)?,
        price_amount: row.get(3)?,
        currency: currency.parse().unwrap_or(Currency::Jod),
        brand: row.get(5)?,
        description: row.get(6)?,
        category: row.get(7)?,
        source_website: row.get(8)?,
        scraped_at: parse_timestamp(&scraped_at),
        last_updated: parse_timestamp(&last_updated),
    })
}

fn row_to_session(row: &Row<'_>) -> rusqlite::Result<ScrapeSession> {
    let status: String = row.get(1)?;
    let timestamp: String = row.get(3)?;

    Ok(ScrapeSession {
        website: row.get(0)?,
        status: status.parse().unwrap_or(SessionStatus::Failed),
        products_scraped: row.get(2)?,
        timestamp: parse_timestamp(&timestamp),
        notes: row.get(4)?,
        schema_version: row.get(5)?,
    })
}

fn parse_timestamp(text: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(text)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{build_record, ExtractedFields};
    use pretty_assertions::assert_eq;

    async fn storage() -> SqliteStorage {
        let storage = SqliteStorage::in_memory().unwrap();
        storage.migrate().await.unwrap();
        storage
    }

    fn full_record(url: &str) -> ProductRecord {
        build_record(
            url,
            ExtractedFields {
                title: "Samsung Galaxy S24 5G 256GB".to_string(),
                price: "439.000 JOD".to_string(),
                brand: "Samsung".to_string(),
                description: "Flagship phone".to_string(),
            },
        )
        .unwrap()
    }

    #[tokio::test]
    async fn upsert_is_idempotent() {
        let storage = storage().await;
        let record = full_record("https://example.com/product/galaxy-s24");

        assert!(storage.upsert_product(&record).await.unwrap());
        assert!(!storage.upsert_product(&record).await.unwrap());

        assert_eq!(storage.count_products().await.unwrap(), 1);
        let stored = storage.get_product(&record.url).await.unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn merge_preserves_fields_the_new_scrape_missed() {
        let storage = storage().await;
        let url = "https://example.com/product/galaxy-s24";
        storage.upsert_product(&full_record(url)).await.unwrap();

        // Second scrape only managed to extract a price.
        let partial = build_record(
            url,
            ExtractedFields {
                title: "Samsung Galaxy S24 5G 256GB".to_string(),
                price: "420.000 JOD".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        storage.upsert_product(&partial).await.unwrap();

        let stored = storage.get_product(url).await.unwrap().unwrap();
        assert_eq!(stored.brand, "Samsung");
        assert_eq!(stored.description, "Flagship phone");
        assert_eq!(stored.price, "420.000 JOD");
        assert_eq!(stored.price_amount, Some(420.0));
    }

    #[tokio::test]
    async fn empty_price_keeps_previous_currency_and_amount() {
        let storage = storage().await;
        let url = "https://example.com/product/galaxy-s24";
        storage.upsert_product(&full_record(url)).await.unwrap();

        let priceless = build_record(
            url,
            ExtractedFields {
                title: "Samsung Galaxy S24 5G 256GB".to_string(),
                ..Default::default()
            },
        )
        .unwrap();
        storage.upsert_product(&priceless).await.unwrap();

        let stored = storage.get_product(url).await.unwrap().unwrap();
        assert_eq!(stored.price, "439.000 JOD");
        assert_eq!(stored.price_amount, Some(439.0));
        assert_eq!(stored.currency, Currency::Jod);
    }

    #[tokio::test]
    async fn sessions_append_and_query_by_recency() {
        let storage = storage().await;

        let mut first = ScrapeSession::new("Leaders Center Jordan", SessionStatus::Success, 3, "ok");
        first.timestamp = Utc::now() - Duration::hours(1);
        storage.append_session(&first).await.unwrap();

        let second =
            ScrapeSession::new("Leaders Center Jordan", SessionStatus::Partial, 1, "2 errors");
        storage.append_session(&second).await.unwrap();

        let other = ScrapeSession::new("SmartBuy Jordan", SessionStatus::Failed, 0, "3 errors");
        storage.append_session(&other).await.unwrap();

        let recent = storage
            .recent_sessions(Some("Leaders Center Jordan"), 10)
            .await
            .unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].status, SessionStatus::Partial);
        assert_eq!(recent[1].status, SessionStatus::Success);
    }

    #[tokio::test]
    async fn purge_removes_only_stale_sessions() {
        let storage = storage().await;

        let mut stale = ScrapeSession::new("SmartBuy Jordan", SessionStatus::Success, 2, "");
        stale.timestamp = Utc::now() - Duration::days(45);
        storage.append_session(&stale).await.unwrap();

        let fresh = ScrapeSession::new("SmartBuy Jordan", SessionStatus::Success, 2, "");
        storage.append_session(&fresh).await.unwrap();

        let deleted = storage.purge_sessions_older_than(30).await.unwrap();
        assert_eq!(deleted, 1);

        let remaining = storage.recent_sessions(None, 10).await.unwrap();
        assert_eq!(remaining.len(), 1);
    }
}
