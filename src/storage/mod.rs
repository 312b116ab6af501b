use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::{ProductRecord, ScrapeSession};

mod sqlite;
pub use sqlite::SqliteStorage;

/// Persistence layer for product records and session audit entries.
///
/// Products are upserted by canonical URL with merge-by-presence semantics;
/// sessions are append-only telemetry whose failures must never affect a
/// preceding product upsert.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn migrate(&self) -> Result<(), StoreError>;

    /// Insert or merge a record keyed by `url`. Returns `true` when a new
    /// record was created, `false` when an existing one was updated.
    async fn upsert_product(&self, record: &ProductRecord) -> Result<bool, StoreError>;

    async fn get_product(&self, url: &str) -> Result<Option<ProductRecord>, StoreError>;

    async fn count_products(&self) -> Result<u64, StoreError>;

    /// Append one immutable session entry.
    async fn append_session(&self, session: &ScrapeSession) -> Result<(), StoreError>;

    /// Most recent sessions, newest first, optionally filtered by website.
    async fn recent_sessions(
        &self,
        website: Option<&str>,
        limit: u32,
    ) -> Result<Vec<ScrapeSession>, StoreError>;

    /// Retention maintenance: delete sessions older than the given number
    /// of days. Invoked by the maintenance binary, never by a pipeline run.
    async fn purge_sessions_older_than(&self, days: i64) -> Result<usize, StoreError>;
}
