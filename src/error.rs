use thiserror::Error;

/// Failures raised by the polite fetcher. `AlreadyFetched` is deliberately
/// not part of this taxonomy — skipping a duplicate URL is a normal outcome,
/// surfaced through `FetchOutcome` instead.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL `{0}`: missing scheme or host")]
    InvalidUrl(String),

    #[error("request to {url} failed: {reason}")]
    Http { url: String, reason: String },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },
}

/// Failures while assembling a `ProductRecord` from extracted fields.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("product at {url} has an empty title")]
    MissingTitle { url: String },
}

/// Storage layer failures. Constraint violations and connectivity problems
/// both end up here; callers treat them as skippable at URL granularity.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
}
