use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Schema version stamped on every session entry, kept for forward
/// compatibility with older log consumers.
pub const SESSION_SCHEMA_VERSION: &str = "2.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Success,
    Failed,
    Partial,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Success => "success",
            SessionStatus::Failed => "failed",
            SessionStatus::Partial => "partial",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "success" => Ok(SessionStatus::Success),
            "failed" => Ok(SessionStatus::Failed),
            "partial" => Ok(SessionStatus::Partial),
            other => Err(format!("unknown session status `{other}`")),
        }
    }
}

/// One append-only audit entry per pipeline run. Never mutated after
/// creation; used for operational monitoring, not pipeline logic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeSession {
    pub website: String,
    pub status: SessionStatus,
    pub products_scraped: u32,
    pub timestamp: DateTime<Utc>,
    pub notes: String,
    pub schema_version: String,
}

impl ScrapeSession {
    pub fn new(
        website: impl Into<String>,
        status: SessionStatus,
        products_scraped: u32,
        notes: impl Into<String>,
    ) -> Self {
        Self {
            website: website.into(),
            status,
            products_scraped,
            timestamp: Utc::now(),
            notes: notes.into(),
            schema_version: SESSION_SCHEMA_VERSION.to_string(),
        }
    }
}
