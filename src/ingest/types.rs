use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::taxonomy::SourceTaxonomy;

/// One record of the collector payload, key set unknown.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

/// Link placeholder for records without a usable link; never navigable.
pub const NO_LINK: &str = "#";
/// Title placeholder for records without a usable title.
pub const UNTITLED: &str = "Untitled";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct NormalizedItem {
    pub id: String,
    pub title: String,
    pub link: String,
    pub raw_source: String,
    pub canonical_source: Option<String>,
    pub published_at: Option<DateTime<Utc>>, // None = unknown, never a default
    pub summary: Option<String>,
    pub dedup_key: String,
}

impl NormalizedItem {
    pub fn is_navigable(&self) -> bool {
        self.link != NO_LINK
    }

    /// Canonical source if resolved, else the raw label.
    pub fn source_label(&self) -> &str {
        self.canonical_source.as_deref().unwrap_or(&self.raw_source)
    }
}

/// Counters for one pipeline run.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct RunStats {
    pub records: usize,
    pub skipped: usize,
    pub kept: usize,
    pub filtered: usize,
    pub deduped: usize,
    pub windowed: usize,
    pub undated: usize,
    pub discovered: usize,
}

/// Result of one ingest cycle. Superseded, never mutated, by the next one.
#[derive(Debug, Clone)]
pub struct Feed {
    pub items: Vec<NormalizedItem>,
    pub taxonomy: SourceTaxonomy,
    pub newest_timestamp: Option<DateTime<Utc>>,
    /// Newest item date, else the collector's `generated_at`, else unknown.
    pub updated_at: Option<DateTime<Utc>>,
    pub stats: RunStats,
}

#[async_trait::async_trait]
pub trait PayloadSource: Send + Sync {
    async fn fetch_payload(&self) -> Result<serde_json::Value>;
    fn name(&self) -> &str;
}
