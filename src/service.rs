//! Holds the current [`Feed`] and runs refresh cycles against a payload source.
//!
//! Refreshes are serialized: each cycle starts from the previous cycle's taxonomy,
//! so the canonical source list only grows. A failed refresh keeps the old feed.

use std::sync::{Arc, RwLock};

use anyhow::Result;
use tokio::sync::Mutex;
use tracing::info;

use crate::ingest::{self, types::Feed, types::PayloadSource};
use crate::pipeline::Pipeline;
use crate::taxonomy::SourceTaxonomy;

pub struct FeedService {
    source: Box<dyn PayloadSource>,
    pipeline: Pipeline,
    current: RwLock<Option<Arc<Feed>>>,
    refresh_gate: Mutex<()>,
}

impl FeedService {
    pub fn new(source: Box<dyn PayloadSource>, pipeline: Pipeline) -> Self {
        Self {
            source,
            pipeline,
            current: RwLock::new(None),
            refresh_gate: Mutex::new(()),
        }
    }

    /// Latest successful feed, if any cycle has completed.
    pub fn current(&self) -> Option<Arc<Feed>> {
        self.current.read().ok().and_then(|g| g.clone())
    }

    /// Taxonomy the next cycle will start from.
    pub fn taxonomy(&self) -> SourceTaxonomy {
        match self.current() {
            Some(feed) => self.pipeline.carry_taxonomy(&feed.taxonomy),
            None => self.pipeline.seed_taxonomy(),
        }
    }

    pub async fn refresh(&self) -> Result<Arc<Feed>> {
        let _gate = self.refresh_gate.lock().await;

        let feed = ingest::run_once(self.source.as_ref(), &self.pipeline, self.taxonomy()).await?;
        let feed = Arc::new(feed);

        if let Ok(mut guard) = self.current.write() {
            *guard = Some(feed.clone());
        }
        info!(
            target: "ingest",
            source = self.source.name(),
            items = feed.items.len(),
            sources = feed.taxonomy.len(),
            "feed refreshed"
        );
        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FeedConfig;
    use crate::ingest::providers::StaticPayload;
    use serde_json::json;

    #[tokio::test]
    async fn failed_refresh_keeps_previous_feed() {
        let p = Pipeline::new(FeedConfig::default_seed()).unwrap();
        let svc = FeedService::new(Box::new(StaticPayload::new(json!(42))), p);
        assert!(svc.current().is_none());
        assert!(svc.refresh().await.is_err());
        assert!(svc.current().is_none());
        // taxonomy still available from the seed
        assert!(svc.taxonomy().contains("ESPN"));
    }

    #[tokio::test]
    async fn refresh_publishes_feed() {
        let p = Pipeline::new(FeedConfig::default_seed()).unwrap();
        let svc = FeedService::new(
            Box::new(StaticPayload::new(json!([
                {"title": "Purdue basketball practice report", "source": "New Outlet"}
            ]))),
            p,
        );
        let feed = svc.refresh().await.unwrap();
        assert_eq!(feed.items.len(), 1);
        assert!(svc.taxonomy().contains("New Outlet"));
    }
}
