//! One ingest cycle: payload → normalize → date → taxonomy → classify → dedup → window.
//!
//! Synchronous and free of I/O. The taxonomy goes in by value and comes back inside
//! the [`Feed`], so the caller decides what the next cycle starts from.

use anyhow::Result;
use tracing::info;

use crate::classify::{Classifier, KeywordClassifier};
use crate::config::FeedConfig;
use crate::dates::DateResolver;
use crate::dedup;
use crate::ingest::types::{Feed, RunStats};
use crate::normalize::normalize;
use crate::payload::Payload;
use crate::sequence::{newest_timestamp, sort_and_window};
use crate::taxonomy::{Resolution, SourceTaxonomy};

pub struct Pipeline {
    cfg: FeedConfig,
    dates: DateResolver,
    classifier: Box<dyn Classifier>,
    seed: SourceTaxonomy,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("limit", &self.cfg.window.limit)
            .field("floor_year", &self.dates.floor_year())
            .field("seed_sources", &self.seed.len())
            .finish()
    }
}

impl Pipeline {
    /// Build with the keyword classifier. Fails on an invalid taxonomy alias.
    pub fn new(cfg: FeedConfig) -> Result<Self> {
        let classifier = Box::new(KeywordClassifier::from_cfg(&cfg.classifier));
        Self::with_classifier(cfg, classifier)
    }

    pub fn with_classifier(cfg: FeedConfig, classifier: Box<dyn Classifier>) -> Result<Self> {
        let seed = SourceTaxonomy::from_seed(&cfg.taxonomy)?;
        let dates = DateResolver::new(cfg.fields.date.clone(), cfg.dates.floor_year);
        Ok(Self {
            cfg,
            dates,
            classifier,
            seed,
        })
    }

    /// Fresh taxonomy compiled from the configured seed.
    pub fn seed_taxonomy(&self) -> SourceTaxonomy {
        self.seed.clone()
    }

    /// Seed taxonomy plus every name a previous cycle knew about.
    pub fn carry_taxonomy(&self, previous: &SourceTaxonomy) -> SourceTaxonomy {
        let mut tax = self.seed_taxonomy();
        tax.absorb(previous.entries().iter().map(|c| c.name.as_str()));
        tax
    }

    pub fn run(&self, payload: Payload, mut taxonomy: SourceTaxonomy) -> Feed {
        let mut stats = RunStats {
            records: payload.records.len(),
            skipped: payload.skipped,
            ..RunStats::default()
        };

        let mut kept = Vec::with_capacity(payload.records.len());
        for raw in &payload.records {
            let mut item = normalize(raw, &self.cfg.fields);
            item.published_at = self.dates.resolve(raw);

            let (canonical, how) = taxonomy.resolve_with(&item.raw_source);
            if how == Resolution::Discovered {
                stats.discovered += 1;
            }
            item.canonical_source = Some(canonical);

            if self.classifier.keep(&item) {
                kept.push(item);
            } else {
                stats.filtered += 1;
            }
        }

        let before_dedup = kept.len();
        let merged = dedup::merge(kept);
        stats.deduped = before_dedup - merged.len();

        let before_window = merged.len();
        let items = sort_and_window(merged, self.cfg.window.limit);
        stats.windowed = before_window - items.len();
        stats.kept = items.len();
        stats.undated = items.iter().filter(|i| i.published_at.is_none()).count();

        let newest = newest_timestamp(&items);
        let updated_at = newest.or_else(|| {
            payload
                .generated_at
                .as_ref()
                .and_then(|v| self.dates.resolve_value(v))
        });

        info!(
            target: "feed",
            records = stats.records,
            kept = stats.kept,
            filtered = stats.filtered,
            dedup = stats.deduped,
            undated = stats.undated,
            discovered = stats.discovered,
            sources = taxonomy.len(),
            "pipeline run"
        );

        Feed {
            items,
            taxonomy,
            newest_timestamp: newest,
            updated_at,
            stats,
        }
    }
}
