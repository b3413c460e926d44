// src/classify.rs
//! Topic gate: decides whether an item belongs in the feed.
//!
//! The keyword classifier is a heuristic, not a guarantee. What it does promise:
//! same title ⇒ same verdict, and a negative keyword beats source trust.

use serde::Serialize;
use std::collections::HashSet;
use tracing::debug;

use crate::config::feed::ClassifierCfg;
use crate::ingest::types::NormalizedItem;

/// Pluggable keep/drop strategy.
pub trait Classifier: Send + Sync {
    fn keep(&self, item: &NormalizedItem) -> bool;
}

/// Why an item was kept or dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Verdict {
    TrustedSource,
    PositiveKeyword(String),
    NegativeKeyword(String),
    NoPositiveKeyword,
}

impl Verdict {
    pub fn is_keep(&self) -> bool {
        matches!(self, Verdict::TrustedSource | Verdict::PositiveKeyword(_))
    }
}

// Short stable hash so diagnostics never carry raw titles.
pub(crate) fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(text.as_bytes());
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

/// Case-insensitive substring classifier over the title.
#[derive(Debug, Clone)]
pub struct KeywordClassifier {
    trusted: HashSet<String>,
    positive: Vec<String>,
    negative: Vec<String>,
}

impl KeywordClassifier {
    pub fn from_cfg(cfg: &ClassifierCfg) -> Self {
        let lower = |v: &[String]| -> Vec<String> {
            v.iter()
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect()
        };
        Self {
            trusted: lower(&cfg.trusted).into_iter().collect(),
            positive: lower(&cfg.positive),
            negative: lower(&cfg.negative),
        }
    }

    pub fn is_trusted(&self, canonical_source: Option<&str>) -> bool {
        canonical_source
            .map(|s| self.trusted.contains(&s.trim().to_lowercase()))
            .unwrap_or(false)
    }

    fn first_hit(list: &[String], lowered: &str) -> Option<String> {
        list.iter().find(|k| lowered.contains(k.as_str())).cloned()
    }

    /// Full verdict with the keyword responsible for it.
    pub fn verdict(&self, item: &NormalizedItem) -> Verdict {
        let title = item.title.to_lowercase();

        // Negative signal first: trust never overrides it.
        if let Some(k) = Self::first_hit(&self.negative, &title) {
            return Verdict::NegativeKeyword(k);
        }
        if self.is_trusted(item.canonical_source.as_deref()) {
            return Verdict::TrustedSource;
        }
        match Self::first_hit(&self.positive, &title) {
            Some(k) => Verdict::PositiveKeyword(k),
            None => Verdict::NoPositiveKeyword,
        }
    }
}

impl Classifier for KeywordClassifier {
    fn keep(&self, item: &NormalizedItem) -> bool {
        let v = self.verdict(item);
        if !v.is_keep() {
            debug!(
                target: "feed",
                id = %anon_hash(&item.title),
                source = item.source_label(),
                verdict = ?v,
                "item dropped by classifier"
            );
        }
        v.is_keep()
    }
}
