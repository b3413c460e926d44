//! # Source Taxonomy
//!
//! Owns the canonical list of news outlets shown to readers and maps noisy
//! source labels ("espn.com", "Hammer & Rails", "The Athletic - Purdue") onto it.
//!
//! - Case-insensitive exact match against every canonical name (seeded or discovered).
//! - Alias patterns (case-insensitive regexes), first matching entry in registration order wins.
//! - Unknown labels are appended as new canonical entries; blank labels map to [`UNKNOWN_SOURCE`].
//! - The list is append-only: a name, once registered, is never dropped within a session.
//!   Carry it into the next cycle with [`SourceTaxonomy::absorb`].

use anyhow::Result;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::config::feed::CanonicalSourceCfg;

/// Canonical name for records without any source label.
pub const UNKNOWN_SOURCE: &str = "Unknown";

#[derive(Debug, Clone)]
pub struct CanonicalSource {
    pub name: String,
    aliases: Vec<Regex>,
}

impl CanonicalSource {
    fn matches_alias(&self, label: &str) -> bool {
        self.aliases.iter().any(|re| re.is_match(label))
    }
}

/// How a label was resolved; used for diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Resolution {
    Blank,
    Exact,
    Alias,
    Discovered,
}

#[derive(Debug, Clone, Default)]
pub struct SourceTaxonomy {
    canonical: Vec<CanonicalSource>,
}

impl SourceTaxonomy {
    /// Compile a seed list. Fails on an invalid alias pattern.
    pub fn from_seed(seed: &[CanonicalSourceCfg]) -> Result<Self> {
        let mut tax = Self::default();
        for entry in seed {
            let name = entry.name.trim();
            if name.is_empty() || tax.position_exact(name).is_some() {
                continue;
            }
            let aliases = entry
                .aliases
                .iter()
                .map(|p| {
                    RegexBuilder::new(p)
                        .case_insensitive(true)
                        .build()
                        .map_err(|e| anyhow::anyhow!("taxonomy `{}` alias regex error: {}", name, e))
                })
                .collect::<Result<Vec<_>>>()?;
            tax.canonical.push(CanonicalSource {
                name: name.to_string(),
                aliases,
            });
        }
        Ok(tax)
    }

    /// Resolve a raw label to its canonical name, registering it if new.
    pub fn resolve(&mut self, raw_source: &str) -> String {
        self.resolve_with(raw_source).0
    }

    pub fn resolve_with(&mut self, raw_source: &str) -> (String, Resolution) {
        let label = raw_source.trim();
        if label.is_empty() {
            return (UNKNOWN_SOURCE.to_string(), Resolution::Blank);
        }

        // 1) Exact (case-insensitive) canonical name.
        if let Some(i) = self.position_exact(label) {
            return (self.canonical[i].name.clone(), Resolution::Exact);
        }

        // 2) Alias patterns, earliest registered entry first.
        if let Some(c) = self.canonical.iter().find(|c| c.matches_alias(label)) {
            return (c.name.clone(), Resolution::Alias);
        }

        // 3) Discovery.
        self.canonical.push(CanonicalSource {
            name: label.to_string(),
            aliases: Vec::new(),
        });
        (label.to_string(), Resolution::Discovered)
    }

    /// Register names carried from a previous cycle; existing names are left alone.
    pub fn absorb<'a, I>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut added = 0;
        for name in names {
            let name = name.trim();
            if name.is_empty() || self.position_exact(name).is_some() {
                continue;
            }
            self.canonical.push(CanonicalSource {
                name: name.to_string(),
                aliases: Vec::new(),
            });
            added += 1;
        }
        added
    }

    /// Canonical names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.canonical.iter().map(|c| c.name.clone()).collect()
    }

    pub fn entries(&self) -> &[CanonicalSource] {
        &self.canonical
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position_exact(name.trim()).is_some()
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    fn position_exact(&self, label: &str) -> Option<usize> {
        let lower = label.to_lowercase();
        self.canonical
            .iter()
            .position(|c| c.name.to_lowercase() == lower)
    }
}
