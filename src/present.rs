//! Display-ready view of a [`Feed`] for the presentation layer.
//!
//! The synthetic "All sources" entry lives here, not in the taxonomy.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::ingest::types::{Feed, NormalizedItem};
use crate::taxonomy::SourceTaxonomy;

pub const ALL_SOURCES: &str = "All sources";
pub const UNKNOWN_DATE: &str = "unknown";

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ItemView {
    pub id: String,
    pub title: String,
    /// `None` when the item has no navigable link.
    pub link: Option<String>,
    pub navigable: bool,
    pub source: String,
    pub published: String,
    pub published_iso: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FeedView {
    pub sources: Vec<String>,
    pub selected: String,
    pub updated_at: String,
    pub updated_at_iso: Option<String>,
    pub items: Vec<ItemView>,
}

/// "Sep 8, 2025 at 2:09 PM" (UTC).
pub fn display_date(dt: Option<DateTime<Utc>>) -> String {
    match dt {
        Some(d) => d.format("%b %-d, %Y at %-I:%M %p").to_string(),
        None => UNKNOWN_DATE.to_string(),
    }
}

/// Selectable source list: "All sources" followed by the taxonomy in registration order.
pub fn source_options(taxonomy: &SourceTaxonomy) -> Vec<String> {
    std::iter::once(ALL_SOURCES.to_string())
        .chain(taxonomy.names())
        .collect()
}

/// View shown before any cycle has completed.
pub fn empty_view(taxonomy: &SourceTaxonomy) -> FeedView {
    FeedView {
        sources: source_options(taxonomy),
        selected: ALL_SOURCES.to_string(),
        updated_at: UNKNOWN_DATE.to_string(),
        updated_at_iso: None,
        items: Vec::new(),
    }
}

fn item_view(it: &NormalizedItem) -> ItemView {
    ItemView {
        id: it.id.clone(),
        title: it.title.clone(),
        link: it.is_navigable().then(|| it.link.clone()),
        navigable: it.is_navigable(),
        source: it.source_label().to_string(),
        published: display_date(it.published_at),
        published_iso: it.published_at.map(|d| d.to_rfc3339()),
    }
}

fn matches_query(it: &NormalizedItem, q: &str) -> bool {
    it.title.to_lowercase().contains(q)
        || it.source_label().to_lowercase().contains(q)
        || it
            .summary
            .as_deref()
            .is_some_and(|s| s.to_lowercase().contains(q))
}

/// Build the view, optionally narrowed to one canonical source and a text query.
pub fn view(feed: &Feed, source: Option<&str>, query: Option<&str>) -> FeedView {
    let selected = source
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case(ALL_SOURCES));
    let q = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let items = feed
        .items
        .iter()
        .filter(|it| selected.map_or(true, |s| it.source_label().eq_ignore_ascii_case(s)))
        .filter(|it| q.as_deref().map_or(true, |q| matches_query(it, q)))
        .map(item_view)
        .collect();

    FeedView {
        sources: source_options(&feed.taxonomy),
        selected: selected.unwrap_or(ALL_SOURCES).to_string(),
        updated_at: display_date(feed.updated_at),
        updated_at_iso: feed.updated_at.map(|d| d.to_rfc3339()),
        items,
    }
}
