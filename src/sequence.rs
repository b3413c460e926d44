//! Sequencer: newest first, undated last, then the output window.

use chrono::{DateTime, Utc};

use crate::ingest::types::NormalizedItem;

/// Sort descending by `published_at` and truncate to `limit`.
///
/// Undated items go after every dated one (they are never "now"). The sort is
/// stable, so equal timestamps keep input order.
pub fn sort_and_window(mut items: Vec<NormalizedItem>, limit: usize) -> Vec<NormalizedItem> {
    // None < Some(_), so reversing the comparison puts None last.
    items.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    items.truncate(limit);
    items
}

/// Newest resolved timestamp across `items`.
pub fn newest_timestamp(items: &[NormalizedItem]) -> Option<DateTime<Utc>> {
    items.iter().filter_map(|it| it.published_at).max()
}
