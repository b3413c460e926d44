//! Deduplicator: collapses records that point at the same article.
//!
//! Identity is the link when there is one, else title + raw source. For each key the
//! item with the later `published_at` survives (dated beats unknown); equal dates keep
//! the first-encountered item. Survivors stay at the position of their key's first
//! occurrence, so `merge(merge(x)) == merge(x)`.

use std::collections::HashMap;

use crate::ingest::types::{NormalizedItem, NO_LINK};

/// Identity used to recognize two records as the same article.
pub fn dedup_key(link: Option<&str>, title: &str, raw_source: &str) -> String {
    match link.map(str::trim).filter(|l| !l.is_empty() && *l != NO_LINK) {
        Some(l) => format!("link:{l}"),
        None => format!(
            "title:{}|{}",
            title.trim().to_lowercase(),
            raw_source.trim().to_lowercase()
        ),
    }
}

/// Short stable id (16 hex chars of SHA-256) for a dedup key.
pub fn item_id(key: &str) -> String {
    use sha2::{Digest, Sha256};
    let digest = Sha256::digest(key.as_bytes());
    let mut out = String::with_capacity(16);
    for b in digest.iter().take(8) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}

pub fn merge(items: Vec<NormalizedItem>) -> Vec<NormalizedItem> {
    let mut slot_of: HashMap<String, usize> = HashMap::with_capacity(items.len());
    let mut out: Vec<NormalizedItem> = Vec::with_capacity(items.len());

    for it in items {
        match slot_of.get(&it.dedup_key) {
            Some(&i) => {
                // Option<DateTime> orders None below any date.
                if it.published_at > out[i].published_at {
                    out[i] = it;
                }
            }
            None => {
                slot_of.insert(it.dedup_key.clone(), out.len());
                out.push(it);
            }
        }
    }
    out
}
