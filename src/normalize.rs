//! Schema normalizer: maps arbitrarily shaped collector records onto [`NormalizedItem`].
//!
//! Field guessing is table driven (see [`FieldTable`]); adding a new feed schema
//! is a config edit. Missing or malformed fields never fail a record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::config::feed::FieldTable;
use crate::dedup::{dedup_key, item_id};
use crate::ingest::types::{NormalizedItem, RawRecord, NO_LINK, UNTITLED};

const MAX_TEXT_CHARS: usize = 1500;

static RE_TAGS: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)</?[^>]+>").unwrap());
static RE_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Normalize display text: decode entities, strip tags, fold quotes, collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    out = RE_TAGS.replace_all(&out, "").to_string();

    // 3) Normalize “ ” ‘ ’ « » to ASCII quotes
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace
    out = RE_WS.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > MAX_TEXT_CHARS {
        out = out.chars().take(MAX_TEXT_CHARS).collect();
    }

    out
}

/// Text carried by a field value. Objects contribute the first of `members`.
fn text_of(v: &Value, members: &[&str]) -> Option<String> {
    let s = match v {
        Value::String(s) => s.trim().to_string(),
        Value::Object(map) => {
            return members
                .iter()
                .filter_map(|m| map.get(*m))
                .find_map(|inner| text_of(inner, &[]));
        }
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// First candidate key with non-blank text.
fn first_text(raw: &RawRecord, candidates: &[String], members: &[&str]) -> Option<String> {
    candidates
        .iter()
        .filter_map(|k| raw.get(k))
        .find_map(|v| text_of(v, members))
}

pub fn normalize(raw: &RawRecord, fields: &FieldTable) -> NormalizedItem {
    let title = first_text(raw, &fields.title, &[])
        .map(|t| normalize_text(&t))
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string());

    let link = first_text(raw, &fields.link, &["href"]);
    let raw_source = first_text(raw, &fields.source, &["title", "name"]).unwrap_or_default();
    let summary = first_text(raw, &fields.summary, &[])
        .map(|s| normalize_text(&s))
        .filter(|s| !s.is_empty());

    let key = dedup_key(link.as_deref(), &title, &raw_source);

    NormalizedItem {
        id: item_id(&key),
        title,
        link: link.unwrap_or_else(|| NO_LINK.to_string()),
        raw_source,
        canonical_source: None,
        published_at: None,
        summary,
        dedup_key: key,
    }
}
