//! # Date resolver
//!
//! Turns the many date encodings seen in collector payloads into one
//! `DateTime<Utc>`, or `None` when nothing plausible can be found.
//!
//! Per candidate field (in table order) three steps are tried:
//! 1. numeric epoch (seconds below [`EPOCH_MS_THRESHOLD`], milliseconds above),
//! 2. direct parse (RFC 3339, RFC 2822, then [`NAIVE_LAYOUTS`] / [`DATE_LAYOUTS`]),
//! 3. the same parse after dropping the `" at "` connector
//!    (`"Sep 8, 2025 at 2:09 PM"`).
//!
//! Anything before the floor year is treated as a parse artifact (epoch zero,
//! two-digit years, seconds read as milliseconds) and the next field is tried.
//! There is no "now" fallback: unknown stays unknown.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use time::format_description::well_known::{Rfc2822, Rfc3339};
use time::OffsetDateTime;

use crate::config::feed::DEFAULT_FLOOR_YEAR;
use crate::ingest::types::RawRecord;

/// Numeric values at or above this magnitude are epoch milliseconds.
pub const EPOCH_MS_THRESHOLD: f64 = 1e12;

static RE_AT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s+at\s+").unwrap());

/// Layouts carrying an explicit offset.
const ZONED_LAYOUTS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%z",
    "%Y-%m-%d %H:%M:%S %z",
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%a, %d %b %Y %H:%M:%S %z",
    "%d %b %Y %H:%M:%S %z",
];

/// Zone-less layouts, read as UTC.
const NAIVE_LAYOUTS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%a, %d %b %Y %H:%M:%S GMT",
    "%a, %d %b %Y %H:%M:%S",
    "%b %d, %Y %I:%M %p",
    "%b %d, %Y, %I:%M %p",
    "%b %d, %Y %I:%M:%S %p",
    "%B %d, %Y %I:%M %p",
    "%b %d, %Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%m/%d/%Y %H:%M:%S",
];

/// Date-only layouts, read as midnight UTC.
const DATE_LAYOUTS: &[&str] = &["%Y-%m-%d", "%b %d, %Y", "%B %d, %Y", "%m/%d/%Y", "%d %b %Y"];

#[derive(Debug, Clone)]
pub struct DateResolver {
    candidates: Vec<String>,
    floor_year: i32,
}

impl Default for DateResolver {
    fn default() -> Self {
        Self::new(
            crate::config::feed::FieldTable::default().date,
            DEFAULT_FLOOR_YEAR,
        )
    }
}

impl DateResolver {
    pub fn new(candidates: Vec<String>, floor_year: i32) -> Self {
        Self {
            candidates,
            floor_year,
        }
    }

    pub fn floor_year(&self) -> i32 {
        self.floor_year
    }

    /// Resolve the record's publication time from the candidate table.
    pub fn resolve(&self, raw: &RawRecord) -> Option<DateTime<Utc>> {
        self.candidates
            .iter()
            .filter_map(|k| raw.get(k))
            .find_map(|v| self.resolve_value(v))
    }

    /// Resolve a single value with the plausibility floor applied.
    pub fn resolve_value(&self, v: &Value) -> Option<DateTime<Utc>> {
        parse_value(v).filter(|dt| dt.year() >= self.floor_year)
    }
}

/// Three-step parse of one field value, no plausibility check.
pub fn parse_value(v: &Value) -> Option<DateTime<Utc>> {
    match v {
        Value::Number(n) => n.as_f64().and_then(from_epoch),
        Value::String(s) => parse_str(s),
        _ => None,
    }
}

fn parse_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(n) = s.parse::<f64>() {
        return from_epoch(n);
    }
    if let Some(dt) = parse_direct(s) {
        return Some(dt);
    }
    let cleaned = RE_AT.replace_all(s, " ");
    if cleaned != s {
        return parse_direct(&cleaned);
    }
    None
}

/// Epoch seconds or milliseconds, decided by magnitude.
pub fn from_epoch(n: f64) -> Option<DateTime<Utc>> {
    if !n.is_finite() {
        return None;
    }
    let millis = if n.abs() < EPOCH_MS_THRESHOLD {
        n * 1000.0
    } else {
        n
    };
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    DateTime::from_timestamp_millis(millis.round() as i64)
}

fn parse_direct(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc3339) {
        return from_offset(dt);
    }
    if let Ok(dt) = OffsetDateTime::parse(s, &Rfc2822) {
        return from_offset(dt);
    }
    // "Z" suffix is not understood by %z
    let zoned = s.strip_suffix('Z').map(|b| format!("{b}+0000"));
    let zs = zoned.as_deref().unwrap_or(s);
    for layout in ZONED_LAYOUTS {
        if let Ok(dt) = DateTime::parse_from_str(zs, layout) {
            return Some(dt.with_timezone(&Utc));
        }
    }
    for layout in NAIVE_LAYOUTS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, layout) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    for layout in DATE_LAYOUTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, layout) {
            return d.and_hms_opt(0, 0, 0).map(|ndt| Utc.from_utc_datetime(&ndt));
        }
    }
    None
}

fn from_offset(dt: OffsetDateTime) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(dt.unix_timestamp(), dt.nanosecond())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(v: Value) -> RawRecord {
        v.as_object().cloned().unwrap()
    }

    fn ymd_hm(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn seconds_and_millis_meet_at_the_same_instant() {
        let s = parse_value(&json!(1_736_350_000)).unwrap();
        let ms = parse_value(&json!(1_736_350_000_000i64)).unwrap();
        assert_eq!(s, ms);
        assert_eq!(s.timestamp(), 1_736_350_000);
    }

    #[test]
    fn numeric_strings_are_epochs() {
        let a = parse_value(&json!("1736350000")).unwrap();
        let b = parse_value(&json!(" 1736350000000 ")).unwrap();
        assert_eq!(a, b);
        assert!(parse_value(&json!("NaN")).is_none());
        assert!(parse_value(&json!("inf")).is_none());
    }

    #[test]
    fn standard_strings_parse() {
        let want = ymd_hm(2025, 8, 29, 17, 25);
        for s in [
            "2025-08-29T17:25:00Z",
            "2025-08-29T17:25:00+00:00",
            "2025-08-29T19:25:00+02:00",
            "Fri, 29 Aug 2025 17:25:00 +0000",
            "Fri, 29 Aug 2025 17:25:00 GMT",
            "2025-08-29 17:25:00",
            "2025-08-29T17:25:00",
            "2025-08-29T17:25:00.000Z",
        ] {
            assert_eq!(parse_value(&json!(s)), Some(want), "input {s}");
        }
    }

    #[test]
    fn at_connector_is_stripped() {
        let got = parse_value(&json!("Sep 8, 2025 at 2:09 PM")).unwrap();
        assert_eq!(got, ymd_hm(2025, 9, 8, 14, 9));
    }

    #[test]
    fn date_only_is_midnight_utc() {
        let got = parse_value(&json!("2025-01-15")).unwrap();
        assert_eq!(got, ymd_hm(2025, 1, 15, 0, 0));
    }

    #[test]
    fn garbage_and_non_scalars_are_unknown() {
        assert!(parse_value(&json!("yesterday-ish")).is_none());
        assert!(parse_value(&json!("")).is_none());
        assert!(parse_value(&json!(null)).is_none());
        assert!(parse_value(&json!({"a": 1})).is_none());
        assert!(parse_value(&json!(true)).is_none());
    }

    #[test]
    fn floor_guard_falls_through_to_next_field() {
        let r = DateResolver::default();
        // epoch zero in isoDate, real date in published
        let got = r.resolve(&rec(json!({
            "isoDate": 0,
            "published": "2025-03-01T12:00:00Z"
        })));
        assert_eq!(got, Some(ymd_hm(2025, 3, 1, 12, 0)));
    }

    #[test]
    fn all_implausible_is_none_not_epoch() {
        let r = DateResolver::default();
        let got = r.resolve(&rec(json!({
            "pubDate": "1999-01-01",
            "date": 0,
            "time": "1970-01-01T00:00:00Z"
        })));
        assert_eq!(got, None);
    }

    #[test]
    fn first_plausible_field_wins() {
        let r = DateResolver::default();
        let got = r.resolve(&rec(json!({
            "updated": "2025-05-05T00:00:00Z",
            "pubDate": "2025-04-04T00:00:00Z"
        })));
        // pubDate precedes updated in the candidate table
        assert_eq!(got, Some(ymd_hm(2025, 4, 4, 0, 0)));
    }

    #[test]
    fn unparseable_field_does_not_block_later_ones() {
        let r = DateResolver::default();
        let got = r.resolve(&rec(json!({
            "isoDate": "not a date",
            "timestamp": 1_736_350_000
        })));
        assert_eq!(got.map(|d| d.timestamp()), Some(1_736_350_000));
    }

    #[test]
    fn floor_is_configurable() {
        let r = DateResolver::new(vec!["date".into()], 2026);
        assert!(r.resolve(&rec(json!({"date": "2025-06-01"}))).is_none());
        assert!(r.resolve(&rec(json!({"date": "2026-06-01"}))).is_some());
    }

    #[test]
    fn locale_string_variants() {
        assert_eq!(
            parse_value(&json!("Sep 8, 2025, 2:09 PM")),
            Some(ymd_hm(2025, 9, 8, 14, 9))
        );
        let with_secs = parse_value(&json!("Sep 8, 2025 at 2:09:33 PM")).unwrap();
        assert_eq!(with_secs, ymd_hm(2025, 9, 8, 14, 9) + chrono::Duration::seconds(33));
    }

    #[test]
    fn blank_published_falls_through_to_published_ts() {
        let r = DateResolver::default();
        let got = r.resolve(&rec(json!({"published": "", "published_ts": 1_757_340_540})));
        assert_eq!(got.map(|d| d.timestamp()), Some(1_757_340_540));
    }
}
