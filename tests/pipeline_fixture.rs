// tests/pipeline_fixture.rs
use feed_normalizer::config::FeedConfig;
use feed_normalizer::payload::{extract, parse_bytes};
use feed_normalizer::Pipeline;
use serde_json::json;

const ITEMS_JSON: &str = include_str!("fixtures/items.json");

fn pipeline() -> Pipeline {
    Pipeline::new(FeedConfig::default_seed()).expect("default seed compiles")
}

#[test]
fn documented_scenario_yields_one_item() {
    let p = pipeline();
    let payload = extract(&json!([
        {"title": "Purdue basketball tops rival", "source": "ESPN", "published": "Sep 8, 2025 at 2:09 PM"},
        {"title": "Purdue football drops game", "source": "ESPN", "published": 1736350000},
        {"title": "Hoops preview", "source": "RandomBlog", "published": "1999-01-01"}
    ]))
    .unwrap();

    let feed = p.run(payload, p.seed_taxonomy());
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].title, "Purdue basketball tops rival");
    assert!(feed.items[0].published_at.is_some());
}

#[test]
fn fixture_is_normalized_deduped_and_ordered() {
    let p = pipeline();
    let payload = parse_bytes(ITEMS_JSON.as_bytes()).expect("fixture parses");
    let feed = p.run(payload, p.seed_taxonomy());

    let titles: Vec<&str> = feed.items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(
        titles,
        vec![
            "Matt Painter on the Mackey schedule",
            "Boilermakers' Braden Smith named Big Ten preseason player of the year",
            "Purdue basketball tops rival",
            "Paint Crew camping rules announced",
        ]
    );

    // later duplicate survived, with its own source label resolved exactly
    let smith = &feed.items[1];
    assert_eq!(
        smith.published_at.map(|d| d.to_rfc3339()),
        Some("2025-10-07T16:45:00+00:00".to_string())
    );
    assert_eq!(smith.canonical_source.as_deref(), Some("Hammer and Rails"));

    // alias + discovery
    assert_eq!(feed.items[0].canonical_source.as_deref(), Some("WLFI Sports"));
    assert_eq!(
        feed.items[3].canonical_source.as_deref(),
        Some("Journal & Courier")
    );
    assert!(feed.items[3].published_at.is_none());
    assert!(!feed.items[3].is_navigable());

    let s = feed.stats;
    assert_eq!(s.records, 7);
    assert_eq!(s.skipped, 1);
    assert_eq!(s.filtered, 2);
    assert_eq!(s.deduped, 1);
    assert_eq!(s.discovered, 2);
    assert_eq!(s.undated, 1);
    assert_eq!(s.kept, 4);

    // newest dated item beats the collector's generated_at
    assert_eq!(feed.updated_at, feed.items[0].published_at);
    assert_eq!(feed.newest_timestamp, feed.items[0].published_at);
}

#[test]
fn window_limit_applies_after_sorting() {
    let mut cfg = FeedConfig::default_seed();
    cfg.window.limit = 2;
    let p = Pipeline::new(cfg).unwrap();
    let feed = p.run(parse_bytes(ITEMS_JSON.as_bytes()).unwrap(), p.seed_taxonomy());
    assert_eq!(feed.items.len(), 2);
    assert_eq!(feed.stats.windowed, 2);
    assert!(feed.items.iter().all(|i| i.published_at.is_some()));
}

#[test]
fn discovered_sources_from_dropped_items_still_register() {
    let p = pipeline();
    let feed = p.run(
        parse_bytes(ITEMS_JSON.as_bytes()).unwrap(),
        p.seed_taxonomy(),
    );
    let names = feed.taxonomy.names();
    // seed order first, discoveries appended in encounter order
    assert_eq!(names.first().map(String::as_str), Some("PurdueSports.com"));
    let tail: Vec<&str> = names.iter().rev().take(2).rev().map(String::as_str).collect();
    assert_eq!(tail, vec!["RandomBlog", "WLFI Sports"]);
}
