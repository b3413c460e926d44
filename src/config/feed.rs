//! # Feed configuration
//!
//! Every tunable of the pipeline lives here as data: candidate field names per
//! logical attribute, the date plausibility floor, classifier keyword lists,
//! the trusted-source set, the output window and the taxonomy seed.
//!
//! - Loads from TOML or JSON (all sections optional, missing ones fall back to defaults).
//! - Lookup order: `$FEED_CONFIG_PATH` → `config/feed.toml` → `config/feed.json` → built-in seed.
//! - The built-in seed targets Purdue men's basketball coverage.

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "FEED_CONFIG_PATH";
pub const DEFAULT_TOML_PATH: &str = "config/feed.toml";
pub const DEFAULT_JSON_PATH: &str = "config/feed.json";

pub const DEFAULT_FLOOR_YEAR: i32 = 2000;
pub const DEFAULT_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub fields: FieldTable,
    #[serde(default)]
    pub dates: DateCfg,
    #[serde(default)]
    pub classifier: ClassifierCfg,
    #[serde(default)]
    pub window: WindowCfg,
    #[serde(default = "default_taxonomy")]
    pub taxonomy: Vec<CanonicalSourceCfg>,
}

/// Ordered candidate keys per logical field. First non-blank value wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldTable {
    #[serde(default = "default_title_fields")]
    pub title: Vec<String>,
    #[serde(default = "default_link_fields")]
    pub link: Vec<String>,
    #[serde(default = "default_source_fields")]
    pub source: Vec<String>,
    #[serde(default = "default_summary_fields")]
    pub summary: Vec<String>,
    #[serde(default = "default_date_fields")]
    pub date: Vec<String>,
}

impl Default for FieldTable {
    fn default() -> Self {
        Self {
            title: default_title_fields(),
            link: default_link_fields(),
            source: default_source_fields(),
            summary: default_summary_fields(),
            date: default_date_fields(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DateCfg {
    /// Resolved timestamps before this calendar year are parse artifacts.
    #[serde(default = "default_floor_year")]
    pub floor_year: i32,
}

impl Default for DateCfg {
    fn default() -> Self {
        Self {
            floor_year: DEFAULT_FLOOR_YEAR,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierCfg {
    /// Canonical source names exempt from the positive-keyword requirement.
    #[serde(default = "default_trusted")]
    pub trusted: Vec<String>,
    #[serde(default = "default_positive")]
    pub positive: Vec<String>,
    #[serde(default = "default_negative")]
    pub negative: Vec<String>,
}

impl Default for ClassifierCfg {
    fn default() -> Self {
        Self {
            trusted: default_trusted(),
            positive: default_positive(),
            negative: default_negative(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowCfg {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

impl Default for WindowCfg {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Seed entry of the source taxonomy. `aliases` are case-insensitive regexes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalSourceCfg {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_title_fields() -> Vec<String> {
    strings(&["title", "headline"])
}
fn default_link_fields() -> Vec<String> {
    strings(&["link", "url"])
}
fn default_source_fields() -> Vec<String> {
    strings(&["source", "site", "by", "feed", "publisher"])
}
fn default_summary_fields() -> Vec<String> {
    strings(&["summary", "description", "content"])
}
fn default_date_fields() -> Vec<String> {
    strings(&[
        "isoDate",
        "pubDate",
        "published",
        "published_at",
        "published_ts",
        "date",
        "updated",
        "created",
        "time",
        "timestamp",
        "ts",
    ])
}
fn default_floor_year() -> i32 {
    DEFAULT_FLOOR_YEAR
}
fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn default_trusted() -> Vec<String> {
    strings(&[
        "PurdueSports.com",
        "Hammer and Rails",
        "Journal & Courier",
        "GoldandBlack.com",
        "The Athletic",
        "ESPN",
        "Yahoo Sports",
        "Sports Illustrated",
        "CBS Sports",
        "Big Ten Network",
        "247Sports",
        "Rivals",
        "AP News",
    ])
}

fn default_positive() -> Vec<String> {
    strings(&[
        "basketball",
        "mbb",
        "boilers",
        "boilermakers",
        "purdue",
        "big ten",
        "painter",
        "paint crew",
        "mackey",
        "boiler",
        "kenpom",
        "ncaa tournament",
        "bracket",
    ])
}

// Plain substring match: "nfl" also hits "conflict" and "influence".
fn default_negative() -> Vec<String> {
    strings(&[
        "football",
        "qb",
        "quarterback",
        "touchdown",
        "wide receiver",
        "running back",
        "ross-ade",
        "gridiron",
        "nfl",
        "colts",
        "volleyball",
        "softball",
        "baseball",
        "soccer",
        "wrestling",
        "women's",
        "wbb",
    ])
}

fn default_taxonomy() -> Vec<CanonicalSourceCfg> {
    [
        ("PurdueSports.com", &[r"purduesports", r"^purdue athletics"][..]),
        (
            "Hammer and Rails",
            &[r"hammer\s*(and|&)\s*rails", r"hammerandrails"][..],
        ),
        (
            "Journal & Courier",
            &[r"journal\s*(and|&)\s*courier", r"jconline", r"journalcourier"][..],
        ),
        ("GoldandBlack.com", &[r"gold\s*(and|&)?\s*black"][..]),
        ("The Athletic", &[r"^(the\s+)?athletic\b", r"theathletic"][..]),
        ("ESPN", &[r"\bespn"][..]),
        ("Yahoo Sports", &[r"\byahoo"][..]),
        ("Sports Illustrated", &[r"sports\s+illustrated", r"\bsi\.com\b", r"^si\b"][..]),
        ("CBS Sports", &[r"\bcbs\s*sports", r"cbssports", r"^cbs\b"][..]),
        ("Big Ten Network", &[r"big\s*ten\s+network", r"bigtennetwork", r"^btn\b"][..]),
        ("247Sports", &[r"\b247\s*sports", r"^247\b"][..]),
        ("Rivals", &[r"\brivals(\.com)?\b"][..]),
        ("AP News", &[r"\bassociated press\b", r"apnews", r"^ap\b"][..]),
        ("Google News", &[r"news\.google", r"^google\b"][..]),
    ]
    .into_iter()
    .map(|(name, aliases)| CanonicalSourceCfg {
        name: name.to_string(),
        aliases: strings(aliases),
    })
    .collect()
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self::default_seed()
    }
}

impl FeedConfig {
    /// Built-in seed used when no config file is present.
    pub fn default_seed() -> Self {
        Self {
            fields: FieldTable::default(),
            dates: DateCfg::default(),
            classifier: ClassifierCfg::default(),
            window: WindowCfg::default(),
            taxonomy: default_taxonomy(),
        }
    }

    /// Trim lists, drop blanks and duplicate taxonomy names, clamp silly values.
    fn sanitized(mut self) -> Self {
        for list in [
            &mut self.fields.title,
            &mut self.fields.link,
            &mut self.fields.source,
            &mut self.fields.summary,
            &mut self.fields.date,
            &mut self.classifier.trusted,
            &mut self.classifier.positive,
            &mut self.classifier.negative,
        ] {
            clean_list(list);
        }

        let mut seen = std::collections::HashSet::new();
        self.taxonomy.retain_mut(|c| {
            c.name = c.name.trim().to_string();
            !c.name.is_empty() && seen.insert(c.name.to_lowercase())
        });

        if self.window.limit == 0 {
            self.window.limit = DEFAULT_LIMIT;
        }
        self
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_config_from(path: &Path) -> Result<FeedConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading feed config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
        .with_context(|| format!("parsing feed config {}", path.display()))
}

/// Load config using env var + fallbacks:
/// 1) $FEED_CONFIG_PATH
/// 2) config/feed.toml
/// 3) config/feed.json
/// 4) built-in seed
pub fn load_config_default() -> Result<FeedConfig> {
    if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_config_from(&pb);
        } else {
            return Err(anyhow!("FEED_CONFIG_PATH points to non-existent path"));
        }
    }
    let toml_p = PathBuf::from(DEFAULT_TOML_PATH);
    if toml_p.exists() {
        return load_config_from(&toml_p);
    }
    let json_p = PathBuf::from(DEFAULT_JSON_PATH);
    if json_p.exists() {
        return load_config_from(&json_p);
    }
    Ok(FeedConfig::default_seed())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<FeedConfig> {
    let looks_json = s.trim_start().starts_with('{');
    let cfg: FeedConfig = if hint_ext == "json" || (hint_ext != "toml" && looks_json) {
        serde_json::from_str(s)?
    } else {
        toml::from_str(s)?
    };
    Ok(cfg.sanitized())
}

fn clean_list(items: &mut Vec<String>) {
    let mut seen = std::collections::HashSet::new();
    items.retain_mut(|it| {
        *it = it.trim().to_string();
        !it.is_empty() && seen.insert(it.clone())
    });
}
