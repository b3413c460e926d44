use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

use crate::ingest::types::PayloadSource;

/// Reads the collector's `items.json` (or any JSON file) from disk on every fetch.
pub struct FilePayload {
    path: PathBuf,
    label: String,
}

impl FilePayload {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let label = format!("file:{}", path.display());
        Self { path, label }
    }
}

#[async_trait]
impl PayloadSource for FilePayload {
    async fn fetch_payload(&self) -> Result<serde_json::Value> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("reading payload from {}", self.path.display()))?;
        serde_json::from_slice(&bytes)
            .with_context(|| format!("payload {} is not valid JSON", self.path.display()))
    }

    fn name(&self) -> &str {
        &self.label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn reads_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("items.json");
        std::fs::write(&p, r#"{"items": [{"title": "x"}]}"#).unwrap();
        let v = FilePayload::new(&p).fetch_payload().await.unwrap();
        assert_eq!(v["items"][0]["title"], "x");
    }

    #[tokio::test]
    async fn missing_file_is_error() {
        let src = FilePayload::new("/definitely/not/here/items.json");
        assert!(src.fetch_payload().await.is_err());
        assert!(src.name().starts_with("file:"));
    }
}
