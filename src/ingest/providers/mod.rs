pub mod file;
pub mod http;

pub use file::FilePayload;
pub use http::HttpPayload;

use anyhow::Result;
use async_trait::async_trait;

use crate::ingest::types::PayloadSource;

/// In-memory payload, for fixtures and tests.
pub struct StaticPayload {
    value: serde_json::Value,
}

impl StaticPayload {
    pub fn new(value: serde_json::Value) -> Self {
        Self { value }
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(s)?))
    }
}

#[async_trait]
impl PayloadSource for StaticPayload {
    async fn fetch_payload(&self) -> Result<serde_json::Value> {
        Ok(self.value.clone())
    }

    fn name(&self) -> &str {
        "static"
    }
}
