use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::ingest::types::PayloadSource;

/// Fetches the collector payload over HTTP (e.g. a published `items.json`).
pub struct HttpPayload {
    url: String,
    client: reqwest::Client,
}

impl HttpPayload {
    pub fn from_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl PayloadSource for HttpPayload {
    async fn fetch_payload(&self) -> Result<serde_json::Value> {
        let resp = match self.client.get(&self.url).send().await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(target: "ingest", error = ?e, url = %self.url, "payload http error");
                return Err(e).context("payload http get()");
            }
        };
        let resp = resp
            .error_for_status()
            .with_context(|| format!("payload http status from {}", self.url))?;
        resp.json::<serde_json::Value>()
            .await
            .context("payload http .json()")
    }

    fn name(&self) -> &str {
        &self.url
    }
}
