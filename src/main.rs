//! Feed service binary entrypoint.
//! Loads config, wires the payload source and pipeline, runs the first ingest
//! cycle and serves the Axum API (plus `/metrics`).

use feed_normalizer::{
    api::{self, AppState},
    config::load_config_default,
    ingest::providers::{FilePayload, HttpPayload},
    ingest::types::PayloadSource,
    metrics::Metrics,
    service::FeedService,
    Pipeline,
};
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const ENV_PAYLOAD_URL: &str = "FEED_PAYLOAD_URL";
const ENV_PAYLOAD_PATH: &str = "FEED_PAYLOAD_PATH";
const DEFAULT_PAYLOAD_PATH: &str = "items.json";

/// Enable compact tracing logs in development only.
/// Activation requires BOTH:
///   - dev environment (debug build OR SHUTTLE_ENV in {local, development, dev})
///   - FEED_DEV_LOG=1
fn enable_dev_tracing() {
    let dev_flag = std::env::var("FEED_DEV_LOG")
        .ok()
        .is_some_and(|v| v == "1");

    let is_dev_env = cfg!(debug_assertions)
        || matches!(
            std::env::var("SHUTTLE_ENV")
                .unwrap_or_default()
                .to_ascii_lowercase()
                .as_str(),
            "local" | "development" | "dev"
        );

    if !(dev_flag && is_dev_env) {
        return;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("feed=debug,ingest=info,warn"));

    // Shuttle may already own the global subscriber.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

fn payload_source() -> Box<dyn PayloadSource> {
    match std::env::var(ENV_PAYLOAD_URL) {
        Ok(url) if !url.trim().is_empty() => Box::new(HttpPayload::from_url(url.trim())),
        _ => {
            let path = std::env::var(ENV_PAYLOAD_PATH)
                .unwrap_or_else(|_| DEFAULT_PAYLOAD_PATH.to_string());
            Box::new(FilePayload::new(path))
        }
    }
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();

    enable_dev_tracing();

    let cfg = load_config_default()?;

    // Recorder first so the initial cycle is counted.
    let metrics = Metrics::init(cfg.window.limit)
        .map_err(|e| tracing::warn!(error = ?e, "metrics disabled"))
        .ok();

    let pipeline = Pipeline::new(cfg)?;
    let service = FeedService::new(payload_source(), pipeline);

    // First cycle; a failure leaves an empty feed that /api/refresh can fill later.
    if let Err(e) = service.refresh().await {
        tracing::warn!(target: "ingest", error = ?e, "initial refresh failed");
    }

    let mut router = api::router(AppState::new(service));
    if let Some(m) = metrics {
        router = router.merge(m.router());
    }

    Ok(router.into())
}
