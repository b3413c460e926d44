use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::ingest::types::RunStats;
use crate::present::{self, FeedView};
use crate::service::FeedService;

#[derive(Clone)]
pub struct AppState {
    pub feed: Arc<FeedService>,
}

impl AppState {
    pub fn new(service: FeedService) -> Self {
        Self {
            feed: Arc::new(service),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/feed", get(get_feed))
        .route("/api/sources", get(get_sources))
        .route("/api/refresh", post(refresh))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Debug, Default, serde::Deserialize)]
struct FeedQuery {
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    q: Option<String>,
}

async fn get_feed(
    State(state): State<AppState>,
    Query(query): Query<FeedQuery>,
) -> Json<FeedView> {
    match state.feed.current() {
        Some(feed) => Json(present::view(
            &feed,
            query.source.as_deref(),
            query.q.as_deref(),
        )),
        None => Json(present::empty_view(&state.feed.taxonomy())),
    }
}

async fn get_sources(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(present::source_options(&state.feed.taxonomy()))
}

#[derive(serde::Serialize)]
struct RefreshOut {
    ok: bool,
    items: usize,
    sources: usize,
    updated_at: Option<String>,
    stats: Option<RunStats>,
    error: Option<String>,
}

async fn refresh(State(state): State<AppState>) -> (StatusCode, Json<RefreshOut>) {
    match state.feed.refresh().await {
        Ok(feed) => (
            StatusCode::OK,
            Json(RefreshOut {
                ok: true,
                items: feed.items.len(),
                sources: feed.taxonomy.len(),
                updated_at: feed.updated_at.map(|d| d.to_rfc3339()),
                stats: Some(feed.stats),
                error: None,
            }),
        ),
        Err(e) => (
            StatusCode::BAD_GATEWAY,
            Json(RefreshOut {
                ok: false,
                items: 0,
                sources: state.feed.taxonomy().len(),
                updated_at: None,
                stats: None,
                error: Some(format!("{e:#}")),
            }),
        ),
    }
}
