//! Web server for the quake map.
//!
//! Stateless: every page load fetches the feed once, composes the view
//! and renders it. Only the immutable configuration is shared between
//! requests.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};

use crate::client::FeedSource;
use crate::composer::{MapView, compose};
use crate::config::MapConfig;
use crate::errors::QuakemapError;
use crate::html::render_page;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
    pub source: FeedSource,
    pub map: MapConfig,
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<ServerConfig>,
}

impl AppState {
    #[must_use]
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }
}

/// Create the Axum router with all routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/map.json", get(view_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Start the web server.
pub async fn run_server(config: ServerConfig) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.host, config.port);
    let app = create_router(AppState::new(config));

    tracing::info!("🌍 quakemap starting at http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Fetch and compose on a blocking worker; the feed client is synchronous.
async fn load_view(state: &AppState) -> Result<MapView, ViewError> {
    let config = Arc::clone(&state.config);
    tokio::task::spawn_blocking(move || {
        let feed = config.source.load()?;
        compose(&feed, &config.map)
    })
    .await
    .map_err(|e| ViewError::Internal(e.to_string()))?
    .map_err(ViewError::Feed)
}

/// Failure while building a view for a request.
#[derive(Debug)]
enum ViewError {
    Feed(QuakemapError),
    Internal(String),
}

impl IntoResponse for ViewError {
    fn into_response(self) -> Response {
        match self {
            Self::Feed(e) if e.is_fetch_failure() => {
                tracing::warn!("feed fetch failed: {}", e);
                (StatusCode::BAD_GATEWAY, "Failed to fetch earthquake feed").into_response()
            }
            Self::Feed(e) => {
                tracing::warn!("feed payload rejected: {}", e);
                (StatusCode::BAD_GATEWAY, "Earthquake feed was malformed").into_response()
            }
            Self::Internal(msg) => {
                tracing::error!("render task failed: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// Main page handler - renders the map.
async fn index_handler(State(state): State<AppState>) -> Result<Html<String>, ViewError> {
    let view = load_view(&state).await?;
    let page = render_page(&view).map_err(ViewError::Feed)?;
    Ok(Html(page))
}

/// Composed view as JSON.
async fn view_handler(State(state): State<AppState>) -> Result<Json<MapView>, ViewError> {
    load_view(&state).await.map(Json)
}

/// Health check endpoint.
async fn health_handler() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::{Path, PathBuf};

    fn state_for(path: PathBuf) -> AppState {
        let mut map = MapConfig::default();
        map.tile_layer.access_token = Some("pk.test".into());
        AppState::new(ServerConfig {
            port: 0,
            host: "127.0.0.1".into(),
            source: FeedSource::File(path),
            map,
        })
    }

    #[tokio::test]
    async fn test_index_renders_sample_feed() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tools/sample_all_day.json");
        let Html(page) = index_handler(State(state_for(path))).await.unwrap();
        assert!(page.contains("<div id=\"map\"></div>"));
        assert!(page.contains("Bay Area"));
    }

    #[tokio::test]
    async fn test_view_handler() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tools/sample_all_day.json");
        let Json(view) = view_handler(State(state_for(path))).await.unwrap();
        assert_eq!(view.overlay.markers.len(), 4);
        assert_eq!(view.legend.panel.event_count, 4);
    }

    #[tokio::test]
    async fn test_missing_feed_is_bad_gateway() {
        let state = state_for(PathBuf::from("/nonexistent/feed.geojson"));
        let err = index_handler(State(state)).await.unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_health() {
        assert_eq!(health_handler().await, "OK");
    }
}
