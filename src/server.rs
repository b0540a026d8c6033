//! HTTP boundary for the search service.
//!
//! `GET /api/search?q=<query>` answers with a JSON object mapping result
//! titles to URLs in ranked order. A failed search answers `{}`, the same
//! shape as "nothing relevant", so browser clients only ever see one
//! success shape.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use episodego_search::{HttpFetcher, PageFetcher, SearchConfig};
use tower_http::cors::CorsLayer;

use crate::config::AppConfig;
use crate::error::Result;

/// Shared handler state: one fetcher and one configuration for all requests.
pub struct AppState<F> {
    fetcher: Arc<F>,
    config: Arc<SearchConfig>,
}

impl<F> AppState<F> {
    /// Create state from a fetcher and a validated search configuration.
    pub fn new(fetcher: F, config: SearchConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config: Arc::new(config),
        }
    }
}

impl<F> Clone for AppState<F> {
    fn clone(&self) -> Self {
        Self {
            fetcher: Arc::clone(&self.fetcher),
            config: Arc::clone(&self.config),
        }
    }
}

#[derive(serde::Deserialize)]
struct SearchQuery {
    q: Option<String>,
}

/// Build the router with all routes.
///
/// Any origin may call the API, preflight requests included.
pub fn build_router<F: PageFetcher + 'static>(state: AppState<F>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search::<F>))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind `config.host:config.port` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the HTTP client cannot be built or the listener
/// cannot be bound.
pub async fn run_server(config: AppConfig) -> Result<()> {
    let fetcher = HttpFetcher::new(&config.search)?;
    let state = AppState::new(fetcher, config.search.clone());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    let local_addr = listener.local_addr()?;

    let app = build_router(state);
    tracing::info!("search server listening on http://{local_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

async fn search<F: PageFetcher + 'static>(
    State(state): State<AppState<F>>,
    Query(params): Query<SearchQuery>,
) -> Response {
    let Some(query) = params.q.filter(|q| !q.trim().is_empty()) else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({"error": "query parameter q is required"})),
        )
            .into_response();
    };

    match episodego_search::search_with(state.fetcher.as_ref(), &query, &state.config).await {
        Ok(results) => {
            tracing::debug!(count = results.len(), "search answered");
            Json(results).into_response()
        }
        Err(e) => {
            tracing::warn!(error = %e, "search failed");
            Json(serde_json::json!({})).into_response()
        }
    }
}
