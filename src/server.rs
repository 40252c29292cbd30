//! Web server module for the crawler service.
//!
//! Provides the stub HTTP API surface. Handlers reach the database through
//! the shared [`SessionManager`] in [`AppState`] — request-scope dependency
//! injection rather than module globals.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};

use crate::db::{DbError, SessionManager};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<SessionManager>,
}

/// Health check response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub db: String,
}

/// Stub crawl response.
///
/// Fixed placeholder shape; actual crawling is out of scope for this service
/// skeleton.
#[derive(Serialize)]
pub struct CrawlResponse {
    pub start_url: String,
    pub total: i64,
    pub visited_urls: Vec<String>,
}

/// Build the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/crawl/", get(start_crawl))
        .route("/api/domains", get(get_domains))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(false)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// `GET /health` — liveness plus database readiness.
///
/// An uninitialized session manager is a deployment/ordering bug, so it
/// surfaces as a server-side fault (503), never as a client error.
async fn health(State(state): State<AppState>) -> Response {
    match ping_db(&state.db).await {
        Ok(()) => Json(HealthResponse {
            status: "ok".to_string(),
            db: "ready".to_string(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, "health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthResponse {
                    status: "degraded".to_string(),
                    db: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Round-trip one query through a session scope.
async fn ping_db(db: &SessionManager) -> Result<(), DbError> {
    let mut session = db.session().await?;
    sqlx::query("SELECT 1").execute(&mut *session).await?;
    Ok(())
}

/// `GET /crawl/` — placeholder crawl endpoint returning fixed data.
async fn start_crawl() -> Json<CrawlResponse> {
    Json(CrawlResponse {
        start_url: "url_request.url".to_string(),
        total: 100,
        visited_urls: vec!["eisisi".to_string()],
    })
}

/// `GET /api/domains` — placeholder domain listing.
async fn get_domains() -> Json<Vec<String>> {
    Json(vec!["domain1".to_string(), "domain2".to_string()])
}
