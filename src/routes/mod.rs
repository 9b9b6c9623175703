use std::path::PathBuf;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

use crate::{middleware, state::AppState};

pub mod admin;
pub mod auth;
pub mod catalog;
pub mod likes;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let static_dir = PathBuf::from(&state.config.static_dir);
    // Client-side routing: unknown paths fall back to the SPA entry point.
    let frontend = ServeDir::new(&static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health_check))
        .nest("/api", api_routes())
        .fallback_service(frontend)
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn(middleware::propagate_request_id))
                .layer(TraceLayer::new_for_http().make_span_with(middleware::http_span))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/filters", get(catalog::available_filters))
        .route("/recommend", post(catalog::recommend))
        .route(
            "/recommend/personalized",
            post(catalog::recommend_personalized),
        )
        .route("/pokemon/:pokemon_id", get(catalog::pokemon_detail))
        .route("/pokemon/:pokemon_id/like", post(likes::toggle))
        .route("/likes", get(likes::liked_ids))
        .route("/likes/details", get(likes::liked_details))
        .nest("/auth", auth::routes())
        .nest("/admin", admin::routes())
}

/// Health check endpoint
async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Pagination values arrive from loosely-typed clients; anything that does
/// not parse as a positive integer falls back to the default.
pub(crate) fn positive_or(raw: Option<&Value>, default: u32) -> u32 {
    let parsed = match raw {
        Some(Value::Number(number)) => number.as_u64().and_then(|v| u32::try_from(v).ok()),
        Some(Value::String(text)) => text.trim().parse::<u32>().ok(),
        _ => None,
    };
    parsed.filter(|v| *v >= 1).unwrap_or(default)
}

/// Same fallback rule for query-string pagination.
pub(crate) fn parse_query_page(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.parse::<u32>().ok())
        .filter(|v| *v >= 1)
        .unwrap_or(default)
}
