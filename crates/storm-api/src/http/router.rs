//! Axum router configuration with middleware.
//!
//! The chat protocol ignores the request path: GET, POST and PATCH behave
//! the same on `/` and on any other path. `/health` is the only reserved
//! route. Middleware: CORS, tracing.

use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let chat = get(handlers::chat::get_messages)
        .post(handlers::chat::post_message)
        .patch(handlers::chat::patch_nickname);

    Router::new()
        .route("/health", get(health))
        .route("/", chat.clone())
        .route("/{*path}", chat)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
