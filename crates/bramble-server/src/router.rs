use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use bramble_engine::Bookshelf;

use crate::auth::AuthProvider;
use crate::config::ServerConfig;
use crate::handler;

/// Shared state behind every handler.
pub struct AppState {
    pub config: ServerConfig,
    pub shelf: Bookshelf,
    pub auth: Box<dyn AuthProvider>,
}

/// Build the axum router with all Bramble endpoints.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.max_upload_bytes;
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route(
            "/v1/books",
            get(handler::list_books_handler).post(handler::upload_book_handler),
        )
        .route("/v1/books/:id", get(handler::book_entry_handler))
        .route("/v1/waypoints/:id", get(handler::waypoint_handler))
        .route(
            "/v1/waypoints/:id/audio/:filename",
            put(handler::attach_audio_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
