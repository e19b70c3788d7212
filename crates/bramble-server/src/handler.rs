use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use bytes::Bytes;
use serde::Deserialize;
use serde_json::json;

use bramble_engine::{AudioAttachment, Book, BookEntry, LoadedBook, WaypointView};
use bramble_types::{BookId, WaypointId};

use crate::auth::{Action, Credentials, Identity};
use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

/// Health check handler.
pub async fn health_handler() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// Info handler.
pub async fn info_handler() -> Json<serde_json::Value> {
    Json(json!({
        "name": "bramble-server",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// List every book, oldest first.
pub async fn list_books_handler(
    State(state): State<Arc<AppState>>,
) -> ServerResult<Json<Vec<Book>>> {
    Ok(Json(state.shelf.books()?))
}

/// A book and its start waypoint.
pub async fn book_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ServerResult<Json<BookEntry>> {
    Ok(Json(state.shelf.book_entry(BookId::new(id))?))
}

/// A waypoint, its content, and its outgoing choices.
pub async fn waypoint_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> ServerResult<Json<WaypointView>> {
    Ok(Json(state.shelf.waypoint_graph(WaypointId::new(id))?))
}

/// Upload a book document. The body is the raw JSON document; the created
/// book is attributed to the authenticated caller.
pub async fn upload_book_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<(StatusCode, Json<LoadedBook>)> {
    let identity = require_identity(&state, &headers, &Action::UploadBook).await?;
    let summary = state.shelf.load_bytes(&body, identity.owner)?;
    Ok((StatusCode::CREATED, Json(summary)))
}

#[derive(Debug, Deserialize)]
pub struct AudioParams {
    pub seconds: Option<f32>,
}

/// Upload narration audio for one waypoint. The body is the raw audio bytes.
pub async fn attach_audio_handler(
    State(state): State<Arc<AppState>>,
    Path((id, filename)): Path<(u64, String)>,
    Query(params): Query<AudioParams>,
    headers: HeaderMap,
    body: Bytes,
) -> ServerResult<Json<AudioAttachment>> {
    require_identity(&state, &headers, &Action::AttachAudio).await?;
    let attachment =
        state
            .shelf
            .attach_audio(WaypointId::new(id), &body, &filename, params.seconds)?;
    Ok(Json(attachment))
}

async fn require_identity(
    state: &AppState,
    headers: &HeaderMap,
    action: &Action,
) -> ServerResult<Identity> {
    let credentials = Credentials::from_headers(headers);
    let identity = state.auth.authenticate(&credentials).await?;
    if identity.owner.is_anonymous() && !state.config.allow_anonymous_uploads {
        return Err(ServerError::AuthRequired);
    }
    if !state.auth.authorize(&identity, action).await? {
        return Err(ServerError::Forbidden(format!(
            "{} denied for {}",
            action, identity.name
        )));
    }
    Ok(identity)
}
