use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use bramble_engine::{EngineError, LoadError};

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("authentication required")]
    AuthRequired,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServerResult<T> = Result<T, ServerError>;

impl ServerError {
    /// HTTP status for the error taxonomy: authoring errors reject the
    /// request, stale ids are not-found, and anything storage-or-below is a
    /// generic server failure.
    fn status(&self) -> StatusCode {
        match self {
            Self::AuthFailed(_) | Self::AuthRequired => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Engine(engine) => match engine {
                EngineError::BookNotFound(_) | EngineError::WaypointNotFound(_) => {
                    StatusCode::NOT_FOUND
                }
                EngineError::UnsupportedAudioFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
                EngineError::InvalidFilename(_) | EngineError::Document(_) => {
                    StatusCode::BAD_REQUEST
                }
                EngineError::Load(LoadError::Document(_))
                | EngineError::Load(LoadError::UnresolvedWaypointReference(_)) => {
                    StatusCode::BAD_REQUEST
                }
                EngineError::Load(LoadError::Store(_))
                | EngineError::Store(_)
                | EngineError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Config(_) | Self::Io(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        // Server-side failures get a generic body; the detail goes to the log.
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, "request failed");
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
