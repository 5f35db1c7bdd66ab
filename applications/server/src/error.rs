/// Server error types
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jukebox_library::LibraryError;
use jukebox_player_client::PlayerClientError;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ServerError>;

#[derive(Debug, Error)]
pub enum ServerError {
    /// Bad or missing request fields
    #[error("Invalid request: {0}")]
    Validation(String),

    /// Player process unreachable or answered with an error
    #[error("Player unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Library error: {0}")]
    Filesystem(#[from] LibraryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<PlayerClientError> for ServerError {
    fn from(err: PlayerClientError) -> Self {
        match err {
            PlayerClientError::InvalidVolume(_) => ServerError::Validation(err.to_string()),
            other => ServerError::UpstreamUnavailable(other.cause()),
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ServerError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            ServerError::UpstreamUnavailable(msg) => {
                tracing::error!("Player error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            ServerError::Filesystem(ref e) => {
                tracing::error!("Library error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read music library".to_string(),
                )
            }
            ServerError::Config(ref msg) => {
                tracing::error!("Config error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Configuration error".to_string(),
                )
            }
            ServerError::Internal(ref msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            ServerError::Io(ref e) => {
                tracing::error!("IO error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "IO error".to_string())
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
