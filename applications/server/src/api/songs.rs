/// Music library API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{extract::State, Json};
use jukebox_library::Track;
use std::sync::Arc;

/// GET /api/songs - List the audio files in the music directory
///
/// The directory is re-read on every call.
pub async fn list_songs(State(app_state): State<AppState>) -> Result<Json<Vec<Track>>> {
    let scanner = Arc::clone(&app_state.scanner);

    let tracks = tokio::task::spawn_blocking(move || scanner.scan())
        .await
        .map_err(|e| ServerError::Internal(format!("Library scan task failed: {}", e)))??;

    tracing::debug!("Listing {} songs", tracks.len());

    Ok(Json(tracks))
}
