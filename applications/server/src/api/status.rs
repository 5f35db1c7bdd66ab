/// Player status API route
use crate::state::AppState;
use axum::{extract::State, Json};
use jukebox_player_client::PlayerControl;
use serde::Serialize;
use serde_json::Value;

/// Volume reported while the player cannot be reached
pub const FALLBACK_VOLUME: u8 = 70;

/// Fixed answer used when the player is unreachable.
#[derive(Debug, Serialize)]
pub struct StatusFallback {
    #[serde(rename = "tocando")]
    pub is_playing: bool,
    #[serde(rename = "pausado")]
    pub is_paused: bool,
    #[serde(rename = "ficheiro_atual")]
    pub current_file: Option<String>,
    pub volume: u8,
    #[serde(rename = "mixer_ocupado")]
    pub mixer_busy: bool,
    pub error: String,
}

impl StatusFallback {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            is_playing: false,
            is_paused: false,
            current_file: None,
            volume: FALLBACK_VOLUME,
            mixer_busy: false,
            error: error.into(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum StatusResponse {
    /// Forwarded unchanged
    Live(Value),
    Unreachable(StatusFallback),
}

/// GET /api/status - Current player state
///
/// Never fails: an unreachable player yields the fallback state with 200.
pub async fn status(State(app_state): State<AppState>) -> Json<StatusResponse> {
    match app_state.player.get_status_value().await {
        Ok(state) => {
            app_state.probe_status.record(true);
            Json(StatusResponse::Live(state))
        }
        Err(e) => {
            app_state.probe_status.record(false);
            tracing::warn!("Player status unavailable: {}", e);
            Json(StatusResponse::Unreachable(StatusFallback::new(e.cause())))
        }
    }
}
