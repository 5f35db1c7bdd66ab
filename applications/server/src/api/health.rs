/// Health check API routes
use crate::state::AppState;
use axum::{extract::State, Json};
use jukebox_player_client::PlayerControl;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Whether the player answered a status probe just now
    #[serde(rename = "python_server")]
    pub player_server: bool,

    /// Always true: answering at all means the gateway is up
    #[serde(rename = "node_server")]
    pub gateway_server: bool,

    /// Supervisor state, or "unmanaged"
    pub player_process: String,

    pub version: String,
}

/// GET /api/health - Health check endpoint
pub async fn health(State(app_state): State<AppState>) -> Json<HealthResponse> {
    let player_ok = app_state.player.get_status().await.is_ok();
    app_state.probe_status.record(player_ok);

    let player_process = app_state
        .supervisor
        .as_ref()
        .map_or("unmanaged", |supervisor| supervisor.state().as_str())
        .to_string();

    Json(HealthResponse {
        player_server: player_ok,
        gateway_server: true,
        player_process,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
