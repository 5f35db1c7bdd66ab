/// Playback control API routes
use crate::{
    error::{Result, ServerError},
    state::AppState,
};
use axum::{body::Bytes, extract::State, Json};
use jukebox_player_client::{PlayerControl, Volume};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Parse an optional JSON object body. An empty body counts as `{}`.
fn parse_object(body: &Bytes) -> Result<Map<String, Value>> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }

    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(ServerError::Validation(
            "Request body must be a JSON object".to_string(),
        )),
        Err(e) => Err(ServerError::Validation(format!("Invalid JSON body: {}", e))),
    }
}

/// Build `{ message, ...fields, ...upstream }`. Upstream keys win, as the
/// player's own answer is the most specific.
fn merge_upstream(message: String, fields: Vec<(&str, Value)>, upstream: Value) -> Value {
    let mut body = Map::new();
    body.insert("message".to_string(), Value::String(message));
    for (key, value) in fields {
        body.insert(key.to_string(), value);
    }

    match upstream {
        Value::Object(upstream) => body.extend(upstream),
        Value::Null => {}
        other => {
            body.insert("response".to_string(), other);
        }
    }

    Value::Object(body)
}

/// Relative paths are taken relative to the music directory
fn resolve_song_path(music_dir: &Path, requested: &str) -> PathBuf {
    let requested = PathBuf::from(requested);
    let path = if requested.is_absolute() {
        requested
    } else {
        music_dir.join(requested)
    };

    if path.is_absolute() {
        return path;
    }
    std::env::current_dir()
        .map(|cwd| cwd.join(&path))
        .unwrap_or(path)
}

/// Accept a JSON number or a numeric string
fn parse_percent(value: Option<&Value>) -> Result<f64> {
    let invalid =
        || ServerError::Validation("Field 'volume' must be a number between 0 and 100".to_string());

    let percent = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
    .ok_or_else(invalid)?;

    if !percent.is_finite() || !(0.0..=Volume::MAX_PERCENT).contains(&percent) {
        return Err(invalid());
    }
    Ok(percent)
}

/// POST /api/play - Play a file: `{ "path": "..." }`
pub async fn play(State(app_state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let request = parse_object(&body)?;

    let requested = request
        .get("path")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .ok_or_else(|| {
            ServerError::Validation("Field 'path' must be a non-empty string".to_string())
        })?;

    let file = resolve_song_path(app_state.scanner.music_dir(), requested);
    let song = file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| requested.to_string());

    tracing::info!(song = %song, "Playing");

    let upstream = app_state.player.play(&file).await?;

    Ok(Json(merge_upstream(
        format!("Playing {}", song),
        vec![("song", Value::String(song))],
        upstream,
    )))
}

/// POST /api/pause - Pause playback
pub async fn pause(State(app_state): State<AppState>) -> Result<Json<Value>> {
    let upstream = app_state.player.pause().await?;
    Ok(Json(merge_upstream(
        "Playback paused".to_string(),
        Vec::new(),
        upstream,
    )))
}

/// POST /api/resume - Resume paused playback
pub async fn resume(State(app_state): State<AppState>) -> Result<Json<Value>> {
    let upstream = app_state.player.resume().await?;
    Ok(Json(merge_upstream(
        "Playback resumed".to_string(),
        Vec::new(),
        upstream,
    )))
}

/// POST /api/stop - Stop playback
pub async fn stop(State(app_state): State<AppState>) -> Result<Json<Value>> {
    let upstream = app_state.player.stop().await?;
    Ok(Json(merge_upstream(
        "Playback stopped".to_string(),
        Vec::new(),
        upstream,
    )))
}

/// POST /api/volume - Set volume: `{ "volume": 0..100 }`
pub async fn set_volume(State(app_state): State<AppState>, body: Bytes) -> Result<Json<Value>> {
    let request = parse_object(&body)?;
    let percent = parse_percent(request.get("volume"))?;
    let volume = Volume::from_percent(percent)?;

    tracing::info!(percent, "Setting volume");

    let upstream = app_state.player.set_volume(volume).await?;

    Ok(Json(merge_upstream(
        format!("Volume set to {}%", percent),
        Vec::new(),
        upstream,
    )))
}
