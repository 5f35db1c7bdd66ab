//! Player command vocabulary.

use crate::error::{PlayerClientError, Result};
use crate::types::{PlaybackState, Volume};
use async_trait::async_trait;
use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// One request to the player process.
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerCommand {
    Play { file: PathBuf },
    Pause,
    Resume,
    Stop,
    SetVolume(Volume),
    GetStatus,
}

impl PlayerCommand {
    /// Short name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Self::Play { .. } => "play",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Stop => "stop",
            Self::SetVolume(_) => "set_volume",
            Self::GetStatus => "get_status",
        }
    }

    /// Path relative to the player base URL
    pub fn endpoint(&self) -> &'static str {
        match self {
            Self::Play { .. } => "/play",
            Self::Pause => "/pause",
            Self::Resume => "/resume",
            Self::Stop => "/stop",
            Self::SetVolume(_) => "/volume",
            Self::GetStatus => "/status",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::GetStatus => Method::GET,
            _ => Method::POST,
        }
    }

    /// JSON body, if the command carries one
    pub fn body(&self) -> Option<Value> {
        match self {
            Self::Play { file } => Some(json!({ "ficheiro": file.to_string_lossy() })),
            Self::SetVolume(volume) => Some(json!({ "volume": volume.value() })),
            _ => None,
        }
    }

    /// Whether an empty 2xx body is an acceptable answer
    pub(crate) fn allows_empty_response(&self) -> bool {
        !matches!(self, Self::GetStatus)
    }
}

/// Anything that can deliver [`PlayerCommand`]s to a player.
///
/// Implementors only provide [`send`](PlayerControl::send); the typed
/// helpers are built on top of it.
#[async_trait]
pub trait PlayerControl: Send + Sync {
    /// Deliver one command and return the player's JSON answer.
    async fn send(&self, command: PlayerCommand) -> Result<Value>;

    async fn play(&self, file: &Path) -> Result<Value> {
        self.send(PlayerCommand::Play {
            file: file.to_path_buf(),
        })
        .await
    }

    async fn pause(&self) -> Result<Value> {
        self.send(PlayerCommand::Pause).await
    }

    async fn resume(&self) -> Result<Value> {
        self.send(PlayerCommand::Resume).await
    }

    async fn stop(&self) -> Result<Value> {
        self.send(PlayerCommand::Stop).await
    }

    async fn set_volume(&self, volume: Volume) -> Result<Value> {
        self.send(PlayerCommand::SetVolume(volume)).await
    }

    async fn get_status(&self) -> Result<PlaybackState> {
        let value = self.send(PlayerCommand::GetStatus).await?;
        parse_status(&value)
    }

    /// The status body exactly as the player sent it, once it has been
    /// checked to be a valid [`PlaybackState`].
    async fn get_status_value(&self) -> Result<Value> {
        let value = self.send(PlayerCommand::GetStatus).await?;
        parse_status(&value)?;
        Ok(value)
    }
}

fn parse_status(value: &Value) -> Result<PlaybackState> {
    PlaybackState::deserialize(value)
        .map_err(|e| PlayerClientError::Unavailable(format!("Malformed status response: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_play_body_uses_player_field_name() {
        let command = PlayerCommand::Play {
            file: PathBuf::from("/music/a b.mp3"),
        };
        assert_eq!(command.body(), Some(json!({ "ficheiro": "/music/a b.mp3" })));
        assert_eq!(command.method(), Method::POST);
        assert_eq!(command.endpoint(), "/play");
    }

    #[test]
    fn test_volume_body_is_normalized() {
        let command = PlayerCommand::SetVolume(Volume::from_percent(25.0).unwrap());
        assert_eq!(command.body(), Some(json!({ "volume": 0.25 })));
    }

    #[test]
    fn test_parse_status_rejects_wrong_shape() {
        assert!(parse_status(&json!({ "tocando": true })).is_ok());
        assert!(matches!(
            parse_status(&json!({ "volume": 70 })),
            Err(PlayerClientError::Unavailable(_))
        ));
    }

    #[test]
    fn test_status_is_get_without_body() {
        assert_eq!(PlayerCommand::GetStatus.method(), Method::GET);
        assert!(PlayerCommand::GetStatus.body().is_none());
        assert!(!PlayerCommand::GetStatus.allows_empty_response());
        assert!(PlayerCommand::Stop.allows_empty_response());
    }
}
