//! Types exchanged with the player-control endpoint.

use crate::error::{PlayerClientError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

/// Configuration for connecting to the player process.
#[derive(Debug, Clone)]
pub struct PlayerClientConfig {
    /// Base URL of the player-control endpoint (e.g., "http://127.0.0.1:5000")
    pub url: String,
    /// Upper bound for each request, connect included
    pub timeout: Duration,
}

impl PlayerClientConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

    /// Create a config with the default timeout.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Last known state of the player, as reported by `GET /status`.
///
/// Field names on the wire are fixed by the player process. Fields this
/// struct does not know about are kept in `extra` and written back out
/// unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaybackState {
    #[serde(rename = "tocando")]
    pub is_playing: bool,

    #[serde(rename = "pausado", default)]
    pub is_paused: bool,

    #[serde(rename = "ficheiro_atual", default)]
    pub current_file: Option<String>,

    #[serde(default)]
    pub volume: f64,

    /// Whether the audio mixer is currently producing sound
    #[serde(rename = "mixer_ocupado", default)]
    pub mixer_busy: bool,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A volume level normalized to `[0.0, 1.0]`.
///
/// Callers speak percent; the player speaks fractions. The only way to
/// build one is through [`Volume::from_percent`], so anything sent upstream
/// is already in range.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    pub const MAX_PERCENT: f64 = 100.0;

    /// Convert a percentage in `[0, 100]` into a normalized volume.
    pub fn from_percent(percent: f64) -> Result<Self> {
        if !percent.is_finite() || !(0.0..=Self::MAX_PERCENT).contains(&percent) {
            return Err(PlayerClientError::InvalidVolume(percent));
        }
        Ok(Self(percent / Self::MAX_PERCENT))
    }

    /// Normalized value in `[0.0, 1.0]`
    pub fn value(self) -> f64 {
        self.0
    }
}
