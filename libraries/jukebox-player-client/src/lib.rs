//! Jukebox Player Client
//!
//! HTTP client for the external player process. The player exposes a small,
//! fixed vocabulary (play, pause, resume, stop, volume, status); this crate
//! maps each command onto one outbound request and collapses every failure
//! (connection refused, timeout, non-2xx, unparseable body) into
//! [`PlayerClientError::Unavailable`] with a readable cause.
//!
//! There are no retries here and no local state: to observe the effect of a
//! command, ask for the status again.
//!
//! # Example
//!
//! ```ignore
//! use jukebox_player_client::{PlayerClient, PlayerClientConfig, PlayerControl, Volume};
//!
//! let client = PlayerClient::new(PlayerClientConfig::new("http://127.0.0.1:5000"))?;
//!
//! client.play("/music/song.mp3".as_ref()).await?;
//! client.set_volume(Volume::from_percent(40.0)?).await?;
//!
//! let status = client.get_status().await?;
//! println!("playing: {}", status.is_playing);
//! ```

mod client;
mod command;
mod error;
mod types;

pub use client::PlayerClient;
pub use command::{PlayerCommand, PlayerControl};
pub use error::{PlayerClientError, Result};
pub use types::{PlaybackState, PlayerClientConfig, Volume};
