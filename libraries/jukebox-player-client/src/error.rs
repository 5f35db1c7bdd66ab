//! Error types for the player client.

use thiserror::Error;

/// Errors that can occur when talking to the player process.
#[derive(Error, Debug)]
pub enum PlayerClientError {
    /// Invalid player base URL
    #[error("Invalid player URL: {0}")]
    InvalidUrl(String),

    /// Volume outside the 0..=100 percent range
    #[error("Volume must be a number between 0 and 100, got {0}")]
    InvalidVolume(f64),

    /// The player could not be reached or answered with something unusable
    #[error("Player unavailable: {0}")]
    Unavailable(String),
}

impl PlayerClientError {
    /// The human-readable cause, without the variant prefix.
    pub fn cause(&self) -> String {
        match self {
            Self::InvalidUrl(msg) | Self::Unavailable(msg) => msg.clone(),
            Self::InvalidVolume(_) => self.to_string(),
        }
    }
}

/// Result type for player client operations.
pub type Result<T> = std::result::Result<T, PlayerClientError>;
