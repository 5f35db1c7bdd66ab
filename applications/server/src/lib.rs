//! Jukebox Server Library
//!
//! HTTP gateway for the jukebox: lists the music library, relays playback
//! commands to the player process and keeps that process alive.
//!
//! This library exposes the core components for testing purposes.

pub mod api;
pub mod config;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use routes::create_router;
pub use services::PlayerProbe;
pub use state::{AppState, ProbeStatus};
