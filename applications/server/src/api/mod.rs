/// API route modules
pub mod health;
pub mod playback;
pub mod songs;
pub mod status;
