/// Server services
pub mod player_probe;

pub use player_probe::PlayerProbe;
