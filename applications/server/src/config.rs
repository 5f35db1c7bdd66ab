/// Server configuration
use crate::error::{Result, ServerError};
use jukebox_supervisor::SupervisorConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file looked up in the working directory when none is given
pub const DEFAULT_CONFIG_FILE: &str = "jukebox.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_server")]
    pub server: ServerSettings,

    #[serde(default = "default_library")]
    pub library: LibrarySettings,

    #[serde(default = "default_player")]
    pub player: PlayerSettings,

    #[serde(default = "default_supervisor")]
    pub supervisor: SupervisorSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    #[serde(default = "default_music_dir")]
    pub music_dir: PathBuf,

    #[serde(default = "default_image_dir")]
    pub image_dir: PathBuf,

    /// Static web UI
    #[serde(default = "default_web_dir")]
    pub web_dir: PathBuf,

    #[serde(default = "default_music_route")]
    pub music_route: String,

    #[serde(default = "default_image_route")]
    pub image_route: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlayerSettings {
    /// Player-control endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SupervisorSettings {
    /// Spawn and babysit the player process. Disable when it is managed
    /// elsewhere (systemd, a container, ...).
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default = "default_program")]
    pub program: PathBuf,

    #[serde(default = "default_args")]
    pub args: Vec<String>,

    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    #[serde(default = "default_restart_delay_ms")]
    pub restart_delay_ms: u64,

    #[serde(default = "default_readiness_attempts")]
    pub readiness_attempts: u32,

    #[serde(default = "default_readiness_interval_ms")]
    pub readiness_interval_ms: u64,
}

impl PlayerSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl SupervisorSettings {
    pub fn to_supervisor_config(&self) -> SupervisorConfig {
        let mut config = SupervisorConfig::new(&self.program)
            .args(self.args.iter().cloned())
            .restart_delay(Duration::from_millis(self.restart_delay_ms))
            .readiness(
                self.readiness_attempts,
                Duration::from_millis(self.readiness_interval_ms),
            );
        if let Some(dir) = &self.working_dir {
            config = config.working_dir(dir);
        }
        config
    }
}

impl ServerConfig {
    /// Load configuration from file and environment
    ///
    /// An explicitly given file must exist; the default `jukebox.toml` is
    /// optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        match path {
            Some(path) if !path.exists() => {
                return Err(ServerError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            Some(path) => {
                settings = settings.add_source(config::File::from(path));
            }
            None => {
                let default_path = PathBuf::from(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    settings = settings.add_source(config::File::from(default_path));
                }
            }
        }

        // Override with environment variables (e.g. JUKEBOX_PLAYER__BASE_URL)
        settings = settings.add_source(
            config::Environment::with_prefix("JUKEBOX")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(" ")
                .with_list_parse_key("supervisor.args"),
        );

        let config = settings
            .build()
            .map_err(|e| ServerError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| ServerError::Config(e.to_string()))
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ServerError::Config("Port must not be 0".to_string()));
        }

        let url = self.player.base_url.trim();
        if url.is_empty() {
            return Err(ServerError::Config(
                "Player URL is required (set JUKEBOX_PLAYER__BASE_URL)".to_string(),
            ));
        }
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(ServerError::Config(format!(
                "Player URL must start with http:// or https://, got {}",
                url
            )));
        }

        if self.player.timeout_secs == 0 {
            return Err(ServerError::Config(
                "Player timeout must be at least 1 second".to_string(),
            ));
        }

        for (name, route) in [
            ("music_route", &self.library.music_route),
            ("image_route", &self.library.image_route),
        ] {
            if !route.starts_with('/') || route == "/" || route.starts_with("/api") {
                return Err(ServerError::Config(format!(
                    "library.{} must be a path like /music, got {:?}",
                    name, route
                )));
            }
        }

        if self.supervisor.enabled && self.supervisor.program.as_os_str().is_empty() {
            return Err(ServerError::Config(
                "supervisor.program is required when supervision is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

// Default values
fn default_server() -> ServerSettings {
    ServerSettings {
        host: default_host(),
        port: default_port(),
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_library() -> LibrarySettings {
    LibrarySettings {
        music_dir: default_music_dir(),
        image_dir: default_image_dir(),
        web_dir: default_web_dir(),
        music_route: default_music_route(),
        image_route: default_image_route(),
    }
}

fn default_music_dir() -> PathBuf {
    PathBuf::from("./music")
}

fn default_image_dir() -> PathBuf {
    PathBuf::from("./image")
}

fn default_web_dir() -> PathBuf {
    PathBuf::from("./public")
}

fn default_music_route() -> String {
    "/music".to_string()
}

fn default_image_route() -> String {
    "/image".to_string()
}

fn default_player() -> PlayerSettings {
    PlayerSettings {
        base_url: default_base_url(),
        timeout_secs: default_timeout_secs(),
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_supervisor() -> SupervisorSettings {
    SupervisorSettings {
        enabled: default_enabled(),
        program: default_program(),
        args: default_args(),
        working_dir: None,
        restart_delay_ms: default_restart_delay_ms(),
        readiness_attempts: default_readiness_attempts(),
        readiness_interval_ms: default_readiness_interval_ms(),
    }
}

fn default_enabled() -> bool {
    true
}

fn default_program() -> PathBuf {
    PathBuf::from("python3")
}

fn default_args() -> Vec<String> {
    vec!["player_server.py".to_string()]
}

fn default_restart_delay_ms() -> u64 {
    2000
}

fn default_readiness_attempts() -> u32 {
    10
}

fn default_readiness_interval_ms() -> u64 {
    500
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            library: default_library(),
            player: default_player(),
            supervisor: default_supervisor(),
        }
    }
}
