/// Common test utilities and fixtures
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use jukebox_library::LibraryScanner;
use jukebox_player_client::{PlayerClient, PlayerClientConfig, PlayerControl};
use jukebox_server::{config::LibrarySettings, create_router, AppState, ProbeStatus};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tower::util::ServiceExt;

/// Throwaway music, image and web directories
pub struct TestDirs {
    pub root: TempDir,
}

impl TestDirs {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        for dir in ["music", "image", "public"] {
            std::fs::create_dir(root.path().join(dir)).unwrap();
        }
        std::fs::write(
            root.path().join("public/index.html"),
            "<html><body>jukebox</body></html>",
        )
        .unwrap();
        Self { root }
    }

    pub fn music(&self) -> std::path::PathBuf {
        self.root.path().join("music")
    }

    pub fn image(&self) -> std::path::PathBuf {
        self.root.path().join("image")
    }

    pub fn add_song(&self, name: &str) {
        std::fs::write(self.music().join(name), b"ID3").unwrap();
    }

    pub fn add_cover(&self, name: &str) {
        std::fs::write(self.image().join(name), b"\x89PNG").unwrap();
    }

    pub fn library_settings(&self) -> LibrarySettings {
        LibrarySettings {
            music_dir: self.music(),
            image_dir: self.image(),
            web_dir: self.root.path().join("public"),
            music_route: "/music".to_string(),
            image_route: "/image".to_string(),
        }
    }
}

/// Build the full router against a player at `player_url`, without a
/// supervised process.
pub fn create_test_app(dirs: &TestDirs, player_url: &str) -> (Router, ProbeStatus) {
    let settings = dirs.library_settings();

    let scanner = LibraryScanner::new(&settings.music_dir, &settings.image_dir)
        .with_music_route(&settings.music_route)
        .with_image_route(&settings.image_route);

    let client_config =
        PlayerClientConfig::new(player_url).with_timeout(Duration::from_millis(500));
    let player: Arc<dyn PlayerControl> = Arc::new(PlayerClient::new(client_config).unwrap());

    let probe_status = ProbeStatus::default();
    let app_state = AppState::new(Arc::new(scanner), player, None, probe_status.clone());

    (create_router(app_state, &settings), probe_status)
}

/// An address nothing listens on
pub const UNREACHABLE_PLAYER: &str = "http://127.0.0.1:1";

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

pub async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

pub async fn post_json(app: &Router, uri: &str, body: impl Into<Body>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .unwrap();
    let (status, body) = send(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

