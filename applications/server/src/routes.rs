/// HTTP router
use crate::{api, config::LibrarySettings, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{DefaultMakeSpan, TraceLayer},
};

/// Build the full application: JSON API under `/api`, the audio and cover
/// trees under their routes, and the web UI for everything else.
pub fn create_router(app_state: AppState, library: &LibrarySettings) -> Router {
    let api_routes = Router::new()
        .route("/songs", get(api::songs::list_songs))
        .route("/play", post(api::playback::play))
        .route("/pause", post(api::playback::pause))
        .route("/resume", post(api::playback::resume))
        .route("/stop", post(api::playback::stop))
        .route("/volume", post(api::playback::set_volume))
        .route("/status", get(api::status::status))
        .route("/health", get(api::health::health));

    // Read-only asset trees
    let web = ServeDir::new(&library.web_dir).append_index_html_on_directories(true);

    Router::new()
        .nest("/api", api_routes)
        .nest_service(&library.music_route, ServeDir::new(&library.music_dir))
        .nest_service(&library.image_route, ServeDir::new(&library.image_dir))
        .fallback_service(web)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::default().include_headers(true)),
        )
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
