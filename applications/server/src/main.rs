/// Jukebox Server - music library browser and player remote control
use clap::{Parser, Subcommand};
use jukebox_library::LibraryScanner;
use jukebox_player_client::{PlayerClient, PlayerClientConfig, PlayerControl};
use jukebox_server::{
    config::ServerConfig, create_router, services::PlayerProbe, state::AppState, ProbeStatus,
};
use jukebox_supervisor::Supervisor;
use std::{net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jukebox-server")]
#[command(about = "Jukebox music library and player remote control", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server and the player process
    Serve {
        /// Configuration file path
        #[arg(short, long, env = "JUKEBOX_CONFIG")]
        config: Option<PathBuf>,
    },
    /// Scan a directory for music files and print them as JSON
    Scan {
        /// Directory to scan (defaults to the configured music directory)
        path: Option<PathBuf>,

        /// Configuration file path
        #[arg(short, long, env = "JUKEBOX_CONFIG")]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "jukebox_server=info,jukebox_supervisor=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Scan { path, config } => {
            scan_directory(path, config).await?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Jukebox Server");
    tracing::info!("Music directory: {}", config.library.music_dir.display());
    tracing::info!("Player endpoint: {}", config.player.base_url);

    // Player client
    let client_config =
        PlayerClientConfig::new(config.player.base_url.clone()).with_timeout(config.player.timeout());
    let player: Arc<dyn PlayerControl> = Arc::new(PlayerClient::new(client_config)?);

    // Library scanner
    let scanner = LibraryScanner::new(&config.library.music_dir, &config.library.image_dir)
        .with_music_route(&config.library.music_route)
        .with_image_route(&config.library.image_route);
    let scanner = Arc::new(scanner);

    let probe_status = ProbeStatus::default();

    // Create server address
    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    // Bind before spawning the player so a taken port leaves no orphan behind
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    // Player process supervision
    let supervisor = if config.supervisor.enabled {
        let probe = PlayerProbe::new(Arc::clone(&player), probe_status.clone());
        let supervisor = Supervisor::with_probe(
            config.supervisor.to_supervisor_config(),
            Arc::new(probe),
        );
        // Spawn failures are retried by the supervisor itself
        if let Err(e) = supervisor.start().await {
            tracing::error!("Player process failed to start: {}", e);
        }
        Some(supervisor)
    } else {
        tracing::info!("Player supervision disabled");
        None
    };

    // Build application state and router
    let app_state = AppState::new(scanner, player, supervisor.clone(), probe_status);
    let app = create_router(app_state, &config.library);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(supervisor) = supervisor {
        supervisor.shutdown().await;
    }
    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

async fn scan_directory(path: Option<PathBuf>, config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?;
    let music_dir = path.unwrap_or_else(|| config.library.music_dir.clone());

    let scanner = LibraryScanner::new(music_dir, &config.library.image_dir)
        .with_music_route(&config.library.music_route)
        .with_image_route(&config.library.image_route);

    let tracks = tokio::task::spawn_blocking(move || scanner.scan()).await??;
    tracing::info!("Found {} tracks", tracks.len());

    println!("{}", serde_json::to_string_pretty(&tracks)?);

    Ok(())
}
