/// Shared application state
use jukebox_library::LibraryScanner;
use jukebox_player_client::PlayerControl;
use jukebox_supervisor::Supervisor;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Outcome of the most recent status probe against the player.
///
/// Written by `/api/status`, `/api/health` and the supervisor's readiness
/// polling; read by `/api/health`. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct ProbeStatus(Arc<AtomicBool>);

impl ProbeStatus {
    pub fn record(&self, ok: bool) {
        self.0.store(ok, Ordering::Relaxed);
    }

    pub fn last_ok(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub scanner: Arc<LibraryScanner>,
    pub player: Arc<dyn PlayerControl>,
    /// `None` when the player process is managed outside this server
    pub supervisor: Option<Supervisor>,
    pub probe_status: ProbeStatus,
}

impl AppState {
    pub fn new(
        scanner: Arc<LibraryScanner>,
        player: Arc<dyn PlayerControl>,
        supervisor: Option<Supervisor>,
        probe_status: ProbeStatus,
    ) -> Self {
        Self {
            scanner,
            player,
            supervisor,
            probe_status,
        }
    }
}
