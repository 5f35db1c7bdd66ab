/// Player process supervisor
use crate::{
    config::SupervisorConfig,
    error::{Result, SupervisorError},
    output::{forward_lines, OutputStream},
    probe::ReadinessProbe,
    state::ProcessState,
};
use std::process::Stdio;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use tokio::{
    process::{Child, Command},
    sync::{watch, Mutex},
    task::JoinHandle,
};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Supervisor for the external player process.
///
/// Cloning gives another handle to the same supervisor; there is only ever
/// one process per supervisor. Every state change happens while holding the
/// internal slot lock; `start` and `shutdown` are additionally serialized so a
/// new process is never spawned before the previous one has been reaped.
#[derive(Clone)]
pub struct Supervisor {
    inner: Arc<Inner>,
}

struct Inner {
    config: SupervisorConfig,
    probe: Option<Arc<dyn ReadinessProbe>>,
    /// Held by `start` and for the whole of `shutdown`, reaping included.
    /// Background tasks only take `slot`.
    lifecycle: Mutex<()>,
    slot: Mutex<Slot>,
    state_tx: watch::Sender<ProcessState>,
    spawn_count: AtomicU64,
}

#[derive(Default)]
struct Slot {
    /// Bumped on every spawn so tasks of an old process can tell they are stale
    generation: u64,
    child: Option<ChildHandle>,
    restart: Option<JoinHandle<()>>,
    shutting_down: bool,
}

struct ChildHandle {
    pid: Option<u32>,
    /// Cancelling kills the process
    kill: CancellationToken,
    monitor: JoinHandle<()>,
}

impl Supervisor {
    /// Create a supervisor that trusts a fixed settle delay for readiness
    pub fn new(config: SupervisorConfig) -> Self {
        Self::build(config, None)
    }

    /// Create a supervisor that only declares `Running` once `probe` succeeds
    pub fn with_probe(config: SupervisorConfig, probe: Arc<dyn ReadinessProbe>) -> Self {
        Self::build(config, Some(probe))
    }

    fn build(config: SupervisorConfig, probe: Option<Arc<dyn ReadinessProbe>>) -> Self {
        let (state_tx, _) = watch::channel(ProcessState::Stopped);
        Self {
            inner: Arc::new(Inner {
                config,
                probe,
                lifecycle: Mutex::new(()),
                slot: Mutex::new(Slot::default()),
                state_tx,
                spawn_count: AtomicU64::new(0),
            }),
        }
    }

    /// Spawn the player process unless one is already starting, running, or
    /// scheduled for restart.
    ///
    /// On spawn failure a retry is scheduled before the error is returned.
    /// Waits for an in-progress `shutdown` to finish first.
    pub async fn start(&self) -> Result<()> {
        let _lifecycle = self.inner.lifecycle.lock().await;
        let mut slot = self.inner.slot.lock().await;

        let state = self.state();
        if state.is_active() {
            debug!(state = %state, "Player process already supervised");
            return Ok(());
        }

        slot.shutting_down = false;
        Inner::spawn_locked(&self.inner, &mut slot)
    }

    /// Kill the player process and stop supervising it.
    ///
    /// Waits until the process has been reaped. Any pending restart is
    /// cancelled.
    pub async fn shutdown(&self) {
        let _lifecycle = self.inner.lifecycle.lock().await;

        let handle = {
            let mut slot = self.inner.slot.lock().await;
            slot.shutting_down = true;
            if let Some(restart) = slot.restart.take() {
                restart.abort();
            }
            self.inner.set_state(ProcessState::Stopped);
            slot.child.take()
        };

        let Some(handle) = handle else {
            return;
        };

        info!(pid = ?handle.pid, "Stopping player process");
        handle.kill.cancel();
        if let Err(e) = handle.monitor.await {
            warn!(error = %e, "Player monitor task ended abnormally");
        }
    }

    pub fn state(&self) -> ProcessState {
        *self.inner.state_tx.borrow()
    }

    /// Watch state transitions
    pub fn subscribe(&self) -> watch::Receiver<ProcessState> {
        self.inner.state_tx.subscribe()
    }

    /// OS pid of the current process, if one is alive
    pub async fn pid(&self) -> Option<u32> {
        let slot = self.inner.slot.lock().await;
        slot.child.as_ref().and_then(|child| child.pid)
    }

    /// Number of processes spawned since creation
    pub fn spawn_count(&self) -> u64 {
        self.inner.spawn_count.load(Ordering::SeqCst)
    }
}

impl Inner {
    fn set_state(&self, next: ProcessState) {
        let previous = self.state_tx.send_replace(next);
        if previous != next {
            info!(from = %previous, to = %next, "Player process state changed");
        }
    }

    fn state(&self) -> ProcessState {
        *self.state_tx.borrow()
    }

    /// Spawn a new process. Caller holds the slot lock.
    fn spawn_locked(inner: &Arc<Inner>, slot: &mut Slot) -> Result<()> {
        let config = &inner.config;

        let mut command = Command::new(&config.program);
        command
            .args(&config.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &config.working_dir {
            command.current_dir(dir);
        }

        let mut child = match command.spawn() {
            Ok(child) => child,
            Err(source) => {
                let program = config.program.display().to_string();
                error!(program = %program, error = %source, "Failed to spawn player process");
                Inner::schedule_restart(inner, slot);
                return Err(SupervisorError::Spawn { program, source });
            }
        };

        slot.generation += 1;
        let generation = slot.generation;
        inner.spawn_count.fetch_add(1, Ordering::SeqCst);

        let pid = child.id();
        info!(
            pid = ?pid,
            program = %config.program.display(),
            "Player process spawned"
        );

        if let Some(stdout) = child.stdout.take() {
            tokio::spawn(forward_lines(stdout, pid, OutputStream::Stdout));
        }
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_lines(stderr, pid, OutputStream::Stderr));
        }

        inner.set_state(ProcessState::Starting);

        let kill = CancellationToken::new();
        let monitor = tokio::spawn(Inner::monitor(
            Arc::clone(inner),
            child,
            generation,
            kill.clone(),
        ));
        tokio::spawn(Inner::await_readiness(
            Arc::clone(inner),
            generation,
            kill.clone(),
        ));

        slot.child = Some(ChildHandle { pid, kill, monitor });
        Ok(())
    }

    /// Set `Restarting` and spawn again after the restart delay. Caller holds
    /// the slot lock.
    fn schedule_restart(inner: &Arc<Inner>, slot: &mut Slot) {
        inner.set_state(ProcessState::Restarting);

        let delay = inner.config.restart_delay;
        info!(delay = ?delay, "Scheduling player restart");

        if let Some(previous) = slot.restart.take() {
            previous.abort();
        }

        let task_inner = Arc::clone(inner);
        slot.restart = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let mut slot = task_inner.slot.lock().await;
            if slot.shutting_down || task_inner.state() != ProcessState::Restarting {
                return;
            }
            // Detach ourselves so a failed spawn can schedule a fresh retry
            slot.restart = None;

            // Failures are logged and rescheduled inside spawn_locked
            let _ = Inner::spawn_locked(&task_inner, &mut slot);
        }));
    }

    /// Wait for the process to exit (or be killed), then schedule a restart
    /// unless shutting down.
    async fn monitor(
        inner: Arc<Inner>,
        mut child: Child,
        generation: u64,
        kill: CancellationToken,
    ) {
        let pid = child.id();

        let status = tokio::select! {
            status = child.wait() => status,
            () = kill.cancelled() => {
                if let Err(e) = child.start_kill() {
                    warn!(pid = ?pid, error = %e, "Failed to kill player process");
                }
                child.wait().await
            }
        };

        // Stops the readiness poll for this process
        kill.cancel();

        match &status {
            Ok(status) => info!(pid = ?pid, status = %status, "Player process exited"),
            Err(e) => warn!(pid = ?pid, error = %e, "Lost track of player process"),
        }

        let mut slot = inner.slot.lock().await;
        if slot.generation != generation {
            return;
        }

        slot.child = None;
        inner.set_state(ProcessState::Stopped);

        if !slot.shutting_down {
            Inner::schedule_restart(&inner, &mut slot);
        }
    }

    /// Poll the readiness probe and move `Starting -> Running`. Kills the
    /// process if it never becomes ready.
    async fn await_readiness(inner: Arc<Inner>, generation: u64, kill: CancellationToken) {
        let interval = inner.config.readiness_interval;

        let Some(probe) = inner.probe.clone() else {
            tokio::select! {
                () = kill.cancelled() => return,
                () = tokio::time::sleep(interval) => {}
            }
            inner.mark_running(generation).await;
            return;
        };

        let attempts = inner.config.readiness_attempts;
        for attempt in 1..=attempts {
            tokio::select! {
                () = kill.cancelled() => return,
                () = tokio::time::sleep(interval) => {}
            }

            match probe.probe().await {
                Ok(()) => {
                    inner.mark_running(generation).await;
                    return;
                }
                Err(cause) => {
                    debug!(attempt, attempts, cause = %cause, "Player not ready yet");
                }
            }
        }

        let slot = inner.slot.lock().await;
        if slot.generation == generation && inner.state() == ProcessState::Starting {
            warn!(attempts, "Player never became ready, killing it");
            kill.cancel();
        }
    }

    async fn mark_running(&self, generation: u64) {
        let slot = self.slot.lock().await;
        if slot.generation == generation && self.state() == ProcessState::Starting {
            self.set_state(ProcessState::Running);
        }
    }
}
