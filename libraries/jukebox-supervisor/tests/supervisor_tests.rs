//! Supervisor lifecycle tests
//!
//! These spawn real (short-lived) unix processes.
#![cfg(unix)]

use jukebox_supervisor::{ProcessState, Supervisor, SupervisorConfig, SupervisorError};
use std::os::unix::fs::PermissionsExt;
use std::process::Command;
use std::time::Duration;

const RESTART_DELAY: Duration = Duration::from_millis(100);

/// A process that stays up until killed
fn sleeper() -> SupervisorConfig {
    SupervisorConfig::new("sleep")
        .args(["30"])
        .restart_delay(RESTART_DELAY)
        .readiness(1, Duration::from_millis(20))
}

/// A process that exits on its own shortly after starting
fn crasher() -> SupervisorConfig {
    SupervisorConfig::new("sh")
        .args(["-c", "echo starting; echo failing >&2; sleep 0.2; exit 3"])
        .restart_delay(RESTART_DELAY)
        .readiness(1, Duration::from_millis(20))
}

async fn wait_for_state(supervisor: &Supervisor, wanted: ProcessState) {
    let mut rx = supervisor.subscribe();
    tokio::time::timeout(Duration::from_secs(5), rx.wait_for(|state| *state == wanted))
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {}", wanted))
        .expect("state channel closed");
}

async fn wait_for_spawns(supervisor: &Supervisor, count: u64) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while supervisor.spawn_count() < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("never reached {} spawns", count));
}

/// `kill -0` succeeds only for a live, unreaped process
fn is_alive(pid: u32) -> bool {
    Command::new("kill")
        .args(["-0", &pid.to_string()])
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

#[tokio::test]
async fn test_start_reaches_running() {
    let supervisor = Supervisor::new(sleeper());

    supervisor.start().await.unwrap();
    assert_eq!(supervisor.state(), ProcessState::Starting);
    assert!(supervisor.pid().await.is_some());

    wait_for_state(&supervisor, ProcessState::Running).await;

    supervisor.shutdown().await;
    assert_eq!(supervisor.state(), ProcessState::Stopped);
    assert!(supervisor.pid().await.is_none());
}

#[tokio::test]
async fn test_concurrent_start_spawns_once() {
    let supervisor = Supervisor::new(sleeper());

    let (a, b) = tokio::join!(supervisor.start(), supervisor.start());
    a.unwrap();
    b.unwrap();

    assert_eq!(supervisor.spawn_count(), 1);

    // Starting again while running is a no-op as well
    wait_for_state(&supervisor, ProcessState::Running).await;
    supervisor.start().await.unwrap();
    assert_eq!(supervisor.spawn_count(), 1);

    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_exited_process_is_restarted() {
    let supervisor = Supervisor::new(crasher());
    supervisor.start().await.unwrap();
    let first_pid = supervisor.pid().await;

    wait_for_state(&supervisor, ProcessState::Restarting).await;
    assert!(supervisor.pid().await.is_none());

    wait_for_spawns(&supervisor, 2).await;
    let second_pid = supervisor.pid().await;
    assert!(second_pid.is_some());
    assert_ne!(first_pid, second_pid);

    supervisor.shutdown().await;
    assert_eq!(supervisor.state(), ProcessState::Stopped);
}

#[tokio::test]
async fn test_shutdown_does_not_restart() {
    let supervisor = Supervisor::new(sleeper());
    supervisor.start().await.unwrap();
    wait_for_state(&supervisor, ProcessState::Running).await;

    supervisor.shutdown().await;
    tokio::time::sleep(RESTART_DELAY * 3).await;

    assert_eq!(supervisor.state(), ProcessState::Stopped);
    assert_eq!(supervisor.spawn_count(), 1);
}

#[tokio::test]
async fn test_start_after_shutdown_rearms() {
    let supervisor = Supervisor::new(sleeper());
    supervisor.start().await.unwrap();
    supervisor.shutdown().await;

    supervisor.start().await.unwrap();
    assert_eq!(supervisor.spawn_count(), 2);
    wait_for_state(&supervisor, ProcessState::Running).await;

    supervisor.shutdown().await;
}

#[tokio::test]
async fn test_spawn_failure_schedules_retry() {
    let dir = tempfile::TempDir::new().unwrap();
    let program = dir.path().join("player.sh");

    let config = SupervisorConfig::new(&program).restart_delay(RESTART_DELAY);
    let supervisor = Supervisor::new(config);

    match supervisor.start().await {
        Err(SupervisorError::Spawn { program, .. }) => {
            assert!(program.ends_with("player.sh"));
        }
        other => panic!("Expected Spawn error, got: {:?}", other),
    }
    assert_eq!(supervisor.state(), ProcessState::Restarting);
    assert_eq!(supervisor.spawn_count(), 0);

    // A start while the retry is pending does not jump the queue
    supervisor.start().await.unwrap();
    assert_eq!(supervisor.spawn_count(), 0);

    // The program shows up before the retry fires
    std::fs::write(&program, "#!/bin/sh\nexec sleep 30\n").unwrap();
    std::fs::set_permissions(&program, std::fs::Permissions::from_mode(0o755)).unwrap();

    wait_for_spawns(&supervisor, 1).await;
    assert!(supervisor.pid().await.is_some());

    supervisor.shutdown().await;
    assert_eq!(supervisor.state(), ProcessState::Stopped);
}

#[tokio::test]
async fn test_start_during_shutdown_waits_for_reap() {
    let supervisor = Supervisor::new(sleeper());
    supervisor.start().await.unwrap();
    wait_for_state(&supervisor, ProcessState::Running).await;
    let old_pid = supervisor.pid().await.unwrap();

    let stopping = supervisor.clone();
    let shutdown = tokio::spawn(async move { stopping.shutdown().await });

    // Shutdown has begun but the old process may not be reaped yet
    wait_for_state(&supervisor, ProcessState::Stopped).await;
    supervisor.start().await.unwrap();

    assert!(!is_alive(old_pid), "old process {} still running", old_pid);
    let new_pid = supervisor.pid().await.unwrap();
    assert_ne!(old_pid, new_pid);
    assert_eq!(supervisor.spawn_count(), 2);

    shutdown.await.unwrap();
    supervisor.shutdown().await;
    assert!(!is_alive(new_pid));
}

#[tokio::test]
async fn test_shutdown_when_never_started() {
    let supervisor = Supervisor::new(sleeper());
    supervisor.shutdown().await;
    assert_eq!(supervisor.state(), ProcessState::Stopped);
}
