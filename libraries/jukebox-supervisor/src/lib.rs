//! Jukebox Supervisor
//!
//! Owns the lifecycle of the external player process:
//!
//! ```text
//! Stopped -> Starting -> Running -> Stopped -> Restarting -> Starting -> ...
//! ```
//!
//! - [`Supervisor::start`] spawns the process unless one is already starting,
//!   running or about to be restarted. Concurrent calls never spawn twice.
//! - The process is `Running` once a [`ReadinessProbe`] succeeds (or, with
//!   no probe, after a settle delay). A process that never becomes ready is
//!   killed and restarted.
//! - Any exit of the process schedules exactly one restart after a fixed
//!   delay.
//! - [`Supervisor::shutdown`] kills the process and stops supervising it.
//!
//! Output of the child is forwarded line by line to `tracing` under the
//! `jukebox_supervisor::child` target and is never interpreted.

mod config;
mod error;
mod output;
mod probe;
mod state;
mod supervisor;

pub use config::SupervisorConfig;
pub use error::{Result, SupervisorError};
pub use probe::ReadinessProbe;
pub use state::ProcessState;
pub use supervisor::Supervisor;
