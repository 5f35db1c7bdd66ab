/// Lifecycle states of the supervised process
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessState {
    /// No process, no restart pending
    #[default]
    Stopped,
    /// Spawned, waiting for readiness
    Starting,
    Running,
    /// Process gone, a restart is scheduled
    Restarting,
}

impl ProcessState {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Starting => "starting",
            Self::Running => "running",
            Self::Restarting => "restarting",
        }
    }

    /// Whether a process exists or is about to. `start()` is a no-op then.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !matches!(self, Self::Stopped)
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
