/// Supervisor configuration
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// Executable to run
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,

    /// Wait between an exit (or failed spawn) and the next spawn
    pub restart_delay: Duration,

    /// How many readiness probes to try before giving up on a process
    pub readiness_attempts: u32,

    /// Wait before each readiness probe; also the settle delay when no
    /// probe is configured
    pub readiness_interval: Duration,
}

impl SupervisorConfig {
    pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_secs(2);
    pub const DEFAULT_READINESS_ATTEMPTS: u32 = 10;
    pub const DEFAULT_READINESS_INTERVAL: Duration = Duration::from_millis(500);

    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            restart_delay: Self::DEFAULT_RESTART_DELAY,
            readiness_attempts: Self::DEFAULT_READINESS_ATTEMPTS,
            readiness_interval: Self::DEFAULT_READINESS_INTERVAL,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }

    pub fn readiness(mut self, attempts: u32, interval: Duration) -> Self {
        self.readiness_attempts = attempts.max(1);
        self.readiness_interval = interval;
        self
    }
}
