//! Runtime settings shared by the CLI and the server.

use std::path::PathBuf;
use std::time::Duration;

use crate::executor::Executor;

#[derive(Debug, Clone)]
pub struct Settings {
    /// State directory holding core.json and config_entries.json.
    pub home: PathBuf,
    /// Maximum concurrent lookups on the blocking pool.
    pub workers: usize,
    /// Lookup timeout; `None` waits forever.
    pub lookup_timeout: Option<Duration>,
}

impl Settings {
    /// `lookup_timeout_secs == 0` disables the timeout.
    pub fn new(home: Option<PathBuf>, workers: usize, lookup_timeout_secs: u64) -> Self {
        Self {
            home: home.unwrap_or_else(crate::host::default_home),
            workers: workers.max(1),
            lookup_timeout: (lookup_timeout_secs > 0).then(|| Duration::from_secs(lookup_timeout_secs)),
        }
    }

    pub fn executor(&self) -> Executor {
        Executor::new(self.workers, self.lookup_timeout)
    }
}
