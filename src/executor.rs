//! Bounded blocking pool for CPU-heavy calls.
//!
//! Work runs on tokio's blocking threads; a semaphore caps how many run at once
//! and an optional timeout bounds how long a caller waits.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::Semaphore;

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("worker task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("worker task timed out after {0:?}")]
    Timeout(Duration),

    #[error("executor is shut down")]
    Closed,
}

#[derive(Clone)]
pub struct Executor {
    permits: Arc<Semaphore>,
    timeout: Option<Duration>,
}

impl Executor {
    pub fn new(workers: usize, timeout: Option<Duration>) -> Self {
        Self {
            permits: Arc::new(Semaphore::new(workers.max(1))),
            timeout,
        }
    }

    /// Run `job` off the async scheduler and await its result.
    ///
    /// The timeout covers both waiting for a free worker and the job itself. On
    /// timeout the blocking thread is left to finish on its own; its result is dropped.
    pub async fn run<F, T>(&self, job: F) -> Result<T, ExecutorError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let permits = Arc::clone(&self.permits);
        let work = async move {
            let permit = permits
                .acquire_owned()
                .await
                .map_err(|_| ExecutorError::Closed)?;

            let handle = tokio::task::spawn_blocking(move || {
                let _permit = permit;
                job()
            });
            Ok::<T, ExecutorError>(handle.await?)
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, work)
                .await
                .map_err(|_| ExecutorError::Timeout(limit))?,
            None => work.await,
        }
    }
}
