use super::*;
use tokio::{runtime::Handle, time::Instant};

/// Scheduler backed by a tokio runtime
///
/// Drive it with a current-thread runtime to keep all passes on one
/// thread; tasks only make progress while that runtime is being polled.
#[derive(Clone, Debug)]
pub struct TokioScheduler {
    handle: Handle,
    epoch: Instant,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            epoch: Instant::now(),
        }
    }

    pub fn new_shared(handle: Handle) -> SharedScheduler {
        Arc::new(Self::new(handle))
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }

    fn after(&self, delay: Duration, task: Task) {
        self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
