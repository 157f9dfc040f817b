//! Deferred task execution
//!
//! Poll passes never run inline: every pass is handed to a [`Scheduler`]
//! to be fired after the polling interval. The tracker only ever needs
//! "run this later" and "what time is it", which lets tests swap the
//! real timer for a simulated clock.
#[cfg(test)]
mod manual;
mod runtime;

#[cfg(test)]
pub use self::manual::*;
pub use self::runtime::*;

use std::sync::Arc;
use std::time::Duration;

pub type Task = Box<dyn FnOnce() + Send + 'static>;

pub trait Scheduler {
    /// Monotonic time since this scheduler's epoch
    fn now(&self) -> Duration;

    /// Run `task` once, no earlier than `delay` from now
    fn after(&self, delay: Duration, task: Task);
}

pub type SharedScheduler = Arc<dyn Scheduler + Send + Sync + 'static>;
