use super::*;
use parking_lot::Mutex;
use std::{cmp::Reverse, collections::BinaryHeap};

struct Pending {
    due: Duration,
    seq: u64,
    task: Task,
}

impl Pending {
    fn key(&self) -> Reverse<(Duration, u64)> {
        Reverse((self.due, self.seq))
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key().cmp(&other.key())
    }
}

#[derive(Default)]
struct ManualSchedulerInner {
    now: Duration,
    next_seq: u64,
    queue: BinaryHeap<Pending>,
}

/// Simulated clock; time only moves on [`ManualScheduler::advance`]
#[derive(Default)]
pub struct ManualScheduler {
    inner: Mutex<ManualSchedulerInner>,
}

impl ManualScheduler {
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn pending(&self) -> usize {
        self.inner.lock().queue.len()
    }

    /// Move the clock forward by `by`, firing every task that falls due
    ///
    /// Tasks scheduled by fired tasks are fired too if they fall due
    /// within the same window.
    pub fn advance(&self, by: Duration) {
        let target = self.inner.lock().now + by;

        loop {
            let task = {
                let mut inner = self.inner.lock();
                if !inner.queue.peek().map_or(false, |p| p.due <= target) {
                    inner.now = target;
                    return;
                }
                let p = inner.queue.pop().expect("peeked");
                inner.now = p.due;
                p.task
            };
            // lock released: the task may schedule more work
            task();
        }
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.inner.lock().now
    }

    fn after(&self, delay: Duration, task: Task) {
        let mut inner = self.inner.lock();
        let due = inner.now + delay;
        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.queue.push(Pending { due, seq, task });
    }
}
