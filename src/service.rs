pub mod bid_won_logger;
pub mod impression_tracker;

pub use self::{bid_won_logger::*, impression_tracker::*};
use crate::{
    event::Event,
    event_log::{self, WithOffset},
};
use anyhow::{bail, format_err, Result};
use std::{
    sync::{
        atomic::{self, AtomicBool, Ordering},
        Arc,
    },
    thread,
    time::Duration,
};
use tracing::error;

pub type ServiceId = String;

/// A service that handles events on the log
pub trait LogFollowerService: Send + Sync {
    fn service_id(&self) -> ServiceId;

    fn handle_event(&mut self, event: Event) -> Result<()>;
}

/// Service execution control instance
///
/// All services are basically a loop, and we would like to be able to
/// gracefully terminate them, and handle and top-level error of any
/// of them by gracefully stopping everything else.
#[derive(Clone, Default)]
pub struct ServiceControl {
    stop_all: Arc<AtomicBool>,
}

impl ServiceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop_all(&self) {
        self.stop_all.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.stop_all.load(Ordering::SeqCst)
    }

    /// Follow the log from its start, feeding every event to `service`
    pub fn spawn_log_follower(
        &self,
        mut service: impl LogFollowerService + 'static,
        event_reader: event_log::SharedReader,
    ) -> JoinHandle {
        let service_id = service.service_id();
        let mut progress = match event_reader.get_start_offset() {
            Ok(offset) => offset,
            // Fail the same way a failure inside the loop would.
            Err(e) => {
                return JoinHandle::new(
                    Arc::new(AtomicBool::new(false)),
                    thread::spawn(move || Err(e)),
                )
            }
        };

        self.spawn_loop_raw(service_id.clone(), move || {
            let WithOffset {
                offset: new_offset,
                data: events,
            } = event_reader.read(progress, 1, Some(Duration::from_secs(1)))?;

            for event in events {
                service.handle_event(event.details)?;
            }
            progress = new_offset;
            Ok(())
        })
    }

    /// Start a new service as a loop, with a certain body
    ///
    /// This will take care of checking termination condition and
    /// handling any errors returned by `f`
    fn spawn_loop_raw<F>(&self, service_id: ServiceId, mut f: F) -> JoinHandle
    where
        F: FnMut() -> Result<()> + Send + 'static,
    {
        let stop = Arc::new(AtomicBool::new(false));

        JoinHandle::new(
            stop.clone(),
            thread::spawn({
                let stop_all = self.stop_all.clone();
                move || match std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                    while !stop.load(atomic::Ordering::SeqCst)
                        && !stop_all.load(atomic::Ordering::SeqCst)
                    {
                        if let Err(e) = f() {
                            error!(service = %service_id, error = %e, "service failed");
                            stop_all.store(true, atomic::Ordering::SeqCst);
                            return Err(e);
                        }
                    }
                    Ok(())
                })) {
                    Err(_e) => {
                        stop_all.store(true, atomic::Ordering::SeqCst);
                        bail!("service {} panicked", service_id);
                    }
                    Ok(res) => res,
                }
            }),
        )
    }
}

/// Simple thread join wrapper that joins the thread on drop
pub struct JoinHandle {
    stop: Arc<AtomicBool>,
    thread: Option<thread::JoinHandle<Result<()>>>,
}

impl JoinHandle {
    fn new(stop: Arc<AtomicBool>, handle: thread::JoinHandle<Result<()>>) -> Self {
        JoinHandle {
            stop,
            thread: Some(handle),
        }
    }

    fn join_mut(&mut self) -> Result<()> {
        if let Some(h) = self.thread.take() {
            h.join().map_err(|e| format_err!("join failed: {:?}", e))?
        } else {
            Ok(())
        }
    }

    pub fn join(mut self) -> Result<()> {
        self.join_mut()
    }
}

impl Drop for JoinHandle {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::SeqCst);
        if let Err(e) = self.join_mut() {
            error!(error = %e, "service thread failed");
        }
    }
}
