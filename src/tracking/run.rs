use super::matches;
use crate::{
    auction::{Bid, BidStatus, SharedAuctionSink, SharedBid},
    config::TrackingConfig,
    event::Event,
    event_log,
    rendered_ads::{RenderedAd, SharedRenderedAdSource},
    scheduler::SharedScheduler,
};
use parking_lot::Mutex;
use std::{sync::Arc, time::Duration};
use tracing::{debug, info, warn};

/// Floor for the polling interval; a zero interval would never let time advance
pub const MIN_POLLING_FREQ: Duration = Duration::from_millis(1);

/// Lifecycle of a [`ReconciliationRun`]
///
/// `Idle -> Scheduled -> Running -> Scheduled | Stopped`. `Stopped` is final.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum RunState {
    #[default]
    Idle,
    Scheduled,
    Running,
    Stopped,
}

#[derive(Default, Debug)]
struct RunProgress {
    state: RunState,
    passes: u64,
    matched: usize,
}

/// Read-only view of a run in flight
///
/// A run cannot be stopped from outside; it ends when its window elapses.
#[derive(Clone, Debug, Default)]
pub struct RunHandle(Arc<Mutex<RunProgress>>);

impl RunHandle {
    pub fn state(&self) -> RunState {
        self.0.lock().state
    }

    /// Number of completed poll passes
    pub fn passes(&self) -> u64 {
        self.0.lock().passes
    }

    /// Number of bids reported as won so far
    pub fn matched(&self) -> usize {
        self.0.lock().matched
    }

    fn set_state(&self, state: RunState) {
        self.0.lock().state = state;
    }
}

/// One bounded polling session, created per completed auction
pub struct ReconciliationRun {
    started_at: Duration,
    max_window: Duration,
    polling_freq: Duration,
    candidates: Vec<SharedBid>,
    ads: SharedRenderedAdSource,
    auction: SharedAuctionSink,
    event_writer: event_log::SharedWriter,
    scheduler: SharedScheduler,
    progress: RunHandle,
}

impl ReconciliationRun {
    pub fn new(
        config: &TrackingConfig,
        candidates: Vec<SharedBid>,
        ads: SharedRenderedAdSource,
        auction: SharedAuctionSink,
        event_writer: event_log::SharedWriter,
        scheduler: SharedScheduler,
    ) -> Self {
        Self {
            started_at: scheduler.now(),
            max_window: config.max_window(),
            polling_freq: config.polling_freq().max(MIN_POLLING_FREQ),
            candidates,
            ads,
            auction,
            event_writer,
            scheduler,
            progress: RunHandle::default(),
        }
    }

    pub fn handle(&self) -> RunHandle {
        self.progress.clone()
    }

    /// Schedule the first pass and return right away
    pub fn start(self) -> RunHandle {
        let handle = self.handle();
        debug!(
            candidates = self.candidates.len(),
            max_window = ?self.max_window,
            "starting delivery tracking"
        );
        self.schedule_next();
        handle
    }

    fn schedule_next(self) {
        self.progress.set_state(RunState::Scheduled);
        let scheduler = self.scheduler.clone();
        let delay = self.polling_freq;
        scheduler.after(delay, Box::new(move || self.poll()));
    }

    fn poll(self) {
        self.progress.set_state(RunState::Running);
        let matched = self.run_pass();
        {
            let mut progress = self.progress.0.lock();
            progress.passes += 1;
            progress.matched += matched;
        }

        // The next pass must still land at or before the window boundary.
        let elapsed = self.scheduler.now().saturating_sub(self.started_at);
        if elapsed + self.polling_freq <= self.max_window {
            self.schedule_next();
        } else {
            debug!(
                passes = self.progress.passes(),
                matched = self.progress.matched(),
                "delivery tracking window elapsed"
            );
            self.progress.set_state(RunState::Stopped);
        }
    }

    /// Attribute every currently rendered ad to at most one candidate
    ///
    /// Returns the number of bids reported as won in this pass.
    pub fn run_pass(&self) -> usize {
        let mut matched = 0;

        for ad in self.ads.snapshot() {
            if let Some(bid) = self.claim(&ad) {
                self.report(&bid);
                if !self.ads.consume(&ad) {
                    debug!(ad_id = %ad.ad_id, "rendered ad already removed from the list");
                }
                matched += 1;
            }
        }

        matched
    }

    /// Mark the first unrendered candidate matching `ad` as rendered
    fn claim(&self, ad: &RenderedAd) -> Option<Bid> {
        self.candidates.iter().find_map(|shared| {
            let mut bid = shared.lock();
            if bid.is_rendered() || !matches(&bid, ad) {
                return None;
            }
            bid.status = BidStatus::Rendered;
            Some(bid.clone())
        })
    }

    fn report(&self, bid: &Bid) {
        info!(
            request_id = %bid.request_id,
            bidder = %bid.bidder_code,
            creative_id = ?bid.creative_id,
            "instream bid delivered"
        );

        if let Err(e) = self.auction.add_winning_bid(bid) {
            warn!(request_id = %bid.request_id, error = %e, "failed to add winning bid");
        }
        if let Err(e) = self.event_writer.write(&[Event::BidWon(bid.clone())]) {
            warn!(request_id = %bid.request_id, error = %e, "failed to emit bid won");
        }
        if let Err(e) = self.auction.mark_winning_bid_as_used(bid) {
            warn!(request_id = %bid.request_id, error = %e, "failed to mark bid as used");
        }
    }
}
