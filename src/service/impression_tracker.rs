//! Impression Tracker
//!
//! Listens for completed auctions and, for those with instream video bids
//! held in the cache, starts a [`ReconciliationRun`] against the ad SDK's
//! rendered-ad list.
use super::*;
use crate::{
    auction::{AuctionEnd, SharedAuctionSink},
    config::TrackingConfig,
    rendered_ads::SharedRenderedAdSource,
    scheduler::SharedScheduler,
    tracking::{select_candidates, ReconciliationRun, RunHandle},
};
use tracing::trace;

pub const IMPRESSION_TRACKER_SERVICE_ID: &str = "impression-tracker";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotStartedReason {
    Disabled,
    SdkUnavailable,
    NoCandidates,
}

#[derive(Debug)]
pub enum TrackingOutcome {
    Started(RunHandle),
    NotStarted(NotStartedReason),
}

impl TrackingOutcome {
    pub fn is_started(&self) -> bool {
        matches!(self, TrackingOutcome::Started(_))
    }

    pub fn run(&self) -> Option<&RunHandle> {
        match self {
            TrackingOutcome::Started(run) => Some(run),
            TrackingOutcome::NotStarted(_) => None,
        }
    }
}

pub struct ImpressionTracker {
    config: TrackingConfig,
    /// `None` when the ad SDK is not loaded
    ads: Option<SharedRenderedAdSource>,
    auction: SharedAuctionSink,
    event_writer: event_log::SharedWriter,
    scheduler: SharedScheduler,
}

impl ImpressionTracker {
    pub fn new(
        config: TrackingConfig,
        ads: Option<SharedRenderedAdSource>,
        auction: SharedAuctionSink,
        event_writer: event_log::SharedWriter,
        scheduler: SharedScheduler,
    ) -> Self {
        Self {
            config,
            ads,
            auction,
            event_writer,
            scheduler,
        }
    }

    /// Start tracking delivery of the auction's instream bids
    ///
    /// Never blocks: the first pass is only scheduled.
    pub fn track(&self, auction: &AuctionEnd) -> TrackingOutcome {
        use NotStartedReason::*;

        if !self.config.enabled {
            return TrackingOutcome::NotStarted(Disabled);
        }
        let Some(ads) = self.ads.clone() else {
            return TrackingOutcome::NotStarted(SdkUnavailable);
        };

        let candidates = select_candidates(&auction.bids_received, &auction.bidder_requests);
        if candidates.is_empty() {
            trace!(auction_id = %auction.auction_id, "no instream candidates");
            return TrackingOutcome::NotStarted(NoCandidates);
        }

        let run = ReconciliationRun::new(
            &self.config,
            candidates,
            ads,
            self.auction.clone(),
            self.event_writer.clone(),
            self.scheduler.clone(),
        );
        TrackingOutcome::Started(run.start())
    }
}

impl LogFollowerService for ImpressionTracker {
    fn service_id(&self) -> ServiceId {
        IMPRESSION_TRACKER_SERVICE_ID.to_owned()
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::AuctionEnd(auction) = event {
            self.track(&auction);
        }
        Ok(())
    }
}
