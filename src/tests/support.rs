use crate::{
    auction::{
        AuctionEnd, Bid, BidRequest, BidderRequest, InMemoryAuctionManager, MediaTypes,
        SharedBid, VideoContext, VideoMediaType,
    },
    config::TrackingConfig,
    event::Event,
    event_log::{self, InMemoryLog},
    rendered_ads::InMemoryRenderedAds,
    scheduler::ManualScheduler,
    service::ImpressionTracker,
};
use anyhow::Result;
use std::{sync::Arc, time::Duration};

pub fn cached_bid(request_id: &str, creative_id: &str) -> Bid {
    Bid {
        request_id: request_id.to_owned(),
        bidder_code: "appnexus".to_owned(),
        ad_unit_code: "video-1".to_owned(),
        creative_id: Some(creative_id.to_owned()),
        video_cache_key: Some(format!("cache-{request_id}")),
        cpm: 1.5,
        ..Default::default()
    }
}

pub fn request(bid_id: &str, context: Option<VideoContext>) -> BidderRequest {
    BidderRequest {
        bidder_code: "appnexus".to_owned(),
        auction_id: "auction-1".to_owned(),
        bids: vec![BidRequest {
            bid_id: bid_id.to_owned(),
            ad_unit_code: "video-1".to_owned(),
            media_types: MediaTypes {
                video: context.map(|context| VideoMediaType {
                    context: Some(context),
                    mimes: vec!["video/mp4".to_owned()],
                }),
            },
        }],
    }
}

pub fn instream_request(bid_id: &str) -> BidderRequest {
    request(bid_id, Some(VideoContext::Instream))
}

pub fn enabled_config(max_window_ms: u64, polling_freq_ms: u64) -> TrackingConfig {
    TrackingConfig {
        enabled: true,
        max_window_ms,
        polling_freq_ms,
    }
}

/// Everything a tracker talks to, as in-process doubles
pub struct Fixture {
    pub ads: Arc<InMemoryRenderedAds>,
    pub auction: Arc<InMemoryAuctionManager>,
    pub log: Arc<InMemoryLog>,
    pub scheduler: Arc<ManualScheduler>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            ads: InMemoryRenderedAds::new_shared(),
            auction: InMemoryAuctionManager::new_shared(),
            log: Arc::new(InMemoryLog::default()),
            scheduler: ManualScheduler::new_shared(),
        }
    }

    pub fn tracker(&self, config: TrackingConfig) -> ImpressionTracker {
        ImpressionTracker::new(
            config,
            Some(self.ads.clone()),
            self.auction.clone(),
            self.log.clone(),
            self.scheduler.clone(),
        )
    }

    pub fn advance_ms(&self, ms: u64) {
        self.scheduler.advance(Duration::from_millis(ms));
    }

    /// All events written to the bus so far
    pub fn events(&self) -> Result<Vec<Event>> {
        let reader: event_log::SharedReader = self.log.clone();
        Ok(reader
            .read(reader.get_start_offset()?, usize::MAX, Some(Duration::ZERO))?
            .data
            .into_iter()
            .map(|e| e.details)
            .collect())
    }
}

pub fn auction_end(bids: &[SharedBid], bidder_requests: Vec<BidderRequest>) -> AuctionEnd {
    AuctionEnd {
        auction_id: "auction-1".to_owned(),
        ad_units: vec![],
        bids_received: bids.to_vec(),
        bidder_requests,
    }
}
