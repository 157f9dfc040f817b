//! Auction engine data model
//!
//! Bid records are owned by the auction engine. The tracker only reads them,
//! flips their status once they are matched against a delivered ad, and hands
//! them back through [`AuctionSink`].
mod in_memory;

pub use self::in_memory::*;

use anyhow::Result;
use parking_lot::{Mutex, MutexGuard};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type RequestId = String;
pub type RequestIdRef<'s> = &'s str;
pub type AuctionId = String;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BidStatus {
    #[default]
    Pending,
    TargetingSet,
    Rendered,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bid {
    pub request_id: RequestId,
    pub bidder_code: String,
    pub ad_unit_code: String,
    pub creative_id: Option<String>,
    pub vast_xml: Option<String>,
    pub video_cache_key: Option<String>,
    pub cpm: f64,
    pub status: BidStatus,
}

fn non_empty(s: &Option<String>) -> Option<&str> {
    s.as_deref().filter(|s| !s.is_empty())
}

impl Bid {
    pub fn creative_id(&self) -> Option<&str> {
        non_empty(&self.creative_id)
    }

    pub fn vast_xml(&self) -> Option<&str> {
        non_empty(&self.vast_xml)
    }

    pub fn video_cache_key(&self) -> Option<&str> {
        non_empty(&self.video_cache_key)
    }

    pub fn is_rendered(&self) -> bool {
        self.status == BidStatus::Rendered
    }
}

/// Handle to a bid record that stays owned by the auction engine
///
/// Equality is identity: two handles are equal only if they point
/// at the same record.
#[derive(Clone, Debug)]
pub struct SharedBid(Arc<Mutex<Bid>>);

impl SharedBid {
    pub fn new(bid: Bid) -> Self {
        Self(Arc::new(Mutex::new(bid)))
    }

    pub fn lock(&self) -> MutexGuard<'_, Bid> {
        self.0.lock()
    }

    pub fn snapshot(&self) -> Bid {
        self.lock().clone()
    }
}

impl PartialEq for SharedBid {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Eq for SharedBid {}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoContext {
    Instream,
    Outstream,
    Adpod,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VideoMediaType {
    pub context: Option<VideoContext>,
    pub mimes: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaTypes {
    pub video: Option<VideoMediaType>,
}

impl MediaTypes {
    pub fn video_context(&self) -> Option<VideoContext> {
        self.video.as_ref().and_then(|v| v.context)
    }
}

/// The request side of a single bid, as sent to one bidder
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BidRequest {
    pub bid_id: RequestId,
    pub ad_unit_code: String,
    pub media_types: MediaTypes,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BidderRequest {
    pub bidder_code: String,
    pub auction_id: AuctionId,
    pub bids: Vec<BidRequest>,
}

/// Find the request a bid was made for
pub fn find_bid_request<'a>(
    request_id: RequestIdRef,
    bidder_requests: &'a [BidderRequest],
) -> Option<&'a BidRequest> {
    bidder_requests
        .iter()
        .flat_map(|br| br.bids.iter())
        .find(|b| b.bid_id == request_id)
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdUnit {
    pub code: String,
}

/// Payload of the "auction completed" event
#[derive(Clone, Debug, PartialEq)]
pub struct AuctionEnd {
    pub auction_id: AuctionId,
    pub ad_units: Vec<AdUnit>,
    pub bids_received: Vec<SharedBid>,
    pub bidder_requests: Vec<BidderRequest>,
}

/// The parts of the auction engine notified when a bid turns out to be delivered
pub trait AuctionSink {
    fn add_winning_bid(&self, bid: &Bid) -> Result<()>;
    fn mark_winning_bid_as_used(&self, bid: &Bid) -> Result<()>;
}

pub type SharedAuctionSink = Arc<dyn AuctionSink + Send + Sync + 'static>;
