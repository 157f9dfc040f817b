use super::*;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Default)]
struct InMemoryAuctionManagerInner {
    winning_bids: Vec<Bid>,
    used: BTreeSet<RequestId>,
}

/// In-process auction engine state
///
/// Useful for unit-tests.
#[derive(Default)]
pub struct InMemoryAuctionManager {
    inner: Mutex<InMemoryAuctionManagerInner>,
}

impl InMemoryAuctionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn winning_bids(&self) -> Vec<Bid> {
        self.inner.lock().winning_bids.clone()
    }

    pub fn is_used(&self, request_id: RequestIdRef) -> bool {
        self.inner.lock().used.contains(request_id)
    }
}

impl AuctionSink for InMemoryAuctionManager {
    fn add_winning_bid(&self, bid: &Bid) -> Result<()> {
        debug!(request_id = %bid.request_id, "adding winning bid");
        self.inner.lock().winning_bids.push(bid.clone());
        Ok(())
    }

    fn mark_winning_bid_as_used(&self, bid: &Bid) -> Result<()> {
        self.inner.lock().used.insert(bid.request_id.clone());
        Ok(())
    }
}
