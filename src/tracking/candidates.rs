use crate::auction::{find_bid_request, BidderRequest, SharedBid, VideoContext};

/// Bids that may still get attributed to an instream render
///
/// Only instream video bids whose creative went to the cache (rather than
/// being rendered right away) qualify. Bids without a matching request are
/// dropped.
pub fn select_candidates(bids: &[SharedBid], bidder_requests: &[BidderRequest]) -> Vec<SharedBid> {
    bids.iter()
        .filter(|shared| {
            let bid = shared.lock();
            find_bid_request(&bid.request_id, bidder_requests)
                .map(|req| req.media_types.video_context() == Some(VideoContext::Instream))
                .unwrap_or(false)
                && bid.video_cache_key().is_some()
        })
        .cloned()
        .collect()
}
