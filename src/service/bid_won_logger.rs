use super::*;
use tracing::info;

pub const BID_WON_LOGGER_SERVICE_ID: &str = "bid-won-logger";

/// Logs every won bid that shows up on the bus
#[derive(Default)]
pub struct BidWonLogger {
    seen: u64,
}

impl BidWonLogger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LogFollowerService for BidWonLogger {
    fn service_id(&self) -> ServiceId {
        BID_WON_LOGGER_SERVICE_ID.to_owned()
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::BidWon(bid) = event {
            self.seen += 1;
            info!(
                request_id = %bid.request_id,
                bidder = %bid.bidder_code,
                ad_unit = %bid.ad_unit_code,
                cpm = bid.cpm,
                total = self.seen,
                "bid won"
            );
        }
        Ok(())
    }
}
