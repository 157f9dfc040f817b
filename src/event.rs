use crate::auction::{AuctionEnd, Bid};

/// Everything that travels over the global event bus
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// An auction completed; carries its bids and requests
    AuctionEnd(AuctionEnd),
    /// A bid was confirmed as delivered
    BidWon(Bid),
    #[cfg(test)]
    Test,
}
