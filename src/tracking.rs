//! Instream delivery tracking
//!
//! There is no direct link between a bid won in the page auction and an ad
//! later played by the video player's ad SDK. After an auction completes we
//! poll the SDK's list of rendered ads for a bounded time, attribute renders
//! to pending instream bids by (loose) identifier matching, and report each
//! match exactly once as a won bid.
mod candidates;
mod matcher;
mod run;

pub use self::{candidates::*, matcher::*, run::*};
