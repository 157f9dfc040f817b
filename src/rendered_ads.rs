//! Ads reported as rendered by the video player's ad SDK
//!
//! The SDK owns the list and keeps mutating it. We read it on every
//! poll pass and remove the entries we have attributed to a bid, so
//! no other run can claim the same render. There is a single writer
//! assumption here: nothing else removes entries between passes.
mod in_memory;

pub use self::in_memory::*;

use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderedAd {
    pub ad_id: String,
    /// Ids of the ad-server redirects that led to this ad, outermost first
    pub ad_wrapper_ids: Vec<String>,
}

impl RenderedAd {
    pub fn new(ad_id: impl Into<String>) -> Self {
        Self {
            ad_id: ad_id.into(),
            ad_wrapper_ids: vec![],
        }
    }

    pub fn with_wrappers<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ad_wrapper_ids = ids.into_iter().map(Into::into).collect();
        self
    }

    /// Primary id followed by the wrapper ids
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.ad_id.as_str()).chain(self.ad_wrapper_ids.iter().map(String::as_str))
    }
}

pub trait RenderedAdSource {
    /// Current contents of the list, in the SDK's order
    fn snapshot(&self) -> Vec<RenderedAd>;

    /// Remove the first entry equal to `ad`; `false` if it is already gone
    fn consume(&self, ad: &RenderedAd) -> bool;
}

pub type SharedRenderedAdSource = Arc<dyn RenderedAdSource + Send + Sync + 'static>;
