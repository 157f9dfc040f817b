use super::*;
use parking_lot::Mutex;

/// Rendered-ad list living in this process
///
/// The SDK side appends with [`InMemoryRenderedAds::push`].
#[derive(Default, Debug)]
pub struct InMemoryRenderedAds {
    ads: Mutex<Vec<RenderedAd>>,
}

impl InMemoryRenderedAds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn push(&self, ad: RenderedAd) {
        self.ads.lock().push(ad);
    }

    pub fn len(&self) -> usize {
        self.ads.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderedAdSource for InMemoryRenderedAds {
    fn snapshot(&self) -> Vec<RenderedAd> {
        self.ads.lock().clone()
    }

    fn consume(&self, ad: &RenderedAd) -> bool {
        let mut ads = self.ads.lock();
        match ads.iter().position(|a| a == ad) {
            Some(i) => {
                ads.remove(i);
                true
            }
            None => false,
        }
    }
}
