use crate::{auction::Bid, rendered_ads::RenderedAd};

/// Does `ad` look like the render of `bid`?
///
/// Tried in order, first hit wins:
///
/// 1. the bid's creative id contains the ad id,
/// 2. the bid's creative id contains one of the wrapper ids,
/// 3. the bid's VAST markup carries one of those ids, either as an
///    `<Ad id=...>` attribute (either quote style) or as a bare `=<id>`.
///
/// All checks are substring checks: delivered markup often embeds ids
/// inside longer tokens, so `"123"` matches creative `"ad-123"` and also
/// `"ad-91234"`. The one exception to that looseness is empty ids: they
/// are skipped, since an empty id is contained in every creative id and
/// would turn `=<id>` into a bare `=` that matches almost any markup.
pub fn matches(bid: &Bid, ad: &RenderedAd) -> bool {
    if let Some(creative_id) = bid.creative_id() {
        if contains_id(creative_id, &ad.ad_id) {
            return true;
        }

        if ad
            .ad_wrapper_ids
            .iter()
            .any(|id| contains_id(creative_id, id))
        {
            return true;
        }
    }

    if let Some(vast_xml) = bid.vast_xml() {
        return ad
            .ids()
            .filter(|id| !id.is_empty())
            .any(|id| markup_mentions(vast_xml, id));
    }

    false
}

fn contains_id(haystack: &str, id: &str) -> bool {
    !id.is_empty() && haystack.contains(id)
}

fn markup_mentions(vast_xml: &str, id: &str) -> bool {
    // NOTE: the bare `=<id>` form hits any attribute or query parameter
    // ending in that value, not just `<Ad>` tags.
    vast_xml.contains(&format!("<Ad id='{id}'>"))
        || vast_xml.contains(&format!("<Ad id=\"{id}\">"))
        || vast_xml.contains(&format!("={id}"))
}
