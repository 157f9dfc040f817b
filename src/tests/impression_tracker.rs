use super::support::*;
use crate::{
    auction::{BidStatus, SharedBid, VideoContext},
    config::TrackingConfig,
    event::Event,
    event_log,
    rendered_ads::RenderedAd,
    service::{
        ImpressionTracker, LogFollowerService, NotStartedReason, ServiceControl, TrackingOutcome,
    },
    tracking::RunState,
};
use anyhow::Result;
use std::time::{Duration, Instant};

fn not_started(outcome: TrackingOutcome) -> Option<NotStartedReason> {
    match outcome {
        TrackingOutcome::NotStarted(reason) => Some(reason),
        TrackingOutcome::Started(_) => None,
    }
}

#[test]
fn disabled_tracker_schedules_nothing() {
    let fixture = Fixture::new();
    let bid = SharedBid::new(cached_bid("1", "ad-123"));

    let outcome = fixture
        .tracker(TrackingConfig::default())
        .track(&auction_end(&[bid], vec![instream_request("1")]));

    assert_eq!(not_started(outcome), Some(NotStartedReason::Disabled));
    assert_eq!(fixture.scheduler.pending(), 0);
}

#[test]
fn missing_sdk_schedules_nothing() {
    let fixture = Fixture::new();
    let bid = SharedBid::new(cached_bid("1", "ad-123"));
    let tracker = ImpressionTracker::new(
        enabled_config(1000, 500),
        None,
        fixture.auction.clone(),
        fixture.log.clone(),
        fixture.scheduler.clone(),
    );

    let outcome = tracker.track(&auction_end(&[bid], vec![instream_request("1")]));

    assert_eq!(not_started(outcome), Some(NotStartedReason::SdkUnavailable));
    assert_eq!(fixture.scheduler.pending(), 0);
}

#[test]
fn auction_without_candidates_schedules_nothing() {
    let fixture = Fixture::new();
    let bid = SharedBid::new(cached_bid("1", "ad-123"));

    let outcome = fixture.tracker(enabled_config(1000, 500)).track(&auction_end(
        &[bid],
        vec![request("1", Some(VideoContext::Outstream))],
    ));

    assert_eq!(not_started(outcome), Some(NotStartedReason::NoCandidates));
    assert_eq!(fixture.scheduler.pending(), 0);
}

#[test]
fn delivered_instream_bid_is_reported() -> Result<()> {
    let fixture = Fixture::new();
    let bid = SharedBid::new(cached_bid("1", "ad-123"));

    let outcome = fixture
        .tracker(enabled_config(1000, 500))
        .track(&auction_end(&[bid.clone()], vec![instream_request("1")]));
    assert!(outcome.is_started());
    let run = outcome.run().cloned().expect("started");

    fixture.ads.push(RenderedAd::new("123"));
    fixture.advance_ms(1000);

    assert_eq!(run.state(), RunState::Stopped);
    assert_eq!(run.passes(), 2);
    assert_eq!(run.matched(), 1);
    assert_eq!(bid.lock().status, BidStatus::Rendered);
    assert_eq!(fixture.auction.winning_bids(), vec![bid.snapshot()]);
    assert_eq!(fixture.events()?, vec![Event::BidWon(bid.snapshot())]);

    Ok(())
}

#[test]
fn concurrent_runs_do_not_claim_the_same_render() {
    let fixture = Fixture::new();
    let tracker = fixture.tracker(enabled_config(1000, 500));
    let first = SharedBid::new(cached_bid("1", "ad-123"));
    let second = SharedBid::new(cached_bid("2", "ad-123"));

    let run_a = tracker.track(&auction_end(&[first.clone()], vec![instream_request("1")]));
    let run_b = tracker.track(&auction_end(&[second.clone()], vec![instream_request("2")]));
    assert!(run_a.is_started() && run_b.is_started());

    fixture.ads.push(RenderedAd::new("123"));
    fixture.advance_ms(1000);

    assert_eq!(first.lock().status, BidStatus::Rendered);
    assert_eq!(second.lock().status, BidStatus::Pending);
    assert_eq!(fixture.auction.winning_bids().len(), 1);
}

#[test]
fn follows_auction_end_events_on_the_log() -> Result<()> {
    let fixture = Fixture::new();
    let bid = SharedBid::new(cached_bid("1", "ad-123"));
    fixture.ads.push(RenderedAd::new("123"));

    let writer: event_log::SharedWriter = fixture.log.clone();
    writer.write(&[Event::AuctionEnd(auction_end(
        &[bid.clone()],
        vec![instream_request("1")],
    ))])?;

    let svc_ctr = ServiceControl::new();
    let handle =
        svc_ctr.spawn_log_follower(fixture.tracker(enabled_config(1000, 500)), fixture.log.clone());

    // the follower thread only schedules the first pass
    let deadline = Instant::now() + Duration::from_secs(5);
    while fixture.scheduler.pending() == 0 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(10));
    }
    svc_ctr.stop_all();
    handle.join()?;

    assert_eq!(bid.lock().status, BidStatus::Pending);
    fixture.advance_ms(500);
    assert_eq!(bid.lock().status, BidStatus::Rendered);

    Ok(())
}

#[test]
fn ignores_unrelated_events() -> Result<()> {
    let fixture = Fixture::new();
    let mut tracker = fixture.tracker(enabled_config(1000, 500));

    tracker.handle_event(Event::Test)?;
    tracker.handle_event(Event::BidWon(cached_bid("1", "ad-1")))?;

    assert_eq!(fixture.scheduler.pending(), 0);
    Ok(())
}
