mod auction;
mod config;
mod event;
mod event_log;
mod rendered_ads;
mod scheduler;
mod service;
mod tracking;

use anyhow::Result;
use std::{path::PathBuf, time::Duration};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = config::Config::load(config_path.as_deref())?;

    // Poll passes are confined to this single thread.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;

    let scheduler = scheduler::TokioScheduler::new_shared(runtime.handle().clone());
    let (event_writer, event_reader) = event_log::new_in_memory_shared();
    let auction_manager = auction::InMemoryAuctionManager::new_shared();
    let rendered_ads = rendered_ads::InMemoryRenderedAds::new_shared();

    let svc_ctr = service::ServiceControl::new();

    ctrlc::set_handler({
        let svc_ctr = svc_ctr.clone();
        move || {
            eprintln!("Stopping all services...");
            svc_ctr.stop_all();
        }
    })?;

    let handles = vec![
        svc_ctr.spawn_log_follower(
            service::ImpressionTracker::new(
                config.instream_tracking.clone(),
                Some(rendered_ads),
                auction_manager,
                event_writer,
                scheduler,
            ),
            event_reader.clone(),
        ),
        svc_ctr.spawn_log_follower(service::BidWonLogger::new(), event_reader),
    ];

    runtime.block_on({
        let svc_ctr = svc_ctr.clone();
        async move {
            while !svc_ctr.is_stopped() {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
    });

    for handle in handles {
        handle.join()?
    }

    Ok(())
}
