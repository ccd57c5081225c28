//! The fetch loop: walks the planned windows, requests each one and
//! accumulates whatever comes back.

use crate::candle::RawCandle;
use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::window::{TimeWindow, WindowPlanner};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Anything that can return the raw candles for one window.
pub trait CandleSource {
    fn fetch_batch(
        &self,
        window: TimeWindow,
    ) -> impl Future<Output = Result<Vec<RawCandle>, FetchError>> + Send;
}

/// Pause taken between two consecutive requests.
pub trait Pacer {
    fn pause(&self) -> impl Future<Output = ()> + Send;
}

/// Sleeps for a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay(pub Duration);

impl Pacer for FixedDelay {
    async fn pause(&self) {
        tokio::time::sleep(self.0).await;
    }
}

/// Never waits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDelay;

impl Pacer for NoDelay {
    async fn pause(&self) {}
}

/// Request every window of the configured range and collect all records.
///
/// A failed batch is logged and counted as empty; the cursor advances
/// regardless, so the loop always terminates.
pub async fn fetch_all<S, P>(source: &S, config: &FetchConfig, pacer: &P) -> Vec<RawCandle>
where
    S: CandleSource,
    P: Pacer,
{
    let mut all = Vec::new();
    let mut failed = 0usize;
    let mut windows = WindowPlanner::new(config).peekable();
    let mut batch_num = 0;

    while let Some(window) = windows.next() {
        batch_num += 1;
        info!("Fetching batch {} from {}...", batch_num, window);

        let candles = match source.fetch_batch(window).await {
            Ok(candles) => candles,
            Err(error) => {
                warn!(%error, batch = batch_num, "Error fetching data");
                failed += 1;
                Vec::new()
            }
        };

        debug!(
            batch = batch_num,
            fetched = candles.len(),
            total = all.len() + candles.len(),
            "batch done"
        );
        all.extend(candles);

        // Be nice to the API
        if windows.peek().is_some() {
            pacer.pause().await;
        }
    }

    info!(
        "Fetched {} raw candles in {} batches ({} failed).",
        all.len(),
        batch_num,
        failed
    );
    all
}
