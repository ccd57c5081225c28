use crate::config::FetchConfig;
use crate::data_storage::{candles_to_dataframe, normalize_series, parse_candles, save_dataframe_csv};
use crate::fetcher::{fetch_all, CandleSource, Pacer};
use crate::utils::measure_time_async;
use anyhow::Result;
use std::path::PathBuf;
use tracing::info;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Every batch came back empty or failed; nothing was written.
    NoCandles,
    Written { path: PathBuf, rows: usize },
}

/// Fetch the configured range, normalize it and write the CSV file.
pub async fn run<S, P>(config: &FetchConfig, source: &S, pacer: &P) -> Result<RunOutcome>
where
    S: CandleSource,
    P: Pacer,
{
    info!(
        "Fetching {} OHLCV data from {} to {} with {} granularity...",
        config.product_id,
        config.start,
        config.end,
        config.granularity.as_api_str()
    );

    let raw = measure_time_async("Fetching candles", fetch_all(source, config, pacer)).await;
    if raw.is_empty() {
        info!("No candles fetched.");
        return Ok(RunOutcome::NoCandles);
    }

    let candles = parse_candles(raw)?;
    let mut df = normalize_series(candles_to_dataframe(&candles)?)?;

    let path = config.output_path();
    save_dataframe_csv(&mut df, &path)?;

    let rows = df.height();
    info!(
        "Successfully downloaded {} candles and saved to {}",
        rows,
        path.display()
    );
    Ok(RunOutcome::Written { path, rows })
}
