//! Normalization of the accumulated candles and CSV persistence.

use crate::candle::{Candle, RawCandle};
use anyhow::Result;
use polars::prelude::*;
use std::fs::File;
use std::path::Path;

/// Output columns, in file order.
pub const CSV_COLUMNS: [&str; 6] = ["timestamp", "low", "high", "open", "close", "volume"];

/// Parse every raw record. The first malformed field aborts the whole run.
pub fn parse_candles(raw: Vec<RawCandle>) -> Result<Vec<Candle>> {
    let candles = raw
        .into_iter()
        .map(RawCandle::into_candle)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(candles)
}

/// Convert a slice of Candles into a Polars DataFrame (timestamp as epoch seconds).
pub fn candles_to_dataframe(candles: &[Candle]) -> Result<DataFrame> {
    let start: Vec<i64> = candles.iter().map(|c| c.timestamp.timestamp()).collect();
    let low: Vec<f64> = candles.iter().map(|c| c.low).collect();
    let high: Vec<f64> = candles.iter().map(|c| c.high).collect();
    let open: Vec<f64> = candles.iter().map(|c| c.open).collect();
    let close: Vec<f64> = candles.iter().map(|c| c.close).collect();
    let volume: Vec<f64> = candles.iter().map(|c| c.volume).collect();

    let df = df!(
        "start" => start,
        "low" => low,
        "high" => high,
        "open" => open,
        "close" => close,
        "volume" => volume,
    )?;
    Ok(df)
}

/// Drop duplicate timestamps (first occurrence wins), sort ascending and
/// render `timestamp` as `YYYY-MM-DD HH:MM:SS` UTC.
pub fn normalize_series(df: DataFrame) -> Result<DataFrame> {
    let df = df
        .lazy()
        .unique_stable(Some(vec!["start".to_string()]), UniqueKeepStrategy::First)
        .sort(vec!["start"], Default::default())
        .select([
            (col("start") * lit(1000i64))
                .cast(DataType::Datetime(TimeUnit::Milliseconds, None))
                .dt()
                .strftime("%Y-%m-%d %H:%M:%S")
                .alias("timestamp"),
            col("low"),
            col("high"),
            col("open"),
            col("close"),
            col("volume"),
        ])
        .collect()?;
    Ok(df)
}

/// Save a DataFrame to a CSV file with a header row (overwrites).
pub fn save_dataframe_csv(df: &mut DataFrame, path: &Path) -> Result<()> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}
