//! Run configuration: product, date range, endpoint and pacing.

use chrono::{DateTime, TimeDelta, Utc};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const BASE_URL: &str = "https://api.coinbase.com/api/v3/brokerage/market/products";
pub const PRODUCT_ID: &str = "BTC-USD";

/// 2025-11-01 00:00:00 UTC
const START_SECS: i64 = 1_761_955_200;
/// 2025-12-01 00:00:00 UTC
const END_SECS: i64 = 1_764_547_200;

/// Polite delay between two consecutive batch requests.
const REQUEST_DELAY: Duration = Duration::from_millis(100);

/// Maximum number of candles the API returns for one request.
const MAX_CANDLES_PER_REQUEST: i64 = 300;

/// Candle bucket width. Only one-minute candles are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Granularity {
    #[default]
    OneMinute,
}

impl Granularity {
    /// Value of the `granularity` query parameter.
    pub fn as_api_str(&self) -> &'static str {
        match self {
            Granularity::OneMinute => "ONE_MINUTE",
        }
    }

    pub fn seconds(&self) -> i64 {
        match self {
            Granularity::OneMinute => 60,
        }
    }

    /// Short label used in output file names.
    pub fn label(&self) -> &'static str {
        match self {
            Granularity::OneMinute => "1min",
        }
    }

    pub fn step(&self) -> TimeDelta {
        TimeDelta::seconds(self.seconds())
    }
}

/// Immutable settings for one fetch run.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub base_url: String,
    pub product_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub granularity: Granularity,
    pub request_delay: Duration,
    pub output_dir: PathBuf,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: BASE_URL.to_string(),
            product_id: PRODUCT_ID.to_string(),
            start: DateTime::UNIX_EPOCH + TimeDelta::seconds(START_SECS),
            end: DateTime::UNIX_EPOCH + TimeDelta::seconds(END_SECS),
            granularity: Granularity::OneMinute,
            request_delay: REQUEST_DELAY,
            output_dir: PathBuf::from("."),
        }
    }
}

impl FetchConfig {
    pub fn with_range(mut self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Widest window (in minutes) that still fits in one request.
    ///
    /// One candle short of the cap because both window bounds are inclusive.
    pub fn max_batch_minutes(&self) -> i64 {
        let per_minute = self.granularity.seconds() / 60;
        ((MAX_CANDLES_PER_REQUEST - 1) * per_minute).max(1)
    }

    /// e.g. `BTC-USD_OHLCV_1min_20251101_0000_20251201_0000.csv`
    pub fn output_filename(&self) -> String {
        format!(
            "{}_OHLCV_{}_{}_{}.csv",
            self.product_id,
            self.granularity.label(),
            self.start.format("%Y%m%d_%H%M"),
            self.end.format("%Y%m%d_%H%M")
        )
    }

    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(self.output_filename())
    }

    /// Full candles endpoint for the configured product.
    pub fn candles_url(&self) -> Result<Url, url::ParseError> {
        Url::parse(&format!(
            "{}/{}/candles",
            self.base_url.trim_end_matches('/'),
            self.product_id
        ))
    }
}
