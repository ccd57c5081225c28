use crate::candle::{CandlesResponse, RawCandle};
use crate::config::{FetchConfig, Granularity};
use crate::error::FetchError;
use crate::fetcher::CandleSource;
use crate::window::TimeWindow;
use anyhow::Result;
use reqwest::header::ACCEPT;
use reqwest::Client;
use tracing::debug;
use url::Url;

/// Public market-data client for the Coinbase candles endpoint of one product.
#[derive(Debug, Clone)]
pub struct CoinbaseClient {
    http: Client,
    candles_url: Url,
    granularity: Granularity,
}

impl CoinbaseClient {
    /// Fails only when the configured base URL does not parse.
    pub fn new(config: &FetchConfig) -> Result<Self> {
        Ok(Self {
            http: Client::new(),
            candles_url: config.candles_url()?,
            granularity: config.granularity,
        })
    }

    pub fn candles_url(&self) -> &Url {
        &self.candles_url
    }

    /// Fetch a single batch of candles between `start` and `end` (epoch seconds, inclusive).
    /// Candles come back in API order, usually newest first.
    pub async fn fetch_candle_batch(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Vec<RawCandle>, FetchError> {
        let response = self
            .http
            .get(self.candles_url.clone())
            .header(ACCEPT, "application/json")
            .query(&[
                ("start", start),
                ("end", end),
                ("granularity", self.granularity.as_api_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status { status, body });
        }

        let body: CandlesResponse = response.json().await?;
        debug!(count = body.candles.len(), start, end, "received candle batch");
        Ok(body.candles)
    }
}

impl CandleSource for CoinbaseClient {
    async fn fetch_batch(&self, window: TimeWindow) -> Result<Vec<RawCandle>, FetchError> {
        self.fetch_candle_batch(&window.start_ts(), &window.end_ts())
            .await
    }
}
