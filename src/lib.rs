//! Download historical one-minute OHLCV candles for one Coinbase product
//! and store them as a sorted, duplicate-free CSV file.

pub mod candle;
pub mod coinbase_client;
pub mod config;
pub mod data_storage;
pub mod error;
pub mod fetcher;
pub mod pipeline;
pub mod utils;
pub mod window;

pub use candle::{Candle, RawCandle};
pub use coinbase_client::CoinbaseClient;
pub use config::{FetchConfig, Granularity};
pub use error::{CandleError, FetchError};
pub use fetcher::{fetch_all, CandleSource, FixedDelay, NoDelay, Pacer};
pub use pipeline::{run, RunOutcome};
pub use window::{TimeWindow, WindowPlanner};
