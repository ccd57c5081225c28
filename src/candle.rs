use crate::error::CandleError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Body of the candles endpoint: `{ "candles": [ { "start": "1761955200", ... } ] }`.
#[derive(Debug, Deserialize)]
pub struct CandlesResponse {
    #[serde(default)]
    pub candles: Vec<RawCandle>,
}

/// One candle exactly as the API returned it.
///
/// Every field is kept as text; numeric coercion happens during
/// normalization so a malformed value fails the run instead of the batch.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawCandle {
    #[serde(deserialize_with = "string_or_number")]
    pub start: String, // unix seconds
    #[serde(deserialize_with = "string_or_number")]
    pub low: String,
    #[serde(deserialize_with = "string_or_number")]
    pub high: String,
    #[serde(deserialize_with = "string_or_number")]
    pub open: String,
    #[serde(deserialize_with = "string_or_number")]
    pub close: String,
    #[serde(deserialize_with = "string_or_number")]
    pub volume: String,
}

/// A parsed one-minute OHLCV candle.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: DateTime<Utc>,
    pub low: f64,
    pub high: f64,
    pub open: f64,
    pub close: f64,
    pub volume: f64,
}

impl RawCandle {
    pub fn into_candle(self) -> Result<Candle, CandleError> {
        let secs: i64 = self
            .start
            .trim()
            .parse()
            .map_err(|_| CandleError::InvalidTimestamp(self.start.clone()))?;
        let timestamp = DateTime::<Utc>::from_timestamp(secs, 0)
            .ok_or_else(|| CandleError::InvalidTimestamp(self.start.clone()))?;

        Ok(Candle {
            timestamp,
            low: parse_field("low", &self.low)?,
            high: parse_field("high", &self.high)?,
            open: parse_field("open", &self.open)?,
            close: parse_field("close", &self.close)?,
            volume: parse_field("volume", &self.volume)?,
        })
    }
}

fn parse_field(field: &'static str, value: &str) -> Result<f64, CandleError> {
    value.trim().parse().map_err(|_| CandleError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

/// Fields are usually JSON strings, but plain numbers are accepted too.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrNumber;

    impl<'de> serde::de::Visitor<'de> for StringOrNumber {
        type Value = String;

        fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, v: &str) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_string<E>(self, v: String) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(v)
        }

        fn visit_i64<E>(self, v: i64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_u64<E>(self, v: u64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }

        fn visit_f64<E>(self, v: f64) -> Result<String, E>
        where
            E: serde::de::Error,
        {
            Ok(v.to_string())
        }
    }

    deserializer.deserialize_any(StringOrNumber)
}
