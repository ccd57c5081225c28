use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use coinbase_candles::{run, CoinbaseClient, FetchConfig, NoDelay, RunOutcome};
use serde_json::{json, Value};
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const CANDLES_PATH: &str = "/api/v3/brokerage/market/products/BTC-USD/candles";

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 11, 1, 0, 0, 0).unwrap()
}

fn candle(ts: DateTime<Utc>, close: &str) -> Value {
    json!({
        "start": ts.timestamp().to_string(),
        "low": "109000.00",
        "high": "110000.00",
        "open": "109500.00",
        "close": close,
        "volume": "1.25"
    })
}

/// One candle per minute over `[from, to]`, newest first.
fn minute_candles(from: DateTime<Utc>, to: DateTime<Utc>) -> Value {
    let mut out = Vec::new();
    let mut ts = to;
    while ts >= from {
        out.push(candle(ts, "109900.00"));
        ts -= TimeDelta::minutes(1);
    }
    json!({ "candles": out })
}

fn config_for(server: &MockServer, dir: &tempfile::TempDir, hours: i64) -> FetchConfig {
    FetchConfig::default()
        .with_base_url(format!("{}/api/v3/brokerage/market/products", server.uri()))
        .with_range(start(), start() + TimeDelta::hours(hours))
        .with_output_dir(dir.path())
}

#[tokio::test]
async fn five_hours_land_in_one_csv_without_gaps() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir, 5);

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .and(query_param("start", "1761955200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(minute_candles(
            start(),
            start() + TimeDelta::minutes(299),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let client = CoinbaseClient::new(&config).unwrap();
    let outcome = run(&config, &client, &NoDelay).await.unwrap();

    let expected_path = dir
        .path()
        .join("BTC-USD_OHLCV_1min_20251101_0000_20251101_0500.csv");
    assert_eq!(
        outcome,
        RunOutcome::Written {
            path: expected_path.clone(),
            rows: 300
        }
    );

    let text = std::fs::read_to_string(&expected_path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines[0], "timestamp,low,high,open,close,volume");
    assert_eq!(lines.len(), 301);
    assert!(lines[1].starts_with("2025-11-01 00:00:00,"));
    assert!(lines[300].starts_with("2025-11-01 04:59:00,"));

    for (i, line) in lines[1..].iter().enumerate() {
        let expected = (start() + TimeDelta::minutes(i as i64))
            .format("%Y-%m-%d %H:%M:%S")
            .to_string();
        assert!(line.starts_with(&expected), "row {i}: {line}");
    }
}

#[tokio::test]
async fn failed_batch_is_skipped_and_overlaps_are_removed() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir, 10);

    // first window fails
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .and(query_param("start", "1761955200"))
        .respond_with(ResponseTemplate::new(503).set_body_string("unavailable"))
        .expect(1)
        .mount(&server)
        .await;

    // second window starts at 05:00 and answers out of order with a repeat
    let five = start() + TimeDelta::hours(5);
    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .and(query_param("start", "1761973200"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candles": [
                candle(five + TimeDelta::minutes(2), "3"),
                candle(five, "1"),
                candle(five + TimeDelta::minutes(1), "2"),
                candle(five, "1"),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = CoinbaseClient::new(&config).unwrap();
    let outcome = run(&config, &client, &NoDelay).await.unwrap();

    let RunOutcome::Written { path: file, rows } = outcome.clone() else {
        panic!("expected a written file, got {outcome:?}");
    };
    assert_eq!(rows, 3);

    let text = std::fs::read_to_string(file).unwrap();
    let timestamps: Vec<&str> = text
        .lines()
        .skip(1)
        .map(|l| l.split(',').next().unwrap())
        .collect();
    assert_eq!(
        timestamps,
        vec![
            "2025-11-01 05:00:00",
            "2025-11-01 05:01:00",
            "2025-11-01 05:02:00"
        ]
    );
}

#[tokio::test]
async fn all_empty_batches_write_nothing() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir, 24);

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candles": [] })))
        .expect(5)
        .mount(&server)
        .await;

    let client = CoinbaseClient::new(&config).unwrap();
    let outcome = run(&config, &client, &NoDelay).await.unwrap();

    assert_eq!(outcome, RunOutcome::NoCandles);
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn malformed_price_aborts_the_run() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir, 1);

    Mock::given(method("GET"))
        .and(path(CANDLES_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candles": [candle(start(), "not-a-price")]
        })))
        .mount(&server)
        .await;

    let client = CoinbaseClient::new(&config).unwrap();
    let result = run(&config, &client, &NoDelay).await;

    assert!(result.is_err());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
