use anyhow::Result;
use coinbase_candles::{run, CoinbaseClient, FetchConfig, FixedDelay};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = FetchConfig::default();
    let client = CoinbaseClient::new(&config)?;
    let pacer = FixedDelay(config.request_delay);

    run(&config, &client, &pacer).await?;
    Ok(())
}
