//! Small timing helper for logging.

use std::future::Future;
use std::time::Instant;
use tracing::info;

/// Await `f` and log how long it took under `label`.
pub async fn measure_time_async<F, T>(label: &str, f: F) -> T
where
    F: Future<Output = T>,
{
    let start = Instant::now();
    let result = f.await;
    let elapsed = start.elapsed();
    info!("{} took: {:.2} ms", label, elapsed.as_secs_f64() * 1000.0);
    result
}
