use std::future::Future;
use std::time::Instant;

/// A response paired with how long it took to arrive
#[derive(Debug, Clone, PartialEq)]
pub struct TimedResponse<T> {
    /// Elapsed wall-clock time in milliseconds
    pub latency: f64,
    pub response: T,
}

/// Run an async operation and record its latency
///
/// The clock starts right before `operation` is invoked. The inner result is
/// returned untouched, failures included.
pub async fn measure_latency<F, Fut, T>(operation: F) -> TimedResponse<T>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = T>,
{
    let start = Instant::now();
    let response = operation().await;
    let latency = start.elapsed().as_secs_f64() * 1000.0;

    tracing::debug!(latency_ms = latency, "request completed");

    TimedResponse { latency, response }
}
