use core::{future::Future, time::Duration};

use crate::{
    FlakeId, Result,
    futures::{FlakeGeneratorAsyncExt, SleepProvider},
    generator::FlakeGenerator,
    time::TimeSource,
};

/// An implementation of [`SleepProvider`] using Tokio's timer.
///
/// This is the default provider for use in async applications built on Tokio.
pub struct TokioSleep;
impl SleepProvider for TokioSleep {
    async fn sleep_for(dur: Duration) {
        tokio::time::sleep(dur).await;
    }
}

/// An implementation of [`SleepProvider`] using Tokio's yield.
///
/// This strategy avoids timer-based delays by yielding to the scheduler
/// immediately, which can improve responsiveness in low-concurrency scenarios.
///
/// However, it comes at the cost of more frequent rescheduling, which can
/// result in tighter polling loops and increased CPU usage under load. In
/// highly concurrent cases, a timer-based sleep (e.g., [`TokioSleep`]) is often
/// more efficient due to reduced scheduler churn.
pub struct TokioYield;
impl SleepProvider for TokioYield {
    async fn sleep_for(_dur: Duration) {
        tokio::task::yield_now().await;
    }
}

/// Extension trait for asynchronously generating IDs on the
/// [`tokio`](https://docs.rs/tokio) runtime.
///
/// Uses [`TokioSleep`] as the sleep provider, so callers don't have to name
/// one.
pub trait FlakeGeneratorAsyncTokioExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available ID using
    /// [`TokioSleep`].
    ///
    /// # Errors
    ///
    /// Resolves to an error if the underlying generator fails.
    ///
    /// # Example
    /// ```
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// use safeflake::{
    ///     FlakeGeneratorAsyncTokioExt, GeneratorConfig, LockFlakeGenerator, SystemClock,
    /// };
    ///
    /// let config = GeneratorConfig::new(1_583_843_696_123).with_worker_id(1);
    /// let generator = LockFlakeGenerator::try_new(config, SystemClock).unwrap();
    /// let id = generator.generate().await.unwrap();
    /// assert_eq!(id.worker_id(), 1);
    /// # }
    /// ```
    fn generate(&self) -> impl Future<Output = Result<FlakeId>> + Send;
}

impl<G, T> FlakeGeneratorAsyncTokioExt<T> for G
where
    G: FlakeGenerator<T> + Sync,
    T: TimeSource,
{
    fn generate(&self) -> impl Future<Output = Result<FlakeId>> + Send {
        <Self as FlakeGeneratorAsyncExt<T>>::try_next_id_async::<TokioSleep>(self)
    }
}
