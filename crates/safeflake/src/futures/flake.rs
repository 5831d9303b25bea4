use core::{future::Future, time::Duration};

use super::SleepProvider;
use crate::{
    FlakeId, Result,
    generator::{FlakeGenerator, Poll},
    time::TimeSource,
};

/// Extension trait for asynchronously generating [`FlakeId`]s.
///
/// When the sequence for the current millisecond is exhausted, the returned
/// future suspends through the chosen [`SleepProvider`] and then re-runs the
/// generator's full decision procedure. No lock is held while suspended, so
/// other tasks sharing the generator keep making progress.
pub trait FlakeGeneratorAsyncExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available ID.
    ///
    /// # Errors
    ///
    /// Resolves to an error if the generator returns one. Sequence exhaustion
    /// is never an error, it only delays resolution.
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<FlakeId>> + Send
    where
        S: SleepProvider;
}

impl<G, T> FlakeGeneratorAsyncExt<T> for G
where
    G: FlakeGenerator<T> + Sync,
    T: TimeSource,
{
    fn try_next_id_async<S>(&self) -> impl Future<Output = Result<FlakeId>> + Send
    where
        S: SleepProvider,
    {
        async move {
            loop {
                let dur = match self.try_poll_id()? {
                    Poll::Ready { id } => return Ok(id),
                    Poll::Pending { yield_for } => Duration::from_millis(yield_for),
                };
                S::sleep_for(dur).await;
            }
        }
    }
}
