use core::{future::Future, time::Duration};

use smol::Timer;

use crate::{
    FlakeId, Result,
    futures::{FlakeGeneratorAsyncExt, SleepProvider},
    generator::FlakeGenerator,
    time::TimeSource,
};

/// An implementation of [`SleepProvider`] using Smol's timer.
///
/// This is the default provider for use in async applications built on Smol.
pub struct SmolSleep;
impl SleepProvider for SmolSleep {
    async fn sleep_for(dur: Duration) {
        Timer::after(dur).await;
    }
}

/// An implementation of [`SleepProvider`] using Smol's yield.
///
/// Same trade-off as `TokioYield`: lower latency when lightly loaded, more
/// scheduler churn when heavily contended.
pub struct SmolYield;
impl SleepProvider for SmolYield {
    async fn sleep_for(_dur: Duration) {
        smol::future::yield_now().await;
    }
}

/// Extension trait for asynchronously generating IDs on the
/// [`smol`](https://docs.rs/smol) runtime.
///
/// Uses [`SmolSleep`] as the sleep provider.
pub trait FlakeGeneratorAsyncSmolExt<T>
where
    T: TimeSource,
{
    /// Returns a future that resolves to the next available ID using
    /// [`SmolSleep`].
    ///
    /// # Errors
    ///
    /// Resolves to an error if the underlying generator fails.
    fn generate(&self) -> impl Future<Output = Result<FlakeId>> + Send;
}

impl<G, T> FlakeGeneratorAsyncSmolExt<T> for G
where
    G: FlakeGenerator<T> + Sync,
    T: TimeSource,
{
    fn generate(&self) -> impl Future<Output = Result<FlakeId>> + Send {
        <Self as FlakeGeneratorAsyncExt<T>>::try_next_id_async::<SmolSleep>(self)
    }
}

#[cfg(all(test, feature = "lock"))]
mod tests {
    use std::{collections::HashSet, sync::Arc};

    use super::*;
    use crate::{GeneratorConfig, LockFlakeGenerator, MonotonicClock};

    const EPOCH: u64 = 1_583_843_696_123;

    #[test]
    fn generate_on_smol() {
        let config = GeneratorConfig::new(EPOCH).with_worker_id(2);
        let generator = LockFlakeGenerator::try_new(config, MonotonicClock::new()).unwrap();

        let ids = smol::block_on(async {
            let mut ids = Vec::with_capacity(2_500);
            for _ in 0..2_500 {
                ids.push(generator.generate().await.unwrap());
            }
            ids
        });

        assert!(ids.windows(2).all(|w| w[0] < w[1]));
        assert!(ids.iter().all(|id| id.worker_id() == 2));
    }

    #[test]
    fn spawned_tasks_share_a_generator() {
        const TASKS: usize = 4;
        const IDS_PER_TASK: usize = 1_500;

        let config = GeneratorConfig::new(EPOCH).with_worker_id(5);
        let generator =
            Arc::new(LockFlakeGenerator::try_new(config, MonotonicClock::new()).unwrap());

        let all_ids: Vec<FlakeId> = smol::block_on(async {
            let tasks: Vec<smol::Task<Vec<FlakeId>>> = (0..TASKS)
                .map(|_| {
                    let generator = Arc::clone(&generator);
                    smol::spawn(async move {
                        let mut ids = Vec::with_capacity(IDS_PER_TASK);
                        for _ in 0..IDS_PER_TASK {
                            ids.push(
                                generator
                                    .try_next_id_async::<SmolYield>()
                                    .await
                                    .unwrap(),
                            );
                        }
                        ids
                    })
                })
                .collect();

            let mut all = Vec::with_capacity(TASKS * IDS_PER_TASK);
            for task in tasks {
                all.extend(task.await);
            }
            all
        });

        let unique: HashSet<_> = all_ids.iter().collect();
        assert_eq!(unique.len(), TASKS * IDS_PER_TASK);
    }
}
