use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    FlakeId, GeneratorConfig, ParsedId, Result, ValidConfig,
    generator::{FlakeGenerator, GeneratorState, Mutex, Poll, Step},
    id::parse,
    time::TimeSource,
};

/// A lock-based generator suitable for multi-threaded environments.
///
/// This generator wraps its state in an [`Arc<Mutex<_>>`], allowing safe
/// shared use across threads. Clones share the same state and therefore act
/// as one generator.
///
/// The lock is held for a single pass of the decision procedure only. When
/// the sequence is exhausted the lock is released before the caller waits,
/// and re-acquired for the next pass. Every pass that issues an ID issues one
/// strictly larger than all IDs before it, so a caller that had to wait can
/// never receive a smaller ID than a caller that started after it and
/// finished first.
///
/// ## Features
/// - ✅ Thread-safe
/// - ✅ Fair access across threads
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access across threads is important
/// - Your target doesn't support atomics
///
/// ## See Also
/// - [`BasicFlakeGenerator`]
/// - [`AtomicFlakeGenerator`]
///
/// [`BasicFlakeGenerator`]: crate::BasicFlakeGenerator
/// [`AtomicFlakeGenerator`]: crate::AtomicFlakeGenerator
pub struct LockFlakeGenerator<T>
where
    T: TimeSource,
{
    config: ValidConfig,
    #[cfg(feature = "cache-padded")]
    state: Arc<crossbeam_utils::CachePadded<Mutex<GeneratorState>>>,
    #[cfg(not(feature = "cache-padded"))]
    state: Arc<Mutex<GeneratorState>>,
    time: T,
}

impl<T> Clone for LockFlakeGenerator<T>
where
    T: TimeSource + Clone,
{
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            state: Arc::clone(&self.state),
            time: self.time.clone(),
        }
    }
}

impl<T> LockFlakeGenerator<T>
where
    T: TimeSource,
{
    /// Validates `config` and creates a generator with zeroed state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the epoch is missing or the worker
    /// ID is out of range.
    ///
    /// # Example
    /// ```
    /// use safeflake::{FlakeGenerator, GeneratorConfig, LockFlakeGenerator, MonotonicClock};
    ///
    /// let config = GeneratorConfig::new(1_583_843_696_123).with_worker_id(3);
    /// let generator = LockFlakeGenerator::try_new(config, MonotonicClock::new()).unwrap();
    ///
    /// std::thread::scope(|s| {
    ///     for _ in 0..4 {
    ///         s.spawn(|| generator.generate_blocking().unwrap());
    ///     }
    /// });
    /// ```
    pub fn try_new(config: GeneratorConfig, time: T) -> Result<Self> {
        Ok(Self::from_config(config.validate()?, time))
    }

    /// Creates a generator from an already validated configuration.
    pub fn from_config(config: ValidConfig, time: T) -> Self {
        let state = Mutex::new(GeneratorState::default());
        Self {
            config,
            #[cfg(feature = "cache-padded")]
            state: Arc::new(crossbeam_utils::CachePadded::new(state)),
            #[cfg(not(feature = "cache-padded"))]
            state: Arc::new(state),
            time,
        }
    }

    /// Returns the configuration this generator is bound to.
    pub const fn config(&self) -> &ValidConfig {
        &self.config
    }

    /// Runs the decision procedure once under the lock.
    ///
    /// The clock is read while holding the lock, so the readings that drive
    /// successive passes are themselves serialized.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::try_poll_id`]. Additionally returns
    /// [`crate::Error::LockPoisoned`] if another thread panicked while
    /// holding the lock (std mutex only).
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let mut state = {
            #[cfg(feature = "parking-lot")]
            {
                self.state.lock()
            }
            #[cfg(not(feature = "parking-lot"))]
            {
                self.state.lock()?
            }
        };

        let now = self.time.current_millis();
        match state.advance(now, &self.config)? {
            Step::Issue { next, id } => {
                *state = next;
                Ok(Poll::Ready { id })
            }
            Step::Exhausted => Ok(Poll::Pending { yield_for: 1 }),
        }
    }

    /// Decomposes `id` against this generator's epoch.
    pub const fn parse(&self, id: FlakeId) -> ParsedId {
        parse(self.config.epoch(), id)
    }
}

impl<T> FlakeGenerator<T> for LockFlakeGenerator<T>
where
    T: TimeSource,
{
    fn from_config(config: ValidConfig, time: T) -> Self {
        Self::from_config(config, time)
    }

    fn config(&self) -> &ValidConfig {
        self.config()
    }

    fn try_poll_id(&self) -> Result<Poll> {
        self.try_poll_id()
    }

    fn parse(&self, id: FlakeId) -> ParsedId {
        self.parse(id)
    }
}
