use core::cell::Cell;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    FlakeId, GeneratorConfig, ParsedId, Result, ValidConfig,
    generator::{FlakeGenerator, GeneratorState, Poll, Step},
    id::parse,
    time::TimeSource,
};

/// A non-concurrent generator suitable for single-threaded environments.
///
/// This generator is lightweight and fast, but **not thread-safe**: the state
/// lives in a [`Cell`], so the type is not `Sync`.
///
/// ## Features
/// - ❌ Not thread-safe
/// - ✅ Fastest flavor
///
/// ## Recommended When
/// - You're in a single-threaded environment (no shared access)
/// - Each task or thread owns its own worker ID
///
/// ## See Also
/// - [`LockFlakeGenerator`]
/// - [`AtomicFlakeGenerator`]
///
/// [`LockFlakeGenerator`]: crate::LockFlakeGenerator
/// [`AtomicFlakeGenerator`]: crate::AtomicFlakeGenerator
pub struct BasicFlakeGenerator<T>
where
    T: TimeSource,
{
    config: ValidConfig,
    state: Cell<GeneratorState>,
    time: T,
}

impl<T> BasicFlakeGenerator<T>
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
    /// use safeflake::{BasicFlakeGenerator, FlakeGenerator, GeneratorConfig, SystemClock};
    ///
    /// let config = GeneratorConfig::new(1_583_843_696_123).with_worker_id(1);
    /// let generator = BasicFlakeGenerator::try_new(config, SystemClock).unwrap();
    /// let id = generator.generate_blocking().unwrap();
    /// assert_eq!(generator.parse(id).worker_id, 1);
    /// ```
    pub fn try_new(config: GeneratorConfig, time: T) -> Result<Self> {
        Ok(Self::from_config(config.validate()?, time))
    }

    /// Creates a generator from an already validated configuration.
    pub fn from_config(config: ValidConfig, time: T) -> Self {
        Self {
            config,
            state: Cell::new(GeneratorState::default()),
            time,
        }
    }

    /// Returns the configuration this generator is bound to.
    pub const fn config(&self) -> &ValidConfig {
        &self.config
    }

    /// Runs the decision procedure once.
    ///
    /// Returns [`Poll::Pending`] if the current millisecond's sequence is
    /// exhausted.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::try_poll_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let now = self.time.current_millis();
        match self.state.get().advance(now, &self.config)? {
            Step::Issue { next, id } => {
                self.state.set(next);
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

impl<T> FlakeGenerator<T> for BasicFlakeGenerator<T>
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
