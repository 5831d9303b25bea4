use core::time::Duration;

use crate::{
    FlakeId, GeneratorConfig, ParsedId, Result, ValidConfig,
    generator::Poll,
    id::parse,
    time::TimeSource,
};

/// A minimal interface for generating and parsing [`FlakeId`]s.
///
/// Implemented by every generator flavor so callers and the async extensions
/// can stay generic over the concurrency model.
pub trait FlakeGenerator<T>
where
    T: TimeSource,
{
    /// Creates a generator from an already validated configuration.
    fn from_config(config: ValidConfig, time: T) -> Self
    where
        Self: Sized;

    /// Validates `config` and creates a generator with zeroed state.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the configuration is rejected.
    fn try_new(config: GeneratorConfig, time: T) -> Result<Self>
    where
        Self: Sized,
    {
        let config = config.validate()?;
        Ok(Self::from_config(config, time))
    }

    /// Returns the configuration this generator is bound to.
    fn config(&self) -> &ValidConfig;

    /// Runs the decision procedure once.
    ///
    /// # Errors
    ///
    /// - [`crate::Error::EpochOutOfRange`] if the clock precedes the epoch
    /// - [`crate::Error::ClockMovedBackward`] if the clock regressed
    /// - [`crate::Error::SafeIntegerRangeExceeded`] once the safe window has
    ///   passed
    /// - [`crate::Error::LockPoisoned`] for a poisoned std mutex
    fn try_poll_id(&self) -> Result<Poll>;

    /// Generates the next ID, calling `f(yield_for)` each time the sequence
    /// for the current millisecond is exhausted.
    ///
    /// `f` decides how to wait (spin, yield, sleep). The full decision
    /// procedure re-runs after it returns.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_poll_id`].
    fn try_next_id(&self, mut f: impl FnMut(u64)) -> Result<FlakeId> {
        loop {
            match self.try_poll_id()? {
                Poll::Ready { id } => break Ok(id),
                Poll::Pending { yield_for } => f(yield_for),
            }
        }
    }

    /// Generates the next ID, parking the current thread while the sequence
    /// is exhausted.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_poll_id`].
    fn generate_blocking(&self) -> Result<FlakeId> {
        self.try_next_id(|yield_for| {
            if yield_for == 0 {
                std::thread::yield_now();
            } else {
                std::thread::sleep(Duration::from_millis(yield_for));
            }
        })
    }

    /// Decomposes `id` against this generator's epoch.
    fn parse(&self, id: FlakeId) -> ParsedId {
        parse(self.config().epoch(), id)
    }

    /// Epoch in milliseconds since the Unix epoch.
    fn epoch(&self) -> u64 {
        self.config().epoch()
    }

    /// Worker ID embedded in every ID this generator produces.
    fn worker_id(&self) -> u8 {
        self.config().worker_id()
    }
}

