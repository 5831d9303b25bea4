use portable_atomic::{AtomicU64, Ordering};
#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    FlakeId, GeneratorConfig, ParsedId, Result, ValidConfig,
    generator::{FlakeGenerator, GeneratorState, Poll, Step},
    id::parse,
    time::TimeSource,
};

/// Bits reserved for the sequence in the packed state word.
const SEQUENCE_BITS: u32 = 10;
const SEQUENCE_MASK: u64 = (1 << SEQUENCE_BITS) - 1;

const _: () = assert!(FlakeId::MAX_SEQUENCE as u64 <= SEQUENCE_MASK);
// Committed states always satisfy `last_millis - epoch <= MAX_ELAPSED`
const _: () = assert!((FlakeId::MAX_ELAPSED + 1) <= u64::MAX >> SEQUENCE_BITS);

/// A lock-free generator suitable for multi-threaded environments.
///
/// The state is packed into a single [`AtomicU64`] and advanced with a
/// compare-and-swap. The word stores the time relative to the epoch (plus one,
/// so that zero means "fresh") in the high bits and the sequence in the low 10
/// bits:
///
/// ```text
///  Bit Index:  63                              10 9              0
///              +---------------------------------+---------------+
///  Field:      |   last_millis - epoch + 1 (54)  | sequence (10) |
///              +---------------------------------+---------------+
/// ```
///
/// ## Features
/// - ✅ Thread-safe
/// - ❌ Fair access: a losing CAS returns [`Poll::Pending`] with
///   `yield_for == 0` and the caller retries
///
/// ## Recommended When
/// - You're in a multi-threaded environment
/// - Fair access is sacrificed for higher throughput
///
/// ## See Also
/// - [`BasicFlakeGenerator`]
/// - [`LockFlakeGenerator`]
///
/// [`BasicFlakeGenerator`]: crate::BasicFlakeGenerator
/// [`LockFlakeGenerator`]: crate::LockFlakeGenerator
pub struct AtomicFlakeGenerator<T>
where
    T: TimeSource,
{
    config: ValidConfig,
    #[cfg(feature = "cache-padded")]
    state: crossbeam_utils::CachePadded<AtomicU64>,
    #[cfg(not(feature = "cache-padded"))]
    state: AtomicU64,
    time: T,
}

impl<T> AtomicFlakeGenerator<T>
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
    /// use safeflake::{AtomicFlakeGenerator, FlakeGenerator, GeneratorConfig, SystemClock};
    ///
    /// let config = GeneratorConfig::new(1_583_843_696_123).with_worker_id(2);
    /// let generator = AtomicFlakeGenerator::try_new(config, SystemClock).unwrap();
    /// let id = generator.generate_blocking().unwrap();
    /// assert_eq!(id.worker_id(), 2);
    /// ```
    pub fn try_new(config: GeneratorConfig, time: T) -> Result<Self> {
        Ok(Self::from_config(config.validate()?, time))
    }

    /// Creates a generator from an already validated configuration.
    pub fn from_config(config: ValidConfig, time: T) -> Self {
        let fresh = pack(GeneratorState::default(), config.epoch());
        Self {
            config,
            #[cfg(feature = "cache-padded")]
            state: crossbeam_utils::CachePadded::new(AtomicU64::new(fresh)),
            #[cfg(not(feature = "cache-padded"))]
            state: AtomicU64::new(fresh),
            time,
        }
    }

    /// Returns the configuration this generator is bound to.
    pub const fn config(&self) -> &ValidConfig {
        &self.config
    }

    /// Runs the decision procedure once and tries to publish the result.
    ///
    /// Returns [`Poll::Pending`] with `yield_for == 1` if the sequence is
    /// exhausted, or `yield_for == 0` if another thread won the race.
    ///
    /// # Errors
    ///
    /// See [`FlakeGenerator::try_poll_id`].
    #[cfg_attr(feature = "tracing", instrument(level = "trace", skip(self)))]
    pub fn try_poll_id(&self) -> Result<Poll> {
        let epoch = self.config.epoch();
        let current = self.state.load(Ordering::Acquire);
        let now = self.time.current_millis();

        let (next, id) = match unpack(current, epoch).advance(now, &self.config)? {
            Step::Issue { next, id } => (next, id),
            Step::Exhausted => return Ok(Poll::Pending { yield_for: 1 }),
        };

        if self
            .state
            .compare_exchange(
                current,
                pack(next, epoch),
                Ordering::AcqRel,
                Ordering::Relaxed,
            )
            .is_ok()
        {
            Ok(Poll::Ready { id })
        } else {
            // Another thread won the race, retry immediately
            Ok(Poll::Pending { yield_for: 0 })
        }
    }

    /// Decomposes `id` against this generator's epoch.
    pub const fn parse(&self, id: FlakeId) -> ParsedId {
        parse(self.config.epoch(), id)
    }
}

impl<T> FlakeGenerator<T> for AtomicFlakeGenerator<T>
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

/// Only called with states produced by [`GeneratorState::advance`], which
/// guarantees `epoch <= last_millis <= epoch + MAX_ELAPSED` once used.
fn pack(state: GeneratorState, epoch: u64) -> u64 {
    if state.last_millis == 0 {
        return 0;
    }
    ((state.last_millis - epoch + 1) << SEQUENCE_BITS) | u64::from(state.sequence)
}

#[allow(clippy::cast_possible_truncation)]
fn unpack(raw: u64, epoch: u64) -> GeneratorState {
    if raw == 0 {
        return GeneratorState::default();
    }
    GeneratorState {
        last_millis: epoch + (raw >> SEQUENCE_BITS) - 1,
        sequence: (raw & SEQUENCE_MASK) as u16,
    }
}
