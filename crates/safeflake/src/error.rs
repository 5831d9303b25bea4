/// A result type whose error defaults to [`Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All error variants that `safeflake` can emit.
///
/// Variants fall into two groups, which callers can branch on with
/// [`Error::is_transient`] and [`Error::is_permanent`]:
///
/// - **Transient**: [`Error::EpochOutOfRange`] and
///   [`Error::ClockMovedBackward`] depend on the state of the wall clock and
///   may clear up on their own. The generator never retries them itself.
/// - **Permanent**: [`Error::Config`] and
///   [`Error::SafeIntegerRangeExceeded`] will not go away by calling again.
///
/// Sequence exhaustion within a millisecond is *not* an error. It surfaces as
/// [`crate::Poll::Pending`] and is absorbed by the generation loops.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The generator configuration was rejected at construction.
    #[error("invalid generator configuration: {0}")]
    Config(#[from] ConfigError),

    /// The wall clock is still earlier than the configured epoch.
    ///
    /// Usually a misconfigured epoch or a badly skewed clock. Do not
    /// busy-retry.
    #[error("clock ({now} ms) is earlier than the configured epoch ({epoch} ms)")]
    EpochOutOfRange {
        /// Wall-clock reading, in milliseconds since the Unix epoch.
        now: u64,
        /// Configured epoch, in milliseconds since the Unix epoch.
        epoch: u64,
    },

    /// The wall clock regressed behind the last tick this generator used.
    #[error("clock moved backward: now {now} ms, last tick {last} ms")]
    ClockMovedBackward {
        /// Wall-clock reading, in milliseconds since the Unix epoch.
        now: u64,
        /// Last millisecond an ID was issued in.
        last: u64,
    },

    /// The time elapsed since the epoch no longer fits in an ID that is
    /// exactly representable as an IEEE-754 double.
    ///
    /// Time only moves forward, so this generator is done. Rotate to a newer
    /// epoch.
    #[error("{elapsed} ms since epoch exceeds the safe integer window")]
    SafeIntegerRangeExceeded {
        /// Milliseconds elapsed since the configured epoch.
        elapsed: u64,
    },

    /// The operation failed because the lock was **poisoned**.
    ///
    /// This occurs when a thread panics while holding the lock. When the
    /// `parking-lot` feature is enabled, mutexes do **not** poison, so this
    /// variant is not available.
    #[cfg_attr(docsrs, doc(cfg(all(feature = "lock", not(feature = "parking-lot")))))]
    #[cfg(all(feature = "lock", not(feature = "parking-lot")))]
    #[error("generator lock poisoned")]
    LockPoisoned,
}

impl Error {
    /// Returns `true` if calling again later may succeed.
    pub const fn is_transient(&self) -> bool {
        matches!(
            self,
            Self::EpochOutOfRange { .. } | Self::ClockMovedBackward { .. }
        )
    }

    /// Returns `true` if this generator (or configuration) will never succeed
    /// again.
    pub const fn is_permanent(&self) -> bool {
        !self.is_transient()
    }
}

/// Reasons a [`crate::GeneratorConfig`] is rejected.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// No epoch was given, or it was zero.
    #[error("epoch is required and must be non-zero")]
    MissingEpoch,

    /// The epoch could not be read as a whole number of milliseconds.
    #[error("epoch `{value}` is not a whole number of milliseconds")]
    InvalidEpoch {
        /// The rejected input.
        value: String,
    },

    /// The worker ID was supplied but is not a whole integer.
    #[error("worker id `{value}` is not an integer")]
    InvalidWorkerId {
        /// The rejected input.
        value: String,
    },

    /// The worker ID is an integer outside `0..=9`.
    #[error("worker id {worker_id} is outside 0..=9")]
    WorkerIdOutOfRange {
        /// The rejected worker ID.
        worker_id: i64,
    },
}

#[cfg_attr(docsrs, doc(cfg(all(feature = "lock", not(feature = "parking-lot")))))]
#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
use crate::generator::{MutexGuard, PoisonError};
#[cfg_attr(docsrs, doc(cfg(all(feature = "lock", not(feature = "parking-lot")))))]
#[cfg(all(feature = "lock", not(feature = "parking-lot")))]
impl<T> From<PoisonError<MutexGuard<'_, T>>> for Error {
    fn from(_: PoisonError<MutexGuard<'_, T>>) -> Self {
        Self::LockPoisoned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_errors_are_transient() {
        assert!(Error::EpochOutOfRange { now: 1, epoch: 2 }.is_transient());
        assert!(Error::ClockMovedBackward { now: 1, last: 2 }.is_transient());
    }

    #[test]
    fn range_and_config_errors_are_permanent() {
        assert!(Error::SafeIntegerRangeExceeded { elapsed: 1 }.is_permanent());
        assert!(Error::from(ConfigError::MissingEpoch).is_permanent());
    }

    #[test]
    fn display_names_the_offending_values() {
        let err = Error::ClockMovedBackward { now: 5, last: 9 };
        assert_eq!(err.to_string(), "clock moved backward: now 5 ms, last tick 9 ms");

        let err = Error::from(ConfigError::InvalidWorkerId {
            value: "a".to_string(),
        });
        assert_eq!(
            err.to_string(),
            "invalid generator configuration: worker id `a` is not an integer"
        );
    }
}
