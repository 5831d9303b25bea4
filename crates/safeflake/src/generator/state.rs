use core::cmp::Ordering;

use crate::{Error, FlakeId, Result, ValidConfig};

/// Per-generator counter state: the millisecond the current sequence window
/// opened in and the last sequence issued in it.
///
/// `last_millis == 0` means no ID has been issued yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct GeneratorState {
    pub(crate) last_millis: u64,
    pub(crate) sequence: u16,
}

/// What one pass of the decision procedure decided.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// Commit `next` and hand out `id`.
    Issue { next: GeneratorState, id: FlakeId },
    /// The sequence is exhausted for `now`; leave the state untouched.
    Exhausted,
}

impl GeneratorState {
    /// Runs the decision procedure against the clock reading `now`.
    ///
    /// Pure: callers commit `Step::Issue::next` under whatever exclusion
    /// their flavor provides.
    pub(crate) fn advance(self, now: u64, config: &ValidConfig) -> Result<Step> {
        let epoch = config.epoch();
        if now < epoch {
            return Err(cold_epoch_out_of_range(now, epoch));
        }

        let next = match self.last_millis.cmp(&now) {
            Ordering::Less => Self {
                last_millis: now,
                sequence: 0,
            },
            Ordering::Greater => return Err(cold_clock_behind(now, self.last_millis)),
            Ordering::Equal => {
                if self.sequence >= FlakeId::MAX_SEQUENCE {
                    return Ok(Step::Exhausted);
                }
                Self {
                    last_millis: now,
                    sequence: self.sequence + 1,
                }
            }
        };

        let elapsed = now - epoch;
        if elapsed > FlakeId::MAX_ELAPSED {
            return Err(cold_range_exceeded(elapsed));
        }

        Ok(Step::Issue {
            next,
            id: FlakeId::from_components(elapsed, config.worker_id(), next.sequence),
        })
    }
}

#[cold]
#[inline(never)]
fn cold_epoch_out_of_range(now: u64, epoch: u64) -> Error {
    #[cfg(feature = "tracing")]
    tracing::warn!(now, epoch, "clock is earlier than the generator epoch");
    Error::EpochOutOfRange { now, epoch }
}

#[cold]
#[inline(never)]
fn cold_clock_behind(now: u64, last: u64) -> Error {
    #[cfg(feature = "tracing")]
    tracing::warn!(now, last, behind_ms = last - now, "clock moved backward");
    Error::ClockMovedBackward { now, last }
}

#[cold]
#[inline(never)]
fn cold_range_exceeded(elapsed: u64) -> Error {
    #[cfg(feature = "tracing")]
    tracing::error!(
        elapsed,
        max_elapsed = FlakeId::MAX_ELAPSED,
        "generator ran past its safe integer window"
    );
    Error::SafeIntegerRangeExceeded { elapsed }
}
