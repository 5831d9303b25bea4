use crate::time::{SystemTime, TimeSource, UNIX_EPOCH};

/// Reads the system wall clock on every call.
///
/// The wall clock can be stepped backward by NTP corrections or VM
/// migrations. Generators report that as [`crate::Error::ClockMovedBackward`].
/// Use [`crate::MonotonicClock`] if you would rather never observe it.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn current_millis(&self) -> u64 {
        // A clock before 1970 reads as 0, which every valid epoch is ahead of
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_millis() as u64)
    }
}
