use core::time::Duration;
use std::{
    sync::{
        Arc, OnceLock,
        atomic::{AtomicU64, Ordering},
    },
    thread::{self, JoinHandle},
    time::Instant,
};

use crate::time::{SystemClock, TimeSource};

/// Shared ticker thread that updates every millisecond.
#[derive(Debug)]
struct Ticker {
    elapsed: AtomicU64,
    _handle: OnceLock<JoinHandle<()>>,
}

/// A wall-clock-aligned time source that never moves backward.
///
/// The wall clock is sampled once at construction. From then on, a background
/// thread advances a shared counter from a monotonic [`Instant`], and each
/// reading is `start + elapsed`. NTP steps after start-up are ignored, so a
/// generator driven by this clock never reports
/// [`crate::Error::ClockMovedBackward`]. Readings drift from the wall clock
/// by however much the wall clock is corrected while the process runs.
///
/// Clones share the same ticker thread. The thread exits once the last clone
/// is dropped.
///
/// # Example
///
/// ```
/// use safeflake::{MonotonicClock, TimeSource};
///
/// let clock = MonotonicClock::new();
/// let a = clock.current_millis();
/// std::thread::sleep(std::time::Duration::from_millis(5));
/// assert!(clock.current_millis() >= a);
/// ```
#[derive(Clone, Debug)]
pub struct MonotonicClock {
    ticker: Arc<Ticker>,
    start: u64, // in milliseconds since the Unix epoch
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    /// Starts a clock aligned to the current wall-clock time.
    pub fn new() -> Self {
        Self::starting_at(SystemClock.current_millis())
    }

    /// Starts a clock whose first reading is `start` (ms since the Unix
    /// epoch).
    pub fn starting_at(start: u64) -> Self {
        let origin = Instant::now();
        let ticker = Arc::new(Ticker {
            elapsed: AtomicU64::new(0),
            _handle: OnceLock::new(),
        });

        let weak = Arc::downgrade(&ticker);
        let handle = thread::spawn(move || {
            let mut tick = 0;

            loop {
                let Some(ticker) = weak.upgrade() else {
                    break;
                };

                let target = origin + Duration::from_millis(tick);
                let now = Instant::now();
                if now < target {
                    thread::sleep(target - now);
                }

                #[allow(clippy::cast_possible_truncation)]
                let now_ms = origin.elapsed().as_millis() as u64;
                ticker.elapsed.store(now_ms, Ordering::Relaxed);

                // Align to next tick after the current actual time
                tick = now_ms + 1;
            }
        });

        // Freshly created, so the cell is always empty here
        let _ = ticker._handle.set(handle);

        Self { ticker, start }
    }
}

impl TimeSource for MonotonicClock {
    fn current_millis(&self) -> u64 {
        self.start + self.ticker.elapsed.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_at_the_given_time_and_advances() {
        let clock = MonotonicClock::starting_at(1_000);
        let first = clock.current_millis();
        assert!(first >= 1_000);

        thread::sleep(Duration::from_millis(20));
        let second = clock.current_millis();
        assert!(second > first, "{second} should be past {first}");
    }

    #[test]
    fn never_goes_backward() {
        let clock = MonotonicClock::new();
        let mut last = clock.current_millis();
        for _ in 0..10_000 {
            let now = clock.current_millis();
            assert!(now >= last);
            last = now;
        }
    }

    #[test]
    fn clones_share_a_ticker() {
        let clock = MonotonicClock::starting_at(5_000);
        let clone = clock.clone();
        thread::sleep(Duration::from_millis(5));
        let (a, b) = (clock.current_millis(), clone.current_millis());
        assert!(a.abs_diff(b) <= 1);
    }
}
