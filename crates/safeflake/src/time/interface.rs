use std::sync::Arc;

/// A source of wall-clock time in **milliseconds since the Unix epoch**.
///
/// Generators subtract their own epoch from this value, so a time source never
/// needs to know which epoch it is serving. Swap in a fixed or stepped source
/// to drive a generator deterministically in tests.
///
/// # Example
///
/// ```
/// use safeflake::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_583_843_696_123
///     }
/// }
///
/// assert_eq!(FixedTime.current_millis(), 1_583_843_696_123);
/// ```
pub trait TimeSource {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn current_millis(&self) -> u64;
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn current_millis(&self) -> u64 {
        (**self).current_millis()
    }
}
