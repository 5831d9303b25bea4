use crate::id::FlakeId;

/// The outcome of one pass of a generator's decision procedure.
///
/// - [`Poll::Ready`] carries a freshly generated ID.
/// - [`Poll::Pending`] means all 1000 sequence values of the current
///   millisecond are used up. Wait `yield_for` milliseconds and poll again;
///   the next pass re-reads the clock and re-runs the whole procedure.
///
/// # Example
///
/// ```
/// use safeflake::{BasicFlakeGenerator, GeneratorConfig, Poll, TimeSource};
///
/// struct FixedTime;
/// impl TimeSource for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1_583_843_696_123
///     }
/// }
///
/// let generator =
///     BasicFlakeGenerator::try_new(GeneratorConfig::new(1_583_843_696_123), FixedTime).unwrap();
/// match generator.try_poll_id().unwrap() {
///     Poll::Ready { id } => println!("ID: {id}"),
///     Poll::Pending { yield_for } => println!("Back off for {yield_for} ms"),
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Poll {
    /// A unique ID was generated and is ready to use.
    Ready {
        /// The generated ID.
        id: FlakeId,
    },
    /// The sequence for the current millisecond is exhausted.
    Pending {
        /// Milliseconds to wait before polling again.
        yield_for: u64,
    },
}
