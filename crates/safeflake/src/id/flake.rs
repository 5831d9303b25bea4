use core::fmt;

/// A Flake-style ID that always fits in 53 bits.
///
/// The fields are packed with decimal place values rather than bit shifts, so
/// the ID stays readable in base 10 and survives a round-trip through an
/// IEEE-754 double (e.g. a JavaScript `number`):
///
/// ```text
///  id = (elapsed * 10 + worker_id) * 1000 + sequence
///
///  Digits:   | elapsed ms since epoch | worker (1) | sequence (3) |
///            +------------------------+------------+--------------+
///            |<------- MSD ------ at most 2^53 - 1 ------ LSD ---->|
/// ```
///
/// - `elapsed`: milliseconds since the generator's epoch, at most
///   [`FlakeId::MAX_ELAPSED`] (~28.5 years)
/// - `worker_id`: `0..=9`
/// - `sequence`: `0..=999`
///
/// The epoch is not embedded in the ID. Absolute timestamps are only
/// recovered by parsing against the epoch that produced it.
///
/// # Example
///
/// ```
/// use safeflake::FlakeId;
///
/// let id = FlakeId::from_components(1, 2, 3);
/// assert_eq!(id.to_raw(), 12_003);
/// assert_eq!(id.elapsed(), 1);
/// assert_eq!(id.worker_id(), 2);
/// assert_eq!(id.sequence(), 3);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct FlakeId {
    id: u64,
}

impl FlakeId {
    /// Largest integer a binary64 float represents exactly: `2^53 - 1`.
    pub const MAX_SAFE_INTEGER: u64 = (1 << 53) - 1;

    /// Place value of the sequence field.
    pub const SEQUENCE_RADIX: u64 = 1_000;

    /// Place value of the worker field, relative to the sequence field.
    pub const WORKER_RADIX: u64 = 10;

    /// Largest sequence value within one millisecond.
    pub const MAX_SEQUENCE: u16 = (Self::SEQUENCE_RADIX - 1) as u16;

    /// Largest worker ID.
    pub const MAX_WORKER_ID: u8 = (Self::WORKER_RADIX - 1) as u8;

    /// Largest elapsed-millisecond value that keeps *every* worker/sequence
    /// combination at or below [`Self::MAX_SAFE_INTEGER`].
    ///
    /// Evaluates to `900_719_925_473`.
    pub const MAX_ELAPSED: u64 = (Self::MAX_SAFE_INTEGER
        - (Self::MAX_WORKER_ID as u64 * Self::SEQUENCE_RADIX + Self::MAX_SEQUENCE as u64))
        / (Self::WORKER_RADIX * Self::SEQUENCE_RADIX);

    /// Largest ID any generator can produce.
    pub const MAX: Self = Self::from_components(
        Self::MAX_ELAPSED,
        Self::MAX_WORKER_ID,
        Self::MAX_SEQUENCE,
    );

    /// Packs the three fields into an ID.
    ///
    /// Out-of-range `worker_id` or `sequence` values spill into the next
    /// field, and an `elapsed` above [`Self::MAX_ELAPSED`] produces an ID
    /// that fails [`Self::is_valid`]. Generators never do either.
    pub const fn from_components(elapsed: u64, worker_id: u8, sequence: u16) -> Self {
        Self {
            id: (elapsed * Self::WORKER_RADIX + worker_id as u64) * Self::SEQUENCE_RADIX
                + sequence as u64,
        }
    }

    /// Milliseconds since the producing generator's epoch.
    pub const fn elapsed(&self) -> u64 {
        self.id / (Self::WORKER_RADIX * Self::SEQUENCE_RADIX)
    }

    /// Worker ID in `0..=9`.
    pub const fn worker_id(&self) -> u8 {
        ((self.id / Self::SEQUENCE_RADIX) % Self::WORKER_RADIX) as u8
    }

    /// Sequence in `0..=999`.
    pub const fn sequence(&self) -> u16 {
        (self.id % Self::SEQUENCE_RADIX) as u16
    }

    /// Returns the packed integer.
    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a packed integer without checking it.
    pub const fn from_raw(raw: u64) -> Self {
        Self { id: raw }
    }

    /// Returns `true` if the ID is exactly representable as a binary64 float.
    pub const fn is_valid(&self) -> bool {
        self.id <= Self::MAX_SAFE_INTEGER
    }
}

const _: () = assert!(FlakeId::MAX_ELAPSED == 900_719_925_473);
const _: () = assert!(FlakeId::MAX.to_raw() <= FlakeId::MAX_SAFE_INTEGER);
const _: () = assert!(
    FlakeId::from_components(FlakeId::MAX_ELAPSED + 1, 0, 0).to_raw() > FlakeId::MAX.to_raw()
);

impl fmt::Display for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for FlakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlakeId")
            .field("id", &self.id)
            .field("elapsed", &self.elapsed())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl From<FlakeId> for u64 {
    fn from(id: FlakeId) -> Self {
        id.to_raw()
    }
}

impl From<FlakeId> for f64 {
    /// Lossless for every valid ID.
    #[allow(clippy::cast_precision_loss)]
    fn from(id: FlakeId) -> Self {
        id.to_raw() as f64
    }
}

impl TryFrom<u64> for FlakeId {
    type Error = u64;

    /// Rejects integers above [`FlakeId::MAX_SAFE_INTEGER`], returning the
    /// offending value.
    fn try_from(raw: u64) -> Result<Self, Self::Error> {
        let id = Self::from_raw(raw);
        if id.is_valid() { Ok(id) } else { Err(raw) }
    }
}
