use core::time::Duration;

use crate::{
    id::FlakeId,
    time::{SystemTime, UNIX_EPOCH},
};

/// The decomposed form of a [`FlakeId`], with the elapsed time resolved
/// against an epoch.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ParsedId {
    /// Absolute time the ID was issued, in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Worker ID in `0..=9`.
    pub worker_id: u8,
    /// Sequence in `0..=999`.
    pub sequence: u16,
}

impl ParsedId {
    /// Returns [`Self::timestamp`] as a [`SystemTime`], or `None` if the
    /// platform's `SystemTime` cannot represent it.
    pub fn time(&self) -> Option<SystemTime> {
        UNIX_EPOCH.checked_add(Duration::from_millis(self.timestamp))
    }
}

/// Splits `id` into its fields, resolving the time against `epoch` (ms since
/// the Unix epoch).
///
/// Total over every `u64`. The ID carries no epoch marker, so parsing with a
/// different epoch than the one that produced it yields a wrong `timestamp`
/// that cannot be detected.
///
/// # Example
///
/// ```
/// use safeflake::{FlakeId, parse};
///
/// let parsed = parse(1_583_843_696_123, FlakeId::from_raw(1000));
/// assert_eq!(parsed.timestamp, 1_583_843_696_123);
/// assert_eq!(parsed.worker_id, 1);
/// assert_eq!(parsed.sequence, 0);
/// ```
pub const fn parse(epoch: u64, id: FlakeId) -> ParsedId {
    ParsedId {
        timestamp: epoch.saturating_add(id.elapsed()),
        worker_id: id.worker_id(),
        sequence: id.sequence(),
    }
}
