use crate::types::{BitCount, BitPosition};
use displaydoc::Display;

/// Any error which can occur while reserving or releasing a run of slots.
///
/// Only [Error::ContentionExceeded] is transient. The others describe the request or the
/// occupancy observed when the request was evaluated, and retrying the same request against the
/// same occupancy fails the same way.
#[derive(Debug, Display, Clone, Copy, Eq, PartialEq)]
pub enum Error {
    /** The run of {bits} slots starting at slot {position} does not fit in a bitmap of {width}
        slots.
    */
    TooLarge {
        position: BitPosition,
        bits: BitCount,
        width: BitCount,
    },

    /// The bitmap has no free run of {bits} consecutive slots.
    NoSpace { bits: BitCount },

    /// At least one of the {bits} slots starting at slot {position} is already free.
    AlreadyFree {
        position: BitPosition,
        bits: BitCount,
    },

    /// Concurrent writers changed the bitmap during each of {attempts} attempts to update it.
    ContentionExceeded { attempts: u32 },
}

impl Error {
    /// Whether the same request may succeed if the caller tries again later.
    pub const fn is_transient(&self) -> bool {
        matches!(self, Error::ContentionExceeded { .. })
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
