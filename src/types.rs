use core::fmt::{Binary, Debug};
use core::ops::{BitAnd, BitOr, Not};

use crate::sync::Ordering;

/// The index of a slot inside a [Bitmask]. Position 0 is the most significant bit.
pub type BitPosition = u32;

/// A number of consecutive slots inside a [Bitmask].
pub type BitCount = u32;

cfg_if::cfg_if! {
    if #[cfg(target_has_atomic = "64")] {
        /// The widest [Bitmask] the target can compare-and-swap without a lock.
        pub type WidestLockFree = u64;
    } else if #[cfg(target_has_atomic = "32")] {
        /// The widest [Bitmask] the target can compare-and-swap without a lock.
        pub type WidestLockFree = u32;
    } else if #[cfg(target_has_atomic = "16")] {
        /// The widest [Bitmask] the target can compare-and-swap without a lock.
        pub type WidestLockFree = u16;
    } else if #[cfg(target_has_atomic = "8")] {
        /// The widest [Bitmask] the target can compare-and-swap without a lock.
        pub type WidestLockFree = u8;
    } else {
        compile_error!("freebits needs at least one lock-free atomic integer width");
    }
}

mod private {
    pub trait Sealed {}
}

/// A fixed-width unsigned integer used as an occupancy vector.
///
/// A set bit is an occupied slot, a clear bit is a free slot. Slots are numbered from the most
/// significant bit, so for a `u8` the mask `0b1110_0000` has slots 0, 1 and 2 occupied.
///
/// This trait is sealed and implemented for `u8`, `u16`, `u32` and `u64` on targets which can
/// manipulate that width atomically.
pub trait Bitmask:
    Copy
    + Eq
    + Debug
    + Binary
    + BitAnd<Output = Self>
    + BitOr<Output = Self>
    + Not<Output = Self>
    + Send
    + Sync
    + 'static
    + private::Sealed
{
    /// The number of slots in the mask.
    const WIDTH: BitCount;

    /// Every slot free.
    const EMPTY: Self;

    /// Every slot occupied.
    const FULL: Self;

    /// The atomic cell holding a mask of this width.
    type Atomic: AtomicBitmask<Mask = Self>;

    fn leading_zeros(self) -> u32;

    fn leading_ones(self) -> u32;

    fn count_ones(self) -> u32;

    /// Shift towards the most significant bit, yielding [Bitmask::EMPTY] once `by` reaches the
    /// width instead of overflowing.
    fn shift_towards_msb(self, by: u32) -> Self;

    /// Shift towards the least significant bit, yielding [Bitmask::EMPTY] once `by` reaches the
    /// width instead of overflowing.
    fn shift_towards_lsb(self, by: u32) -> Self;
}

/// The atomic counterpart of a [Bitmask]. Mirrors the subset of the standard atomic integer API
/// the accessors need.
pub trait AtomicBitmask: Send + Sync {
    type Mask: Bitmask;

    fn new(mask: Self::Mask) -> Self;

    fn load(&self, ordering: Ordering) -> Self::Mask;

    fn compare_exchange(
        &self,
        current: Self::Mask,
        new: Self::Mask,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self::Mask, Self::Mask>;

    fn compare_exchange_weak(
        &self,
        current: Self::Mask,
        new: Self::Mask,
        success: Ordering,
        failure: Ordering,
    ) -> Result<Self::Mask, Self::Mask>;
}

macro_rules! impl_bitmask {
    ($width:tt, $mask:ty, $atomic:ty) => {
        #[cfg(target_has_atomic = $width)]
        impl private::Sealed for $mask {}

        #[cfg(target_has_atomic = $width)]
        impl Bitmask for $mask {
            const WIDTH: BitCount = <$mask>::BITS;
            const EMPTY: Self = 0;
            const FULL: Self = <$mask>::MAX;

            type Atomic = $atomic;

            #[inline]
            fn leading_zeros(self) -> u32 {
                <$mask>::leading_zeros(self)
            }

            #[inline]
            fn leading_ones(self) -> u32 {
                <$mask>::leading_ones(self)
            }

            #[inline]
            fn count_ones(self) -> u32 {
                <$mask>::count_ones(self)
            }

            #[inline]
            fn shift_towards_msb(self, by: u32) -> Self {
                self.checked_shl(by).unwrap_or(0)
            }

            #[inline]
            fn shift_towards_lsb(self, by: u32) -> Self {
                self.checked_shr(by).unwrap_or(0)
            }
        }

        #[cfg(target_has_atomic = $width)]
        impl AtomicBitmask for $atomic {
            type Mask = $mask;

            #[inline]
            fn new(mask: $mask) -> Self {
                <$atomic>::new(mask)
            }

            #[inline]
            fn load(&self, ordering: Ordering) -> $mask {
                <$atomic>::load(self, ordering)
            }

            #[inline]
            fn compare_exchange(
                &self,
                current: $mask,
                new: $mask,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$mask, $mask> {
                <$atomic>::compare_exchange(self, current, new, success, failure)
            }

            #[inline]
            fn compare_exchange_weak(
                &self,
                current: $mask,
                new: $mask,
                success: Ordering,
                failure: Ordering,
            ) -> Result<$mask, $mask> {
                <$atomic>::compare_exchange_weak(self, current, new, success, failure)
            }
        }
    };
}

impl_bitmask!("8", u8, crate::sync::AtomicU8);
impl_bitmask!("16", u16, crate::sync::AtomicU16);
impl_bitmask!("32", u32, crate::sync::AtomicU32);
impl_bitmask!("64", u64, crate::sync::AtomicU64);

/// A contiguous span of slots: `len` slots starting at `start`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash)]
pub struct Run {
    pub start: BitPosition,
    pub len: BitCount,
}

impl Run {
    pub const fn new(start: BitPosition, len: BitCount) -> Self {
        Self { start, len }
    }

    /// One past the last slot of the run, saturating at `BitPosition::MAX`.
    pub const fn end(&self) -> BitPosition {
        self.start.saturating_add(self.len)
    }

    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the two runs share at least one slot. Empty runs overlap nothing.
    pub const fn overlaps(&self, other: &Run) -> bool {
        !self.is_empty() && !other.is_empty() && self.start < other.end() && other.start < self.end()
    }
}
