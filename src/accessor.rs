use core::cell::Cell;
use core::fmt::{Debug, Formatter};

use crate::sync::Ordering;
use crate::types::{AtomicBitmask, Bitmask};

/// Read, write and compare-and-swap access to a single [Bitmask] cell.
///
/// Implementations own their cell and are not `Clone`; a clone would be a second, independent
/// bitmap rather than another view of the same one.
pub trait StorageAccessor {
    type Mask: Bitmask;

    /// The current value of the cell.
    fn get(&self) -> Self::Mask;

    /// Unconditionally replace the value of the cell.
    fn set(&self, value: Self::Mask);

    /// Replace the value of the cell with `desired` only if it currently equals `expected`.
    ///
    /// Returns whether the replacement happened. Never fails spuriously, so a `false` always
    /// means some other write got in first.
    fn compare_and_swap(&self, expected: Self::Mask, desired: Self::Mask) -> bool;
}

/// A [StorageAccessor] over a plain cell.
///
/// Compare-and-swap is an ordinary compare followed by a write. The type is `!Sync`, so the
/// compiler keeps it on one thread; use it for deterministic single-threaded work and tests.
pub struct PlainAccessor<M: Bitmask> {
    mask: Cell<M>,
}

impl<M: Bitmask> PlainAccessor<M> {
    pub fn new(mask: M) -> Self {
        Self { mask: Cell::new(mask) }
    }
}

impl<M: Bitmask> Default for PlainAccessor<M> {
    fn default() -> Self {
        Self::new(M::EMPTY)
    }
}

impl<M: Bitmask> Debug for PlainAccessor<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "PlainAccessor({:#0width$b})", self.mask.get(), width = M::WIDTH as usize + 2)
    }
}

impl<M: Bitmask> StorageAccessor for PlainAccessor<M> {
    type Mask = M;

    fn get(&self) -> M {
        self.mask.get()
    }

    fn set(&self, value: M) {
        self.mask.set(value);
    }

    fn compare_and_swap(&self, expected: M, desired: M) -> bool {
        if self.mask.get() != expected {
            return false;
        }
        self.mask.set(desired);
        true
    }
}

/// A lock-free [StorageAccessor] over an atomic cell, safe to share between threads.
pub struct AtomicAccessor<M: Bitmask> {
    mask: M::Atomic,
}

impl<M: Bitmask> AtomicAccessor<M> {
    pub fn new(mask: M) -> Self {
        Self { mask: M::Atomic::new(mask) }
    }
}

impl<M: Bitmask> Default for AtomicAccessor<M> {
    fn default() -> Self {
        Self::new(M::EMPTY)
    }
}

impl<M: Bitmask> Debug for AtomicAccessor<M> {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "AtomicAccessor({:#0width$b})", self.get(), width = M::WIDTH as usize + 2)
    }
}

impl<M: Bitmask> StorageAccessor for AtomicAccessor<M> {
    type Mask = M;

    fn get(&self) -> M {
        self.mask.load(Ordering::Acquire)
    }

    /// A compare-and-swap loop rather than a plain store.
    fn set(&self, value: M) {
        let mut current: M = self.mask.load(Ordering::Relaxed);
        loop {
            match self.mask.compare_exchange_weak(current, value, Ordering::AcqRel, Ordering::Acquire) {
                Ok(_) => return,
                Err(actual) => current = actual,
            }
        }
    }

    fn compare_and_swap(&self, expected: M, desired: M) -> bool {
        self.mask
            .compare_exchange(expected, desired, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}
