use tracing::{debug, trace};

use crate::accessor::{AtomicAccessor, StorageAccessor};
use crate::err::Error;
use crate::types::{BitCount, BitPosition, Bitmask, WidestLockFree};

mod release;
mod reserve;

/// The number of retries a [ReservationEngine] makes after its first attempt unless told
/// otherwise.
pub const DEFAULT_CONTENTION_LIMIT: u32 = 5;

/// A [ReservationEngine] over an atomic bitmap, defaulting to the widest lock-free width.
pub type AtomicReservationEngine<M = WidestLockFree> = ReservationEngine<AtomicAccessor<M>>;

/// Reserves and releases runs of slots in a single-word bitmap without taking a lock.
///
/// Every update reads the bitmap, computes the new value from that snapshot and publishes it with
/// one compare-and-swap. If another writer changed the bitmap in between, the update starts over
/// from a fresh snapshot, at most `contention_limit` times, after which the caller gets
/// [Error::ContentionExceeded]. An update either lands whole or not at all.
///
/// The engine never sleeps or backs off. Callers that want backoff apply it around
/// [Error::ContentionExceeded].
#[derive(Debug)]
pub struct ReservationEngine<A: StorageAccessor> {
    accessor: A,

    /// How many times an update is retried after its first compare-and-swap fails.
    contention_limit: u32,
}

impl<A: StorageAccessor> ReservationEngine<A> {
    pub fn new(accessor: A) -> Self {
        Self::with_contention_limit(accessor, DEFAULT_CONTENTION_LIMIT)
    }

    pub fn with_contention_limit(accessor: A, contention_limit: u32) -> Self {
        Self {
            accessor,
            contention_limit,
        }
    }

    /// The number of slots in the bitmap.
    pub fn width(&self) -> BitCount {
        A::Mask::WIDTH
    }

    pub fn contention_limit(&self) -> u32 {
        self.contention_limit
    }

    /// The bitmap as of a single read. Set bits are occupied slots, most significant first.
    pub fn bitmap(&self) -> A::Mask {
        self.accessor.get()
    }

    pub fn into_accessor(self) -> A {
        self.accessor
    }

    /// The number of occupied slots as of a single read of the bitmap.
    pub fn occupied(&self) -> BitCount {
        self.accessor.get().count_ones()
    }

    /// Apply `plan` to a snapshot of the bitmap and publish the result with a compare-and-swap,
    /// starting over from a fresh snapshot whenever the swap loses a race.
    ///
    /// `plan` yields the position to report along with the new bitmap. An error from `plan` is
    /// final and is returned without retrying.
    fn update<F>(&self, mut plan: F) -> Result<BitPosition, Error>
    where
        F: FnMut(A::Mask) -> Result<(BitPosition, A::Mask), Error>,
    {
        let attempts: u32 = self.contention_limit.saturating_add(1);
        for attempt in 1..=attempts {
            let current: A::Mask = self.accessor.get();
            let (position, updated): (BitPosition, A::Mask) = plan(current)?;

            if self.accessor.compare_and_swap(current, updated) {
                trace!(attempt, position, "published {updated:#b} over {current:#b}");
                return Ok(position);
            }
            debug!(attempt, "bitmap changed since {current:#b} was read, retrying");
        }

        debug!(attempts, "gave up on bitmap update");
        Err(Error::ContentionExceeded { attempts })
    }
}

impl<A: StorageAccessor + Default> Default for ReservationEngine<A> {
    fn default() -> Self {
        Self::new(A::default())
    }
}
