use tracing::{instrument, trace};

use crate::accessor::StorageAccessor;
use crate::engine::ReservationEngine;
use crate::err::Error;
use crate::run::{find_run, run_mask, Fit};
use crate::types::{BitCount, BitPosition};

impl<A: StorageAccessor> ReservationEngine<A> {
    /// Mark the first free run of `bits` slots as occupied and return where it starts.
    ///
    /// Reserving 0 slots succeeds at position 0 without touching the bitmap.
    ///
    /// Fails with [Error::TooLarge] if `bits` exceeds the width of the bitmap, with
    /// [Error::NoSpace] if the bitmap as read has no free run that long, and with
    /// [Error::ContentionExceeded] if other writers kept changing the bitmap.
    #[instrument(level = "trace", skip(self))]
    pub fn reserve(&self, bits: BitCount) -> Result<BitPosition, Error> {
        self.reserve_with(bits, Fit::First)
    }

    /// Like [ReservationEngine::reserve], but choosing among adequate free runs with `fit`.
    #[instrument(level = "trace", skip(self))]
    pub fn reserve_with(&self, bits: BitCount, fit: Fit) -> Result<BitPosition, Error> {
        if bits == 0 {
            return Ok(0);
        }

        let width: BitCount = self.width();
        if bits > width {
            trace!("request is wider than the bitmap");
            return Err(Error::TooLarge { position: 0, bits, width });
        }

        self.update(|current: A::Mask| {
            // a snapshot without room is final, even if a later read might have had some
            let position: BitPosition = find_run(current, bits, fit).ok_or_else(|| {
                trace!("no free run in {current:#b}");
                Error::NoSpace { bits }
            })?;
            Ok((position, current | run_mask::<A::Mask>(position, bits)))
        })
    }
}
