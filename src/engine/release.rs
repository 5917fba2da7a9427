use tracing::{instrument, trace};

use crate::accessor::StorageAccessor;
use crate::engine::ReservationEngine;
use crate::err::Error;
use crate::run::run_mask;
use crate::types::{BitCount, BitPosition};

impl<A: StorageAccessor> ReservationEngine<A> {
    /// Mark the `bits` slots starting at `position` as free again and return `position`.
    ///
    /// Releasing 0 slots succeeds without touching the bitmap, whatever `position` is.
    ///
    /// Fails with [Error::TooLarge] if the run does not fit in the bitmap, with
    /// [Error::AlreadyFree] if any slot of the run is free in the bitmap as read, and with
    /// [Error::ContentionExceeded] if other writers kept changing the bitmap.
    #[instrument(level = "trace", skip(self))]
    pub fn release(&self, position: BitPosition, bits: BitCount) -> Result<BitPosition, Error> {
        if bits == 0 {
            return Ok(position);
        }

        let width: BitCount = self.width();
        let fits: bool = position.checked_add(bits).is_some_and(|end| end <= width);
        if !fits {
            trace!("run reaches past the end of the bitmap");
            return Err(Error::TooLarge { position, bits, width });
        }

        let release_mask: A::Mask = run_mask(position, bits);
        self.update(|current: A::Mask| {
            // TODO: a concurrent release narrowing the bitmap between our read and this check is
            // reported as AlreadyFree too; retrying once on a changed bitmap would tell them apart
            if (current & release_mask) != release_mask {
                trace!("some of the run is already free in {current:#b}");
                return Err(Error::AlreadyFree { position, bits });
            }
            Ok((position, current & !release_mask))
        })
    }
}
