//! Locating free runs inside a [Bitmask].
//!
//! Every scan here steps over whole runs at a time using leading-zero and leading-one counts, so
//! the cost depends on how fragmented the mask is rather than on its width.

use core::iter::FusedIterator;

use crate::types::{BitCount, BitPosition, Bitmask, Run};

/// Where to place a run when more than one free run is large enough.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Default)]
pub enum Fit {
    /// The lowest position at which the run fits.
    #[default]
    First,
    /// The highest position at which the run fits, i.e. the tail of the last adequate free run.
    Last,
    /// The head of the smallest adequate free run.
    Smallest,
    /// The head of the largest free run.
    Largest,
}

/// A mask with the `bits` slots starting at `position` set.
///
/// # Panics
///
/// Panics if the run does not fit inside `M`, i.e. if `position + bits` exceeds `M::WIDTH` or
/// overflows.
#[inline]
pub fn run_mask<M: Bitmask>(position: BitPosition, bits: BitCount) -> M {
    assert!(
        position.checked_add(bits).is_some_and(|end: BitPosition| end <= M::WIDTH),
        "run of {bits} slots at {position} does not fit in {} slots",
        M::WIDTH
    );
    M::FULL
        .shift_towards_msb(M::WIDTH - bits)
        .shift_towards_lsb(position)
}

/// Find the lowest position at which `bits` consecutive free slots start in `mask`.
///
/// A request for 0 slots is satisfied at position 0.
///
/// # Panics
///
/// Panics if the scan fails to settle within `M::WIDTH` passes, which would mean the run
/// accounting itself is broken.
pub fn find_free_run<M: Bitmask>(mask: M, bits: BitCount) -> Option<BitPosition> {
    let width: BitCount = M::WIDTH;
    let mut unscanned: M = mask;
    let mut index: BitPosition = 0;

    // each pass past the first consumes a free run and an occupied run
    for _ in 0..width {
        let remaining: BitCount = width - index;
        if remaining < bits {
            return None;
        }

        // the shifts below pull zeros in at the bottom, which are not slots
        let free: BitCount = unscanned.leading_zeros().min(remaining);
        if free >= bits {
            return Some(index);
        }
        unscanned = unscanned.shift_towards_msb(free);
        index += free;

        let used: BitCount = unscanned.leading_ones();
        unscanned = unscanned.shift_towards_msb(used);
        index += used;
    }

    panic!(
        "scan for {bits} free slots in {mask:#b} did not settle within {width} passes (stopped at slot {index})"
    );
}

/// Find where to place `bits` consecutive free slots in `mask` according to `fit`.
///
/// [Fit::First] is exactly [find_free_run]. A request for 0 slots is satisfied at position 0
/// under every policy.
pub fn find_run<M: Bitmask>(mask: M, bits: BitCount, fit: Fit) -> Option<BitPosition> {
    if bits == 0 {
        return Some(0);
    }
    let adequate = free_runs(mask).filter(|run: &Run| run.len >= bits);
    match fit {
        Fit::First => find_free_run(mask, bits),
        Fit::Last => adequate.last().map(|run: Run| run.end() - bits),
        Fit::Smallest => adequate.min_by_key(|run: &Run| run.len).map(|run: Run| run.start),
        Fit::Largest => adequate
            .max_by(|a: &Run, b: &Run| a.len.cmp(&b.len).then_with(|| b.start.cmp(&a.start)))
            .map(|run: Run| run.start),
    }
}

/// Iterate over the maximal free runs of `mask` in position order.
pub fn free_runs<M: Bitmask>(mask: M) -> FreeRuns<M> {
    FreeRuns {
        unscanned: mask,
        index: 0,
    }
}

/// Iterator returned by [free_runs].
#[derive(Debug, Clone)]
pub struct FreeRuns<M: Bitmask> {
    unscanned: M,
    index: BitPosition,
}

impl<M: Bitmask> Iterator for FreeRuns<M> {
    type Item = Run;

    fn next(&mut self) -> Option<Run> {
        let used: BitCount = self.unscanned.leading_ones();
        self.unscanned = self.unscanned.shift_towards_msb(used);
        self.index += used;
        if self.index >= M::WIDTH {
            return None;
        }

        let free: BitCount = self.unscanned.leading_zeros().min(M::WIDTH - self.index);
        let run: Run = Run::new(self.index, free);
        self.unscanned = self.unscanned.shift_towards_msb(free);
        self.index += free;
        Some(run)
    }
}

impl<M: Bitmask> FusedIterator for FreeRuns<M> {}
