use freebits::err::Error;
use freebits::types::Run;
use freebits::{AtomicAccessor, ReservationEngine};
use tracing::debug;

cfg_if::cfg_if! {
    if #[cfg(loom)] {
        pub(crate) use loom::sync::Arc;
        pub(crate) use loom::thread;
    } else if #[cfg(feature = "shuttle")] {
        pub(crate) use shuttle::sync::Arc;
        pub(crate) use shuttle::thread;
    } else {
        pub(crate) use std::sync::Arc;
        pub(crate) use std::thread;
    }
}

type Engine = ReservationEngine<AtomicAccessor<u8>>;

/// Every result of a racing reserve is either a run or a failure that a racing reserve can cause.
fn collect_runs(results: Vec<(u32, Result<u32, Error>)>) -> Vec<Run> {
    results
        .into_iter()
        .filter_map(|(bits, result)| match result {
            Ok(position) => Some(Run::new(position, bits)),
            Err(Error::NoSpace { .. }) | Err(Error::ContentionExceeded { .. }) => None,
            Err(error) => panic!("unexpected failure reserving {bits} slots: {error}"),
        })
        .collect()
}

fn assert_disjoint_and_accounted(engine: &Engine, runs: &[Run]) {
    for (i, run) in runs.iter().enumerate() {
        assert!(
            runs[i + 1..].iter().all(|other| !other.overlaps(run)),
            "{run:?} handed out twice in {runs:?}"
        );
    }
    let reserved: u32 = runs.iter().map(|run| run.len).sum();
    assert_eq!(engine.occupied(), reserved);
}

/// `NUM_THREADS` threads each reserve `bits` slots from one empty width-8 bitmap at the same
/// time. No two threads may end up with overlapping runs, and releasing every run afterwards
/// must leave the bitmap empty.
pub(crate) fn concurrency_test<const NUM_THREADS: usize>(bits: u32, contention_limit: u32) {
    let engine: Arc<Engine> = Arc::new(ReservationEngine::with_contention_limit(
        AtomicAccessor::new(0),
        contention_limit,
    ));

    let join_handles: Vec<thread::JoinHandle<(u32, Result<u32, Error>)>> = (0..NUM_THREADS)
        .map(|_| {
            let engine: Arc<Engine> = engine.clone();
            thread::spawn(move || (bits, engine.reserve(bits)))
        })
        .collect();

    let results: Vec<(u32, Result<u32, Error>)> = join_handles
        .into_iter()
        .map(|join_handle| join_handle.join().expect("A thread panicked"))
        .collect();
    debug!("reservation results: {results:?}");

    let runs: Vec<Run> = collect_runs(results);
    assert_disjoint_and_accounted(&engine, &runs);

    for run in &runs {
        assert_eq!(engine.release(run.start, run.len), Ok(run.start));
    }
    assert_eq!(engine.occupied(), 0);
}

/// One thread releases a run while another reserves a run of the same size. The reservation may
/// land either in the space being released or after it, but never on top of a held slot.
pub(crate) fn release_while_reserving_test(contention_limit: u32) {
    let engine: Arc<Engine> = Arc::new(ReservationEngine::with_contention_limit(
        AtomicAccessor::new(0b1110_0000),
        contention_limit,
    ));

    let releaser: thread::JoinHandle<Result<u32, Error>> = {
        let engine: Arc<Engine> = engine.clone();
        thread::spawn(move || engine.release(0, 3))
    };
    let reserver: thread::JoinHandle<(u32, Result<u32, Error>)> = {
        let engine: Arc<Engine> = engine.clone();
        thread::spawn(move || (3, engine.reserve(3)))
    };

    let released: Result<u32, Error> = releaser.join().expect("A thread panicked");
    let reserved: (u32, Result<u32, Error>) = reserver.join().expect("A thread panicked");
    debug!("released: {released:?}, reserved: {reserved:?}");

    let mut runs: Vec<Run> = collect_runs(vec![reserved]);
    if let Some(run) = runs.first() {
        assert!(run.start == 0 || run.start == 3, "unexpected placement {run:?}");
    }
    match released {
        Ok(position) => assert_eq!(position, 0),
        // the original run is still held
        Err(Error::ContentionExceeded { .. }) => runs.push(Run::new(0, 3)),
        Err(error) => panic!("unexpected failure releasing: {error}"),
    }
    assert_disjoint_and_accounted(&engine, &runs);
}
