use std::num::NonZero;
use std::thread;
use std::time::{Duration, Instant};

use new_zealand::nz;

use crate::cycles::CycleClock;
use crate::region::SharedRegion;
use crate::staging::StagingBuffer;
use crate::strategy::WriteStrategy;

/// Controls how one batch of timed writes is collected.
#[derive(Clone, Debug)]
pub struct SampleOptions {
    /// Number of timed writes per transfer size. Must be at least 3 because the
    /// statistics reduction discards one minimum and one maximum sample.
    pub sample_count: NonZero<usize>,

    /// Pause before each batch, decoupling it from the previous size's cache and
    /// scheduler effects.
    pub settle: Duration,
}

impl Default for SampleOptions {
    /// 1000 samples per size with a one second settling delay, the reference
    /// configuration.
    fn default() -> Self {
        Self {
            sample_count: nz!(1000),
            settle: Duration::from_secs(1),
        }
    }
}

/// One transfer size's raw measurements: per-write cycle counts plus the
/// wall-clock bracket around the whole batch.
///
/// Produced by [`sample_writes`], consumed immediately by
/// [`reduce`][crate::stats::reduce], not retained across sizes.
#[derive(Clone, Debug)]
pub struct SampleBatch {
    /// The transfer size each write touched.
    pub size: NonZero<usize>,

    /// Cycle-counter delta for each individual write, in collection order.
    pub ticks: Vec<u64>,

    /// Wall-clock time for the whole batch, outliers included.
    pub elapsed: Duration,
}

/// Performs one batch of timed writes into the region and collects the raw
/// measurements.
///
/// Each write touches exactly `size` bytes starting at the region's base, using
/// the given strategy with `staging` as the source material. A settling delay is
/// taken before any timing begins.
///
/// # Panics
///
/// Panics if `options.sample_count` is below 3 or `size` exceeds the region's
/// capacity. Both are precondition violations, checked before any timing occurs.
#[must_use]
pub fn sample_writes(
    region: &mut SharedRegion,
    size: NonZero<usize>,
    strategy: WriteStrategy,
    staging: &StagingBuffer,
    options: &SampleOptions,
) -> SampleBatch {
    let sample_count = options.sample_count.get();
    assert!(
        sample_count >= 3,
        "sample_count must be at least 3 so the min/max trim leaves samples to average"
    );
    assert!(
        size.get() <= region.capacity(),
        "transfer size {size} exceeds region capacity {}",
        region.capacity()
    );

    let mut ticks = Vec::with_capacity(sample_count);
    let clock = CycleClock::new();

    thread::sleep(options.settle);

    let extent = region
        .bytes_mut()
        .get_mut(..size.get())
        .expect("size was checked against capacity above");

    let wall_start = Instant::now();

    for _ in 0..sample_count {
        let start = clock.read();
        strategy.write(extent, staging);
        let stop = clock.read();

        ticks.push(stop.saturating_sub(start));
    }

    let elapsed = wall_start.elapsed();

    SampleBatch {
        size,
        ticks,
        elapsed,
    }
}
