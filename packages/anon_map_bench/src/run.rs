use std::num::NonZero;

use crate::errors::Result;
use crate::pair::FillerProcess;
use crate::region::SharedRegion;
use crate::sampler::{SampleOptions, sample_writes};
use crate::schedule::SizeSchedule;
use crate::staging::StagingBuffer;
use crate::stats::{ThroughputReport, reduce};
use crate::strategy::WriteStrategy;

/// Runs the complete benchmark: region setup, process split, one sampled batch per
/// scheduled size, teardown.
///
/// Reports are handed to `on_report` one at a time, in schedule order, as soon as
/// each size's batch has been reduced. A failed run therefore leaves the reports
/// already emitted valid; nothing is retracted.
///
/// The filler process is torn down (signalled and reaped) on every exit path out
/// of this function, including panics, via the [`FillerProcess`] guard.
///
/// # Errors
///
/// Returns the first fatal setup error: [`Error::MapFailed`][crate::Error] if the
/// shared region cannot be created, [`Error::SpawnFailed`][crate::Error] if the
/// fork fails, [`Error::AllocFailed`][crate::Error] if the staging buffer cannot
/// be allocated. No retries; all are resource-exhaustion conditions.
pub fn run_benchmark(
    schedule: &SizeSchedule,
    strategy: WriteStrategy,
    staging_len: NonZero<usize>,
    options: &SampleOptions,
    mut on_report: impl FnMut(&ThroughputReport),
) -> Result<()> {
    let mut region = SharedRegion::create(schedule.max_size())?;
    let mut staging = StagingBuffer::new(staging_len)?;

    let _filler = FillerProcess::split(&mut region)?;

    let mut rng = rand::rng();

    for size in schedule.sizes() {
        staging.refill(&mut rng);

        let batch = sample_writes(&mut region, size, strategy, &staging, options);
        let report = reduce(&batch);

        on_report(&report);
    }

    Ok(())
}
