use std::num::NonZero;
use std::time::Duration;

use crate::sampler::SampleBatch;

/// The reduced statistics for one transfer size.
///
/// Immutable once produced. The reporting layer turns one of these into one output
/// line; nothing in the engine retains it.
#[derive(Clone, Debug)]
pub struct ThroughputReport {
    /// Bytes touched by each timed write.
    pub size: NonZero<usize>,

    /// Number of timed writes in the batch, before trimming.
    pub sample_count: usize,

    /// Cheapest single write, in cycles.
    pub min_ticks: u64,

    /// Most expensive single write, in cycles.
    pub max_ticks: u64,

    /// Mean cycles per write after discarding one minimum and one maximum sample.
    pub mean_ticks: f64,

    /// Wall-clock time for the whole batch, outliers included.
    pub elapsed: Duration,

    /// Effective delivery rate over the wall-clock bracket, in MiB per second.
    pub megabytes_per_sec: f64,
}

/// Reduces a batch of raw tick samples to a throughput report.
///
/// The per-write cost figures use a trimmed mean: exactly one occurrence of the
/// minimum and one of the maximum are discarded (not every duplicate), and the
/// rest are averaged. The MB/s figure deliberately does not trim: it divides the
/// full `size * sample_count` byte volume by the wall-clock bracket, outliers
/// included, so it reflects the real delivered rate while the tick statistics
/// reflect typical per-operation cost.
///
/// # Panics
///
/// Panics if the batch holds fewer than 3 samples; trimming two samples from
/// fewer leaves nothing to average. The sampler enforces this precondition, so
/// hitting it here means the batch was constructed by hand incorrectly.
#[must_use]
pub fn reduce(batch: &SampleBatch) -> ThroughputReport {
    let sample_count = batch.ticks.len();
    assert!(
        sample_count >= 3,
        "reducing a batch requires at least 3 samples, got {sample_count}"
    );

    let mut min_ticks = u64::MAX;
    let mut max_ticks = u64::MIN;
    let mut total: u128 = 0;

    for &ticks in &batch.ticks {
        min_ticks = min_ticks.min(ticks);
        max_ticks = max_ticks.max(ticks);
        total = total
            .checked_add(u128::from(ticks))
            .expect("sum of u64 samples cannot overflow u128");
    }

    let trimmed_total = total
        .checked_sub(u128::from(min_ticks))
        .and_then(|t| t.checked_sub(u128::from(max_ticks)))
        .expect("total includes at least one min and one max sample");

    let trimmed_count = sample_count
        .checked_sub(2)
        .expect("sample_count >= 3 was asserted above");

    #[expect(
        clippy::cast_precision_loss,
        reason = "statistics are inherently approximate at these magnitudes"
    )]
    let mean_ticks = trimmed_total as f64 / trimmed_count as f64;

    let elapsed_seconds = batch.elapsed.as_secs_f64();

    #[expect(
        clippy::cast_precision_loss,
        reason = "statistics are inherently approximate at these magnitudes"
    )]
    let megabytes_per_sec =
        (batch.size.get() as f64 * sample_count as f64) / (1024.0 * 1024.0 * elapsed_seconds);

    ThroughputReport {
        size: batch.size,
        sample_count,
        min_ticks,
        max_ticks,
        mean_ticks,
        elapsed: batch.elapsed,
        megabytes_per_sec,
    }
}

#[cfg(test)]
mod tests {
    use new_zealand::nz;

    use super::*;

    fn batch_of(ticks: &[u64]) -> SampleBatch {
        SampleBatch {
            size: nz!(128),
            ticks: ticks.to_vec(),
            elapsed: Duration::from_millis(10),
        }
    }

    #[test]
    fn reference_batch_reduces_to_known_values() {
        let batch = batch_of(&[10, 50, 12, 11, 9, 13, 48, 10]);

        let report = reduce(&batch);

        assert_eq!(report.min_ticks, 9);
        assert_eq!(report.max_ticks, 50);

        let sum: u64 = batch.ticks.iter().sum();
        let expected = (sum - 9 - 50) as f64 / 6.0;
        assert!((report.mean_ticks - expected).abs() < f64::EPSILON);
        assert_eq!(report.sample_count, 8);
    }

    #[test]
    fn trimmed_mean_stays_within_min_max_bounds() {
        let batch = batch_of(&[7, 3, 9, 4, 4, 8]);

        let report = reduce(&batch);

        assert!(f64::from(u32::try_from(report.min_ticks).unwrap()) <= report.mean_ticks);
        assert!(report.mean_ticks <= f64::from(u32::try_from(report.max_ticks).unwrap()));
    }

    #[test]
    fn duplicated_extremes_are_trimmed_only_once() {
        // Two copies of the minimum (1) and maximum (9); only one of each goes.
        let batch = batch_of(&[1, 1, 9, 9, 5]);

        let report = reduce(&batch);

        // (1 + 1 + 9 + 9 + 5 - 1 - 9) / 3 = 15 / 3
        assert!((report.mean_ticks - 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn identical_samples_reduce_to_that_value() {
        let batch = batch_of(&[42, 42, 42, 42]);

        let report = reduce(&batch);

        assert_eq!(report.min_ticks, 42);
        assert_eq!(report.max_ticks, 42);
        assert!((report.mean_ticks - 42.0).abs() < f64::EPSILON);
    }

    #[test]
    fn throughput_uses_untrimmed_count_and_wall_clock() {
        let batch = SampleBatch {
            size: nz!(1048576),
            ticks: vec![5, 6, 7, 8],
            elapsed: Duration::from_secs(2),
        };

        let report = reduce(&batch);

        // 1 MiB * 4 samples over 2 seconds = 2 MB/s.
        assert!((report.megabytes_per_sec - 2.0).abs() < 1e-9);
    }

    #[test]
    #[should_panic(expected = "at least 3 samples")]
    fn two_sample_batch_is_rejected() {
        drop(reduce(&batch_of(&[5, 6])));
    }

    #[test]
    fn minimal_three_sample_batch_reduces() {
        let report = reduce(&batch_of(&[3, 1, 2]));

        assert_eq!(report.min_ticks, 1);
        assert_eq!(report.max_ticks, 3);
        assert!((report.mean_ticks - 2.0).abs() < f64::EPSILON);
    }
}
