//! A fast, reduced benchmark run: two small transfer sizes, five samples each,
//! every write strategy. Completes in well under a second, unlike the full
//! reference configuration.

use std::time::Duration;

use anon_map_bench::{SampleOptions, SizeSchedule, WriteStrategy, run_benchmark};
use new_zealand::nz;
use nonempty::nonempty;

fn main() {
    let schedule = SizeSchedule::new(nonempty![nz!(128), nz!(1024)]);

    let options = SampleOptions {
        sample_count: nz!(5),
        settle: Duration::ZERO,
    };

    for strategy in WriteStrategy::all() {
        println!("strategy: {strategy}");

        run_benchmark(&schedule, strategy, nz!(4096), &options, |report| {
            println!(
                "  {} bytes: min {} / mean {:.1} / max {} ticks, {:.2} MB/s",
                report.size,
                report.min_ticks,
                report.mean_ticks,
                report.max_ticks,
                report.megabytes_per_sec
            );
        })
        .expect("benchmark setup failed");
    }
}
