//! Binary entry point for the anonymous-mapping write benchmark.
//!
//! Runs the reference configuration: powers of two from 128 bytes to 64 MiB,
//! 1000 samples per size, byte-fill writes. One report line per size goes to
//! stdout; the field order is stable because downstream tooling parses it.

use std::num::NonZero;
use std::process::ExitCode;

use anon_map_bench::{Error, SampleOptions, SizeSchedule, WriteStrategy, run_benchmark};
use argh::FromArgs;

/// Measures write throughput into an anonymous shared memory mapping across an
/// ascending schedule of transfer sizes.
#[derive(FromArgs)]
struct Args {
    /// staging buffer length in bytes for block-copy writes; defaults to the
    /// OS page size
    #[argh(positional)]
    staging_len: Option<usize>,
}

// Binary entry point - mutations would require subprocess testing which is impractical.
#[cfg_attr(test, mutants::skip)]
fn main() -> ExitCode {
    let args: Args = argh::from_env();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("{error}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), Error> {
    let staging_len = match args.staging_len {
        Some(len) => NonZero::new(len).ok_or(Error::AllocFailed {
            len: 0,
            purpose: "staging buffer",
        })?,
        None => os_page_size(),
    };

    let pid = std::process::id();

    run_benchmark(
        &SizeSchedule::default(),
        WriteStrategy::ByteFill,
        staging_len,
        &SampleOptions::default(),
        |report| {
            // Field order is consumed by external tooling; do not reorder.
            println!(
                "PID:{pid} time: min:{} max:{} Ticks Avg without min/max:{:.6} Ticks (for {} measurements) for {} Bytes ({:.2} MB/s)",
                report.min_ticks,
                report.max_ticks,
                report.mean_ticks,
                report.sample_count,
                report.size,
                report.megabytes_per_sec,
            );
        },
    )
}

/// The operating system's reported memory page size.
fn os_page_size() -> NonZero<usize> {
    // SAFETY: sysconf with a valid name has no safety requirements.
    let raw = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };

    usize::try_from(raw)
        .ok()
        .and_then(NonZero::new)
        .expect("the OS always reports a positive page size")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_a_sane_power_of_two() {
        let page_size = os_page_size().get();

        assert!(page_size.is_power_of_two());
        assert!(page_size >= 1024);
    }
}
