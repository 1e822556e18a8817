//! Measures how write latency into an anonymous shared memory mapping scales with
//! transfer size.
//!
//! The benchmark forks itself into a process pair around a single `MAP_ANON |
//! MAP_SHARED` mapping. The child (the *filler*) writes the mapping once to
//! establish a deterministic starting state and then parks; the parent (the
//! *driver*) times individual writes into the mapping with the hardware cycle
//! counter, walking an ascending schedule of transfer sizes and reducing each
//! batch of samples with an outlier-trimmed mean.
//!
//! This is a measurement tool, not an IPC library: the shared mapping, the
//! process split and the signal-based teardown exist to make the measured writes
//! land in genuinely process-shared pages, nothing more.
//!
//! # Quick start
//!
//! ```no_run
//! use anon_map_bench::{
//!     SampleOptions, SizeSchedule, WriteStrategy, run_benchmark,
//! };
//! use new_zealand::nz;
//!
//! run_benchmark(
//!     &SizeSchedule::default(),
//!     WriteStrategy::ByteFill,
//!     nz!(4096),
//!     &SampleOptions::default(),
//!     |report| {
//!         println!(
//!             "{} bytes: {:.2} MB/s (mean {:.1} ticks/write)",
//!             report.size, report.megabytes_per_sec, report.mean_ticks
//!         );
//!     },
//! )
//! .expect("benchmark setup failed");
//! ```
//!
//! # Pieces
//!
//! The individual stages are public so they can be exercised separately:
//! [`SharedRegion`] (the mapping), [`FillerProcess`] (the split and its teardown
//! guard), [`sample_writes`] (one timed batch), [`reduce`] (the statistics), and
//! [`WriteStrategy`] (the three interchangeable write loops).
//!
//! Only Linux-like systems are supported, on x86_64 or aarch64 - the cycle
//! counter and the fork-based process pair are inherently platform-specific.

mod cycles;
mod errors;
mod pair;
mod region;
mod run;
mod sampler;
mod schedule;
mod staging;
mod stats;
mod strategy;

pub use cycles::CycleClock;
pub use errors::Error;
pub use pair::FillerProcess;
pub use region::SharedRegion;
pub use run::run_benchmark;
pub use sampler::{SampleBatch, SampleOptions, sample_writes};
pub use schedule::SizeSchedule;
pub use staging::StagingBuffer;
pub use stats::{ThroughputReport, reduce};
pub use strategy::WriteStrategy;
