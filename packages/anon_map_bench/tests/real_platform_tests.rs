//! Integration tests against the real operating system: fork-based visibility of
//! the shared mapping across the process boundary, and a full benchmark run
//! through the public API.

use std::time::Duration;

use anon_map_bench::{SampleOptions, SharedRegion, SizeSchedule, WriteStrategy, run_benchmark};
use new_zealand::nz;
use nonempty::nonempty;

/// Forks, runs `child` in the child process (exiting with its return value), and
/// returns the child's exit status to the caller.
fn fork_and_reap(child: impl FnOnce() -> u8) -> u8 {
    // SAFETY: The child branch runs only the provided closure and _exit; it does
    // not return into the test harness.
    let pid = unsafe { libc::fork() };
    assert!(pid >= 0, "fork failed");

    if pid == 0 {
        let code = child();

        // SAFETY: _exit skips atexit handlers and stdio flushing that belong to
        // the parent's copy of the test harness.
        unsafe { libc::_exit(i32::from(code)) }
    }

    let mut status = 0;

    // SAFETY: Blocking wait on our own child.
    let waited = unsafe { libc::waitpid(pid, &raw mut status, 0) };
    assert_eq!(waited, pid);

    assert!(libc::WIFEXITED(status), "child did not exit normally");
    u8::try_from(libc::WEXITSTATUS(status)).expect("exit status is a single byte")
}

#[test]
fn parent_write_is_visible_to_child() {
    let mut region = SharedRegion::create(nz!(4096)).unwrap();

    // SAFETY: The child branch polls the mapping and calls _exit; it never
    // returns into the test harness.
    let pid = unsafe { libc::fork() };
    assert!(pid >= 0, "fork failed");

    if pid == 0 {
        // Child: wait for the parent's write to land, report what we saw.
        let mut observed = 0;
        for _ in 0..5000 {
            observed = region.bytes()[0];
            if observed != 0 {
                break;
            }
            std::thread::sleep(Duration::from_millis(1));
        }

        // SAFETY: _exit skips cleanup that belongs to the parent's harness.
        unsafe { libc::_exit(i32::from(observed)) }
    }

    // Parent: write into our own view of the mapping while the child polls.
    region.bytes_mut()[0] = 42;

    let mut status = 0;

    // SAFETY: Blocking wait on our own child.
    let waited = unsafe { libc::waitpid(pid, &raw mut status, 0) };
    assert_eq!(waited, pid);

    assert!(libc::WIFEXITED(status), "child did not exit normally");
    assert_eq!(libc::WEXITSTATUS(status), 42);
}

#[test]
fn child_write_is_visible_to_parent() {
    let mut region = SharedRegion::create(nz!(4096)).unwrap();

    let exit_code = fork_and_reap(|| {
        region.bytes_mut()[7] = 99;
        0
    });
    assert_eq!(exit_code, 0);

    // The child has been reaped, so its write has happened.
    assert_eq!(region.bytes()[7], 99);
}

#[test]
fn end_to_end_run_produces_expected_reports() {
    let schedule = SizeSchedule::new(nonempty![nz!(128), nz!(1024)]);
    let options = SampleOptions {
        sample_count: nz!(5),
        settle: Duration::ZERO,
    };

    let mut reports = Vec::new();

    run_benchmark(
        &schedule,
        WriteStrategy::BulkFill,
        nz!(4096),
        &options,
        |report| reports.push(report.clone()),
    )
    .unwrap();

    assert_eq!(reports.len(), 2);

    let sizes: Vec<usize> = reports.iter().map(|r| r.size.get()).collect();
    assert_eq!(sizes, vec![128, 1024]);

    for report in &reports {
        assert_eq!(report.sample_count, 5);
        assert!(report.megabytes_per_sec > 0.0);
        assert!(report.elapsed > Duration::ZERO);
        assert!(report.min_ticks <= report.max_ticks);
    }
}
