use std::io;

use crate::errors::{Error, Result};
use crate::region::SharedRegion;

/// Handle to the filler side of the driver/filler process pair.
///
/// [`split()`][Self::split] forks the calling process. The child becomes the
/// filler: it writes the shared region's entire capacity once, establishing a
/// deterministic all-zero starting state, then parks until it receives `SIGTERM`.
/// It never returns from `split()`. The parent becomes the driver and receives
/// this handle.
///
/// The handle is a scoped teardown guard: dropping it sends `SIGTERM` to the
/// filler and reaps it, on every driver exit path including panics and early
/// errors. The one teardown gap this cannot cover is the driver itself dying to
/// `SIGKILL`, in which case the filler stays parked until killed externally.
#[derive(Debug)]
pub struct FillerProcess {
    pid: libc::pid_t,
}

impl FillerProcess {
    /// Forks the calling process into the driver/filler pair.
    ///
    /// Must be called after `region` is created and before any measurement, so
    /// both processes share the same physical pages. The caller must be
    /// single-threaded at this point; forking a multi-threaded process leaves the
    /// child with dead locks it cannot reason about.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SpawnFailed`] when the process cannot be duplicated
    /// (process or memory limits). Fatal; no measurement has happened yet.
    pub fn split(region: &mut SharedRegion) -> Result<Self> {
        // SAFETY: Forking duplicates the process; we immediately diverge into the
        // filler path in the child, which touches only the shared region and libc.
        let pid = unsafe { libc::fork() };

        match pid {
            -1 => Err(Error::SpawnFailed {
                source: io::Error::last_os_error(),
            }),
            0 => run_filler(region),
            child => Ok(Self { pid: child }),
        }
    }

    /// Operating system identifier of the filler process.
    #[must_use]
    pub fn id(&self) -> u32 {
        u32::try_from(self.pid).expect("fork returned a valid positive pid to the parent")
    }
}

impl Drop for FillerProcess {
    fn drop(&mut self) {
        // SAFETY: The pid belongs to our direct child, which we have not reaped
        // yet, so it cannot have been recycled for an unrelated process.
        unsafe {
            libc::kill(self.pid, libc::SIGTERM);
        }

        // SAFETY: Blocking wait on our own child; no memory is passed in.
        unsafe {
            libc::waitpid(self.pid, std::ptr::null_mut(), 0);
        }
    }
}

/// The filler never returns: it initializes the region and parks until signalled.
fn run_filler(region: &mut SharedRegion) -> ! {
    let capacity = region.capacity();

    let mut private = Vec::new();
    if private.try_reserve_exact(capacity).is_err() {
        let error = Error::AllocFailed {
            len: capacity,
            purpose: "filler's private buffer",
        };
        eprintln!("{error}");

        // SAFETY: Exiting without unwinding is required in a forked child; _exit
        // skips atexit handlers and stdio flushing shared with the parent.
        unsafe { libc::_exit(1) }
    }
    private.resize(capacity, 0_u8);

    region.bytes_mut().copy_from_slice(&private);

    // Park until the driver's SIGTERM terminates us via its default disposition.
    // pause() can also return on other signals; re-park in that case.
    loop {
        // SAFETY: No arguments, suspends until a signal is delivered.
        unsafe {
            libc::pause();
        }
    }
}
