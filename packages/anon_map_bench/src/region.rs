use std::io;
use std::num::NonZero;
use std::ptr::NonNull;
use std::slice;

use crate::errors::{Error, Result};

/// A page-aligned, zero-initialized, anonymous memory mapping shared between
/// processes.
///
/// The mapping is created with `MAP_SHARED`, so a process forked after creation
/// observes the same physical pages as its parent rather than copy-on-write
/// duplicates. Writes from either side are visible to the other. This must be
/// created **before** the process split for that sharing to take effect.
///
/// Within one process the region behaves like an owned byte buffer: exclusive
/// access through [`bytes_mut()`][Self::bytes_mut] and shared access through
/// [`bytes()`][Self::bytes]. Cross-process exclusivity is the caller's protocol to
/// uphold; the benchmark's driver/filler handshake guarantees the filler has
/// finished its single write before the driver starts mutating.
///
/// Dropping the region unmaps it. After a fork, each process holds an independent
/// mapping entry for the same pages, so each side's drop releases only its own view.
#[derive(Debug)]
pub struct SharedRegion {
    ptr: NonNull<u8>,
    capacity: NonZero<usize>,
}

impl SharedRegion {
    /// Creates an anonymous shared mapping of `capacity` bytes, readable and
    /// writable, zero-initialized by the operating system.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MapFailed`] when the operating system cannot satisfy the
    /// mapping request, e.g. due to address-space exhaustion. This is treated as
    /// fatal by the benchmark; there is no point retrying.
    pub fn create(capacity: NonZero<usize>) -> Result<Self> {
        // SAFETY: We pass a null address hint and a fresh anonymous mapping request;
        // no existing memory is affected regardless of outcome.
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                capacity.get(),
                libc::PROT_READ | libc::PROT_WRITE,
                libc::MAP_ANON | libc::MAP_SHARED,
                -1,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            return Err(Error::MapFailed {
                capacity: capacity.get(),
                source: io::Error::last_os_error(),
            });
        }

        Ok(Self {
            ptr: NonNull::new(ptr.cast::<u8>())
                .expect("mmap returned null despite not returning MAP_FAILED"),
            capacity,
        })
    }

    /// Total capacity of the mapping in bytes.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// The mapped bytes, for reading.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        // SAFETY: The mapping is valid for `capacity` bytes for the lifetime of
        // `self`, and `&self` guarantees no `&mut` aliases exist in this process.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.capacity.get()) }
    }

    /// The mapped bytes, for writing.
    #[must_use]
    pub fn bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: The mapping is valid for `capacity` bytes for the lifetime of
        // `self`, and `&mut self` guarantees exclusive access within this process.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.capacity.get()) }
    }
}

impl Drop for SharedRegion {
    fn drop(&mut self) {
        // SAFETY: We created this mapping with exactly this address and length and
        // nothing else unmaps it. Failure here leaves nothing actionable to do.
        unsafe {
            libc::munmap(self.ptr.as_ptr().cast::<libc::c_void>(), self.capacity.get());
        }
    }
}

// SAFETY: The pointer refers to a process-wide mapping that is not tied to any
// particular thread, so ownership can move freely between threads.
unsafe impl Send for SharedRegion {}

#[cfg(test)]
mod tests {
    use new_zealand::nz;

    use super::*;

    #[test]
    fn create_produces_zeroed_bytes() {
        let region = SharedRegion::create(nz!(4096)).unwrap();

        assert_eq!(region.capacity(), 4096);
        assert!(region.bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn writes_read_back_within_one_process() {
        let mut region = SharedRegion::create(nz!(128)).unwrap();

        region.bytes_mut().fill(b'x');

        assert!(region.bytes().iter().all(|&b| b == b'x'));
    }

    #[test]
    fn unreasonable_capacity_fails_with_map_error() {
        // Larger than any realistic address space grant for a single mapping.
        let absurd = NonZero::new(usize::MAX & !0xfff).unwrap();

        let result = SharedRegion::create(absurd);

        assert!(matches!(result, Err(Error::MapFailed { .. })));
    }
}
