use std::io;

use thiserror::Error;

/// Errors that can occur while setting up the benchmark's OS resources.
///
/// Every variant represents a resource-exhaustion condition that retrying would not
/// resolve, so callers are expected to treat all of them as fatal: render the error
/// (the underlying OS error code is included) and exit nonzero. Report lines already
/// emitted for completed transfer sizes remain valid.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The anonymous shared mapping could not be created, typically due to
    /// address-space or memory exhaustion.
    #[error("failed to create anonymous shared mapping of {capacity} bytes: {source}")]
    MapFailed {
        /// The capacity that was requested from the operating system.
        capacity: usize,

        /// The OS error returned by the mapping call.
        source: io::Error,
    },

    /// The process could not be split into the driver/filler pair.
    #[error("failed to fork the filler process: {source}")]
    SpawnFailed {
        /// The OS error returned by the process-creation call.
        source: io::Error,
    },

    /// An auxiliary heap buffer (staging buffer or the filler's private buffer)
    /// could not be allocated.
    #[error("failed to allocate {len}-byte buffer for {purpose}")]
    AllocFailed {
        /// Size of the allocation that failed.
        len: usize,

        /// What the buffer would have been used for.
        purpose: &'static str,
    },
}

/// A specialized `Result` type for benchmark setup operations, returning the
/// crate's [`Error`] type as the error value.
pub(crate) type Result<T> = std::result::Result<T, Error>;
