use std::num::NonZero;

use rand::Rng;

use crate::errors::{Error, Result};

/// The source buffer for block-copy writes, and the origin of the fill byte used by
/// all write strategies.
///
/// The buffer is allocated once, typically one OS page in size, and refilled once
/// per transfer size with a freshly chosen pseudo-random lowercase ASCII letter.
/// Using one repeated printable byte keeps the region content identical across all
/// three write strategies while still defeating any same-value write elision the
/// previous size iteration might otherwise enable.
#[derive(Debug)]
pub struct StagingBuffer {
    bytes: Vec<u8>,
    fill_value: u8,
}

impl StagingBuffer {
    /// Allocates a staging buffer of `len` bytes, initially filled with `b'a'`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AllocFailed`] if the heap allocation cannot be satisfied.
    pub fn new(len: NonZero<usize>) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len.get())
            .map_err(|_| Error::AllocFailed {
                len: len.get(),
                purpose: "staging buffer",
            })?;
        bytes.resize(len.get(), b'a');

        Ok(Self {
            bytes,
            fill_value: b'a',
        })
    }

    /// Picks a new pseudo-random lowercase letter and fills the whole buffer with
    /// it. Called once per transfer size before sampling begins.
    pub fn refill(&mut self, rng: &mut impl Rng) {
        self.fill_value = rng.random_range(b'a'..=b'z');
        self.bytes.fill(self.fill_value);
    }

    /// The byte value this buffer currently holds in every position.
    #[must_use]
    pub fn fill_value(&self) -> u8 {
        self.fill_value
    }

    /// The buffer contents.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Buffer length in bytes. Never zero.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always false; the constructor requires a non-zero length.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
