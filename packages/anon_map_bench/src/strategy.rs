use std::fmt::{self, Display};
use std::str::FromStr;

use crate::staging::StagingBuffer;

/// How one timed write into the shared region is performed.
///
/// All three strategies leave the target extent holding the staging buffer's
/// current fill value in every byte; only the instruction pattern differs, which is
/// the whole point of comparing them.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum WriteStrategy {
    /// Writes the fill value one byte at a time in a plain loop.
    ByteFill,

    /// Copies the staging buffer into successive offsets of the extent until it is
    /// covered. The final chunk is clipped to the remaining byte count when the
    /// extent is not a multiple of the staging buffer's length, so exactly the
    /// extent is touched - no overrun, no gap.
    BlockCopy,

    /// Sets the whole extent to the fill value in one bulk operation.
    BulkFill,
}

impl WriteStrategy {
    /// Writes `target.len()` bytes into `target` according to the strategy.
    #[inline]
    pub fn write(self, target: &mut [u8], staging: &StagingBuffer) {
        match self {
            Self::ByteFill => {
                let value = staging.fill_value();

                for byte in target.iter_mut() {
                    *byte = value;
                }
            }
            Self::BlockCopy => {
                for chunk in target.chunks_mut(staging.len()) {
                    let source = staging
                        .bytes()
                        .get(..chunk.len())
                        .expect("chunks_mut never yields a chunk longer than the staging buffer");

                    chunk.copy_from_slice(source);
                }
            }
            Self::BulkFill => {
                target.fill(staging.fill_value());
            }
        }
    }

    /// All strategies, in a fixed order. Useful for exercising every variant in one
    /// run.
    #[must_use]
    pub fn all() -> [Self; 3] {
        [Self::ByteFill, Self::BlockCopy, Self::BulkFill]
    }
}

impl Display for WriteStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ByteFill => "byte-fill",
            Self::BlockCopy => "block-copy",
            Self::BulkFill => "bulk-fill",
        };

        f.write_str(name)
    }
}

impl FromStr for WriteStrategy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "byte-fill" => Ok(Self::ByteFill),
            "block-copy" => Ok(Self::BlockCopy),
            "bulk-fill" => Ok(Self::BulkFill),
            other => Err(format!(
                "unknown write strategy '{other}' (expected byte-fill, block-copy or bulk-fill)"
            )),
        }
    }
}
