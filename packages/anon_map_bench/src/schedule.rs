use std::num::NonZero;

use nonempty::NonEmpty;

/// The ordered list of transfer sizes a benchmark run measures.
///
/// Sizes must be strictly increasing: the last entry doubles as the shared region's
/// capacity, and ascending order keeps each size's cache footprint a superset of
/// the previous one, which makes per-size comparisons meaningful.
#[derive(Clone, Debug)]
pub struct SizeSchedule {
    sizes: NonEmpty<NonZero<usize>>,
}

impl SizeSchedule {
    /// Creates a schedule from a non-empty list of sizes.
    ///
    /// # Panics
    ///
    /// Panics if the sizes are not strictly increasing.
    #[must_use]
    pub fn new(sizes: NonEmpty<NonZero<usize>>) -> Self {
        for (previous, current) in sizes.iter().zip(sizes.iter().skip(1)) {
            assert!(
                previous < current,
                "size schedule must be strictly increasing: {previous} is not below {current}"
            );
        }

        Self { sizes }
    }

    /// The sizes, in ascending order.
    pub fn sizes(&self) -> impl Iterator<Item = NonZero<usize>> + '_ {
        self.sizes.iter().copied()
    }

    /// Number of sizes in the schedule.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes
            .tail
            .len()
            .checked_add(1)
            .expect("schedule length always fits in usize")
    }

    /// Always false; the constructor requires a non-empty list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The largest size. The shared region must be at least this large.
    #[must_use]
    pub fn max_size(&self) -> NonZero<usize> {
        *self.sizes.last()
    }
}

impl Default for SizeSchedule {
    /// Powers of two from 128 bytes to 64 MiB, the reference configuration.
    fn default() -> Self {
        let sizes = (7..=26)
            .map(|exponent: u32| {
                NonZero::new(1_usize << exponent)
                    .expect("a left-shifted 1 within usize range is never zero")
            })
            .collect::<Vec<_>>();

        Self::new(NonEmpty::from_vec(sizes).expect("the exponent range 7..=26 is never empty"))
    }
}
