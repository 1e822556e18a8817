/// A thin wrapper over the hardware cycle counter.
///
/// Reading the counter is a single unprivileged instruction, so this is cheap enough
/// to bracket individual memory writes. The value is monotonically non-decreasing
/// within a single benchmark run on one core; it is not meaningful across cores,
/// across runs or as wall-clock time. Use [`std::time::Instant`] for wall-clock
/// measurement.
///
/// Only x86_64 and aarch64 are supported. Other architectures fail at build time,
/// which is intentional: there is no portable fallback that would preserve the
/// sub-microsecond resolution this benchmark depends on.
///
/// # Example
///
/// ```
/// use anon_map_bench::CycleClock;
///
/// let clock = CycleClock::new();
/// let start = clock.read();
/// let stop = clock.read();
/// assert!(stop >= start);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct CycleClock;

impl CycleClock {
    /// Creates a new cycle clock. This is free; the type carries no state.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Reads the current cycle counter value.
    #[inline]
    #[must_use]
    pub fn read(&self) -> u64 {
        read_cycle_counter()
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn read_cycle_counter() -> u64 {
    // SAFETY: RDTSC has no preconditions; it only reads the timestamp counter.
    unsafe { core::arch::x86_64::_rdtsc() }
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn read_cycle_counter() -> u64 {
    let value: u64;

    // SAFETY: CNTVCT_EL0 is readable from EL0 on Linux; the read has no side effects.
    unsafe {
        core::arch::asm!("mrs {value}, cntvct_el0", value = out(reg) value, options(nomem, nostack));
    }

    value
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
compile_error!("anon_map_bench requires a hardware cycle counter (x86_64 or aarch64)");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_are_monotonic_on_one_thread() {
        let clock = CycleClock::new();

        let mut previous = clock.read();

        for _ in 0..1000 {
            let current = clock.read();
            assert!(current >= previous);
            previous = current;
        }
    }

    #[test]
    fn counter_advances_across_real_work() {
        let clock = CycleClock::new();

        let start = clock.read();
        std::thread::sleep(std::time::Duration::from_millis(1));
        let stop = clock.read();

        assert!(stop > start);
    }
}
