//! Cycle Counter Delays
//!
//! Busy waits measured against the CPU cycle counter. The crash screen runs after the
//! rest of the system has stopped, so timer interrupts cannot be relied on.

/// Rate of the CPU cycle counter in Hz
pub const OS_CPU_COUNTER_HZ: u64 = 46_875_000;

/// Free-running hardware cycle counter
pub trait CycleCounter {
    /// Current 32-bit counter value; it wraps around
    fn read_cycles(&self) -> u32;
}

/// Cycles that elapse in `ms` milliseconds at `rate_hz`
pub const fn ms_to_cycles(ms: u64, rate_hz: u64) -> u64 {
    ms * rate_hz / 1000
}

/// Busy wait for `ms` milliseconds (counter wrap-around is accounted for)
pub fn busy_wait_ms<C: CycleCounter + ?Sized>(counter: &C, ms: u64, rate_hz: u64) {
    if ms == 0 {
        return;
    }

    let target = ms_to_cycles(ms, rate_hz);
    let mut last = counter.read_cycles();
    let mut elapsed = 0u64;

    while elapsed < target {
        core::hint::spin_loop();
        let now = counter.read_cycles();
        elapsed += now.wrapping_sub(last) as u64;
        last = now;
    }
}
