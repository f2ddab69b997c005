//! SysTick timebase: millisecond counter and blocking delays.
//!
//! [`init()`] programs the core SysTick timer to fire once per millisecond;
//! the exception handler increments a shared counter. [`delay_ms`] waits on
//! that counter, [`delay_us`] measures the down-counting hardware register
//! directly, so it works without the interrupt but only below one reload
//! period.

use core::sync::atomic::{AtomicU32, Ordering};

use cortex_m::peripheral::syst::SystClkSource;
use cortex_m::peripheral::SYST;

use crate::time::Hertz;

/// Milliseconds since `init()`. Written only by the SysTick exception
/// handler, read by any number of foreground callers; a 32-bit load/store is
/// a single access on this core, so no further synchronization is needed.
/// Wraps modulo 2^32, i.e. after ~49.7 days of uptime.
static MS_COUNTER: AtomicU32 = AtomicU32::new(0);

/// Hardware ticks per microsecond, written once by `init()`.
static TICKS_PER_US: AtomicU32 = AtomicU32::new(0);

/// Start the timebase from the resolved system clock.
///
/// Must run after the clock tree is brought up: both the reload value and the
/// microsecond tick rate are derived from `sysclk`.
pub(crate) unsafe fn init(sysclk: Hertz) {
    let reload = sysclk.0 / 1_000;
    // SysTick is a 24-bit counter; every supported clock plan fits.
    assert!(reload - 1 <= 0x00FF_FFFF, "systick: sysclk too fast for a 1 ms reload");

    MS_COUNTER.store(0, Ordering::Relaxed); // start a new epoch
    TICKS_PER_US.store(sysclk.0 / 1_000_000, Ordering::Relaxed);

    let mut syst = cortex_m::Peripherals::steal().SYST;
    syst.set_clock_source(SystClkSource::Core);
    syst.set_reload(reload - 1);
    syst.clear_current();
    syst.enable_counter();
    syst.enable_interrupt();
}

/// Milliseconds since the timebase was started, wrapping modulo 2^32.
#[inline]
pub fn now_ms() -> u32 {
    MS_COUNTER.load(Ordering::Relaxed)
}

/// Busy-wait for at least `ms` milliseconds.
///
/// `delay_ms(0)` returns immediately. The wait window is evaluated with
/// modular arithmetic, so it stays correct when the counter wraps past 2^32
/// during the wait.
pub fn delay_ms(ms: u32) {
    let start = now_ms();
    while still_waiting(start, now_ms(), ms) {}
}

/// Busy-wait for `us` microseconds against the raw SysTick counter.
///
/// Valid for waits below one reload period (1 ms); longer waits belong to
/// [`delay_ms`]. The constant overhead of entering the delay is compensated
/// by a calibrated correction of ~3/4 of a tick period, so accuracy is within
/// hardware-tick granularity, not a hard real-time guarantee.
pub fn delay_us(us: u32) {
    let tpus = TICKS_PER_US.load(Ordering::Relaxed);
    let n = us.saturating_mul(tpus).saturating_sub(fuzz_ticks(tpus));
    if n == 0 {
        return;
    }

    let reload = SYST::get_reload();
    debug_assert!(n <= reload, "delay_us beyond one reload period, use delay_ms");

    let start = SYST::get_current();
    while elapsed_ticks(start, SYST::get_current(), reload) < n {}
}

/// `true` while `now` is still inside the half-open window `[start, start+dur)`.
#[inline]
fn still_waiting(start: u32, now: u32, dur: u32) -> bool {
    now.wrapping_sub(start) < dur
}

/// Elapsed ticks on a down-counter that wraps from 0 back to `reload`
/// (not to the top of the register).
#[inline]
fn elapsed_ticks(start: u32, current: u32, reload: u32) -> u32 {
    if current <= start {
        start - current
    } else {
        start + reload + 1 - current
    }
}

/// Fixed overhead correction: approximately 3/4 of one tick period.
#[inline]
const fn fuzz_ticks(ticks_per_us: u32) -> u32 {
    ticks_per_us - (ticks_per_us >> 2)
}

/// The timebase tick. Sole writer of `MS_COUNTER`.
#[cfg(feature = "rt")]
#[cortex_m_rt::exception]
fn SysTick() {
    MS_COUNTER.store(MS_COUNTER.load(Ordering::Relaxed).wrapping_add(1), Ordering::Relaxed);
}

/// Delay provider backed by the timebase, for drivers that take the
/// embedded-hal delay traits.
pub struct Delay;

impl embedded_hal_1::delay::DelayNs for Delay {
    fn delay_ns(&mut self, ns: u32) {
        delay_us(ns.div_ceil(1_000));
    }

    fn delay_us(&mut self, us: u32) {
        let ms = us / 1_000;
        if ms > 0 {
            delay_ms(ms);
        }
        let rem = us % 1_000;
        if rem > 0 {
            delay_us(rem);
        }
    }

    fn delay_ms(&mut self, ms: u32) {
        delay_ms(ms);
    }
}

impl embedded_hal_02::blocking::delay::DelayMs<u32> for Delay {
    fn delay_ms(&mut self, ms: u32) {
        delay_ms(ms);
    }
}

impl embedded_hal_02::blocking::delay::DelayMs<u16> for Delay {
    fn delay_ms(&mut self, ms: u16) {
        delay_ms(ms as u32);
    }
}

impl embedded_hal_02::blocking::delay::DelayUs<u32> for Delay {
    fn delay_us(&mut self, us: u32) {
        delay_us(us);
    }
}

impl embedded_hal_02::blocking::delay::DelayUs<u16> for Delay {
    fn delay_us(&mut self, us: u16) {
        delay_us(us as u32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_delay_window_is_already_closed() {
        assert!(!still_waiting(1234, 1234, 0));
    }

    #[test]
    fn window_closes_after_duration() {
        let start = 1000;
        assert!(still_waiting(start, start, 5));
        assert!(still_waiting(start, start + 4, 5));
        assert!(!still_waiting(start, start + 5, 5));
        assert!(!still_waiting(start, start + 6, 5));
    }

    #[test]
    fn window_survives_counter_wraparound() {
        // The counter passes through 2^32 while the window is open.
        let start = u32::MAX - 2;
        assert!(still_waiting(start, u32::MAX - 2, 6));
        assert!(still_waiting(start, u32::MAX, 6));
        assert!(still_waiting(start, 0, 6)); // wrapped, 3 elapsed
        assert!(still_waiting(start, 2, 6)); // 5 elapsed
        assert!(!still_waiting(start, 3, 6)); // 6 elapsed, done
    }

    #[test]
    fn counter_difference_is_modular() {
        let before: u32 = 0xFFFF_FFF0;
        let n: u32 = 0x20;
        let after = before.wrapping_add(n);
        assert_eq!(after.wrapping_sub(before), n);
    }

    #[test]
    fn elapsed_ticks_without_wrap() {
        // 72 MHz plan: reload = 71_999, counter runs down.
        assert_eq!(elapsed_ticks(1000, 400, 71_999), 600);
        assert_eq!(elapsed_ticks(1000, 1000, 71_999), 0);
    }

    #[test]
    fn elapsed_ticks_across_reload_wrap() {
        // The counter wraps from 0 back to the reload value, so the modulus
        // is reload + 1.
        assert_eq!(elapsed_ticks(100, 71_900, 71_999), 200);
        assert_eq!(elapsed_ticks(0, 71_999, 71_999), 1);
    }

    #[test]
    fn fuzz_is_three_quarters_of_a_tick() {
        assert_eq!(fuzz_ticks(72), 54);
        assert_eq!(fuzz_ticks(100), 75);
        assert_eq!(fuzz_ticks(48), 36);
    }

    #[test]
    fn sub_fuzz_requests_do_not_underflow() {
        let tpus = 72;
        let n = 0u32.saturating_mul(tpus).saturating_sub(fuzz_ticks(tpus));
        assert_eq!(n, 0);
    }
}
