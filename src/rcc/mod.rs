//! Reset and clock control (RCC).

use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::CriticalSection;

use crate::time::Hertz;

#[cfg_attr(stm32f0, path = "f0.rs")]
#[cfg_attr(stm32f1, path = "f1.rs")]
#[cfg_attr(stm32f4, path = "f4.rs")]
mod family;
pub use family::*;

/// Whether `CLOCK_FREQS` has been initialized by `set_freqs()`.
static CLOCK_FREQS_INIT: AtomicBool = AtomicBool::new(false);

/// Cached clock tree frequencies, written once at the end of `init()`.
static mut CLOCK_FREQS: Clocks = Clocks::ZERO;

/// Resolved clock tree frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clocks {
    /// System clock (SYSCLK).
    pub sysclk: Hertz,
    /// AHB clock (HCLK).
    pub hclk: Hertz,
    /// APB1 peripheral clock. The only APB clock on F0.
    pub pclk1: Hertz,
    /// APB2 peripheral clock. Equal to PCLK1 on F0.
    pub pclk2: Hertz,
}

impl Clocks {
    const ZERO: Self = Self {
        sysclk: Hertz(0),
        hclk: Hertz(0),
        pclk1: Hertz(0),
        pclk2: Hertz(0),
    };
}

/// Sets the clock frequencies.
///
/// Safety: Sets a mutable global.
pub(crate) unsafe fn set_freqs(freqs: Clocks) {
    debug!("rcc: sysclk={} hclk={} pclk1={} pclk2={}",
        freqs.sysclk.0, freqs.hclk.0, freqs.pclk1.0, freqs.pclk2.0);
    unsafe { CLOCK_FREQS = freqs };
    CLOCK_FREQS_INIT.store(true, Ordering::Release);
}

/// Safety: Reads a mutable global. Must be called after `set_freqs()`.
pub(crate) unsafe fn get_freqs() -> &'static Clocks {
    unsafe { &*core::ptr::addr_of!(CLOCK_FREQS) }
}

/// Get the current clock configuration.
///
/// # Panics
///
/// Panics if called before `init()`.
pub fn clocks() -> &'static Clocks {
    assert!(
        CLOCK_FREQS_INIT.load(Ordering::Acquire),
        "rcc: clocks() called before init()"
    );
    unsafe { get_freqs() }
}

pub(crate) trait SealedRccEnableReset {
    fn rcc_enable() {}

    fn rcc_disable() {}

    fn rcc_reset() {}
}
#[allow(private_bounds)]
pub trait RccEnableReset: SealedRccEnableReset + 'static {}

pub(crate) trait SealedRccGetFreq {
    /// Get the bus clock feeding this peripheral.
    fn get_freq() -> Hertz;
}

#[allow(private_bounds)]
pub trait RccGetFreq: SealedRccGetFreq + 'static {
    /// Get the bus clock feeding this peripheral.
    fn frequency() -> Hertz {
        Self::get_freq()
    }
}

/// Enables peripheral `T`.
///
/// # Safety
///
/// Peripheral must not be in use.
pub fn enable_with_cs<T: RccEnableReset>(_cs: CriticalSection) {
    T::rcc_enable();
}

/// Enables peripheral `T`.
///
/// # Safety
///
/// Peripheral must not be in use.
pub fn enable<T: RccEnableReset>() {
    critical_section::with(|cs| enable_with_cs::<T>(cs));
}

/// Enables and resets peripheral `T`.
///
/// # Safety
///
/// Peripheral must not be in use.
pub fn enable_and_reset_with_cs<T: RccEnableReset>(_cs: CriticalSection) {
    T::rcc_enable();
    T::rcc_reset();
}

/// Enables and resets peripheral `T`.
///
/// # Safety
///
/// Peripheral must not be in use.
pub fn enable_and_reset<T: RccEnableReset>() {
    critical_section::with(|cs| enable_and_reset_with_cs::<T>(cs));
}

/// Disables peripheral `T`.
///
/// # Safety
///
/// Peripheral must not be in use.
pub fn disable_with_cs<T: RccEnableReset>(_cs: CriticalSection) {
    T::rcc_disable();
}

/// Disables peripheral `T`.
///
/// # Safety
///
/// Peripheral must not be in use.
pub fn disable<T: RccEnableReset>() {
    critical_section::with(|cs| disable_with_cs::<T>(cs));
}
