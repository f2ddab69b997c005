#![no_std]
#![doc = include_str!("../README.md")]
#![allow(unsafe_op_in_unsafe_fn)]

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod macros;

pub mod gpio;
pub mod rcc;
pub mod systick;
pub mod time;

#[cfg(peri_dac)]
pub mod dac;
pub mod spi;
pub mod usart;

mod chips;

// Reexports
pub use chips::{peripherals, Peripherals};
pub use embassy_hal_internal::{into_ref, Peripheral, PeripheralRef};
#[cfg(feature = "unstable-pac")]
pub use stm32_metapac as pac;
#[cfg(not(feature = "unstable-pac"))]
pub(crate) use stm32_metapac as pac;

/// HAL configuration.
pub mod config {
    use crate::rcc;

    /// HAL configuration passed when initializing.
    #[non_exhaustive]
    pub struct Config {
        pub rcc: rcc::Config,
    }

    impl Default for Config {
        fn default() -> Self {
            Self {
                rcc: rcc::Config::default(),
            }
        }
    }
}
pub use config::Config;

/// Initialize the HAL with the provided configuration.
///
/// This brings up the clock tree, starts the SysTick timebase and returns the
/// peripheral singletons that can be used for creating drivers.
///
/// This should only be called once at startup, otherwise it panics.
pub fn init(config: Config) -> Peripherals {
    // Do this first, so that it panics if user is calling `init` a second time
    // before doing anything important.
    let p = Peripherals::take();

    unsafe {
        rcc::init(config.rcc);

        // The timebase derives its reload value and tick rate from the sysclk
        // that rcc::init just established and confirmed.
        systick::init(rcc::clocks().sysclk);
    }
    p
}
