//! Clock tree bring-up for the F0 family.

use crate::pac::flash::vals::Latency;
use crate::pac::rcc::regs::{Cfgr, Cfgr2, Cfgr3, Cir, Cr, Cr2};
use crate::pac::rcc::vals::Sw;
use crate::pac::{FLASH, RCC};
use crate::time::Hertz;

use super::{set_freqs, Clocks};

pub use crate::pac::rcc::vals::{
    Hpre as AHBPrescaler, Pllmul as PllMul, Pllsrc as PllSource, Ppre as APBPrescaler,
    Prediv as PllPreDiv,
};

/// Internal RC oscillator frequency.
pub const HSI_FREQ: Hertz = Hertz(8_000_000);

/// Documented reset value of RCC_CR (HSI on, default trim).
const CR_RESET_VALUE: u32 = 0x0000_0083;

const MAX_SYSCLK: u32 = 48_000_000;

/// System clock source.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Sysclk {
    /// Internal 8 MHz RC oscillator.
    Hsi,
    /// External oscillator.
    Hse,
    /// PLL output.
    Pll,
}

/// PLL configuration.
#[derive(Clone, Copy)]
pub struct Pll {
    /// PLL reference input.
    pub src: PllSource,
    /// Pre-divider for an HSE reference. Ignored for HSI (which is fixed /2).
    pub prediv: PllPreDiv,
    /// Multiplier applied to the reference.
    pub mul: PllMul,
}

/// Clock configuration.
///
/// The `new()` plan is the canonical one for this family: HSI/2 into the PLL,
/// x12, 48 MHz system clock.
#[non_exhaustive]
pub struct ConfigBuilder {
    /// External oscillator frequency, if a crystal is fitted.
    pub hse: Option<Hertz>,
    /// System clock source.
    pub sys: Sysclk,
    /// PLL configuration, if used.
    pub pll: Option<Pll>,
    /// AHB prescaler.
    pub ahb_pre: AHBPrescaler,
    /// APB prescaler. This family has a single APB bus.
    pub apb_pre: APBPrescaler,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigBuilder {
    pub const fn new() -> Self {
        Self {
            hse: None,
            sys: Sysclk::Pll,
            pll: Some(Pll {
                src: PllSource::HSI_DIV2,
                prediv: PllPreDiv::DIV1,
                mul: PllMul::MUL12,
            }),
            ahb_pre: AHBPrescaler::DIV1,
            apb_pre: APBPrescaler::DIV1,
        }
    }

    pub const fn with_hse(mut self, hse: Hertz) -> Self {
        self.hse = Some(hse);
        self
    }

    pub const fn with_sys(mut self, sys: Sysclk) -> Self {
        self.sys = sys;
        self
    }

    pub const fn with_pll(mut self, pll: Pll) -> Self {
        self.pll = Some(pll);
        self
    }

    pub const fn with_ahb_pre(mut self, ahb_pre: AHBPrescaler) -> Self {
        self.ahb_pre = ahb_pre;
        self
    }

    pub const fn with_apb_pre(mut self, apb_pre: APBPrescaler) -> Self {
        self.apb_pre = apb_pre;
        self
    }

    /// Validate the clock configuration.
    ///
    /// Panics with a descriptive message if the configuration is invalid.
    /// Use inside `const { }` blocks to get compile-time errors.
    ///
    /// Note: Uses `::core::panic!` to bypass defmt's panic override,
    /// which is not const-compatible.
    pub const fn check(&self) {
        if let Some(hse) = self.hse {
            if hse.0 < 4_000_000 || hse.0 > 32_000_000 {
                ::core::panic!("HSE frequency out of the supported range (4-32 MHz)");
            }
        }

        match self.sys {
            Sysclk::Hse => {
                if self.hse.is_none() {
                    ::core::panic!("sysclk is set to HSE, but hse is None");
                }
            }
            Sysclk::Pll => {
                if self.pll.is_none() {
                    ::core::panic!("sysclk is set to PLL, but pll is None");
                }
            }
            Sysclk::Hsi => {}
        }

        if let Some(pll) = self.pll {
            if matches!(pll.src, PllSource::HSE_DIV_PREDIV) && self.hse.is_none() {
                ::core::panic!("PLL reference is HSE, but hse is None");
            }
        }

        if self.sysclk_hz() > MAX_SYSCLK {
            ::core::panic!("sysclk frequency exceeds the family limit (48 MHz)");
        }
    }

    /// Validate and return a [`Config`]. Use in `const { }` blocks for
    /// compile-time checking.
    pub const fn checked(self) -> Config {
        self.check();
        Config(self)
    }

    pub(crate) const fn sysclk_hz(&self) -> u32 {
        match self.sys {
            Sysclk::Hsi => HSI_FREQ.0,
            Sysclk::Hse => match self.hse {
                Some(hse) => hse.0,
                None => ::core::panic!("HSE is not configured"),
            },
            Sysclk::Pll => self.pll_hz(),
        }
    }

    pub(crate) const fn pll_hz(&self) -> u32 {
        let pll = match self.pll {
            Some(pll) => pll,
            None => ::core::panic!("PLL is not configured"),
        };
        let refclk = match pll.src {
            PllSource::HSE_DIV_PREDIV => {
                let hse = match self.hse {
                    Some(hse) => hse.0,
                    None => ::core::panic!("HSE is not configured"),
                };
                hse / (pll.prediv.to_bits() as u32 + 1)
            }
            // HSI feeds the PLL through a fixed /2.
            _ => HSI_FREQ.0 / 2,
        };
        refclk * (pll.mul.to_bits() as u32 + 2)
    }

    /// Flash wait-states mandated for the target sysclk.
    pub(crate) const fn flash_latency(&self) -> Latency {
        match self.sysclk_hz() {
            0..=24_000_000 => Latency::WS0,
            _ => Latency::WS1,
        }
    }
}

/// A validated clock configuration.
///
/// Can only be constructed via [`ConfigBuilder::checked()`], which validates
/// at compile time when used inside a `const { }` block.
pub struct Config(pub(crate) ConfigBuilder);

impl Default for Config {
    fn default() -> Self {
        ConfigBuilder::new().checked()
    }
}

const fn hpre_div(pre: AHBPrescaler) -> u32 {
    match pre {
        AHBPrescaler::DIV1 => 1,
        AHBPrescaler::DIV2 => 2,
        AHBPrescaler::DIV4 => 4,
        AHBPrescaler::DIV8 => 8,
        AHBPrescaler::DIV16 => 16,
        AHBPrescaler::DIV64 => 64,
        AHBPrescaler::DIV128 => 128,
        AHBPrescaler::DIV256 => 256,
        AHBPrescaler::DIV512 => 512,
        _ => 1,
    }
}

const fn ppre_div(pre: APBPrescaler) -> u32 {
    match pre {
        APBPrescaler::DIV1 => 1,
        APBPrescaler::DIV2 => 2,
        APBPrescaler::DIV4 => 4,
        APBPrescaler::DIV8 => 8,
        APBPrescaler::DIV16 => 16,
        _ => 1,
    }
}

pub(crate) unsafe fn init(config: Config) {
    let config = config.0;
    config.check();

    // Known state first: HSI must be running and selected before the other
    // control bits are cleared, because clearing CR would otherwise stop the
    // clock the CPU is running from.
    RCC.cr().modify(|w| w.set_hsion(true));
    while !RCC.cr().read().hsirdy() {}
    RCC.cfgr().write_value(Cfgr(0));
    while RCC.cfgr().read().sws() != Sw::HSI {}
    RCC.cr().write_value(Cr(CR_RESET_VALUE));
    RCC.cfgr2().write_value(Cfgr2(0));
    RCC.cfgr3().write_value(Cfgr3(0));
    RCC.cr2().write_value(Cr2(0));
    RCC.cir().write_value(Cir(0));

    // Flash wait-states for the target frequency, confirmed by read-back,
    // before any clock above the reset frequency is selected.
    let latency = config.flash_latency();
    FLASH.acr().modify(|w| {
        w.set_latency(latency);
        w.set_prftbe(true);
    });
    while FLASH.acr().read().latency() != latency {}

    // Oscillator selection.
    if config.hse.is_some() {
        RCC.cr().modify(|w| w.set_hseon(true));
        while !RCC.cr().read().hserdy() {}
    }

    // PLL field programming.
    if let Some(pll) = config.pll {
        RCC.cfgr2().modify(|w| w.set_prediv(pll.prediv));
        RCC.cfgr().modify(|w| {
            w.set_pllsrc(pll.src);
            w.set_pllmul(pll.mul);
        });
        RCC.cr().modify(|w| w.set_pllon(true));
        while !RCC.cr().read().pllrdy() {}
    }

    // Bus prescalers, then the system clock switch, confirmed against the
    // switch status field.
    RCC.cfgr().modify(|w| {
        w.set_hpre(config.ahb_pre);
        w.set_ppre(config.apb_pre);
    });

    let sw = match config.sys {
        Sysclk::Hsi => Sw::HSI,
        Sysclk::Hse => Sw::HSE,
        Sysclk::Pll => Sw::PLL1_P,
    };
    RCC.cfgr().modify(|w| w.set_sw(sw));
    while RCC.cfgr().read().sws() != sw {}

    let sysclk = Hertz(config.sysclk_hz());
    let hclk = Hertz(sysclk.0 / hpre_div(config.ahb_pre));
    let pclk = Hertz(hclk.0 / ppre_div(config.apb_pre));
    set_freqs(Clocks {
        sysclk,
        hclk,
        pclk1: pclk,
        pclk2: pclk,
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_plan_is_valid_and_hits_48mhz() {
        let plan = ConfigBuilder::new();
        plan.check();
        assert_eq!(plan.sysclk_hz(), 48_000_000);
        assert_eq!(plan.flash_latency(), Latency::WS1);
    }

    #[test]
    fn hsi_plan_runs_at_8mhz_with_zero_wait_states() {
        let plan = ConfigBuilder::new().with_sys(Sysclk::Hsi);
        assert_eq!(plan.sysclk_hz(), 8_000_000);
        assert_eq!(plan.flash_latency(), Latency::WS0);
    }

    #[test]
    #[should_panic(expected = "exceeds the family limit")]
    fn overclocked_pll_is_rejected() {
        // HSI/2 x 16 = 64 MHz, above the 48 MHz family limit.
        ConfigBuilder::new()
            .with_pll(Pll {
                src: PllSource::HSI_DIV2,
                prediv: PllPreDiv::DIV1,
                mul: PllMul::MUL16,
            })
            .check();
    }

    #[test]
    #[should_panic(expected = "hse is None")]
    fn hse_sysclk_without_crystal_is_rejected() {
        ConfigBuilder::new().with_sys(Sysclk::Hse).check();
    }
}
