//! Digital-to-Analog Converter (DAC)
#![macro_use]

use embassy_hal_internal::{into_ref, PeripheralRef};

use crate::gpio::{AnyPin, SealedPin as _};
use crate::pac::dac::Dac as Regs;
use crate::{rcc, systick, Peripheral};

/// DAC channel.
///
/// Channels derive their register positions from the containing DAC block;
/// which channels exist on a given chip is encoded by its [`DacPin`] table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// Channel 1.
    Ch1,
    /// Channel 2.
    Ch2,
}

impl Channel {
    fn index(&self) -> usize {
        match self {
            Channel::Ch1 => 0,
            Channel::Ch2 => 1,
        }
    }
}

/// Conversion trigger source (TSEL field encoding).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum TriggerSel {
    /// TIM6 TRGO event.
    Tim6 = 0b000,
    /// TIM7 TRGO event.
    Tim7 = 0b010,
    /// TIM2 TRGO event.
    Tim2 = 0b100,
    /// EXTI line 9.
    Exti9 = 0b110,
    /// Software trigger via [`Dac::trigger`].
    Software = 0b111,
}

/// Blocking DAC driver.
pub struct Dac<'d, T: Instance> {
    _peri: PeripheralRef<'d, T>,
    _ch1_pin: Option<PeripheralRef<'d, AnyPin>>,
    _ch2_pin: Option<PeripheralRef<'d, AnyPin>>,
}

impl<'d, T: Instance> Dac<'d, T> {
    /// Create the driver.
    ///
    /// Enables and resets the DAC block; channels stay disabled until bound
    /// to their output pin with [`Self::enable_channel`].
    pub fn new(peri: impl Peripheral<P = T> + 'd) -> Self {
        into_ref!(peri);
        rcc::enable_and_reset::<T>();
        Self {
            _peri: peri,
            _ch1_pin: None,
            _ch2_pin: None,
        }
    }

    /// Bind the channel's output pin into analog mode and enable the channel.
    ///
    /// Waits out the output buffer settling time, so the first conversion
    /// after this call is already valid.
    pub fn enable_channel<const CH: u8>(
        &mut self,
        pin: impl Peripheral<P = impl DacPin<T, CH>> + 'd,
    ) {
        let pin = pin.into_ref();
        pin.set_as_analog();
        match CH {
            1 => self._ch1_pin = Some(pin.map_into()),
            2 => self._ch2_pin = Some(pin.map_into()),
            _ => ::core::unreachable!(),
        }

        T::regs().cr().modify(|w| w.set_en(CH as usize - 1, true));
        systick::delay_us(8); // output buffer settle
    }

    /// Disable the channel. The output pin is left in analog mode.
    pub fn disable_channel(&mut self, ch: Channel) {
        T::regs().cr().modify(|w| w.set_en(ch.index(), false));
    }

    /// Enable triggered conversion for the channel and select the source.
    ///
    /// With a trigger enabled, written samples move to the output on the next
    /// trigger event instead of immediately.
    pub fn set_trigger(&mut self, ch: Channel, trigger: TriggerSel) {
        T::regs().cr().modify(|w| {
            w.set_tsel(ch.index(), trigger as u8);
            w.set_ten(ch.index(), true);
        });
    }

    /// Write a 12-bit right-aligned sample for the channel.
    pub fn write(&mut self, ch: Channel, value: u16) {
        debug_assert!(value < 4096, "dac: sample exceeds 12 bits");
        T::regs().dhr12r(ch.index()).write(|w| w.set_dhr(value));
    }

    /// Raise the software trigger for the channel.
    ///
    /// Only meaningful after `set_trigger(ch, TriggerSel::Software)`.
    pub fn trigger(&mut self, ch: Channel) {
        T::regs().swtrigr().write(|w| w.set_swtrig(ch.index(), true));
    }

    /// Read back the currently converted output value.
    pub fn read(&self, ch: Channel) -> u16 {
        T::regs().dor(ch.index()).read().dor()
    }
}

pub(crate) trait SealedInstance: crate::rcc::RccEnableReset + crate::rcc::RccGetFreq {
    fn regs() -> Regs;
}

/// DAC peripheral instance trait.
#[allow(private_bounds)]
pub trait Instance: Peripheral<P = Self> + SealedInstance + 'static + Send {}

/// DAC output pin for channel `C`.
pub trait DacPin<T: Instance, const C: u8>: crate::gpio::Pin {}

macro_rules! impl_dac {
    ($inst:ident) => {
        impl crate::dac::SealedInstance for crate::peripherals::$inst {
            fn regs() -> crate::pac::dac::Dac {
                crate::pac::$inst
            }
        }

        impl crate::dac::Instance for crate::peripherals::$inst {}
    };
}

macro_rules! impl_dac_pin {
    ($inst:ident, $ch:expr, $pin:ident) => {
        impl crate::dac::DacPin<crate::peripherals::$inst, $ch> for crate::peripherals::$pin {}
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_indices_derive_from_the_parent_block() {
        assert_eq!(Channel::Ch1.index(), 0);
        assert_eq!(Channel::Ch2.index(), 1);
    }

    #[test]
    fn software_trigger_encoding() {
        assert_eq!(TriggerSel::Software as u8, 0b111);
        assert_eq!(TriggerSel::Tim6 as u8, 0b000);
    }
}
