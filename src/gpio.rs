//! General-purpose Input/Output (GPIO)

use embassy_hal_internal::{impl_peripheral, into_ref, Peripheral, PeripheralRef};

use crate::pac::gpio::{self, vals};

/// GPIO flexible pin.
///
/// This pin can be either an input or output pin. The output level register
/// bit will remain set while not in output mode, so the pin's level will be
/// reflected when it is changed to an output.
pub struct Flex<'d> {
    pub(crate) pin: PeripheralRef<'d, AnyPin>,
}

impl<'d> Flex<'d> {
    /// Wrap the pin in a `Flex`.
    ///
    /// The pin remains disconnected. The initial output level is unspecified,
    /// but can be changed before the pin is put into output mode.
    #[inline]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd) -> Self {
        into_ref!(pin);
        Self {
            pin: pin.map_into(),
        }
    }

    /// Put the pin into input mode.
    ///
    /// The internal weak pull-up and pull-down resistors will be enabled
    /// according to `pull`.
    #[inline]
    pub fn set_as_input(&mut self, pull: Pull) {
        self.pin.set_as_input(pull);
    }

    /// Put the pin into push-pull output mode.
    ///
    /// The pin level will be whatever was set before (or low by default). If
    /// you want it to begin at a specific level, call `set_high`/`set_low` on
    /// the pin first.
    #[inline]
    pub fn set_as_output(&mut self, speed: Speed) {
        self.pin.set_as_output(speed);
    }

    /// Put the pin into input + open-drain output mode.
    ///
    /// The hardware will drive the line low if you set it to low, and will
    /// leave it floating if you set it to high, in which case you can read
    /// the input to figure out whether another device is driving the line low.
    #[inline]
    pub fn set_as_input_output(&mut self, speed: Speed) {
        self.pin.set_as_input_output(speed);
    }

    /// Put the pin into analog mode.
    ///
    /// This mode is used by ADC and DAC but usually there is no need to set
    /// this manually as the driver does it, this is just for completeness.
    #[inline]
    pub fn set_as_analog(&mut self) {
        self.pin.set_as_analog();
    }

    /// Get whether the pin input level is high.
    #[inline]
    pub fn is_high(&self) -> bool {
        !self.is_low()
    }

    /// Get whether the pin input level is low.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.pin.is_low()
    }

    /// Get the current pin input level.
    #[inline]
    pub fn get_level(&self) -> Level {
        self.is_high().into()
    }

    /// Get whether the output level is set to high.
    #[inline]
    pub fn is_set_high(&self) -> bool {
        !self.is_set_low()
    }

    /// Get whether the output level is set to low.
    #[inline]
    pub fn is_set_low(&self) -> bool {
        self.pin.is_set_low()
    }

    /// Get the current output level.
    #[inline]
    pub fn get_output_level(&self) -> Level {
        self.is_set_high().into()
    }

    /// Set the output as high.
    #[inline]
    pub fn set_high(&mut self) {
        self.pin.set_high();
    }

    /// Set the output as low.
    #[inline]
    pub fn set_low(&mut self) {
        self.pin.set_low();
    }

    /// Set the output level.
    #[inline]
    pub fn set_level(&mut self, level: Level) {
        match level {
            Level::Low => self.pin.set_low(),
            Level::High => self.pin.set_high(),
        }
    }

    /// Toggle the output level.
    #[inline]
    pub fn toggle(&mut self) {
        if self.is_set_low() {
            self.set_high();
        } else {
            self.set_low();
        }
    }
}

/// Pull setting for an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// No pull.
    None,
    /// Internal pull-up resistor.
    Up,
    /// Internal pull-down resistor.
    Down,
}

/// Speed setting for an output.
///
/// These vary per chip family. Check the reference manual and datasheet for
/// details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Speed {
    /// Low speed.
    Low,
    /// Medium speed.
    Medium,
    /// High speed.
    High,
    /// Very high speed.
    VeryHigh,
}

#[cfg(gpio_v1)]
impl Speed {
    const fn to_mode(self) -> vals::Mode {
        match self {
            Speed::Low => vals::Mode::OUTPUT2MHZ,
            Speed::Medium => vals::Mode::OUTPUT10MHZ,
            _ => vals::Mode::OUTPUT50MHZ,
        }
    }
}

#[cfg(gpio_v2)]
impl Speed {
    const fn to_ospeedr(self) -> vals::Ospeedr {
        match self {
            Speed::Low => vals::Ospeedr::LOW_SPEED,
            Speed::Medium => vals::Ospeedr::MEDIUM_SPEED,
            Speed::High => vals::Ospeedr::HIGH_SPEED,
            Speed::VeryHigh => vals::Ospeedr::VERY_HIGH_SPEED,
        }
    }
}

#[cfg(gpio_v2)]
impl Pull {
    const fn to_pupdr(self) -> vals::Pupdr {
        match self {
            Pull::None => vals::Pupdr::FLOATING,
            Pull::Up => vals::Pupdr::PULL_UP,
            Pull::Down => vals::Pupdr::PULL_DOWN,
        }
    }
}

/// Digital input or output level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Low
    Low,
    /// High
    High,
}

impl From<bool> for Level {
    fn from(val: bool) -> Self {
        match val {
            true => Self::High,
            false => Self::Low,
        }
    }
}

impl From<Level> for bool {
    fn from(level: Level) -> bool {
        matches!(level, Level::High)
    }
}

/// Drive strength of an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OutputType {
    /// Pin is driven actively high and low.
    PushPull,
    /// Pin is driven actively low, and left floating when set high.
    OpenDrain,
}

/// Alternate function electrical configuration.
///
/// Consumed by the per-driver `new_pin!` bindings; the (pin, signal) pairing
/// itself is validated by the per-chip signal trait tables.
#[derive(Copy, Clone)]
pub struct AfType {
    pull: Pull,
    output_type: OutputType,
    speed: Speed,
    input: bool,
}

impl AfType {
    /// Input with the given pull.
    pub const fn input(pull: Pull) -> Self {
        Self {
            pull,
            output_type: OutputType::PushPull,
            speed: Speed::Low,
            input: true,
        }
    }

    /// Output with the given type and speed.
    pub const fn output(output_type: OutputType, speed: Speed) -> Self {
        Self {
            pull: Pull::None,
            output_type,
            speed,
            input: false,
        }
    }
}

/// GPIO input driver.
pub struct Input<'d> {
    pub(crate) pin: Flex<'d>,
}

impl<'d> Input<'d> {
    /// Create GPIO input driver for a [Pin] with the provided [Pull]
    /// configuration.
    #[inline]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd, pull: Pull) -> Self {
        let mut pin = Flex::new(pin);
        pin.set_as_input(pull);
        Self { pin }
    }

    /// Get whether the pin input level is high.
    #[inline]
    pub fn is_high(&self) -> bool {
        self.pin.is_high()
    }

    /// Get whether the pin input level is low.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.pin.is_low()
    }

    /// Get the current pin input level.
    #[inline]
    pub fn get_level(&self) -> Level {
        self.pin.get_level()
    }
}

/// GPIO output driver.
///
/// Note that pins will **return to their floating state** when `Output` is
/// dropped. If pins should retain their state indefinitely, either keep the
/// driver alive or use [`core::mem::forget`].
pub struct Output<'d> {
    pub(crate) pin: Flex<'d>,
}

impl<'d> Output<'d> {
    /// Create GPIO output driver for a [Pin] with the provided [Level] and
    /// [Speed] configuration.
    #[inline]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd, initial_output: Level, speed: Speed) -> Self {
        let mut pin = Flex::new(pin);
        match initial_output {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        }
        pin.set_as_output(speed);
        Self { pin }
    }

    /// Set the output as high.
    #[inline]
    pub fn set_high(&mut self) {
        self.pin.set_high();
    }

    /// Set the output as low.
    #[inline]
    pub fn set_low(&mut self) {
        self.pin.set_low();
    }

    /// Set the output level.
    #[inline]
    pub fn set_level(&mut self, level: Level) {
        self.pin.set_level(level);
    }

    /// Get whether the output level is set to high.
    #[inline]
    pub fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }

    /// Get whether the output level is set to low.
    #[inline]
    pub fn is_set_low(&self) -> bool {
        self.pin.is_set_low()
    }

    /// Get the current output level.
    #[inline]
    pub fn get_output_level(&self) -> Level {
        self.pin.get_output_level()
    }

    /// Toggle the output level.
    #[inline]
    pub fn toggle(&mut self) {
        self.pin.toggle();
    }
}

/// GPIO output open-drain driver.
pub struct OutputOpenDrain<'d> {
    pub(crate) pin: Flex<'d>,
}

impl<'d> OutputOpenDrain<'d> {
    /// Create a new GPIO open drain driver.
    #[inline]
    pub fn new(pin: impl Peripheral<P = impl Pin> + 'd, initial_output: Level, speed: Speed) -> Self {
        let mut pin = Flex::new(pin);
        match initial_output {
            Level::High => pin.set_high(),
            Level::Low => pin.set_low(),
        }
        pin.set_as_input_output(speed);
        Self { pin }
    }

    /// Get whether the pin input level is high.
    #[inline]
    pub fn is_high(&self) -> bool {
        self.pin.is_high()
    }

    /// Get whether the pin input level is low.
    #[inline]
    pub fn is_low(&self) -> bool {
        self.pin.is_low()
    }

    /// Set the output as high.
    #[inline]
    pub fn set_high(&mut self) {
        self.pin.set_high();
    }

    /// Set the output as low.
    #[inline]
    pub fn set_low(&mut self) {
        self.pin.set_low();
    }

    /// Set the output level.
    #[inline]
    pub fn set_level(&mut self, level: Level) {
        self.pin.set_level(level);
    }

    /// Get whether the output level is set to high.
    #[inline]
    pub fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }

    /// Get whether the output level is set to low.
    #[inline]
    pub fn is_set_low(&self) -> bool {
        self.pin.is_set_low()
    }

    /// Toggle the output level.
    #[inline]
    pub fn toggle(&mut self) {
        self.pin.toggle();
    }
}

pub(crate) trait SealedPin {
    fn pin_port(&self) -> u8;

    #[inline]
    fn _pin(&self) -> u8 {
        self.pin_port() % 16
    }

    #[inline]
    fn _port(&self) -> u8 {
        self.pin_port() / 16
    }

    #[inline]
    fn block(&self) -> gpio::Gpio {
        crate::pac::GPIO(self._port() as usize)
    }

    /// Set the output as high.
    #[inline]
    fn set_high(&self) {
        self.block().bsrr().write(|w| w.set_bs(self._pin() as usize, true));
    }

    /// Set the output as low.
    #[inline]
    fn set_low(&self) {
        self.block().bsrr().write(|w| w.set_br(self._pin() as usize, true));
    }

    #[inline]
    fn is_low(&self) -> bool {
        self.block().idr().read().idr(self._pin() as usize) == vals::Idr::LOW
    }

    #[inline]
    fn is_set_low(&self) -> bool {
        self.block().odr().read().odr(self._pin() as usize) == vals::Odr::LOW
    }

    /// Make sure the clock of the port controller this pin belongs to is
    /// running before its registers are touched.
    #[inline]
    fn enable_port_clock(&self) {
        critical_section::with(|_| crate::chips::enable_gpio_port_clock(self._port()));
    }

    #[inline]
    fn set_as_input(&self, pull: Pull) {
        self.enable_port_clock();
        let pin = self._pin() as usize;
        let block = self.block();

        #[cfg(gpio_v1)]
        {
            let crlh = pin / 8;
            block.cr(crlh).modify(|w| {
                w.set_mode(pin % 8, vals::Mode::INPUT);
                w.set_cnf_in(
                    pin % 8,
                    match pull {
                        Pull::None => vals::CnfIn::FLOATING,
                        _ => vals::CnfIn::PULL,
                    },
                );
            });
            // The pull direction is selected through the output data register.
            match pull {
                Pull::Up => self.set_high(),
                Pull::Down => self.set_low(),
                Pull::None => {}
            }
        }

        #[cfg(gpio_v2)]
        {
            block.pupdr().modify(|w| w.set_pupdr(pin, pull.to_pupdr()));
            block.moder().modify(|w| w.set_moder(pin, vals::Moder::INPUT));
        }
    }

    #[inline]
    fn set_as_output(&self, speed: Speed) {
        self.enable_port_clock();
        let pin = self._pin() as usize;
        let block = self.block();

        #[cfg(gpio_v1)]
        {
            let crlh = pin / 8;
            block.cr(crlh).modify(|w| {
                w.set_mode(pin % 8, speed.to_mode());
                w.set_cnf_out(pin % 8, vals::CnfOut::PUSH_PULL);
            });
        }

        #[cfg(gpio_v2)]
        {
            block.pupdr().modify(|w| w.set_pupdr(pin, vals::Pupdr::FLOATING));
            block.otyper().modify(|w| w.set_ot(pin, vals::Ot::PUSH_PULL));
            block.ospeedr().modify(|w| w.set_ospeedr(pin, speed.to_ospeedr()));
            block.moder().modify(|w| w.set_moder(pin, vals::Moder::OUTPUT));
        }
    }

    #[inline]
    fn set_as_input_output(&self, speed: Speed) {
        self.enable_port_clock();
        let pin = self._pin() as usize;
        let block = self.block();

        #[cfg(gpio_v1)]
        {
            let crlh = pin / 8;
            block.cr(crlh).modify(|w| {
                w.set_mode(pin % 8, speed.to_mode());
                w.set_cnf_out(pin % 8, vals::CnfOut::OPEN_DRAIN);
            });
        }

        #[cfg(gpio_v2)]
        {
            block.pupdr().modify(|w| w.set_pupdr(pin, vals::Pupdr::FLOATING));
            block.otyper().modify(|w| w.set_ot(pin, vals::Ot::OPEN_DRAIN));
            block.ospeedr().modify(|w| w.set_ospeedr(pin, speed.to_ospeedr()));
            block.moder().modify(|w| w.set_moder(pin, vals::Moder::OUTPUT));
        }
    }

    #[inline]
    fn set_as_analog(&self) {
        self.enable_port_clock();
        let pin = self._pin() as usize;
        let block = self.block();

        #[cfg(gpio_v1)]
        {
            let crlh = pin / 8;
            block.cr(crlh).modify(|w| {
                w.set_mode(pin % 8, vals::Mode::INPUT);
                w.set_cnf_in(pin % 8, vals::CnfIn::ANALOG);
            });
        }

        #[cfg(gpio_v2)]
        {
            block.pupdr().modify(|w| w.set_pupdr(pin, vals::Pupdr::FLOATING));
            block.moder().modify(|w| w.set_moder(pin, vals::Moder::ANALOG));
        }
    }

    #[inline]
    fn set_as_af(&self, af_num: u8, af_type: AfType) {
        self.enable_port_clock();
        let pin = self._pin() as usize;
        let block = self.block();

        #[cfg(gpio_v1)]
        {
            // AF routing is fixed by the default AFIO mapping on this family;
            // the pin controller only needs the CNF/MODE nibble switched.
            let _ = af_num;
            if af_type.input {
                self.set_as_input(af_type.pull);
            } else {
                let crlh = pin / 8;
                block.cr(crlh).modify(|w| {
                    w.set_mode(pin % 8, af_type.speed.to_mode());
                    w.set_cnf_out(
                        pin % 8,
                        match af_type.output_type {
                            OutputType::PushPull => vals::CnfOut::ALT_PUSH_PULL,
                            OutputType::OpenDrain => vals::CnfOut::ALT_OPEN_DRAIN,
                        },
                    );
                });
            }
        }

        #[cfg(gpio_v2)]
        {
            let _ = af_type.input;
            block.afr(pin / 8).modify(|w| w.set_afr(pin % 8, af_num));
            block.pupdr().modify(|w| w.set_pupdr(pin, af_type.pull.to_pupdr()));
            block
                .otyper()
                .modify(|w| w.set_ot(pin, match af_type.output_type {
                    OutputType::PushPull => vals::Ot::PUSH_PULL,
                    OutputType::OpenDrain => vals::Ot::OPEN_DRAIN,
                }));
            block
                .ospeedr()
                .modify(|w| w.set_ospeedr(pin, af_type.speed.to_ospeedr()));
            block.moder().modify(|w| w.set_moder(pin, vals::Moder::ALTERNATE));
        }
    }
}

/// GPIO pin trait.
#[allow(private_bounds)]
pub trait Pin: Peripheral<P = Self> + Into<AnyPin> + SealedPin + Sized + 'static {
    /// Number of the pin within the port (0..15)
    #[inline]
    fn pin(&self) -> u8 {
        self._pin()
    }

    /// Port of the pin (0 = A, 1 = B, ...)
    #[inline]
    fn port(&self) -> u8 {
        self._port()
    }

    /// Type-erase (degrade) this pin into an `AnyPin`.
    ///
    /// This converts pin singletons (`PA5`, `PB6`, ...), which are all
    /// different types, into the same type. It is useful for dealing with
    /// pins in an array for example.
    #[inline]
    fn degrade(self) -> AnyPin {
        AnyPin {
            pin_port: self.pin_port(),
        }
    }
}

/// Type-erased GPIO pin.
pub struct AnyPin {
    pin_port: u8,
}

impl AnyPin {
    /// Unsafely create an `AnyPin` from a pin+port number.
    ///
    /// `pin_port` is `port_num * 16 + pin_num`, where `port_num` is 0 for
    /// port `A`, 1 for port `B`, etc... and `pin_num` is the pin number
    /// within the port (0..15).
    ///
    /// # Safety
    ///
    /// You must ensure that you're only using one instance of this type at a
    /// time.
    #[inline]
    pub unsafe fn steal(pin_port: u8) -> Self {
        Self { pin_port }
    }
}

impl_peripheral!(AnyPin);
impl Pin for AnyPin {}
impl SealedPin for AnyPin {
    #[inline]
    fn pin_port(&self) -> u8 {
        self.pin_port
    }
}

// ====================
// embedded-hal 0.2 trait impls

impl embedded_hal_02::digital::v2::InputPin for Input<'_> {
    type Error = core::convert::Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_high())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(self.is_low())
    }
}

impl embedded_hal_02::digital::v2::OutputPin for Output<'_> {
    type Error = core::convert::Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_low();
        Ok(())
    }
}

impl embedded_hal_02::digital::v2::StatefulOutputPin for Output<'_> {
    #[inline]
    fn is_set_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_set_high())
    }

    #[inline]
    fn is_set_low(&self) -> Result<bool, Self::Error> {
        Ok(self.is_set_low())
    }
}

impl embedded_hal_02::digital::v2::ToggleableOutputPin for Output<'_> {
    type Error = core::convert::Infallible;

    #[inline]
    fn toggle(&mut self) -> Result<(), Self::Error> {
        self.toggle();
        Ok(())
    }
}

impl embedded_hal_02::digital::v2::OutputPin for OutputOpenDrain<'_> {
    type Error = core::convert::Infallible;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_low();
        Ok(())
    }
}

impl embedded_hal_02::digital::v2::InputPin for OutputOpenDrain<'_> {
    type Error = core::convert::Infallible;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        Ok(self.is_high())
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        Ok(self.is_low())
    }
}

// ====================
// embedded-hal 1.0 trait impls

impl embedded_hal_1::digital::ErrorType for Input<'_> {
    type Error = core::convert::Infallible;
}

impl embedded_hal_1::digital::InputPin for Input<'_> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_low())
    }
}

impl embedded_hal_1::digital::ErrorType for Output<'_> {
    type Error = core::convert::Infallible;
}

impl embedded_hal_1::digital::OutputPin for Output<'_> {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_low();
        Ok(())
    }
}

impl embedded_hal_1::digital::StatefulOutputPin for Output<'_> {
    #[inline]
    fn is_set_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_set_high())
    }

    #[inline]
    fn is_set_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_set_low())
    }
}

impl embedded_hal_1::digital::ErrorType for OutputOpenDrain<'_> {
    type Error = core::convert::Infallible;
}

impl embedded_hal_1::digital::OutputPin for OutputOpenDrain<'_> {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_low();
        Ok(())
    }
}

impl embedded_hal_1::digital::ErrorType for Flex<'_> {
    type Error = core::convert::Infallible;
}

impl embedded_hal_1::digital::InputPin for Flex<'_> {
    #[inline]
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_high())
    }

    #[inline]
    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok((*self).is_low())
    }
}

impl embedded_hal_1::digital::OutputPin for Flex<'_> {
    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.set_high();
        Ok(())
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.set_low();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // The mode/speed encodings below are the documented CR/OSPEEDR field
    // values; the per-chip tables rely on them.

    #[cfg(gpio_v1)]
    #[test]
    fn v1_mode_encoding_matches_reference_manual() {
        assert_eq!(vals::Mode::INPUT.to_bits(), 0b00);
        assert_eq!(Speed::Low.to_mode().to_bits(), 0b10);
        assert_eq!(Speed::Medium.to_mode().to_bits(), 0b01);
        assert_eq!(Speed::VeryHigh.to_mode().to_bits(), 0b11);
    }

    #[cfg(gpio_v1)]
    #[test]
    fn v1_cnf_encoding_matches_reference_manual() {
        assert_eq!(vals::CnfIn::ANALOG.to_bits(), 0b00);
        assert_eq!(vals::CnfIn::FLOATING.to_bits(), 0b01);
        assert_eq!(vals::CnfIn::PULL.to_bits(), 0b10);
        assert_eq!(vals::CnfOut::ALT_PUSH_PULL.to_bits(), 0b10);
        assert_eq!(vals::CnfOut::ALT_OPEN_DRAIN.to_bits(), 0b11);
    }

    #[cfg(gpio_v2)]
    #[test]
    fn v2_mode_and_speed_encoding_matches_reference_manual() {
        assert_eq!(vals::Moder::INPUT.to_bits(), 0b00);
        assert_eq!(vals::Moder::OUTPUT.to_bits(), 0b01);
        assert_eq!(vals::Moder::ALTERNATE.to_bits(), 0b10);
        assert_eq!(vals::Moder::ANALOG.to_bits(), 0b11);
        assert_eq!(Speed::Low.to_ospeedr().to_bits(), 0b00);
        assert_eq!(Speed::VeryHigh.to_ospeedr().to_bits(), 0b11);
    }
}
