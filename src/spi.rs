//! Serial Peripheral Interface (SPI)
#![macro_use]

use core::marker::PhantomData;
use core::ptr;

use embassy_hal_internal::PeripheralRef;

use crate::gpio::{AfType, AnyPin, OutputType, Pull, SealedPin as _, Speed};
use crate::pac::spi::{vals, Spi as Regs};
use crate::time::Hertz;
use crate::{rcc, Peripheral};

pub use embedded_hal_02::spi::{Mode, Phase, Polarity, MODE_0, MODE_1, MODE_2, MODE_3};

/// Bit order of the frames on the wire.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Least significant bit first.
    LsbFirst,
    /// Most significant bit first.
    MsbFirst,
}

/// SPI configuration.
#[non_exhaustive]
#[derive(Copy, Clone)]
pub struct Config {
    /// Clock polarity and phase.
    pub mode: Mode,
    /// Bit order.
    pub bit_order: BitOrder,
    /// Target frequency. The closest reachable prescaler at or below it is
    /// selected.
    pub frequency: Hertz,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: MODE_0,
            bit_order: BitOrder::MsbFirst,
            frequency: Hertz(1_000_000),
        }
    }
}

impl Config {
    fn raw_phase(&self) -> vals::Cpha {
        match self.mode.phase {
            Phase::CaptureOnSecondTransition => vals::Cpha::SECOND_EDGE,
            Phase::CaptureOnFirstTransition => vals::Cpha::FIRST_EDGE,
        }
    }

    fn raw_polarity(&self) -> vals::Cpol {
        match self.mode.polarity {
            Polarity::IdleHigh => vals::Cpol::IDLE_HIGH,
            Polarity::IdleLow => vals::Cpol::IDLE_LOW,
        }
    }

    fn raw_byte_order(&self) -> vals::Lsbfirst {
        match self.bit_order {
            BitOrder::LsbFirst => vals::Lsbfirst::LSBFIRST,
            BitOrder::MsbFirst => vals::Lsbfirst::MSBFIRST,
        }
    }
}

/// SPI error.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// Mode fault: the hardware lost master arbitration.
    ModeFault,
    /// RX buffer overrun.
    Overrun,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::ModeFault => write!(f, "mode fault"),
            Error::Overrun => write!(f, "RX buffer overrun"),
        }
    }
}

/// Blocking SPI master driver.
pub struct Spi<'d, T: Instance> {
    _sck: Option<PeripheralRef<'d, AnyPin>>,
    _mosi: Option<PeripheralRef<'d, AnyPin>>,
    _miso: Option<PeripheralRef<'d, AnyPin>>,
    _phantom: PhantomData<T>,
}

impl<'d, T: Instance> Spi<'d, T> {
    /// Create a new blocking SPI master.
    pub fn new_blocking(
        _peri: impl Peripheral<P = T> + 'd,
        sck: impl Peripheral<P = impl SckPin<T>> + 'd,
        mosi: impl Peripheral<P = impl MosiPin<T>> + 'd,
        miso: impl Peripheral<P = impl MisoPin<T>> + 'd,
        config: Config,
    ) -> Self {
        let sck = new_pin!(sck, AfType::output(OutputType::PushPull, Speed::VeryHigh));
        let mosi = new_pin!(mosi, AfType::output(OutputType::PushPull, Speed::VeryHigh));
        let miso = new_pin!(miso, AfType::input(Pull::None));

        rcc::enable_and_reset::<T>();
        configure(T::regs(), T::frequency(), &config);

        Self {
            _sck: sck,
            _mosi: mosi,
            _miso: miso,
            _phantom: PhantomData,
        }
    }

    /// Create a new blocking transmit-only SPI master (no MISO pin).
    pub fn new_blocking_txonly(
        _peri: impl Peripheral<P = T> + 'd,
        sck: impl Peripheral<P = impl SckPin<T>> + 'd,
        mosi: impl Peripheral<P = impl MosiPin<T>> + 'd,
        config: Config,
    ) -> Self {
        let sck = new_pin!(sck, AfType::output(OutputType::PushPull, Speed::VeryHigh));
        let mosi = new_pin!(mosi, AfType::output(OutputType::PushPull, Speed::VeryHigh));

        rcc::enable_and_reset::<T>();
        configure(T::regs(), T::frequency(), &config);

        Self {
            _sck: sck,
            _mosi: mosi,
            _miso: None,
            _phantom: PhantomData,
        }
    }

    /// Write `data`, discarding whatever is clocked in.
    pub fn blocking_write(&mut self, data: &[u8]) -> Result<(), Error> {
        let r = T::regs();
        for &b in data {
            transfer_byte(r, b)?;
        }
        flush(r);
        Ok(())
    }

    /// Read into `data`, clocking out zero bytes.
    pub fn blocking_read(&mut self, data: &mut [u8]) -> Result<(), Error> {
        let r = T::regs();
        for b in data {
            *b = transfer_byte(r, 0)?;
        }
        flush(r);
        Ok(())
    }

    /// Simultaneously write from `write` and read into `read`.
    ///
    /// The slices must be of equal length.
    pub fn blocking_transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Error> {
        assert_eq!(read.len(), write.len(), "spi: transfer buffer length mismatch");
        let r = T::regs();
        for (rb, &wb) in read.iter_mut().zip(write.iter()) {
            *rb = transfer_byte(r, wb)?;
        }
        flush(r);
        Ok(())
    }

    /// Write `data` in place, replacing each byte with the byte clocked in.
    pub fn blocking_transfer_in_place(&mut self, data: &mut [u8]) -> Result<(), Error> {
        let r = T::regs();
        for b in data {
            *b = transfer_byte(r, *b)?;
        }
        flush(r);
        Ok(())
    }
}

fn configure(r: Regs, kernel_clock: Hertz, config: &Config) {
    let br = compute_baud_rate(kernel_clock, config.frequency);

    #[cfg(spi_v2)]
    r.cr2().modify(|w| {
        // 8-bit frames; RXNE must fire on a quarter-full (one byte) FIFO.
        w.set_ds(vals::Ds::BITS8);
        w.set_frxth(vals::Frxth::QUARTER);
    });

    r.cr1().modify(|w| {
        w.set_cpha(config.raw_phase());
        w.set_cpol(config.raw_polarity());
        w.set_lsbfirst(config.raw_byte_order());
        w.set_mstr(vals::Mstr::MASTER);
        w.set_br(br);
        // Software slave management keeps the driver off the NSS pin.
        w.set_ssm(true);
        w.set_ssi(true);
        w.set_spe(true);
    });
}

/// Largest prescaler whose output does not exceed the requested frequency.
fn compute_baud_rate(kernel_clock: Hertz, freq: Hertz) -> vals::Br {
    let val = match kernel_clock.0 / freq.0 {
        0 => panic!("spi: requested frequency is above the bus clock"),
        1..=2 => 0b000,
        3..=4 => 0b001,
        5..=8 => 0b010,
        9..=16 => 0b011,
        17..=32 => 0b100,
        33..=64 => 0b101,
        65..=128 => 0b110,
        _ => 0b111,
    };
    vals::Br::from_bits(val)
}

fn transfer_byte(r: Regs, byte: u8) -> Result<u8, Error> {
    while !r.sr().read().txe() {}
    // Byte-wide data register access keeps 16-bit-capable instances in
    // 8-bit framing.
    unsafe { ptr::write_volatile(r.dr().as_ptr() as *mut u8, byte) };

    loop {
        let sr = r.sr().read();
        if sr.ovr() {
            return Err(Error::Overrun);
        }
        if sr.modf() {
            return Err(Error::ModeFault);
        }
        if sr.rxne() {
            break;
        }
    }
    Ok(unsafe { ptr::read_volatile(r.dr().as_ptr() as *const u8) })
}

/// Wait for the shift register to drain.
fn flush(r: Regs) {
    while r.sr().read().bsy() {}
}

pub(crate) trait SealedInstance: crate::rcc::RccEnableReset + crate::rcc::RccGetFreq {
    fn regs() -> Regs;
}

/// SPI peripheral instance trait.
#[allow(private_bounds)]
pub trait Instance: Peripheral<P = Self> + SealedInstance + 'static + Send {}

pin_trait!(SckPin, Instance);
pin_trait!(MosiPin, Instance);
pin_trait!(MisoPin, Instance);

macro_rules! impl_spi {
    ($inst:ident) => {
        impl crate::spi::SealedInstance for crate::peripherals::$inst {
            fn regs() -> crate::pac::spi::Spi {
                crate::pac::$inst
            }
        }

        impl crate::spi::Instance for crate::peripherals::$inst {}
    };
}

// ====================
// embedded-hal trait impls

impl embedded_hal_1::spi::Error for Error {
    fn kind(&self) -> embedded_hal_1::spi::ErrorKind {
        match *self {
            Error::ModeFault => embedded_hal_1::spi::ErrorKind::ModeFault,
            Error::Overrun => embedded_hal_1::spi::ErrorKind::Overrun,
        }
    }
}

impl<T: Instance> embedded_hal_1::spi::ErrorType for Spi<'_, T> {
    type Error = Error;
}

impl<T: Instance> embedded_hal_1::spi::SpiBus<u8> for Spi<'_, T> {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.blocking_read(words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.blocking_write(words)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.blocking_transfer(read, write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.blocking_transfer_in_place(words)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        flush(T::regs());
        Ok(())
    }
}

impl<T: Instance> embedded_hal_02::blocking::spi::Write<u8> for Spi<'_, T> {
    type Error = Error;

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.blocking_write(words)
    }
}

impl<T: Instance> embedded_hal_02::blocking::spi::Transfer<u8> for Spi<'_, T> {
    type Error = Error;

    fn transfer<'w>(&mut self, words: &'w mut [u8]) -> Result<&'w [u8], Self::Error> {
        self.blocking_transfer_in_place(words)?;
        Ok(words)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prescaler_selection_never_overshoots() {
        // 36 MHz bus, 1 MHz target: /64 = 562.5 kHz is the closest power of
        // two at or below the target (/32 = 1.125 MHz overshoots).
        assert_eq!(compute_baud_rate(Hertz(36_000_000), Hertz(1_000_000)).to_bits(), 0b101);
        // Exact division lands on the exact prescaler.
        assert_eq!(compute_baud_rate(Hertz(8_000_000), Hertz(4_000_000)).to_bits(), 0b000);
        assert_eq!(compute_baud_rate(Hertz(8_000_000), Hertz(1_000_000)).to_bits(), 0b010);
    }

    #[test]
    #[should_panic(expected = "above the bus clock")]
    fn overfast_frequency_is_rejected() {
        compute_baud_rate(Hertz(8_000_000), Hertz(16_000_000));
    }
}
