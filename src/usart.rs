//! Universal Synchronous/Asynchronous Receiver Transmitter (USART)
#![macro_use]

use core::marker::PhantomData;

use embassy_hal_internal::PeripheralRef;

use crate::gpio::{AfType, AnyPin, OutputType, Pull, SealedPin as _, Speed};
use crate::pac::usart::Usart as Regs;
use crate::pac::usart::{regs, vals};
use crate::time::Hertz;
use crate::{rcc, Peripheral};

/// Number of stop bits
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StopBits {
    #[doc = "1 stop bit"]
    STOP1,
    #[doc = "2 stop bits"]
    STOP2,
}

/// Parity
///
/// Frames are always 8 bits long; with parity enabled the parity bit takes
/// the place of the 8th data bit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Parity {
    /// No parity
    ParityNone,
    /// Even Parity
    ParityEven,
    /// Odd Parity
    ParityOdd,
}

/// Config Error
#[non_exhaustive]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baudrate too low
    BaudrateTooLow,
    /// Baudrate too high
    BaudrateTooHigh,
}

/// Config
#[non_exhaustive]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Config {
    /// Baud rate
    pub baudrate: u32,
    /// Number of stop bits
    pub stop_bits: StopBits,
    /// Parity type
    pub parity: Parity,
    /// Pull configuration for the RX pin.
    pub rx_pull: Pull,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            baudrate: 115200,
            stop_bits: StopBits::STOP1,
            parity: Parity::ParityNone,
            rx_pull: Pull::None,
        }
    }
}

/// Serial error
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[non_exhaustive]
pub enum Error {
    /// Framing error
    Framing,
    /// Noise error
    Noise,
    /// RX buffer overrun
    Overrun,
    /// Parity check error
    Parity,
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Framing => write!(f, "framing error"),
            Error::Noise => write!(f, "noise error"),
            Error::Overrun => write!(f, "RX buffer overrun"),
            Error::Parity => write!(f, "parity check error"),
        }
    }
}

/// Bidirectional UART Driver, which acts as a combination of [`UartTx`] and
/// [`UartRx`].
pub struct Uart<'d, T: Instance> {
    tx: UartTx<'d, T>,
    rx: UartRx<'d, T>,
}

/// Tx-only UART Driver.
///
/// Can be obtained from [`Uart::split`], or can be constructed independently,
/// if you do not need the receiving half of the driver.
pub struct UartTx<'d, T: Instance> {
    _tx: Option<PeripheralRef<'d, AnyPin>>,
    _phantom: PhantomData<T>,
}

/// Rx-only UART Driver.
///
/// Can be obtained from [`Uart::split`], or can be constructed independently,
/// if you do not need the transmitting half of the driver.
pub struct UartRx<'d, T: Instance> {
    _rx: Option<PeripheralRef<'d, AnyPin>>,
    _phantom: PhantomData<T>,
}

impl<'d, T: Instance> Uart<'d, T> {
    /// Create a new blocking bidirectional UART.
    pub fn new_blocking(
        _peri: impl Peripheral<P = T> + 'd,
        tx: impl Peripheral<P = impl TxPin<T>> + 'd,
        rx: impl Peripheral<P = impl RxPin<T>> + 'd,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let tx = new_pin!(tx, AfType::output(OutputType::PushPull, Speed::VeryHigh));
        let rx = new_pin!(rx, AfType::input(config.rx_pull));

        rcc::enable_and_reset::<T>();
        configure(T::regs(), T::frequency(), &config, true, true)?;

        Ok(Self {
            tx: UartTx {
                _tx: tx,
                _phantom: PhantomData,
            },
            rx: UartRx {
                _rx: rx,
                _phantom: PhantomData,
            },
        })
    }

    /// Perform a blocking write
    pub fn blocking_write(&mut self, buffer: &[u8]) -> Result<(), Error> {
        self.tx.blocking_write(buffer)
    }

    /// Block until transmission complete
    pub fn blocking_flush(&mut self) -> Result<(), Error> {
        self.tx.blocking_flush()
    }

    /// Perform a blocking read into `buffer`
    pub fn blocking_read(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        self.rx.blocking_read(buffer)
    }

    /// Read a single byte if one has been received, without blocking.
    pub fn nb_read(&mut self) -> Result<u8, nb::Error<Error>> {
        self.rx.nb_read()
    }

    /// Split the Uart into a transmitter and receiver, which is particularly
    /// useful when having two tasks correlating to transmitting and receiving.
    pub fn split(self) -> (UartTx<'d, T>, UartRx<'d, T>) {
        (self.tx, self.rx)
    }
}

impl<'d, T: Instance> UartTx<'d, T> {
    /// Create a new blocking tx-only UART with no hardware flow control.
    ///
    /// Useful if you only want Uart Tx. It saves 1 pin and consumes a little
    /// less power.
    pub fn new_blocking(
        _peri: impl Peripheral<P = T> + 'd,
        tx: impl Peripheral<P = impl TxPin<T>> + 'd,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let tx = new_pin!(tx, AfType::output(OutputType::PushPull, Speed::VeryHigh));

        rcc::enable_and_reset::<T>();
        configure(T::regs(), T::frequency(), &config, false, true)?;

        Ok(Self {
            _tx: tx,
            _phantom: PhantomData,
        })
    }

    /// Whether the transmit data register is ready to accept a byte.
    pub fn tx_ready(&self) -> bool {
        sr(T::regs()).read().txe()
    }

    /// Perform a blocking UART write
    pub fn blocking_write(&mut self, buffer: &[u8]) -> Result<(), Error> {
        let r = T::regs();
        for &b in buffer {
            while !sr(r).read().txe() {}
            unsafe { tdr(r).write_volatile(b) };
        }
        Ok(())
    }

    /// Block until transmission complete
    pub fn blocking_flush(&mut self) -> Result<(), Error> {
        let r = T::regs();
        if r.cr1().read().te() {
            while !sr(r).read().tc() {}
        }
        Ok(())
    }
}

impl<'d, T: Instance> UartRx<'d, T> {
    /// Create a new blocking rx-only UART with no hardware flow control.
    ///
    /// Useful if you only want Uart Rx. It saves 1 pin and consumes a little
    /// less power.
    pub fn new_blocking(
        _peri: impl Peripheral<P = T> + 'd,
        rx: impl Peripheral<P = impl RxPin<T>> + 'd,
        config: Config,
    ) -> Result<Self, ConfigError> {
        let rx = new_pin!(rx, AfType::input(config.rx_pull));

        rcc::enable_and_reset::<T>();
        configure(T::regs(), T::frequency(), &config, true, false)?;

        Ok(Self {
            _rx: rx,
            _phantom: PhantomData,
        })
    }

    /// Whether a received byte is waiting in the data register.
    pub fn rx_ready(&self) -> bool {
        sr(T::regs()).read().rxne()
    }

    /// Read a single byte if one has been received, without blocking.
    pub fn nb_read(&mut self) -> Result<u8, nb::Error<Error>> {
        let r = T::regs();
        match check_rx_flags(r)? {
            true => Ok(unsafe { rdr(r).read_volatile() }),
            false => Err(nb::Error::WouldBlock),
        }
    }

    /// Perform a blocking read into `buffer`
    pub fn blocking_read(&mut self, buffer: &mut [u8]) -> Result<(), Error> {
        let r = T::regs();
        for b in buffer {
            while !check_rx_flags(r)? {}
            *b = unsafe { rdr(r).read_volatile() };
        }
        Ok(())
    }
}

/// Check for reception errors, clearing any found, and report whether a byte
/// is ready.
fn check_rx_flags(r: Regs) -> Result<bool, Error> {
    let sr_val = sr(r).read();

    cfg_if::cfg_if! {
        if #[cfg(usart_v1)] {
            let noise = sr_val.ne();
        } else {
            let noise = sr_val.nf();
        }
    }

    if sr_val.pe() || sr_val.fe() || noise || sr_val.ore() {
        let err = if sr_val.pe() {
            Error::Parity
        } else if sr_val.fe() {
            Error::Framing
        } else if noise {
            Error::Noise
        } else {
            Error::Overrun
        };
        clear_rx_errors(r, sr_val);
        return Err(err);
    }
    Ok(sr_val.rxne())
}

#[cfg(usart_v1)]
fn clear_rx_errors(r: Regs, _sr: regs::Sr) {
    // The error flags are cleared by the SR read that detected them followed
    // by a DR read.
    unsafe {
        let _ = rdr(r).read_volatile();
    }
}

#[cfg(usart_v2)]
fn clear_rx_errors(r: Regs, sr: regs::Isr) {
    r.icr().write(|w| *w = regs::Icr(sr.0));
}

fn configure(
    r: Regs,
    kernel_clock: Hertz,
    config: &Config,
    enable_rx: bool,
    enable_tx: bool,
) -> Result<(), ConfigError> {
    let div = compute_brr(kernel_clock, config.baudrate)?;
    r.brr().write_value(regs::Brr(div));

    r.cr2().write(|w| {
        w.set_stop(match config.stop_bits {
            StopBits::STOP1 => vals::Stop::STOP1,
            StopBits::STOP2 => vals::Stop::STOP2,
        });
    });

    r.cr1().write(|w| {
        w.set_te(enable_tx);
        w.set_re(enable_rx);
        w.set_pce(!matches!(config.parity, Parity::ParityNone));
        w.set_ps(match config.parity {
            Parity::ParityOdd => vals::Ps::ODD,
            _ => vals::Ps::EVEN,
        });
        w.set_ue(true);
    });

    Ok(())
}

/// BRR value for the requested baud rate.
///
/// With 16x oversampling BRR holds usartdiv as a 12.4 fixed-point value,
/// which is exactly fck / baud.
const fn compute_brr(kernel_clock: Hertz, baudrate: u32) -> Result<u32, ConfigError> {
    let div = kernel_clock.0 / baudrate;
    if div < 0x10 {
        return Err(ConfigError::BaudrateTooHigh);
    }
    if div > 0xFFFF {
        return Err(ConfigError::BaudrateTooLow);
    }
    Ok(div)
}

#[cfg(usart_v1)]
fn sr(r: Regs) -> crate::pac::common::Reg<regs::Sr, crate::pac::common::RW> {
    r.sr()
}
#[cfg(usart_v2)]
fn sr(r: Regs) -> crate::pac::common::Reg<regs::Isr, crate::pac::common::R> {
    r.isr()
}

#[cfg(usart_v1)]
fn tdr(r: Regs) -> *mut u8 {
    r.dr().as_ptr() as _
}
#[cfg(usart_v2)]
fn tdr(r: Regs) -> *mut u8 {
    r.tdr().as_ptr() as _
}

#[cfg(usart_v1)]
fn rdr(r: Regs) -> *mut u8 {
    r.dr().as_ptr() as _
}
#[cfg(usart_v2)]
fn rdr(r: Regs) -> *mut u8 {
    r.rdr().as_ptr() as _
}

pub(crate) trait SealedInstance: crate::rcc::RccEnableReset + crate::rcc::RccGetFreq {
    fn regs() -> Regs;
}

/// USART peripheral instance trait.
#[allow(private_bounds)]
pub trait Instance: Peripheral<P = Self> + SealedInstance + 'static + Send {}

pin_trait!(RxPin, Instance);
pin_trait!(TxPin, Instance);

macro_rules! impl_usart {
    ($inst:ident) => {
        impl crate::usart::SealedInstance for crate::peripherals::$inst {
            fn regs() -> crate::pac::usart::Usart {
                crate::pac::$inst
            }
        }

        impl crate::usart::Instance for crate::peripherals::$inst {}
    };
}

// ====================
// embedded-io / embedded-hal trait impls

impl embedded_io::Error for Error {
    fn kind(&self) -> embedded_io::ErrorKind {
        embedded_io::ErrorKind::Other
    }
}

impl<T: Instance> embedded_io::ErrorType for Uart<'_, T> {
    type Error = Error;
}

impl<T: Instance> embedded_io::ErrorType for UartTx<'_, T> {
    type Error = Error;
}

impl<T: Instance> embedded_io::Write for Uart<'_, T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.blocking_write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.blocking_flush()
    }
}

impl<T: Instance> embedded_io::Write for UartTx<'_, T> {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.blocking_write(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.blocking_flush()
    }
}

impl embedded_hal_nb::serial::Error for Error {
    fn kind(&self) -> embedded_hal_nb::serial::ErrorKind {
        match *self {
            Error::Framing => embedded_hal_nb::serial::ErrorKind::FrameFormat,
            Error::Noise => embedded_hal_nb::serial::ErrorKind::Noise,
            Error::Overrun => embedded_hal_nb::serial::ErrorKind::Overrun,
            Error::Parity => embedded_hal_nb::serial::ErrorKind::Parity,
        }
    }
}

impl<T: Instance> embedded_hal_nb::serial::ErrorType for Uart<'_, T> {
    type Error = Error;
}

impl<T: Instance> embedded_hal_nb::serial::ErrorType for UartTx<'_, T> {
    type Error = Error;
}

impl<T: Instance> embedded_hal_nb::serial::ErrorType for UartRx<'_, T> {
    type Error = Error;
}

impl<T: Instance> embedded_hal_nb::serial::Read<u8> for Uart<'_, T> {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.nb_read()
    }
}

impl<T: Instance> embedded_hal_nb::serial::Read<u8> for UartRx<'_, T> {
    fn read(&mut self) -> nb::Result<u8, Self::Error> {
        self.nb_read()
    }
}

impl<T: Instance> embedded_hal_nb::serial::Write<u8> for Uart<'_, T> {
    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.tx.write_nb(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.tx.flush_nb()
    }
}

impl<T: Instance> embedded_hal_nb::serial::Write<u8> for UartTx<'_, T> {
    fn write(&mut self, byte: u8) -> nb::Result<(), Self::Error> {
        self.write_nb(byte)
    }

    fn flush(&mut self) -> nb::Result<(), Self::Error> {
        self.flush_nb()
    }
}

impl<T: Instance> UartTx<'_, T> {
    fn write_nb(&mut self, byte: u8) -> nb::Result<(), Error> {
        let r = T::regs();
        if sr(r).read().txe() {
            unsafe { tdr(r).write_volatile(byte) };
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    fn flush_nb(&mut self) -> nb::Result<(), Error> {
        let r = T::regs();
        if r.cr1().read().te() && !sr(r).read().tc() {
            Err(nb::Error::WouldBlock)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brr_value_is_clock_over_baud() {
        assert_eq!(compute_brr(Hertz(36_000_000), 115_200), Ok(312));
        assert_eq!(compute_brr(Hertz(8_000_000), 9_600), Ok(833));
    }

    #[test]
    fn unreachable_baud_rates_are_rejected() {
        // Faster than fck/16 cannot be generated at 16x oversampling.
        assert_eq!(
            compute_brr(Hertz(8_000_000), 1_000_000),
            Err(ConfigError::BaudrateTooHigh)
        );
        // Slower than fck/65535 does not fit the 16-bit divider.
        assert_eq!(
            compute_brr(Hertz(100_000_000), 300),
            Err(ConfigError::BaudrateTooLow)
        );
    }

    #[test]
    fn default_config_is_115200_8n1() {
        let config = Config::default();
        assert_eq!(config.baudrate, 115_200);
        assert_eq!(config.stop_bits, StopBits::STOP1);
        assert_eq!(config.parity, Parity::ParityNone);
    }
}
