//! STM32F103ZE tables: peripheral descriptors, pins and clock-enable rows.

use crate::pac::RCC;

embassy_hal_internal::peripherals! {
    USART1, USART2, USART3, SPI1, SPI2, DAC1,
    PA0, PA1, PA2, PA3, PA4, PA5, PA6, PA7, PA8, PA9, PA10, PA11, PA12, PA13, PA14, PA15, PB0,
    PB1, PB2, PB3, PB4, PB5, PB6, PB7, PB8, PB9, PB10, PB11, PB12, PB13, PB14, PB15, PC0, PC1,
    PC2, PC3, PC4, PC5, PC6, PC7, PC8, PC9, PC10, PC11, PC12, PC13, PC14, PC15, PD0, PD1, PD2,
    PD3, PD4, PD5, PD6, PD7, PD8, PD9, PD10, PD11, PD12, PD13, PD14, PD15, PE0, PE1, PE2, PE3,
    PE4, PE5, PE6, PE7, PE8, PE9, PE10, PE11, PE12, PE13, PE14, PE15, PF0, PF1, PF2, PF3, PF4,
    PF5, PF6, PF7, PF8, PF9, PF10, PF11, PF12, PF13, PF14, PF15, PG0, PG1, PG2, PG3, PG4, PG5,
    PG6, PG7, PG8, PG9, PG10, PG11, PG12, PG13, PG14, PG15,
}

impl_pin!(PA0, 0, 0);
impl_pin!(PA1, 0, 1);
impl_pin!(PA2, 0, 2);
impl_pin!(PA3, 0, 3);
impl_pin!(PA4, 0, 4);
impl_pin!(PA5, 0, 5);
impl_pin!(PA6, 0, 6);
impl_pin!(PA7, 0, 7);
impl_pin!(PA8, 0, 8);
impl_pin!(PA9, 0, 9);
impl_pin!(PA10, 0, 10);
impl_pin!(PA11, 0, 11);
impl_pin!(PA12, 0, 12);
impl_pin!(PA13, 0, 13);
impl_pin!(PA14, 0, 14);
impl_pin!(PA15, 0, 15);
impl_pin!(PB0, 1, 0);
impl_pin!(PB1, 1, 1);
impl_pin!(PB2, 1, 2);
impl_pin!(PB3, 1, 3);
impl_pin!(PB4, 1, 4);
impl_pin!(PB5, 1, 5);
impl_pin!(PB6, 1, 6);
impl_pin!(PB7, 1, 7);
impl_pin!(PB8, 1, 8);
impl_pin!(PB9, 1, 9);
impl_pin!(PB10, 1, 10);
impl_pin!(PB11, 1, 11);
impl_pin!(PB12, 1, 12);
impl_pin!(PB13, 1, 13);
impl_pin!(PB14, 1, 14);
impl_pin!(PB15, 1, 15);
impl_pin!(PC0, 2, 0);
impl_pin!(PC1, 2, 1);
impl_pin!(PC2, 2, 2);
impl_pin!(PC3, 2, 3);
impl_pin!(PC4, 2, 4);
impl_pin!(PC5, 2, 5);
impl_pin!(PC6, 2, 6);
impl_pin!(PC7, 2, 7);
impl_pin!(PC8, 2, 8);
impl_pin!(PC9, 2, 9);
impl_pin!(PC10, 2, 10);
impl_pin!(PC11, 2, 11);
impl_pin!(PC12, 2, 12);
impl_pin!(PC13, 2, 13);
impl_pin!(PC14, 2, 14);
impl_pin!(PC15, 2, 15);
impl_pin!(PD0, 3, 0);
impl_pin!(PD1, 3, 1);
impl_pin!(PD2, 3, 2);
impl_pin!(PD3, 3, 3);
impl_pin!(PD4, 3, 4);
impl_pin!(PD5, 3, 5);
impl_pin!(PD6, 3, 6);
impl_pin!(PD7, 3, 7);
impl_pin!(PD8, 3, 8);
impl_pin!(PD9, 3, 9);
impl_pin!(PD10, 3, 10);
impl_pin!(PD11, 3, 11);
impl_pin!(PD12, 3, 12);
impl_pin!(PD13, 3, 13);
impl_pin!(PD14, 3, 14);
impl_pin!(PD15, 3, 15);
impl_pin!(PE0, 4, 0);
impl_pin!(PE1, 4, 1);
impl_pin!(PE2, 4, 2);
impl_pin!(PE3, 4, 3);
impl_pin!(PE4, 4, 4);
impl_pin!(PE5, 4, 5);
impl_pin!(PE6, 4, 6);
impl_pin!(PE7, 4, 7);
impl_pin!(PE8, 4, 8);
impl_pin!(PE9, 4, 9);
impl_pin!(PE10, 4, 10);
impl_pin!(PE11, 4, 11);
impl_pin!(PE12, 4, 12);
impl_pin!(PE13, 4, 13);
impl_pin!(PE14, 4, 14);
impl_pin!(PE15, 4, 15);
impl_pin!(PF0, 5, 0);
impl_pin!(PF1, 5, 1);
impl_pin!(PF2, 5, 2);
impl_pin!(PF3, 5, 3);
impl_pin!(PF4, 5, 4);
impl_pin!(PF5, 5, 5);
impl_pin!(PF6, 5, 6);
impl_pin!(PF7, 5, 7);
impl_pin!(PF8, 5, 8);
impl_pin!(PF9, 5, 9);
impl_pin!(PF10, 5, 10);
impl_pin!(PF11, 5, 11);
impl_pin!(PF12, 5, 12);
impl_pin!(PF13, 5, 13);
impl_pin!(PF14, 5, 14);
impl_pin!(PF15, 5, 15);
impl_pin!(PG0, 6, 0);
impl_pin!(PG1, 6, 1);
impl_pin!(PG2, 6, 2);
impl_pin!(PG3, 6, 3);
impl_pin!(PG4, 6, 4);
impl_pin!(PG5, 6, 5);
impl_pin!(PG6, 6, 6);
impl_pin!(PG7, 6, 7);
impl_pin!(PG8, 6, 8);
impl_pin!(PG9, 6, 9);
impl_pin!(PG10, 6, 10);
impl_pin!(PG11, 6, 11);
impl_pin!(PG12, 6, 12);
impl_pin!(PG13, 6, 13);
impl_pin!(PG14, 6, 14);
impl_pin!(PG15, 6, 15);

/// Enable the clock of the port controller feeding the pin. Alternate-function modes
/// additionally route through AFIO on this family.
pub(crate) fn enable_gpio_port_clock(port: u8) {
    RCC.apb2enr().modify(|w| {
        match port {
            0 => w.set_gpioaen(true),
            1 => w.set_gpioben(true),
            2 => w.set_gpiocen(true),
            3 => w.set_gpioden(true),
            4 => w.set_gpioeen(true),
            5 => w.set_gpiofen(true),
            6 => w.set_gpiogen(true),
            _ => unreachable!(),
        }
        w.set_afioen(true);
    });
}

impl_rcc!(USART1, apb2enr, set_usart1en, apb2rstr, set_usart1rst, pclk2);
impl_rcc!(USART2, apb1enr, set_usart2en, apb1rstr, set_usart2rst, pclk1);
impl_rcc!(USART3, apb1enr, set_usart3en, apb1rstr, set_usart3rst, pclk1);
impl_rcc!(SPI1, apb2enr, set_spi1en, apb2rstr, set_spi1rst, pclk2);
impl_rcc!(SPI2, apb1enr, set_spi2en, apb1rstr, set_spi2rst, pclk1);
impl_rcc!(DAC1, apb1enr, set_dacen, apb1rstr, set_dacrst, pclk1);

impl_usart!(USART1);
impl_usart!(USART2);
impl_usart!(USART3);

impl_spi!(SPI1);
impl_spi!(SPI2);

impl_dac!(DAC1);

// Default AFIO mapping; the AF number is unused by the gpio_v1 pin
// controller.
pin_trait_impl!(crate::usart::TxPin, USART1, PA9, 0);
pin_trait_impl!(crate::usart::RxPin, USART1, PA10, 0);
pin_trait_impl!(crate::usart::TxPin, USART2, PA2, 0);
pin_trait_impl!(crate::usart::RxPin, USART2, PA3, 0);
pin_trait_impl!(crate::usart::TxPin, USART3, PB10, 0);
pin_trait_impl!(crate::usart::RxPin, USART3, PB11, 0);

pin_trait_impl!(crate::spi::SckPin, SPI1, PA5, 0);
pin_trait_impl!(crate::spi::MisoPin, SPI1, PA6, 0);
pin_trait_impl!(crate::spi::MosiPin, SPI1, PA7, 0);
pin_trait_impl!(crate::spi::SckPin, SPI2, PB13, 0);
pin_trait_impl!(crate::spi::MisoPin, SPI2, PB14, 0);
pin_trait_impl!(crate::spi::MosiPin, SPI2, PB15, 0);

impl_dac_pin!(DAC1, 1, PA4);
impl_dac_pin!(DAC1, 2, PA5);

#[cfg(test)]
mod tests {
    use crate::peripherals;

    #[test]
    fn descriptor_addresses_match_the_memory_map() {
        assert_eq!(crate::pac::USART1.as_ptr() as u32, 0x4001_3800);
        assert_eq!(crate::pac::USART2.as_ptr() as u32, 0x4000_4400);
        assert_eq!(crate::pac::USART3.as_ptr() as u32, 0x4000_4800);
        assert_eq!(crate::pac::SPI1.as_ptr() as u32, 0x4001_3000);
        assert_eq!(crate::pac::SPI2.as_ptr() as u32, 0x4000_3800);
        assert_eq!(crate::pac::DAC1.as_ptr() as u32, 0x4000_7400);
        assert_eq!(crate::pac::RCC.as_ptr() as u32, 0x4002_1000);
    }

    #[test]
    fn port_blocks_match_the_memory_map() {
        assert_eq!(crate::pac::GPIO(0).as_ptr() as u32, 0x4001_0800); // GPIOA
        assert_eq!(crate::pac::GPIO(1).as_ptr() as u32, 0x4001_0C00); // GPIOB
        assert_eq!(crate::pac::GPIO(6).as_ptr() as u32, 0x4001_2000); // GPIOG
    }

    #[test]
    fn pin_port_encoding_matches_the_table() {
        use crate::gpio::Pin;
        let pa9 = unsafe { peripherals::PA9::steal() };
        assert_eq!((pa9.port(), pa9.pin()), (0, 9));
        let pg15 = unsafe { peripherals::PG15::steal() };
        assert_eq!((pg15.port(), pg15.pin()), (6, 15));
    }
}
