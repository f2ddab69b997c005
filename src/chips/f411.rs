//! STM32F411CE tables: peripheral descriptors, pins and clock-enable rows.

use crate::pac::RCC;

embassy_hal_internal::peripherals! {
    USART1, USART2, USART6, SPI1, SPI2, SPI3,
    PA0, PA1, PA2, PA3, PA4, PA5, PA6, PA7, PA8, PA9, PA10, PA11, PA12, PA13, PA14, PA15, PB0,
    PB1, PB2, PB3, PB4, PB5, PB6, PB7, PB8, PB9, PB10, PB11, PB12, PB13, PB14, PB15, PC0, PC1,
    PC2, PC3, PC4, PC5, PC6, PC7, PC8, PC9, PC10, PC11, PC12, PC13, PC14, PC15, PD0, PD1, PD2,
    PD3, PD4, PD5, PD6, PD7, PD8, PD9, PD10, PD11, PD12, PD13, PD14, PD15, PE0, PE1, PE2, PE3,
    PE4, PE5, PE6, PE7, PE8, PE9, PE10, PE11, PE12, PE13, PE14, PE15, PH0, PH1,
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
impl_pin!(PH0, 7, 0);
impl_pin!(PH1, 7, 1);

/// Enable the clock of the port controller feeding the pin.
pub(crate) fn enable_gpio_port_clock(port: u8) {
    RCC.ahb1enr().modify(|w| match port {
        0 => w.set_gpioaen(true),
        1 => w.set_gpioben(true),
        2 => w.set_gpiocen(true),
        3 => w.set_gpioden(true),
        4 => w.set_gpioeen(true),
        7 => w.set_gpiohen(true),
        _ => unreachable!(),
    });
}

impl_rcc!(USART1, apb2enr, set_usart1en, apb2rstr, set_usart1rst, pclk2);
impl_rcc!(USART2, apb1enr, set_usart2en, apb1rstr, set_usart2rst, pclk1);
impl_rcc!(USART6, apb2enr, set_usart6en, apb2rstr, set_usart6rst, pclk2);
impl_rcc!(SPI1, apb2enr, set_spi1en, apb2rstr, set_spi1rst, pclk2);
impl_rcc!(SPI2, apb1enr, set_spi2en, apb1rstr, set_spi2rst, pclk1);
impl_rcc!(SPI3, apb1enr, set_spi3en, apb1rstr, set_spi3rst, pclk1);

impl_usart!(USART1);
impl_usart!(USART2);
impl_usart!(USART6);

impl_spi!(SPI1);
impl_spi!(SPI2);
impl_spi!(SPI3);

pin_trait_impl!(crate::usart::TxPin, USART1, PA9, 7);
pin_trait_impl!(crate::usart::RxPin, USART1, PA10, 7);
pin_trait_impl!(crate::usart::TxPin, USART1, PB6, 7);
pin_trait_impl!(crate::usart::RxPin, USART1, PB7, 7);
pin_trait_impl!(crate::usart::TxPin, USART2, PA2, 7);
pin_trait_impl!(crate::usart::RxPin, USART2, PA3, 7);
pin_trait_impl!(crate::usart::TxPin, USART6, PC6, 8);
pin_trait_impl!(crate::usart::RxPin, USART6, PC7, 8);
pin_trait_impl!(crate::usart::TxPin, USART6, PA11, 8);
pin_trait_impl!(crate::usart::RxPin, USART6, PA12, 8);

pin_trait_impl!(crate::spi::SckPin, SPI1, PA5, 5);
pin_trait_impl!(crate::spi::MisoPin, SPI1, PA6, 5);
pin_trait_impl!(crate::spi::MosiPin, SPI1, PA7, 5);
pin_trait_impl!(crate::spi::SckPin, SPI1, PB3, 5);
pin_trait_impl!(crate::spi::MisoPin, SPI1, PB4, 5);
pin_trait_impl!(crate::spi::MosiPin, SPI1, PB5, 5);
pin_trait_impl!(crate::spi::SckPin, SPI2, PB10, 5);
pin_trait_impl!(crate::spi::SckPin, SPI2, PB13, 5);
pin_trait_impl!(crate::spi::MisoPin, SPI2, PB14, 5);
pin_trait_impl!(crate::spi::MosiPin, SPI2, PB15, 5);
pin_trait_impl!(crate::spi::MisoPin, SPI2, PC2, 5);
pin_trait_impl!(crate::spi::MosiPin, SPI2, PC3, 5);
pin_trait_impl!(crate::spi::SckPin, SPI3, PB3, 6);
pin_trait_impl!(crate::spi::MisoPin, SPI3, PB4, 6);
pin_trait_impl!(crate::spi::MosiPin, SPI3, PB5, 6);
pin_trait_impl!(crate::spi::SckPin, SPI3, PC10, 6);
pin_trait_impl!(crate::spi::MisoPin, SPI3, PC11, 6);
pin_trait_impl!(crate::spi::MosiPin, SPI3, PC12, 6);

#[cfg(test)]
mod tests {
    use crate::peripherals;

    #[test]
    fn descriptor_addresses_match_the_memory_map() {
        assert_eq!(crate::pac::USART1.as_ptr() as u32, 0x4001_1000);
        assert_eq!(crate::pac::USART2.as_ptr() as u32, 0x4000_4400);
        assert_eq!(crate::pac::USART6.as_ptr() as u32, 0x4001_1400);
        assert_eq!(crate::pac::SPI1.as_ptr() as u32, 0x4001_3000);
        assert_eq!(crate::pac::SPI2.as_ptr() as u32, 0x4000_3800);
        assert_eq!(crate::pac::SPI3.as_ptr() as u32, 0x4000_3C00);
        assert_eq!(crate::pac::RCC.as_ptr() as u32, 0x4002_3800);
    }

    #[test]
    fn port_blocks_match_the_memory_map() {
        assert_eq!(crate::pac::GPIO(0).as_ptr() as u32, 0x4002_0000); // GPIOA
        assert_eq!(crate::pac::GPIO(7).as_ptr() as u32, 0x4002_1C00); // GPIOH
    }

    #[test]
    fn pin_af_codes_match_the_datasheet() {
        let pa9 = unsafe { peripherals::PA9::steal() };
        let af = <peripherals::PA9 as crate::usart::TxPin<peripherals::USART1>>::af_num(&pa9);
        assert_eq!(af, 7);
        let pb3 = unsafe { peripherals::PB3::steal() };
        let spi1 = <peripherals::PB3 as crate::spi::SckPin<peripherals::SPI1>>::af_num(&pb3);
        let spi3 = <peripherals::PB3 as crate::spi::SckPin<peripherals::SPI3>>::af_num(&pb3);
        assert_eq!((spi1, spi3), (5, 6));
    }
}
