//! STM32F051R8 tables: peripheral descriptors, pins and clock-enable rows.

use crate::pac::RCC;

embassy_hal_internal::peripherals! {
    USART1, USART2, SPI1, SPI2, DAC1,
    PA0, PA1, PA2, PA3, PA4, PA5, PA6, PA7, PA8, PA9, PA10, PA11, PA12, PA13, PA14, PA15, PB0,
    PB1, PB2, PB3, PB4, PB5, PB6, PB7, PB8, PB9, PB10, PB11, PB12, PB13, PB14, PB15, PC0, PC1,
    PC2, PC3, PC4, PC5, PC6, PC7, PC8, PC9, PC10, PC11, PC12, PC13, PC14, PC15, PD2, PF0, PF1,
    PF4, PF5, PF6, PF7,
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
impl_pin!(PD2, 3, 2);
impl_pin!(PF0, 5, 0);
impl_pin!(PF1, 5, 1);
impl_pin!(PF4, 5, 4);
impl_pin!(PF5, 5, 5);
impl_pin!(PF6, 5, 6);
impl_pin!(PF7, 5, 7);

/// Enable the clock of the port controller feeding the pin.
pub(crate) fn enable_gpio_port_clock(port: u8) {
    RCC.ahbenr().modify(|w| match port {
        0 => w.set_iopaen(true),
        1 => w.set_iopben(true),
        2 => w.set_iopcen(true),
        3 => w.set_iopden(true),
        5 => w.set_iopfen(true),
        _ => unreachable!(),
    });
}

impl_rcc!(USART1, apb2enr, set_usart1en, apb2rstr, set_usart1rst, pclk2);
impl_rcc!(USART2, apb1enr, set_usart2en, apb1rstr, set_usart2rst, pclk1);
impl_rcc!(SPI1, apb2enr, set_spi1en, apb2rstr, set_spi1rst, pclk2);
impl_rcc!(SPI2, apb1enr, set_spi2en, apb1rstr, set_spi2rst, pclk1);
impl_rcc!(DAC1, apb1enr, set_dacen, apb1rstr, set_dacrst, pclk1);

impl_usart!(USART1);
impl_usart!(USART2);

impl_spi!(SPI1);
impl_spi!(SPI2);

impl_dac!(DAC1);

pin_trait_impl!(crate::usart::TxPin, USART1, PA9, 1);
pin_trait_impl!(crate::usart::RxPin, USART1, PA10, 1);
pin_trait_impl!(crate::usart::TxPin, USART1, PB6, 0);
pin_trait_impl!(crate::usart::RxPin, USART1, PB7, 0);
pin_trait_impl!(crate::usart::TxPin, USART2, PA2, 1);
pin_trait_impl!(crate::usart::RxPin, USART2, PA3, 1);
pin_trait_impl!(crate::usart::TxPin, USART2, PA14, 1);
pin_trait_impl!(crate::usart::RxPin, USART2, PA15, 1);

pin_trait_impl!(crate::spi::SckPin, SPI1, PA5, 0);
pin_trait_impl!(crate::spi::MisoPin, SPI1, PA6, 0);
pin_trait_impl!(crate::spi::MosiPin, SPI1, PA7, 0);
pin_trait_impl!(crate::spi::SckPin, SPI1, PB3, 0);
pin_trait_impl!(crate::spi::MisoPin, SPI1, PB4, 0);
pin_trait_impl!(crate::spi::MosiPin, SPI1, PB5, 0);
pin_trait_impl!(crate::spi::SckPin, SPI2, PB13, 0);
pin_trait_impl!(crate::spi::MisoPin, SPI2, PB14, 0);
pin_trait_impl!(crate::spi::MosiPin, SPI2, PB15, 0);

impl_dac_pin!(DAC1, 1, PA4);

#[cfg(test)]
mod tests {
    use crate::peripherals;

    #[test]
    fn descriptor_addresses_match_the_memory_map() {
        assert_eq!(crate::pac::USART1.as_ptr() as u32, 0x4001_3800);
        assert_eq!(crate::pac::USART2.as_ptr() as u32, 0x4000_4400);
        assert_eq!(crate::pac::SPI1.as_ptr() as u32, 0x4001_3000);
        assert_eq!(crate::pac::SPI2.as_ptr() as u32, 0x4000_3800);
        assert_eq!(crate::pac::DAC1.as_ptr() as u32, 0x4000_7400);
        assert_eq!(crate::pac::RCC.as_ptr() as u32, 0x4002_1000);
    }

    #[test]
    fn port_blocks_match_the_memory_map() {
        assert_eq!(crate::pac::GPIO(0).as_ptr() as u32, 0x4800_0000); // GPIOA
        assert_eq!(crate::pac::GPIO(2).as_ptr() as u32, 0x4800_0800); // GPIOC
    }

    #[test]
    fn pin_af_codes_match_the_datasheet() {
        let pa9 = unsafe { peripherals::PA9::steal() };
        let af = <peripherals::PA9 as crate::usart::TxPin<peripherals::USART1>>::af_num(&pa9);
        assert_eq!(af, 1);
        let pb6 = unsafe { peripherals::PB6::steal() };
        let af = <peripherals::PB6 as crate::usart::TxPin<peripherals::USART1>>::af_num(&pb6);
        assert_eq!(af, 0);
    }
}
