#![macro_use]

macro_rules! new_pin {
    ($name:ident, $af_type:expr) => {{
        let pin = $name.into_ref();
        pin.set_as_af(pin.af_num(), $af_type);
        Some(pin.map_into())
    }};
}

macro_rules! pin_trait {
    ($signal:ident, $instance:path) => {
        #[doc = concat!(stringify!($signal), " pin trait")]
        pub trait $signal<T: $instance>: crate::gpio::Pin {
            #[doc = concat!("Get the AF number needed to use this pin as ", stringify!($signal))]
            fn af_num(&self) -> u8;
        }
    };
}

/// One row of the per-chip (signal, instance, pin, AF) table.
///
/// Combinations without a row do not implement the signal trait and fail to
/// compile when requested. On `gpio_v1` chips the AF number is unused by the
/// pin controller (routing is fixed by the default AFIO mapping) and is 0.
macro_rules! pin_trait_impl {
    (crate::$mod:ident::$trait:ident, $instance:ident, $pin:ident, $af:expr) => {
        impl crate::$mod::$trait<crate::peripherals::$instance> for crate::peripherals::$pin {
            fn af_num(&self) -> u8 {
                $af
            }
        }
    };
}

macro_rules! impl_pin {
    ($name:ident, $port_num:expr, $pin_num:expr) => {
        impl crate::gpio::Pin for crate::peripherals::$name {}
        impl crate::gpio::SealedPin for crate::peripherals::$name {
            #[inline]
            fn pin_port(&self) -> u8 {
                $port_num * 16 + $pin_num
            }
        }

        impl From<crate::peripherals::$name> for crate::gpio::AnyPin {
            fn from(val: crate::peripherals::$name) -> Self {
                crate::gpio::Pin::degrade(val)
            }
        }
    };
}

/// One row of the per-chip peripheral descriptor table: clock-enable and
/// reset bits plus the bus clock feeding the instance.
macro_rules! impl_rcc {
    ($inst:ident, $en_reg:ident, $set_en:ident, $rst_reg:ident, $set_rst:ident, $clk:ident) => {
        impl crate::rcc::SealedRccEnableReset for crate::peripherals::$inst {
            fn rcc_enable() {
                crate::pac::RCC.$en_reg().modify(|w| w.$set_en(true));
            }

            fn rcc_disable() {
                crate::pac::RCC.$en_reg().modify(|w| w.$set_en(false));
            }

            fn rcc_reset() {
                crate::pac::RCC.$rst_reg().modify(|w| w.$set_rst(true));
                crate::pac::RCC.$rst_reg().modify(|w| w.$set_rst(false));
            }
        }
        impl crate::rcc::RccEnableReset for crate::peripherals::$inst {}

        impl crate::rcc::SealedRccGetFreq for crate::peripherals::$inst {
            fn get_freq() -> crate::time::Hertz {
                crate::rcc::clocks().$clk
            }
        }
        impl crate::rcc::RccGetFreq for crate::peripherals::$inst {}
    };
}
