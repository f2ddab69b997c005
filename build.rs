use std::env;

fn main() {
    let chip_name = match env::vars()
        .map(|(a, _)| a)
        .filter(|x| x.starts_with("CARGO_FEATURE_STM32"))
        .get_one()
    {
        Ok(x) => x,
        Err(GetOneError::None) => panic!("No stm32xx Cargo feature enabled"),
        Err(GetOneError::Multiple) => panic!("Multiple stm32xx Cargo features enabled"),
    }
    .strip_prefix("CARGO_FEATURE_")
    .unwrap()
    .to_ascii_lowercase();

    // Family and register-block-variant cfg flags. Driver code selects on
    // these instead of on individual chip features.
    let cfgs: &[&str] = match chip_name.as_str() {
        "stm32f051r8" => &["stm32f0", "gpio_v2", "usart_v2", "spi_v2", "peri_dac"],
        "stm32f103ze" => &["stm32f1", "gpio_v1", "usart_v1", "spi_v1", "peri_dac"],
        "stm32f411ce" => &["stm32f4", "gpio_v2", "usart_v1", "spi_v1"],
        _ => panic!("Unsupported chip: {}", chip_name),
    };

    for cfg in [
        "stm32f0", "stm32f1", "stm32f4", "gpio_v1", "gpio_v2", "usart_v1", "usart_v2", "spi_v1",
        "spi_v2", "peri_dac",
    ] {
        println!("cargo:rustc-check-cfg=cfg({})", cfg);
    }
    for cfg in cfgs {
        println!("cargo:rustc-cfg={}", cfg);
    }

    println!("cargo:rerun-if-changed=build.rs");
}

enum GetOneError {
    None,
    Multiple,
}

trait IteratorExt: Iterator {
    fn get_one(self) -> Result<Self::Item, GetOneError>;
}

impl<T: Iterator> IteratorExt for T {
    fn get_one(mut self) -> Result<Self::Item, GetOneError> {
        match self.next() {
            None => Err(GetOneError::None),
            Some(res) => match self.next() {
                Some(_) => Err(GetOneError::Multiple),
                None => Ok(res),
            },
        }
    }
}
