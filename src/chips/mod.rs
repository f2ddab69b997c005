//! Per-chip tables: peripheral singletons, pin definitions, signal/AF rows
//! and clock-enable rows.
//!
//! Exactly one chip module is compiled per build; everything chip-specific
//! that the generic drivers consume lives here.

#[cfg_attr(feature = "stm32f051r8", path = "f051.rs")]
#[cfg_attr(feature = "stm32f103ze", path = "f103.rs")]
#[cfg_attr(feature = "stm32f411ce", path = "f411.rs")]
mod chip;

pub use chip::*;
