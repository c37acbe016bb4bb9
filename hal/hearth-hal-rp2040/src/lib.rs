//! RP2040-specific HAL for the fireplace firmware
//!
//! This crate provides RP2040 implementations of the shared `hearth-hal`
//! traits on top of `embassy-rp`:
//!
//! - Blocking I2C master (implements `hearth_hal::I2cBus`)
//! - Push-pull GPIO output (implements `hearth_hal::OutputPin`)

#![no_std]

pub mod gpio;
pub mod i2c;

pub use gpio::Led;
pub use i2c::{BlockingI2c, I2cBusError};

// Re-export shared traits from hearth-hal for convenience
pub use hearth_hal::{I2cBus, I2cConfig, OutputPin};
