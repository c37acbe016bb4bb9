//! OLED display support for the fireplace firmware
//!
//! This crate provides:
//! - `Ssd1309`, a frame-buffered driver for SSD1309/SSD1306-class
//!   controllers on an `I2cBus`
//! - `DisplayError`, the driver's error type
//! - `banner`, centred multi-line text drawn with `embedded-graphics`
//!
//! The driver implements `hearth_core::traits::FrameSink`, so the
//! animation loop can drive it directly, and `embedded_graphics`'
//! `DrawTarget`, so anything `embedded-graphics` can draw ends up in its
//! frame buffer.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod banner;
pub mod error;
pub mod ssd1309;

#[cfg(test)]
mod mock;

pub use banner::{draw_banner, DEFAULT_LINES, MAX_LINES};
pub use error::DisplayError;
pub use ssd1309::Ssd1309;
