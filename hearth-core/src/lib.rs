//! Board-agnostic core logic for the fireplace firmware
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Packed 1-bit-per-pixel bitmaps in controller page layout
//! - Frame preparation (mirroring, format conversion)
//! - Animation sequence and the frame-timed animation loop
//! - Startup self-test
//! - Configuration type definitions
//! - The `FrameSink` trait the display driver implements

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod app;
pub mod bitmap;
pub mod config;
pub mod selftest;
pub mod traits;

#[cfg(test)]
mod mock;

pub use app::App;
pub use bitmap::{BitmapError, PackedBitmap, MAX_FRAME_BYTES};
