//! Hearth Hardware Abstraction Layer
//!
//! Hardware abstraction traits implemented by chip-specific HALs. The
//! display driver and the animation core only ever see these traits, so
//! they build and test on the host.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  hearth-display, hearth-core            │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  hearth-hal (this crate - traits)       │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!             ┌───────────────┐
//!             │  hearth-hal-  │
//!             │    rp2040     │
//!             └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`] - Digital output (status LED)
//! - [`i2c::I2cBus`] - I2C master writes

#![no_std]
#![deny(unsafe_code)]

pub mod gpio;
pub mod i2c;

pub use gpio::OutputPin;
pub use i2c::{I2cBus, I2cConfig};
