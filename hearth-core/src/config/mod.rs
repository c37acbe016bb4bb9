//! Configuration types
//!
//! Runtime mirrors of the firmware's build-time configuration. Defaults
//! match the deployed board.

pub mod types;

pub use types::*;
