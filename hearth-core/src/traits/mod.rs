//! Hardware abstraction traits
//!
//! These traits define the interface between the animation logic
//! and hardware-specific implementations.

pub mod display;

pub use display::FrameSink;
