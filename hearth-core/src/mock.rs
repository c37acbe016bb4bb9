//! Test doubles shared by the unit tests

use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use hearth_hal::OutputPin;

use crate::traits::FrameSink;

/// Simulated time in nanoseconds, advanced only by `MockDelay`
pub type Clock = Cell<u64>;

pub fn millis(clock: &Clock) -> u64 {
    clock.get() / 1_000_000
}

/// Delay that advances the shared clock instead of sleeping
pub struct MockDelay<'c> {
    pub clock: &'c Clock,
}

impl DelayNs for MockDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.clock.set(self.clock.get() + u64::from(ns));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockError;

/// Display that records what it was asked to show, and when
pub struct MockSink<'c> {
    pub clock: &'c Clock,
    /// (milliseconds, first byte of the frame) per blit
    pub blits: Vec<(u64, u8)>,
    pub clears: usize,
    /// Fail the blit with this zero-based number
    pub fail_at: Option<usize>,
}

impl<'c> MockSink<'c> {
    pub fn new(clock: &'c Clock) -> Self {
        Self {
            clock,
            blits: Vec::new(),
            clears: 0,
            fail_at: None,
        }
    }

    pub fn shown(&self) -> Vec<u8> {
        self.blits.iter().map(|&(_, frame)| frame).collect()
    }
}

impl FrameSink for MockSink<'_> {
    type Error = MockError;

    fn clear(&mut self) -> Result<(), MockError> {
        self.clears += 1;
        Ok(())
    }

    fn blit(&mut self, frame: &[u8]) -> Result<(), MockError> {
        if self.fail_at == Some(self.blits.len()) {
            return Err(MockError);
        }
        self.blits.push((millis(self.clock), frame[0]));
        Ok(())
    }
}

/// LED that counts rising edges
pub struct MockLed {
    pub high: bool,
    pub pulses: usize,
}

impl MockLed {
    pub fn new() -> Self {
        Self {
            high: false,
            pulses: 0,
        }
    }
}

impl OutputPin for MockLed {
    fn set_high(&mut self) {
        if !self.high {
            self.pulses += 1;
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Frames whose first byte is their index
pub fn numbered_frames(count: usize) -> Vec<crate::bitmap::PackedBitmap> {
    (0..count)
        .map(|i| crate::bitmap::PackedBitmap::from_bytes(128, 64, &[i as u8; 1024]).unwrap())
        .collect()
}
