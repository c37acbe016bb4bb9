//! GPIO output

use embassy_rp::gpio::{Level, Output};
use hearth_hal::OutputPin;

/// Active-high LED on a push-pull output
pub struct Led<'d> {
    pin: Output<'d>,
}

impl<'d> Led<'d> {
    pub fn new(pin: Output<'d>) -> Self {
        Self { pin }
    }
}

impl OutputPin for Led<'_> {
    fn set_high(&mut self) {
        self.pin.set_level(Level::High);
    }

    fn set_low(&mut self) {
        self.pin.set_level(Level::Low);
    }

    fn is_set_high(&self) -> bool {
        self.pin.is_set_high()
    }
}
