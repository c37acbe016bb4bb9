//! Startup self-test
//!
//! Visible signs of life before the animation starts: a few LED blinks,
//! then one clear and one full-frame blit so a dead display fails early.

use embedded_hal::delay::DelayNs;
use hearth_hal::OutputPin;

use crate::traits::FrameSink;

/// Blink `led` `times` times, `period_ms` on then `period_ms` off
///
/// Leaves the LED off.
pub fn blink<P, D>(led: &mut P, delay: &mut D, times: u8, period_ms: u32)
where
    P: OutputPin,
    D: DelayNs,
{
    for _ in 0..times {
        led.set_high();
        delay.delay_ms(period_ms);
        led.set_low();
        delay.delay_ms(period_ms);
    }
}

/// Clear the display, then show `frame`
pub fn check_display<S: FrameSink>(sink: &mut S, frame: &[u8]) -> Result<(), S::Error> {
    sink.clear()?;
    sink.blit(frame)
}
