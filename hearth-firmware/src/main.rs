//! Hearth - OLED fireplace firmware
//!
//! Plays a looping fire animation on an SSD1309/SSD1306 OLED over I2C.
//!
//! Startup: blink the status LED, bring up the bus and the display, show
//! the welcome banner for a while, prepare the frames, run one display
//! self-test and then animate forever. Every error on the way is logged
//! and halts the board.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::I2c;
use embassy_time::{Delay, Timer};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use hearth_core::animation::{AnimationSequence, Animator, FrameSet, Forever};
use hearth_core::{selftest, App};
use hearth_display::{draw_banner, DisplayError, Ssd1309};
use hearth_hal_rp2040::i2c::peripheral_config;
use hearth_hal_rp2040::{BlockingI2c, I2cBus, I2cConfig, Led};

#[macro_use]
mod config;

use crate::config::{ANIMATION, DISPLAY};

// Prepared frames, borrowed by the animation for the rest of the program
static FRAMES: StaticCell<FrameSet> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Hearth firmware starting...");

    let p = embassy_rp::init(Default::default());
    let mut delay = Delay;

    // Signs of life before touching the display
    let mut led = Led::new(Output::new(take_led!(p), Level::Low));
    selftest::blink(
        &mut led,
        &mut delay,
        config::LED_BLINKS,
        config::BLINK_PERIOD_MS,
    );

    let (i2c_peri, scl, sda) = take_i2c!(p);
    let bus_config = I2cConfig::from_hz(config::I2C_FREQUENCY).unwrap_or_default();
    let i2c = I2c::new_blocking(i2c_peri, scl, sda, peripheral_config(bus_config));
    info!("I2C initialized at {} Hz", bus_config.frequency);

    let mut display = match Ssd1309::new(BlockingI2c::new(i2c), DISPLAY) {
        Ok(display) => display,
        Err(e) => halt("Display configuration rejected", e),
    };
    if let Err(e) = display.init() {
        error!("No display answering at {=u8:#x}", DISPLAY.address);
        halt("Display init failed", e);
    }
    info!(
        "Display initialized: {}x{} at {=u8:#x}",
        DISPLAY.width, DISPLAY.height, DISPLAY.address
    );

    if config::BANNER_ENABLED {
        if let Err(e) = render_banner(&mut display) {
            halt("Banner failed", e);
        }
        info!("Banner shown, holding {} ms", config::BANNER_HOLD_MS);
        Timer::after_millis(config::BANNER_HOLD_MS).await;
    }

    let frames = FRAMES.init_with(FrameSet::new);
    if let Err(e) = frames.load(
        DISPLAY.width,
        DISPLAY.height,
        config::ASSETS.iter().copied(),
        ANIMATION.format,
        ANIMATION.mirror,
    ) {
        halt("Frame preparation failed", e);
    }

    let sequence = match AnimationSequence::new(
        frames.as_slice(),
        DISPLAY.width,
        DISPLAY.height,
        ANIMATION.playback,
    ) {
        Ok(sequence) => sequence,
        Err(e) => halt("Animation sequence rejected", e),
    };
    info!(
        "Animation ready: {} frames, {} per cycle, {} ms each",
        sequence.frame_count(),
        sequence.len(),
        ANIMATION.frame_interval_ms
    );

    let mut app = App::new(
        display,
        Animator::new(sequence, ANIMATION.frame_interval_ms),
    );
    if let Err(e) = app.self_test() {
        halt("Display self-test failed", e);
    }

    let log_every = ANIMATION.log_every;
    let result = app.run_observed(&mut delay, &mut Forever, |snapshot| {
        if log_every != 0 && snapshot.frames_shown % log_every == 0 {
            info!("Animation: {}", snapshot);
        }
    });

    match result {
        Err(e) => halt("Animation stopped", e),
        Ok(shown) => halt("Animation loop returned", shown),
    }
}

/// Draw the welcome banner and send it to the panel
fn render_banner<B: I2cBus>(display: &mut Ssd1309<B>) -> Result<(), DisplayError<B::Error>> {
    draw_banner(display, config::BANNER_LINES)?;
    display.flush()
}

/// Log a fatal error and stop
fn halt<E: Format>(what: &str, e: E) -> ! {
    error!("{}: {:?}", what, e);
    defmt::panic!("Halted")
}
