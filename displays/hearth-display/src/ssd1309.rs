//! SSD1309 OLED Display Driver
//!
//! Frame-buffered driver for SSD1309 and SSD1306 controllers over I2C.
//! Drawing happens in a local buffer in controller page layout; `flush()`
//! sends the whole buffer using horizontal addressing, split into data
//! writes of at most `max_chunk` bytes.
//!
//! Every command byte is its own bus write (`[0x00, cmd]`), data writes
//! are `[0x40, payload..]`.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::{DrawTarget, OriginDimensions, Pixel, Size};
use hearth_core::config::{DisplayConfig, MAX_CHUNK};
use hearth_core::traits::FrameSink;
use hearth_core::PackedBitmap;
use hearth_hal::I2cBus;

use crate::error::DisplayError;

/// Control byte for a command write
const CONTROL_CMD: u8 = 0x00;
/// Control byte for a data write
const CONTROL_DATA: u8 = 0x40;

/// SSD1309 commands
#[allow(dead_code)]
mod cmd {
    pub const MEMORY_ADDRESSING_MODE: u8 = 0x20;
    pub const COLUMN_ADDRESS: u8 = 0x21;
    pub const PAGE_ADDRESS: u8 = 0x22;
    pub const SET_START_LINE: u8 = 0x40;
    pub const SET_CONTRAST: u8 = 0x81;
    pub const SET_CHARGE_PUMP: u8 = 0x8D;
    pub const SET_SEG_REMAP_NORMAL: u8 = 0xA0;
    pub const SET_SEG_REMAP_FLIPPED: u8 = 0xA1;
    pub const DISPLAY_RESUME_TO_RAM: u8 = 0xA4;
    pub const SET_NORMAL: u8 = 0xA6;
    pub const SET_INVERSE: u8 = 0xA7;
    pub const SET_MUX_RATIO: u8 = 0xA8;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const SET_COM_SCAN_INC: u8 = 0xC0;
    pub const SET_COM_SCAN_DEC: u8 = 0xC8;
    pub const SET_DISPLAY_OFFSET: u8 = 0xD3;
    pub const SET_CLOCK_DIV: u8 = 0xD5;
    pub const SET_PRECHARGE: u8 = 0xD9;
    pub const SET_COM_PINS: u8 = 0xDA;
    pub const SET_VCOM_DETECT: u8 = 0xDB;
}

/// Number of bytes in the initialisation sequence
const INIT_LEN: usize = 25;

/// Columns are shifted on 64-pixel-wide panels
const NARROW_PANEL_OFFSET: u8 = 32;

/// SSD1309 OLED driver
pub struct Ssd1309<B> {
    bus: B,
    config: DisplayConfig,
    /// Frame buffer in controller page layout
    buffer: PackedBitmap,
    ready: bool,
}

impl<B: I2cBus> Ssd1309<B> {
    /// Create a driver; nothing is sent until `init()`
    pub fn new(bus: B, config: DisplayConfig) -> Result<Self, DisplayError<B::Error>> {
        config.validate()?;
        let buffer = PackedBitmap::new(config.width, config.height)?;
        Ok(Self {
            bus,
            config,
            buffer,
            ready: false,
        })
    }

    /// Initialise the controller, then clear the panel
    ///
    /// Stops at the first bus error and reports it as `HardwareInit`; the
    /// driver then stays uninitialised and refuses further drawing calls
    /// without touching the bus.
    pub fn init(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.ready = false;

        for &c in init_sequence(&self.config).iter() {
            self.command(c).map_err(DisplayError::HardwareInit)?;
        }

        self.buffer.fill(false);
        self.transmit().map_err(DisplayError::HardwareInit)?;

        self.ready = true;
        Ok(())
    }

    /// True once `init()` has succeeded
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    /// The local frame buffer
    pub fn buffer(&self) -> &PackedBitmap {
        &self.buffer
    }

    /// Give the bus back
    pub fn release(self) -> B {
        self.bus
    }

    /// Blank the panel
    pub fn clear(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        self.buffer.fill(false);
        self.flush()
    }

    /// Replace the panel contents with a frame in page layout
    ///
    /// The frame must be exactly `width * height / 8` bytes. A wrong
    /// length is rejected before the buffer or the bus are touched.
    pub fn blit(&mut self, frame: &[u8]) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        let expected = self.config.frame_len();
        if frame.len() != expected {
            return Err(DisplayError::SizeMismatch {
                expected,
                actual: frame.len(),
            });
        }
        self.buffer.copy_from(frame)?;
        self.flush()
    }

    /// Set or clear one pixel in the buffer; call `flush()` to show it
    pub fn draw_pixel(&mut self, x: u16, y: u16, on: bool) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        self.buffer.set_pixel(x, y, on)?;
        Ok(())
    }

    /// Send the buffer to the panel
    pub fn flush(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        self.transmit().map_err(DisplayError::Bus)
    }

    /// Set display contrast (0-255)
    pub fn set_contrast(&mut self, contrast: u8) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        self.commands(&[cmd::SET_CONTRAST, contrast])
            .map_err(DisplayError::Bus)?;
        self.config.contrast = contrast;
        Ok(())
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        let c = if inverted {
            cmd::SET_INVERSE
        } else {
            cmd::SET_NORMAL
        };
        self.command(c).map_err(DisplayError::Bus)
    }

    /// Turn the panel off; RAM contents are kept
    pub fn sleep(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        self.command(cmd::DISPLAY_OFF).map_err(DisplayError::Bus)
    }

    /// Turn the panel back on
    pub fn wake(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.ensure_ready()?;
        self.command(cmd::DISPLAY_ON).map_err(DisplayError::Bus)
    }

    /// Blank the panel and turn it off
    pub fn shutdown(&mut self) -> Result<(), DisplayError<B::Error>> {
        self.clear()?;
        self.sleep()
    }

    fn ensure_ready(&self) -> Result<(), DisplayError<B::Error>> {
        if self.ready {
            Ok(())
        } else {
            Err(DisplayError::NotInitialized)
        }
    }

    /// Send a command to the display
    fn command(&mut self, c: u8) -> Result<(), B::Error> {
        self.bus.write(self.config.address, &[CONTROL_CMD, c])
    }

    fn commands(&mut self, cmds: &[u8]) -> Result<(), B::Error> {
        for &c in cmds {
            self.command(c)?;
        }
        Ok(())
    }

    /// Set the address window to the whole panel, then send the buffer
    fn transmit(&mut self) -> Result<(), B::Error> {
        let (col_begin, col_end) = column_window(self.config.width);
        let last_page = (self.config.pages() - 1) as u8;
        self.commands(&[
            cmd::COLUMN_ADDRESS,
            col_begin,
            col_end,
            cmd::PAGE_ADDRESS,
            0,
            last_page,
        ])?;

        let mut data = [0u8; MAX_CHUNK + 1];
        data[0] = CONTROL_DATA;
        for chunk in self.buffer.as_bytes().chunks(self.config.max_chunk) {
            data[1..=chunk.len()].copy_from_slice(chunk);
            self.bus
                .write(self.config.address, &data[..=chunk.len()])?;
        }

        Ok(())
    }
}

/// First and last controller column for a panel of `width` pixels
fn column_window(width: u16) -> (u8, u8) {
    let begin = if width == 64 { NARROW_PANEL_OFFSET } else { 0 };
    (begin, begin + (width - 1) as u8)
}

fn init_sequence(config: &DisplayConfig) -> [u8; INIT_LEN] {
    let (seg_remap, com_scan) = if config.flip {
        (cmd::SET_SEG_REMAP_FLIPPED, cmd::SET_COM_SCAN_DEC)
    } else {
        (cmd::SET_SEG_REMAP_NORMAL, cmd::SET_COM_SCAN_INC)
    };
    // Sequential COM pins only for short panels that are not 64 wide
    let com_pins = if matches!(config.height, 16 | 32) && config.width != 64 {
        0x02
    } else {
        0x12
    };

    [
        cmd::DISPLAY_OFF,
        cmd::SET_CLOCK_DIV,
        0x80,
        cmd::SET_MUX_RATIO,
        (config.height - 1) as u8,
        cmd::SET_DISPLAY_OFFSET,
        0x00,
        cmd::SET_START_LINE,
        cmd::SET_CHARGE_PUMP,
        0x14,
        cmd::MEMORY_ADDRESSING_MODE,
        0x00, // horizontal
        seg_remap,
        com_scan,
        cmd::SET_COM_PINS,
        com_pins,
        cmd::SET_CONTRAST,
        config.contrast,
        cmd::SET_PRECHARGE,
        0xF1,
        cmd::SET_VCOM_DETECT,
        0x40,
        cmd::DISPLAY_RESUME_TO_RAM,
        cmd::SET_NORMAL,
        cmd::DISPLAY_ON,
    ]
}

impl<B: I2cBus> FrameSink for Ssd1309<B> {
    type Error = DisplayError<B::Error>;

    fn clear(&mut self) -> Result<(), Self::Error> {
        Ssd1309::clear(self)
    }

    fn blit(&mut self, frame: &[u8]) -> Result<(), Self::Error> {
        Ssd1309::blit(self, frame)
    }
}

impl<B: I2cBus> OriginDimensions for Ssd1309<B> {
    fn size(&self) -> Size {
        Size::new(u32::from(self.config.width), u32::from(self.config.height))
    }
}

/// Draws into the buffer only; pixels outside the panel are clipped
impl<B: I2cBus> DrawTarget for Ssd1309<B> {
    type Color = BinaryColor;
    type Error = DisplayError<B::Error>;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.ensure_ready()?;
        let (width, height) = (self.config.width, self.config.height);

        for Pixel(point, color) in pixels {
            let (Ok(x), Ok(y)) = (u16::try_from(point.x), u16::try_from(point.y)) else {
                continue;
            };
            if x < width && y < height {
                self.buffer.set_pixel(x, y, color.is_on())?;
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.ensure_ready()?;
        self.buffer.fill(color.is_on());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockBus, Nack};
    use hearth_core::config::ConfigError;
    use embedded_graphics::prelude::*;
    use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
    use proptest::prelude::*;

    fn ready_driver(config: DisplayConfig) -> Ssd1309<MockBus> {
        let mut display = Ssd1309::new(MockBus::new(), config).unwrap();
        display.init().unwrap();
        display.bus.reset();
        display
    }

    fn default_driver() -> Ssd1309<MockBus> {
        ready_driver(DisplayConfig::default())
    }

    #[test]
    fn test_init_sequence() {
        let mut display = Ssd1309::new(MockBus::new(), DisplayConfig::default()).unwrap();
        display.init().unwrap();

        let bus = display.release();
        let commands = bus.commands();
        assert_eq!(
            &commands[..INIT_LEN],
            &[
                0xAE, 0xD5, 0x80, 0xA8, 63, 0xD3, 0x00, 0x40, 0x8D, 0x14, 0x20, 0x00, 0xA1,
                0xC8, 0xDA, 0x12, 0x81, 0xFF, 0xD9, 0xF1, 0xDB, 0x40, 0xA4, 0xA6, 0xAF
            ]
        );
        // Followed by the cleared frame
        assert_eq!(bus.data(), vec![0u8; 1024]);
        assert!(bus.writes.iter().all(|(addr, _)| *addr == 0x3C));
        assert!(bus.writes.iter().all(|(_, w)| w[0] == 0x00 || w[0] == 0x40));
    }

    #[test]
    fn test_init_sequence_unflipped_short_panel() {
        let config = DisplayConfig {
            width: 128,
            height: 32,
            flip: false,
            contrast: 0x7F,
            ..Default::default()
        };
        let seq = init_sequence(&config);
        assert_eq!(seq[4], 31);
        assert_eq!(seq[12], 0xA0);
        assert_eq!(seq[13], 0xC0);
        assert_eq!(seq[15], 0x02);
        assert_eq!(seq[17], 0x7F);
    }

    #[test]
    fn test_com_pins_for_narrow_short_panel() {
        let config = DisplayConfig {
            width: 64,
            height: 32,
            ..Default::default()
        };
        assert_eq!(init_sequence(&config)[15], 0x12);
    }

    #[test]
    fn test_init_without_ack_fails_once() {
        let mut display = Ssd1309::new(MockBus::absent(), DisplayConfig::default()).unwrap();

        assert_eq!(display.init(), Err(DisplayError::HardwareInit(Nack)));
        assert!(!display.is_ready());
        assert_eq!(display.bus.attempts(), 1);

        // Nothing further reaches the bus
        assert_eq!(display.clear(), Err(DisplayError::NotInitialized));
        assert_eq!(display.blit(&[0u8; 1024]), Err(DisplayError::NotInitialized));
        assert_eq!(display.flush(), Err(DisplayError::NotInitialized));
        assert_eq!(display.set_contrast(0x10), Err(DisplayError::NotInitialized));
        assert_eq!(display.bus.attempts(), 1);
    }

    #[test]
    fn test_init_failure_midway() {
        let mut bus = MockBus::new();
        bus.nack_from = Some(5);
        let mut display = Ssd1309::new(bus, DisplayConfig::default()).unwrap();

        assert_eq!(display.init(), Err(DisplayError::HardwareInit(Nack)));
        assert_eq!(display.bus.attempts(), 6);
        assert_eq!(display.draw_pixel(0, 0, true), Err(DisplayError::NotInitialized));
    }

    #[test]
    fn test_drawing_before_init() {
        let mut display = Ssd1309::new(MockBus::new(), DisplayConfig::default()).unwrap();
        assert_eq!(display.blit(&[0u8; 1024]), Err(DisplayError::NotInitialized));
        assert_eq!(display.bus.attempts(), 0);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = DisplayConfig {
            height: 60,
            ..Default::default()
        };
        assert!(matches!(
            Ssd1309::new(MockBus::new(), config),
            Err(DisplayError::Config(_))
        ));
    }

    #[test]
    fn test_unaddressable_panels_rejected() {
        for (width, height) in [(8, 1024), (64, 128), (128, 8)] {
            let config = DisplayConfig {
                width,
                height,
                ..Default::default()
            };
            assert_eq!(
                Ssd1309::new(MockBus::new(), config).err(),
                Some(DisplayError::Config(ConfigError::InvalidDimensions {
                    width,
                    height
                }))
            );
        }
    }

    #[test]
    fn test_mux_ratio_within_controller_range() {
        for height in [16, 32, 48, 64] {
            let config = DisplayConfig {
                height,
                ..Default::default()
            };
            assert!((15..=63).contains(&init_sequence(&config)[4]));
        }
    }

    #[test]
    fn test_blit_window_and_chunks() {
        let mut display = default_driver();
        let frame: Vec<u8> = (0..1024).map(|i| i as u8).collect();

        display.blit(&frame).unwrap();

        let bus = display.release();
        assert_eq!(bus.commands(), vec![0x21, 0, 127, 0x22, 0, 7]);
        let chunks = bus.data_chunks();
        assert_eq!(chunks.len(), 8);
        assert!(chunks.iter().all(|c| c.len() == 128));
        assert_eq!(bus.data(), frame);
    }

    #[test]
    fn test_small_chunks() {
        let mut display = ready_driver(DisplayConfig {
            max_chunk: 100,
            ..Default::default()
        });
        display.blit(&[0x55; 1024]).unwrap();

        let bus = display.release();
        let lens: Vec<usize> = bus.data_chunks().iter().map(|c| c.len()).collect();
        assert_eq!(lens.len(), 11);
        assert!(lens[..10].iter().all(|&l| l == 100));
        assert_eq!(lens[10], 24);
    }

    #[test]
    fn test_narrow_panel_offset() {
        let mut display = ready_driver(DisplayConfig {
            width: 64,
            height: 48,
            ..Default::default()
        });
        display.blit(&[0xFF; 384]).unwrap();

        let bus = display.release();
        assert_eq!(bus.commands(), vec![0x21, 32, 95, 0x22, 0, 5]);
        assert_eq!(bus.data().len(), 384);
    }

    #[test]
    fn test_blit_size_mismatch_no_traffic() {
        let mut display = default_driver();
        let before = display.buffer().clone();

        for len in [1023, 1025, 512, 2048, 0] {
            let frame = vec![0xAA; len];
            assert_eq!(
                display.blit(&frame),
                Err(DisplayError::SizeMismatch {
                    expected: 1024,
                    actual: len
                })
            );
        }

        assert!(display.bus.writes.is_empty());
        assert_eq!(display.buffer(), &before);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut display = default_driver();
        display.blit(&[0xFF; 1024]).unwrap();

        display.clear().unwrap();
        let first = display.buffer().clone();
        display.clear().unwrap();

        assert_eq!(display.buffer(), &first);
        assert!(first.as_bytes().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_draw_pixel_needs_flush() {
        let mut display = default_driver();

        display.draw_pixel(3, 9, true).unwrap();
        assert!(display.bus.writes.is_empty());
        // Page 1, column 3, bit 1
        assert_eq!(display.buffer().as_bytes()[128 + 3], 0x02);

        display.flush().unwrap();
        assert_eq!(display.bus.data()[128 + 3], 0x02);
    }

    #[test]
    fn test_draw_pixel_out_of_bounds() {
        let mut display = default_driver();
        display.blit(&[0x5A; 1024]).unwrap();
        let before = display.buffer().clone();

        for (x, y) in [(128, 0), (0, 64), (200, 200)] {
            assert_eq!(
                display.draw_pixel(x, y, true),
                Err(DisplayError::OutOfBounds { x, y })
            );
        }
        assert_eq!(display.buffer(), &before);
    }

    #[test]
    fn test_bus_error_after_init() {
        let mut display = default_driver();
        display.bus.nack_from = Some(display.bus.attempts());
        assert_eq!(display.blit(&[0u8; 1024]), Err(DisplayError::Bus(Nack)));
    }

    #[test]
    fn test_control_commands() {
        let mut display = default_driver();

        display.set_contrast(0x20).unwrap();
        display.set_inverted(true).unwrap();
        display.set_inverted(false).unwrap();
        display.sleep().unwrap();
        display.wake().unwrap();

        assert_eq!(display.config().contrast, 0x20);
        assert_eq!(
            display.bus.commands(),
            vec![0x81, 0x20, 0xA7, 0xA6, 0xAE, 0xAF]
        );
    }

    #[test]
    fn test_shutdown_clears_then_sleeps() {
        let mut display = default_driver();
        display.blit(&[0xFF; 1024]).unwrap();
        display.bus.reset();

        display.shutdown().unwrap();

        assert_eq!(display.bus.data(), vec![0u8; 1024]);
        assert_eq!(display.bus.commands().last(), Some(&0xAE));
    }

    #[test]
    fn test_frame_sink_impl() {
        fn show<S: FrameSink>(sink: &mut S, frame: &[u8]) -> Result<(), S::Error> {
            sink.clear()?;
            sink.blit(frame)
        }

        let mut display = default_driver();
        show(&mut display, &[0x0F; 1024]).unwrap();
        assert_eq!(display.buffer().as_bytes(), &[0x0F; 1024][..]);
    }

    #[test]
    fn test_draw_target_clips() {
        let mut display = default_driver();

        Rectangle::new(Point::new(120, 60), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut display)
            .unwrap();

        assert!(display.buffer().pixel(127, 63).unwrap());
        assert!(display.buffer().pixel(120, 60).unwrap());
        assert!(!display.buffer().pixel(119, 60).unwrap());
        assert_eq!(display.size(), Size::new(128, 64));
        // Drawing is buffer-only
        assert!(display.bus.writes.is_empty());
    }

    #[test]
    fn test_draw_target_clear() {
        let mut display = default_driver();
        DrawTarget::clear(&mut display, BinaryColor::On).unwrap();
        assert!(display.buffer().as_bytes().iter().all(|&b| b == 0xFF));
        assert!(display.bus.writes.is_empty());
    }

    proptest! {
        #[test]
        fn prop_blit_readback_identity(frame in proptest::collection::vec(any::<u8>(), 1024)) {
            let mut display = default_driver();
            display.blit(&frame).unwrap();
            prop_assert_eq!(display.buffer().as_bytes(), &frame[..]);
            prop_assert_eq!(display.bus.data(), frame);
        }

        #[test]
        fn prop_chunks_never_exceed_limit(max_chunk in 1usize..=128) {
            let mut display = ready_driver(DisplayConfig { max_chunk, ..Default::default() });
            display.blit(&[0xC3; 1024]).unwrap();
            let chunks = display.bus.data_chunks();
            prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= max_chunk));
            prop_assert_eq!(chunks.len(), 1024usize.div_ceil(max_chunk));
        }
    }
}
