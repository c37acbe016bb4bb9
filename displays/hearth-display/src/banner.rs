//! Welcome banner
//!
//! A few lines of centred text shown before the animation starts.

use embedded_graphics::mono_font::ascii::FONT_6X10;
use embedded_graphics::mono_font::MonoTextStyle;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Alignment, Baseline, Text, TextStyleBuilder};

/// Lines that fit on a 64-pixel-high panel
pub const MAX_LINES: usize = 6;

/// Greeting used when no banner text is configured
pub const DEFAULT_LINES: &[&str] = &[
    "Merry Christmas!",
    "OLED SSD1309",
    "DEMONSTRATION",
    "Presented by",
    "Hogeschool",
    "U t r e c h t",
];

/// Clear `target` and draw up to `MAX_LINES` lines, centred both ways
///
/// Extra lines are ignored. Nothing is sent to the panel; flush
/// afterwards.
pub fn draw_banner<D>(target: &mut D, lines: &[&str]) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    target.clear(BinaryColor::Off)?;

    let lines = &lines[..lines.len().min(MAX_LINES)];
    let area = target.bounding_box();
    let line_height = FONT_6X10.character_size.height as i32;
    let block_height = line_height * lines.len() as i32;
    let top = area.top_left.y + (area.size.height as i32 - block_height).max(0) / 2;
    let center_x = area.top_left.x + area.size.width as i32 / 2;

    let character_style = MonoTextStyle::new(&FONT_6X10, BinaryColor::On);
    let text_style = TextStyleBuilder::new()
        .alignment(Alignment::Center)
        .baseline(Baseline::Top)
        .build();

    for (row, line) in lines.iter().enumerate() {
        let position = Point::new(center_x, top + row as i32 * line_height);
        Text::with_text_style(line, position, character_style, text_style).draw(target)?;
    }

    Ok(())
}
