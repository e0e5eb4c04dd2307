//! # Glyph Text Output
//!
//! Formats a line with the crash screen formatter and draws it one glyph at a time.

use crate::font::{GlyphAtlas, GLYPH_WIDTH};
use crate::format::{format_into, Arg, FormatBuffer};
use crate::graphics::{Color, Framebuffer};

/// Palette cycled by rainbow text
pub const RAINBOW: [Color; 6] = [
    Color::rgb(255, 50, 50),
    Color::rgb(255, 200, 50),
    Color::rgb(255, 240, 80),
    Color::rgb(120, 220, 255),
    Color::rgb(120, 160, 255),
    Color::rgb(200, 120, 255),
];

/// How glyphs of one line are colored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
    /// Every glyph in one RGBA5551 color
    Fixed(u16),
    /// Every glyph in the printer's default foreground
    Default,
    /// Glyphs walk through [`RAINBOW`], one step per drawn glyph
    Rainbow,
}

/// Position in the rainbow palette
#[derive(Debug, Default, Clone, Copy)]
pub struct RainbowCycle {
    drawn: usize,
}

impl RainbowCycle {
    pub const fn new() -> Self {
        Self { drawn: 0 }
    }

    /// Color for the next drawn glyph
    pub fn next_color(&mut self) -> u16 {
        let color = RAINBOW[self.drawn % RAINBOW.len()].to_rgba5551();
        self.drawn += 1;
        color
    }
}

/// Draws formatted text onto a surface
pub struct TextPrinter<'s, 'fb> {
    surface: &'s mut Framebuffer<'fb>,
    atlas: &'s GlyphAtlas,
    foreground: u16,
}

impl<'s, 'fb> TextPrinter<'s, 'fb> {
    pub fn new(surface: &'s mut Framebuffer<'fb>, atlas: &'s GlyphAtlas, foreground: u16) -> Self {
        Self {
            surface,
            atlas,
            foreground,
        }
    }

    /// Format `fmt` and draw it with its top-left corner at (x, y).
    ///
    /// Returns the x coordinate just past the last cell.
    pub fn print(&mut self, x: usize, y: usize, mode: ColorMode, fmt: &str, args: &[Arg<'_>]) -> usize {
        let mut line = FormatBuffer::new();
        format_into(&mut line, fmt, args);
        self.print_bytes(x, y, mode, &line)
    }

    /// Draw raw character codes; codes without a glyph leave their cell untouched.
    pub fn print_bytes(&mut self, x: usize, y: usize, mode: ColorMode, text: &[u8]) -> usize {
        let mut cursor = x;
        let mut rainbow = RainbowCycle::new();

        for &code in text {
            if let Some(glyph) = self.atlas.glyph_index(code) {
                let color = match mode {
                    ColorMode::Fixed(color) => color,
                    ColorMode::Default => self.foreground,
                    ColorMode::Rainbow => rainbow.next_color(),
                };
                self.surface.draw_glyph(cursor, y, self.atlas, glyph, color);
            }
            cursor += GLYPH_WIDTH;
        }

        cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::font::DEFAULT_ATLAS;
    use crate::graphics::BACKGROUND;

    const WIDTH: usize = 64;
    const HEIGHT: usize = 8;

    fn cell_colors(fb: &Framebuffer<'_>, cell: usize) -> std::vec::Vec<u16> {
        let mut colors = std::vec::Vec::new();
        for y in 0..HEIGHT {
            for x in cell * GLYPH_WIDTH..(cell + 1) * GLYPH_WIDTH {
                let pixel = fb.pixel(x, y);
                if pixel != BACKGROUND && !colors.contains(&pixel) {
                    colors.push(pixel);
                }
            }
        }
        colors
    }

    #[test]
    fn test_rainbow_period() {
        let mut cycle = RainbowCycle::new();
        let first: std::vec::Vec<u16> = (0..6).map(|_| cycle.next_color()).collect();
        let second: std::vec::Vec<u16> = (0..6).map(|_| cycle.next_color()).collect();
        assert_eq!(first, second);
        assert_eq!(first[0], Color::rgb(255, 50, 50).to_rgba5551());
        assert_eq!(first[5], Color::rgb(200, 120, 255).to_rgba5551());
    }

    #[test]
    fn test_rainbow_skips_unprintable_codes() {
        let mut pixels = [BACKGROUND; WIDTH * HEIGHT];
        let mut fb = Framebuffer::new(&mut pixels, WIDTH, HEIGHT).expect("surface");
        let end = TextPrinter::new(&mut fb, &DEFAULT_ATLAS, 0xFFFF).print_bytes(0, 0, ColorMode::Rainbow, b"A\nB");

        assert_eq!(end, 3 * GLYPH_WIDTH);
        assert_eq!(cell_colors(&fb, 0), [RAINBOW[0].to_rgba5551()]);
        assert!(cell_colors(&fb, 1).is_empty());
        assert_eq!(cell_colors(&fb, 2), [RAINBOW[1].to_rgba5551()]);
    }

    #[test]
    fn test_rainbow_restarts_per_line() {
        let mut pixels = [BACKGROUND; WIDTH * HEIGHT];
        let mut fb = Framebuffer::new(&mut pixels, WIDTH, HEIGHT).expect("surface");
        let mut printer = TextPrinter::new(&mut fb, &DEFAULT_ATLAS, 0xFFFF);
        let cursor = printer.print(0, 0, ColorMode::Rainbow, "%d", &[7i32.into()]);
        printer.print(cursor, 0, ColorMode::Rainbow, "%d", &[7i32.into()]);

        assert_eq!(cell_colors(&fb, 0), cell_colors(&fb, 1));
    }

    #[test]
    fn test_default_and_fixed_colors() {
        let mut pixels = [BACKGROUND; WIDTH * HEIGHT];
        let mut fb = Framebuffer::new(&mut pixels, WIDTH, HEIGHT).expect("surface");
        let mut printer = TextPrinter::new(&mut fb, &DEFAULT_ATLAS, 0x07C1);
        let cursor = printer.print(0, 0, ColorMode::Default, "%s", &["X".into()]);
        assert_eq!(cursor, GLYPH_WIDTH);
        printer.print(cursor, 0, ColorMode::Fixed(0xF801), "X", &[]);

        assert_eq!(cell_colors(&fb, 0), [0x07C1]);
        assert_eq!(cell_colors(&fb, 1), [0xF801]);
    }

    #[test]
    fn test_space_advances_without_drawing() {
        let mut pixels = [BACKGROUND; WIDTH * HEIGHT];
        let mut fb = Framebuffer::new(&mut pixels, WIDTH, HEIGHT).expect("surface");
        let end = TextPrinter::new(&mut fb, &DEFAULT_ATLAS, 0xFFFF).print(6, 0, ColorMode::Default, "   ", &[]);

        assert_eq!(end, 6 + 3 * GLYPH_WIDTH);
        assert!(fb.pixels().iter().all(|&p| p == BACKGROUND));
    }
}
