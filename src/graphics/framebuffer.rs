//! # Crash Screen Framebuffer
//!
//! 16-bit RGBA5551 pixel access for the crash screen. The pixel memory belongs to the
//! display subsystem; a `Framebuffer` only borrows it for the length of one render.
//!
//! Drawing coordinates are a caller precondition: nothing here clips. A rectangle or
//! glyph that leaves the surface is a programming error in the layout.

use core::ptr::NonNull;

use crate::error::{CrashScreenError, Result};
use crate::font::{GlyphAtlas, GLYPH_HEIGHT, GLYPH_ROW_MSB, GLYPH_WIDTH};

/// Color representation in RGBA format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    /// Create a new color
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque color
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Pack into RGBA5551 (5 bits per color channel, 1 bit of alpha)
    pub const fn to_rgba5551(&self) -> u16 {
        (((self.r as u16) << 8) & 0xF800)
            | (((self.g as u16) << 3) & 0x07C0)
            | (((self.b as u16) >> 2) & 0x003E)
            | (self.a != 0) as u16
    }

    // Common colors
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
}

/// Opaque black, the crash screen background
pub const BACKGROUND: u16 = Color::BLACK.to_rgba5551();
/// Foreground used by monochrome glyphs
pub const DEFAULT_FOREGROUND: u16 = Color::WHITE.to_rgba5551();

/// Channel bits that survive dimming (the top 3 bits of each channel)
const DIM_MASK: u16 = 0xE738;

/// A borrowed RGBA5551 surface
pub struct Framebuffer<'a> {
    pixels: &'a mut [u16],
    width: usize,
    height: usize,
}

impl<'a> Framebuffer<'a> {
    /// Wrap a pixel slice laid out row-major with no padding between rows.
    pub fn new(pixels: &'a mut [u16], width: usize, height: usize) -> Result<Self> {
        let needed = width * height;
        if pixels.len() < needed {
            return Err(CrashScreenError::SurfaceTooSmall {
                needed,
                available: pixels.len(),
            });
        }

        Ok(Self {
            pixels,
            width,
            height,
        })
    }

    /// Wrap externally owned pixel memory.
    ///
    /// # Safety
    /// `buffer` must point to `width * height` writable pixels that stay valid, and are
    /// not accessed through any other path, for `'a`.
    pub unsafe fn from_raw_parts(buffer: NonNull<u16>, width: usize, height: usize) -> Self {
        Self {
            pixels: core::slice::from_raw_parts_mut(buffer.as_ptr(), width * height),
            width,
            height,
        }
    }

    /// Width in pixels
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels
    pub const fn height(&self) -> usize {
        self.height
    }

    /// The whole surface, row-major
    pub fn pixels(&self) -> &[u16] {
        &self.pixels[..self.width * self.height]
    }

    pub fn pixel(&self, x: usize, y: usize) -> u16 {
        self.pixels[y * self.width + x]
    }

    pub fn set_pixel(&mut self, x: usize, y: usize, color: u16) {
        self.pixels[y * self.width + x] = color;
    }

    /// Fill the entire surface with one color
    pub fn fill(&mut self, color: u16) {
        let count = self.width * self.height;
        self.pixels[..count].iter_mut().for_each(|pixel| *pixel = color);
    }

    /// Fill the entire surface by repeating a `tile_width` x `tile_height` tile
    pub fn fill_tiled(&mut self, tile: &[u16], tile_width: usize, tile_height: usize) {
        for y in 0..self.height {
            let tile_row = &tile[(y % tile_height) * tile_width..][..tile_width];
            let row = &mut self.pixels[y * self.width..][..self.width];
            for (x, pixel) in row.iter_mut().enumerate() {
                *pixel = tile_row[x % tile_width];
            }
        }
    }

    /// Darken a rectangle so text drawn over it stays readable.
    ///
    /// Each pixel keeps the top bits of its channels shifted down two places, which
    /// gives a see-through panel without a real alpha blend.
    pub fn draw_dim_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
        for row in y..(y + height) {
            let start = row * self.width + x;
            for pixel in &mut self.pixels[start..start + width] {
                *pixel = ((*pixel & DIM_MASK) >> 2) | BACKGROUND;
            }
        }
    }

    /// Draw one glyph with its top-left corner at (x, y).
    ///
    /// Only set bits are written; the rest of the cell keeps whatever was underneath.
    pub fn draw_glyph(&mut self, x: usize, y: usize, atlas: &GlyphAtlas, glyph: u8, color: u16) {
        for row in 0..GLYPH_HEIGHT {
            let bits = atlas.row_bits(glyph, row);
            let start = (y + row) * self.width + x;
            let cells = &mut self.pixels[start..start + GLYPH_WIDTH];

            for (col, pixel) in cells.iter_mut().enumerate() {
                if bits & (GLYPH_ROW_MSB >> col) != 0 {
                    *pixel = color;
                }
            }
        }
    }

    /// Draw one glyph in the default foreground color
    pub fn draw_glyph_monochrome(&mut self, x: usize, y: usize, atlas: &GlyphAtlas, glyph: u8) {
        self.draw_glyph(x, y, atlas, glyph, DEFAULT_FOREGROUND);
    }
}
