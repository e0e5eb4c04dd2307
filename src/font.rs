//! # Crash Screen Font
//!
//! Bundled 6x8 bitmap font for the crash screen. Glyphs cover printable ASCII
//! (0x20..=0x7E) and are stored the way the renderer reads them: 32-bit bit rows,
//! five glyphs side by side per row group, most significant bit first.

/// Width of one glyph cell in pixels (cursor advance)
pub const GLYPH_WIDTH: usize = 6;
/// Height of one glyph cell in pixels
pub const GLYPH_HEIGHT: usize = 8;
/// Glyphs packed next to each other in one 32-bit row
pub const GLYPHS_PER_GROUP: usize = 5;
/// First character code with a glyph
pub const FIRST_PRINTABLE: u8 = 0x20;
/// Last character code with a glyph
pub const LAST_PRINTABLE: u8 = 0x7E;
/// Number of glyphs in the bundled atlas
pub const GLYPH_COUNT: usize = (LAST_PRINTABLE - FIRST_PRINTABLE) as usize + 1;
/// Number of 32-bit words backing the bundled atlas
pub const ATLAS_WORDS: usize = (GLYPH_COUNT + GLYPHS_PER_GROUP - 1) / GLYPHS_PER_GROUP * GLYPH_HEIGHT;

/// Leftmost pixel of an unpacked glyph row
pub const GLYPH_ROW_MSB: u8 = 1 << (GLYPH_WIDTH - 1);

const GROUP_SHIFT: u32 = 32 - GLYPH_WIDTH as u32;

/// Map a character code to its glyph index.
///
/// Printable ASCII maps to `(code - 0x20) & 0x7F`. Everything else is a skip and
/// returns `None`; callers still advance the cursor by one cell.
pub const fn glyph_index(code: u8) -> Option<u8> {
    if code >= FIRST_PRINTABLE && code <= LAST_PRINTABLE {
        Some(code.wrapping_sub(FIRST_PRINTABLE) & 0x7F)
    } else {
        None
    }
}

/// Packed monochrome glyph atlas
#[derive(Debug, Clone, Copy)]
pub struct GlyphAtlas {
    rows: &'static [u32],
    glyph_count: usize,
}

impl GlyphAtlas {
    /// Wrap packed atlas rows.
    ///
    /// `rows` must hold `GLYPH_HEIGHT` words for every started group of
    /// `GLYPHS_PER_GROUP` glyphs.
    pub const fn new(rows: &'static [u32], glyph_count: usize) -> Self {
        Self { rows, glyph_count }
    }

    /// Number of glyphs this atlas can draw
    pub const fn glyph_count(&self) -> usize {
        self.glyph_count
    }

    /// Glyph index for a character code, `None` when this atlas has no glyph for it
    pub fn glyph_index(&self, code: u8) -> Option<u8> {
        glyph_index(code).filter(|&glyph| (glyph as usize) < self.glyph_count)
    }

    /// One unpacked glyph row; bit `GLYPH_ROW_MSB >> col` is the pixel at `col`.
    pub fn row_bits(&self, glyph: u8, row: usize) -> u8 {
        let glyph = glyph as usize;
        let shift = ((glyph % GLYPHS_PER_GROUP) * GLYPH_WIDTH) as u32;
        let word = self.rows[glyph / GLYPHS_PER_GROUP * GLYPH_HEIGHT + row];

        ((word << shift) >> GROUP_SHIFT) as u8
    }
}

/// Pack per-glyph rows into the grouped row layout.
const fn pack_atlas(glyphs: &[[u8; GLYPH_HEIGHT]; GLYPH_COUNT]) -> [u32; ATLAS_WORDS] {
    let mut words = [0u32; ATLAS_WORDS];
    let mut glyph = 0;
    while glyph < GLYPH_COUNT {
        let base = glyph / GLYPHS_PER_GROUP * GLYPH_HEIGHT;
        let shift = GROUP_SHIFT - ((glyph % GLYPHS_PER_GROUP) * GLYPH_WIDTH) as u32;
        let mut row = 0;
        while row < GLYPH_HEIGHT {
            words[base + row] |= (glyphs[glyph][row] as u32) << shift;
            row += 1;
        }
        glyph += 1;
    }
    words
}

// One byte per row, leftmost pixel in bit 5.
const GLYPH_ROWS: [[u8; GLYPH_HEIGHT]; GLYPH_COUNT] = [
    /* ' '   */ [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
    /* '!'   */ [0x08, 0x08, 0x08, 0x08, 0x08, 0x00, 0x08, 0x00],
    /* '"'   */ [0x14, 0x14, 0x14, 0x00, 0x00, 0x00, 0x00, 0x00],
    /* '#'   */ [0x14, 0x14, 0x3E, 0x14, 0x3E, 0x14, 0x14, 0x00],
    /* '$'   */ [0x08, 0x1E, 0x28, 0x1C, 0x0A, 0x3C, 0x08, 0x00],
    /* '%'   */ [0x30, 0x32, 0x04, 0x08, 0x10, 0x26, 0x06, 0x00],
    /* '&'   */ [0x18, 0x24, 0x28, 0x10, 0x2A, 0x24, 0x1A, 0x00],
    /* '\''  */ [0x18, 0x08, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00],
    /* '('   */ [0x04, 0x08, 0x10, 0x10, 0x10, 0x08, 0x04, 0x00],
    /* ')'   */ [0x10, 0x08, 0x04, 0x04, 0x04, 0x08, 0x10, 0x00],
    /* '*'   */ [0x00, 0x08, 0x2A, 0x1C, 0x2A, 0x08, 0x00, 0x00],
    /* '+'   */ [0x00, 0x08, 0x08, 0x3E, 0x08, 0x08, 0x00, 0x00],
    /* ','   */ [0x00, 0x00, 0x00, 0x00, 0x18, 0x08, 0x10, 0x00],
    /* '-'   */ [0x00, 0x00, 0x00, 0x3E, 0x00, 0x00, 0x00, 0x00],
    /* '.'   */ [0x00, 0x00, 0x00, 0x00, 0x00, 0x18, 0x18, 0x00],
    /* '/'   */ [0x00, 0x02, 0x04, 0x08, 0x10, 0x20, 0x00, 0x00],
    /* '0'   */ [0x1C, 0x22, 0x26, 0x2A, 0x32, 0x22, 0x1C, 0x00],
    /* '1'   */ [0x08, 0x18, 0x08, 0x08, 0x08, 0x08, 0x1C, 0x00],
    /* '2'   */ [0x1C, 0x22, 0x02, 0x04, 0x08, 0x10, 0x3E, 0x00],
    /* '3'   */ [0x3E, 0x04, 0x08, 0x04, 0x02, 0x22, 0x1C, 0x00],
    /* '4'   */ [0x04, 0x0C, 0x14, 0x24, 0x3E, 0x04, 0x04, 0x00],
    /* '5'   */ [0x3E, 0x20, 0x3C, 0x02, 0x02, 0x22, 0x1C, 0x00],
    /* '6'   */ [0x0C, 0x10, 0x20, 0x3C, 0x22, 0x22, 0x1C, 0x00],
    /* '7'   */ [0x3E, 0x02, 0x04, 0x08, 0x10, 0x10, 0x10, 0x00],
    /* '8'   */ [0x1C, 0x22, 0x22, 0x1C, 0x22, 0x22, 0x1C, 0x00],
    /* '9'   */ [0x1C, 0x22, 0x22, 0x1E, 0x02, 0x04, 0x18, 0x00],
    /* ':'   */ [0x00, 0x18, 0x18, 0x00, 0x18, 0x18, 0x00, 0x00],
    /* ';'   */ [0x00, 0x18, 0x18, 0x00, 0x18, 0x08, 0x10, 0x00],
    /* '<'   */ [0x04, 0x08, 0x10, 0x20, 0x10, 0x08, 0x04, 0x00],
    /* '='   */ [0x00, 0x00, 0x3E, 0x00, 0x3E, 0x00, 0x00, 0x00],
    /* '>'   */ [0x10, 0x08, 0x04, 0x02, 0x04, 0x08, 0x10, 0x00],
    /* '?'   */ [0x1C, 0x22, 0x02, 0x04, 0x08, 0x00, 0x08, 0x00],
    /* '@'   */ [0x1C, 0x22, 0x02, 0x1A, 0x2A, 0x2A, 0x1C, 0x00],
    /* 'A'   */ [0x1C, 0x22, 0x22, 0x22, 0x3E, 0x22, 0x22, 0x00],
    /* 'B'   */ [0x3C, 0x22, 0x22, 0x3C, 0x22, 0x22, 0x3C, 0x00],
    /* 'C'   */ [0x1C, 0x22, 0x20, 0x20, 0x20, 0x22, 0x1C, 0x00],
    /* 'D'   */ [0x38, 0x24, 0x22, 0x22, 0x22, 0x24, 0x38, 0x00],
    /* 'E'   */ [0x3E, 0x20, 0x20, 0x3C, 0x20, 0x20, 0x3E, 0x00],
    /* 'F'   */ [0x3E, 0x20, 0x20, 0x3C, 0x20, 0x20, 0x20, 0x00],
    /* 'G'   */ [0x1C, 0x22, 0x20, 0x2E, 0x22, 0x22, 0x1E, 0x00],
    /* 'H'   */ [0x22, 0x22, 0x22, 0x3E, 0x22, 0x22, 0x22, 0x00],
    /* 'I'   */ [0x1C, 0x08, 0x08, 0x08, 0x08, 0x08, 0x1C, 0x00],
    /* 'J'   */ [0x0E, 0x04, 0x04, 0x04, 0x04, 0x24, 0x18, 0x00],
    /* 'K'   */ [0x22, 0x24, 0x28, 0x30, 0x28, 0x24, 0x22, 0x00],
    /* 'L'   */ [0x20, 0x20, 0x20, 0x20, 0x20, 0x20, 0x3E, 0x00],
    /* 'M'   */ [0x22, 0x36, 0x2A, 0x2A, 0x22, 0x22, 0x22, 0x00],
    /* 'N'   */ [0x22, 0x22, 0x32, 0x2A, 0x26, 0x22, 0x22, 0x00],
    /* 'O'   */ [0x1C, 0x22, 0x22, 0x22, 0x22, 0x22, 0x1C, 0x00],
    /* 'P'   */ [0x3C, 0x22, 0x22, 0x3C, 0x20, 0x20, 0x20, 0x00],
    /* 'Q'   */ [0x1C, 0x22, 0x22, 0x22, 0x2A, 0x24, 0x1A, 0x00],
    /* 'R'   */ [0x3C, 0x22, 0x22, 0x3C, 0x28, 0x24, 0x22, 0x00],
    /* 'S'   */ [0x1E, 0x20, 0x20, 0x1C, 0x02, 0x02, 0x3C, 0x00],
    /* 'T'   */ [0x3E, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00],
    /* 'U'   */ [0x22, 0x22, 0x22, 0x22, 0x22, 0x22, 0x1C, 0x00],
    /* 'V'   */ [0x22, 0x22, 0x22, 0x22, 0x22, 0x14, 0x08, 0x00],
    /* 'W'   */ [0x22, 0x22, 0x22, 0x2A, 0x2A, 0x2A, 0x14, 0x00],
    /* 'X'   */ [0x22, 0x22, 0x14, 0x08, 0x14, 0x22, 0x22, 0x00],
    /* 'Y'   */ [0x22, 0x22, 0x22, 0x14, 0x08, 0x08, 0x08, 0x00],
    /* 'Z'   */ [0x3E, 0x02, 0x04, 0x08, 0x10, 0x20, 0x3E, 0x00],
    /* '['   */ [0x1C, 0x10, 0x10, 0x10, 0x10, 0x10, 0x1C, 0x00],
    /* '\\'  */ [0x00, 0x20, 0x10, 0x08, 0x04, 0x02, 0x00, 0x00],
    /* ']'   */ [0x1C, 0x04, 0x04, 0x04, 0x04, 0x04, 0x1C, 0x00],
    /* '^'   */ [0x08, 0x14, 0x22, 0x00, 0x00, 0x00, 0x00, 0x00],
    /* '_'   */ [0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x3E],
    /* '`'   */ [0x10, 0x08, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00],
    /* 'a'   */ [0x00, 0x00, 0x1C, 0x02, 0x1E, 0x22, 0x1E, 0x00],
    /* 'b'   */ [0x20, 0x20, 0x2C, 0x32, 0x22, 0x22, 0x3C, 0x00],
    /* 'c'   */ [0x00, 0x00, 0x1C, 0x20, 0x20, 0x22, 0x1C, 0x00],
    /* 'd'   */ [0x02, 0x02, 0x1A, 0x26, 0x22, 0x22, 0x1E, 0x00],
    /* 'e'   */ [0x00, 0x00, 0x1C, 0x22, 0x3E, 0x20, 0x1C, 0x00],
    /* 'f'   */ [0x0C, 0x12, 0x10, 0x38, 0x10, 0x10, 0x10, 0x00],
    /* 'g'   */ [0x00, 0x00, 0x1E, 0x22, 0x22, 0x1E, 0x02, 0x1C],
    /* 'h'   */ [0x20, 0x20, 0x2C, 0x32, 0x22, 0x22, 0x22, 0x00],
    /* 'i'   */ [0x08, 0x00, 0x18, 0x08, 0x08, 0x08, 0x1C, 0x00],
    /* 'j'   */ [0x04, 0x00, 0x0C, 0x04, 0x04, 0x04, 0x24, 0x18],
    /* 'k'   */ [0x20, 0x20, 0x24, 0x28, 0x30, 0x28, 0x24, 0x00],
    /* 'l'   */ [0x18, 0x08, 0x08, 0x08, 0x08, 0x08, 0x1C, 0x00],
    /* 'm'   */ [0x00, 0x00, 0x34, 0x2A, 0x2A, 0x22, 0x22, 0x00],
    /* 'n'   */ [0x00, 0x00, 0x2C, 0x32, 0x22, 0x22, 0x22, 0x00],
    /* 'o'   */ [0x00, 0x00, 0x1C, 0x22, 0x22, 0x22, 0x1C, 0x00],
    /* 'p'   */ [0x00, 0x00, 0x3C, 0x22, 0x22, 0x3C, 0x20, 0x20],
    /* 'q'   */ [0x00, 0x00, 0x1E, 0x22, 0x22, 0x1E, 0x02, 0x02],
    /* 'r'   */ [0x00, 0x00, 0x2C, 0x32, 0x20, 0x20, 0x20, 0x00],
    /* 's'   */ [0x00, 0x00, 0x1C, 0x20, 0x1C, 0x02, 0x3C, 0x00],
    /* 't'   */ [0x10, 0x10, 0x38, 0x10, 0x10, 0x12, 0x0C, 0x00],
    /* 'u'   */ [0x00, 0x00, 0x22, 0x22, 0x22, 0x26, 0x1A, 0x00],
    /* 'v'   */ [0x00, 0x00, 0x22, 0x22, 0x22, 0x14, 0x08, 0x00],
    /* 'w'   */ [0x00, 0x00, 0x22, 0x22, 0x2A, 0x2A, 0x14, 0x00],
    /* 'x'   */ [0x00, 0x00, 0x22, 0x14, 0x08, 0x14, 0x22, 0x00],
    /* 'y'   */ [0x00, 0x00, 0x22, 0x22, 0x22, 0x1E, 0x02, 0x1C],
    /* 'z'   */ [0x00, 0x00, 0x3E, 0x04, 0x08, 0x10, 0x3E, 0x00],
    /* '{'   */ [0x04, 0x08, 0x08, 0x10, 0x08, 0x08, 0x04, 0x00],
    /* '|'   */ [0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x08, 0x00],
    /* '}'   */ [0x10, 0x08, 0x08, 0x04, 0x08, 0x08, 0x10, 0x00],
    /* '~'   */ [0x00, 0x00, 0x10, 0x2A, 0x04, 0x00, 0x00, 0x00],
];

static ATLAS_ROWS: [u32; ATLAS_WORDS] = pack_atlas(&GLYPH_ROWS);

/// The bundled crash screen font
pub static DEFAULT_ATLAS: GlyphAtlas = GlyphAtlas::new(&ATLAS_ROWS, GLYPH_COUNT);

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph_bitmap(atlas: &GlyphAtlas, glyph: u8) -> [u8; GLYPH_HEIGHT] {
        let mut rows = [0u8; GLYPH_HEIGHT];
        for (row, bits) in rows.iter_mut().enumerate() {
            *bits = atlas.row_bits(glyph, row);
        }
        rows
    }

    #[test]
    fn test_printable_ascii_mapping() {
        for code in FIRST_PRINTABLE..=LAST_PRINTABLE {
            assert_eq!(glyph_index(code), Some((code - 0x20) & 0x7F));
        }
        assert_eq!(glyph_index(b' '), Some(0));
        assert_eq!(glyph_index(b'~'), Some(94));
    }

    #[test]
    fn test_non_printable_codes_are_skipped() {
        for code in (0x00..FIRST_PRINTABLE).chain(LAST_PRINTABLE + 1..=0xFF) {
            assert_eq!(glyph_index(code), None, "code {:#04x}", code);
            assert_eq!(DEFAULT_ATLAS.glyph_index(code), None);
        }
    }

    #[test]
    fn test_atlas_unpacks_source_rows() {
        for glyph in 0..GLYPH_COUNT {
            assert_eq!(glyph_bitmap(&DEFAULT_ATLAS, glyph as u8), GLYPH_ROWS[glyph]);
        }
    }

    #[test]
    fn test_glyphs_are_distinct() {
        for a in 0..GLYPH_COUNT {
            for b in (a + 1)..GLYPH_COUNT {
                assert_ne!(
                    GLYPH_ROWS[a], GLYPH_ROWS[b],
                    "glyphs {:?} and {:?} share a bitmap",
                    (a as u8 + FIRST_PRINTABLE) as char,
                    (b as u8 + FIRST_PRINTABLE) as char
                );
            }
        }
    }

    #[test]
    fn test_space_is_blank_and_rows_fit_cell() {
        assert_eq!(glyph_bitmap(&DEFAULT_ATLAS, 0), [0; GLYPH_HEIGHT]);
        for glyph in GLYPH_ROWS.iter() {
            for &row in glyph.iter() {
                assert_eq!(row & !0x3F, 0);
            }
        }
    }

    #[test]
    fn test_group_layout() {
        assert_eq!(ATLAS_WORDS, 152);
        // 'A' is glyph 33: group 6, slot 3
        let a = glyph_index(b'A').unwrap();
        assert_eq!(a, 33);
        let top = ATLAS_ROWS[6 * GLYPH_HEIGHT];
        assert_eq!((top >> (GROUP_SHIFT - 18)) & 0x3F, 0x1C);
    }

    #[test]
    fn test_short_atlas_limits_glyphs() {
        static DIGITS_ONLY: GlyphAtlas = GlyphAtlas::new(&ATLAS_ROWS, 20);
        assert_eq!(DIGITS_ONLY.glyph_index(b'0'), Some(16));
        assert_eq!(DIGITS_ONLY.glyph_index(b'A'), None);
    }
}
