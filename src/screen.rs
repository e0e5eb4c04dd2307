//! # Crash Screen Composer
//!
//! Draws the diagnostic screen for one crashed thread. The stages run strictly in
//! order and the screen is never redrawn:
//!
//! 1. background fill
//! 2. dimmed banner panel and the rainbow banner label
//! 3. thread id with the exception description
//! 4. PC, SR and bad virtual address
//! 5. first pause, then the surface is presented
//! 6. dimmed body panel with the integer register dump
//! 7. FPU control/status word and its most significant cause
//! 8. floating point registers
//! 9. second pause, then the word at the faulting PC

use crate::assets::{usable_background_tile, BACKGROUND_TILE_SIZE};
use crate::config::CrashScreenConfig;
use crate::fault::{cause_description, FpuException};
use crate::font::{GlyphAtlas, DEFAULT_ATLAS, GLYPH_WIDTH};
use crate::graphics::Framebuffer;
use crate::platform::Platform;
use crate::process::context::{is_printable_float, DUMPED_REGISTERS, FPR_COUNT};
use crate::process::{ThreadContext, Tid};
use crate::text::{ColorMode, TextPrinter};
use crate::time::busy_wait_ms;

const LEFT: usize = 30;
const LINE_PITCH: usize = 10;
const COLUMN_PITCH: usize = 90;
const COLUMNS: usize = 3;

const BANNER_Y: usize = 10;
const BANNER_PANEL: (usize, usize, usize, usize) = (25, 20, 270, 25);
const BODY_PANEL: (usize, usize, usize, usize) = (25, 45, 270, 185);

const THREAD_Y: usize = 25;
const SUMMARY_Y: usize = 35;
const SR_X: usize = 114;
const VA_X: usize = 198;

const REGISTERS_Y: usize = 50;
const FPCSR_Y: usize = 155;
const FPCSR_CAUSE_X: usize = 132;
const FPR_Y: usize = 170;
const MEMORY_WORD_POS: (usize, usize) = (210, 140);

/// Top-left corner of cell `index` in a three column grid starting at `top`
const fn grid_cell(index: usize, top: usize) -> (usize, usize) {
    (
        LEFT + (index % COLUMNS) * COLUMN_PITCH,
        top + (index / COLUMNS) * LINE_PITCH,
    )
}

/// Render the crash screen for `thread` onto `surface`.
///
/// The surface must be at least 320x240.
pub fn draw_crash_screen<P: Platform>(
    platform: &mut P,
    surface: &mut Framebuffer<'_>,
    config: &CrashScreenConfig,
    thread: Tid,
    context: &ThreadContext,
) {
    log::debug!("crash screen: drawing thread {}", thread);

    draw_background(surface, config);
    draw_banner(surface, config);
    draw_summary(surface, config, thread, context);

    busy_wait_ms(&*platform, config.first_pause_ms, config.cycle_rate_hz);
    platform.present(surface);
    log::debug!("crash screen: presented");

    draw_registers(surface, config, context);
    draw_fpu_state(surface, config, context);

    busy_wait_ms(&*platform, config.second_pause_ms, config.cycle_rate_hz);
    draw_memory_word(surface, config, platform.read_word(context.pc));
    log::debug!("crash screen: complete");
}

fn draw_background(surface: &mut Framebuffer<'_>, config: &CrashScreenConfig) {
    match usable_background_tile(config.assets) {
        Some(tile) => surface.fill_tiled(tile, BACKGROUND_TILE_SIZE, BACKGROUND_TILE_SIZE),
        None => surface.fill(config.background),
    }
}

fn draw_banner(surface: &mut Framebuffer<'_>, config: &CrashScreenConfig) {
    let (x, y, width, height) = BANNER_PANEL;
    surface.draw_dim_rect(x, y, width, height);

    let atlas: &GlyphAtlas = config.assets.banner_atlas().unwrap_or(&DEFAULT_ATLAS);
    let banner_x = (surface.width() / 2).saturating_sub(config.banner.len() * GLYPH_WIDTH / 2);
    TextPrinter::new(surface, atlas, config.foreground).print(
        banner_x,
        BANNER_Y,
        ColorMode::Rainbow,
        "%s",
        &[config.banner.into()],
    );
}

fn draw_summary(surface: &mut Framebuffer<'_>, config: &CrashScreenConfig, thread: Tid, context: &ThreadContext) {
    let mut text = TextPrinter::new(surface, &DEFAULT_ATLAS, config.foreground);

    text.print(
        LEFT,
        THREAD_Y,
        ColorMode::Default,
        "THREAD:%d  (%s)",
        &[thread.into(), cause_description(context.cause).into()],
    );

    let cursor = text.print(LEFT, SUMMARY_Y, ColorMode::Default, "PC:", &[]);
    text.print(cursor, SUMMARY_Y, ColorMode::Rainbow, "%08XH", &[context.pc.into()]);
    text.print(SR_X, SUMMARY_Y, ColorMode::Default, "SR:%08XH", &[context.sr.into()]);
    text.print(VA_X, SUMMARY_Y, ColorMode::Default, "VA:%08XH", &[context.badvaddr.into()]);
}

fn draw_registers(surface: &mut Framebuffer<'_>, config: &CrashScreenConfig, context: &ThreadContext) {
    let (x, y, width, height) = BODY_PANEL;
    surface.draw_dim_rect(x, y, width, height);

    let mut text = TextPrinter::new(surface, &DEFAULT_ATLAS, config.foreground);
    for (index, &(name, number)) in DUMPED_REGISTERS.iter().enumerate() {
        let (x, y) = grid_cell(index, REGISTERS_Y);
        text.print(x, y, ColorMode::Default, "%s:%08XH", &[name.into(), context.gpr32(number).into()]);
    }
}

fn draw_fpu_state(surface: &mut Framebuffer<'_>, config: &CrashScreenConfig, context: &ThreadContext) {
    let mut text = TextPrinter::new(surface, &DEFAULT_ATLAS, config.foreground);

    text.print(LEFT, FPCSR_Y, ColorMode::Default, "FPCSR:%08XH", &[context.fpcsr.into()]);
    if let Some(exception) = FpuException::from_fpcsr(context.fpcsr) {
        text.print(FPCSR_CAUSE_X, FPCSR_Y, ColorMode::Default, "(%s)", &[exception.description().into()]);
    }

    for slot in 0..FPR_COUNT {
        let (x, y) = grid_cell(slot, FPR_Y);
        let number = ThreadContext::fpr_number(slot);
        if is_printable_float(context.fpr[slot]) {
            text.print(x, y, ColorMode::Default, "F%02d:%.3e", &[number.into(), context.fpr_value(slot).into()]);
        } else {
            text.print(x, y, ColorMode::Default, "F%02d:---------", &[number.into()]);
        }
    }
}

fn draw_memory_word(surface: &mut Framebuffer<'_>, config: &CrashScreenConfig, word: Option<u32>) {
    let mut text = TextPrinter::new(surface, &DEFAULT_ATLAS, config.foreground);
    let (x, y) = MEMORY_WORD_POS;

    let cursor = text.print(x, y, ColorMode::Default, "MM:", &[]);
    match word {
        Some(word) => text.print(cursor, y, ColorMode::Rainbow, "%08XH", &[word.into()]),
        None => text.print(cursor, y, ColorMode::Rainbow, "--------H", &[]),
    };
}
