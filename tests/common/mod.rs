#![allow(dead_code)]

use std::cell::Cell;
use std::collections::VecDeque;

use crash_screen::font::{DEFAULT_ATLAS, GLYPH_HEIGHT, GLYPH_ROW_MSB, GLYPH_WIDTH};
use crash_screen::graphics::BACKGROUND;
use crash_screen::process::{Tid, PRIORITY_APPMAX, PRIORITY_IDLE};
use crash_screen::{
    CycleCounter, FaultEventKind, FaultQueue, Framebuffer, Platform, ThreadContext, ThreadFlags,
    ThreadInfo, WorkerParams,
};

pub const WIDTH: usize = 320;
pub const HEIGHT: usize = 240;

/// Counter advance per read; a 2000 ms pause takes ten reads
pub const CYCLE_STEP: u32 = 10_000_000;

/// Scriptable stand-in for the environment
pub struct MockPlatform {
    pub threads: Vec<ThreadInfo>,
    pub contexts: Vec<(Tid, ThreadContext)>,
    pub memory: Vec<(u32, u32)>,
    /// Thread lists swapped in on successive wake-ups
    pub wakeups: VecDeque<(FaultEventKind, Vec<ThreadInfo>)>,
    pub cycles: Cell<u32>,
    pub cycle_reads: Cell<usize>,
    pub subscriptions: Vec<FaultEventKind>,
    pub spawned: Option<WorkerParams>,
    pub waits: usize,
    pub writebacks: usize,
    pub presented: Vec<Vec<u16>>,
}

impl MockPlatform {
    pub fn new() -> Self {
        Self {
            threads: Vec::new(),
            contexts: Vec::new(),
            memory: Vec::new(),
            wakeups: VecDeque::new(),
            cycles: Cell::new(0),
            cycle_reads: Cell::new(0),
            subscriptions: Vec::new(),
            spawned: None,
            waits: 0,
            writebacks: 0,
            presented: Vec::new(),
        }
    }

    /// Idle thread, the crash screen worker, one faulted app thread and the sentinel
    pub fn with_crashed_thread(id: Tid, context: ThreadContext) -> Self {
        let mut platform = Self::new();
        platform.threads = vec![
            ThreadInfo::new(1, PRIORITY_IDLE, ThreadFlags::empty()),
            ThreadInfo::new(2, PRIORITY_APPMAX, ThreadFlags::empty()),
            ThreadInfo::new(3, 20, ThreadFlags::empty()),
            ThreadInfo::new(id, 10, ThreadFlags::FAULT),
            ThreadInfo::sentinel(),
        ];
        platform.contexts.push((id, context));
        platform
    }
}

impl CycleCounter for MockPlatform {
    fn read_cycles(&self) -> u32 {
        let now = self.cycles.get();
        self.cycles.set(now.wrapping_add(CYCLE_STEP));
        self.cycle_reads.set(self.cycle_reads.get() + 1);
        now
    }
}

impl Platform for MockPlatform {
    type Threads<'a> = std::iter::Copied<std::slice::Iter<'a, ThreadInfo>>;

    fn subscribe(&mut self, kind: FaultEventKind, _queue: &'static FaultQueue) {
        self.subscriptions.push(kind);
    }

    fn spawn_worker(&mut self, params: WorkerParams, _entry: fn(&mut Self) -> !) {
        self.spawned = Some(params);
    }

    fn wait(&mut self, queue: &FaultQueue) -> FaultEventKind {
        self.waits += 1;
        if let Some(kind) = queue.try_recv() {
            return kind;
        }
        let (kind, threads) = self.wakeups.pop_front().expect("worker waited with nothing scripted");
        self.threads = threads;
        kind
    }

    fn threads(&self) -> Self::Threads<'_> {
        self.threads.iter().copied()
    }

    fn snapshot(&self, id: Tid) -> Option<ThreadContext> {
        self.contexts.iter().find(|(tid, _)| *tid == id).map(|(_, context)| *context)
    }

    fn writeback_dcache(&mut self) {
        self.writebacks += 1;
    }

    fn present(&mut self, surface: &Framebuffer<'_>) {
        self.presented.push(surface.pixels().to_vec());
    }

    fn read_word(&self, address: u32) -> Option<u32> {
        self.memory.iter().find(|(addr, _)| *addr == address).map(|(_, word)| *word)
    }
}

/// Register state of a load from address 4 at 0x80300000
pub fn address_error_context() -> ThreadContext {
    let mut context = ThreadContext::default();
    context.cause = 4 << 2;
    context.pc = 0x8030_0000;
    context.sr = 0x3400_0000;
    context.badvaddr = 0x0000_0004;
    context
}

/// Recognize the glyph whose cell starts at (x, y); blank cells read as a space
pub fn read_cell(pixels: &[u16], width: usize, x: usize, y: usize) -> char {
    let mut rows = [0u8; GLYPH_HEIGHT];
    for (row, bits) in rows.iter_mut().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if pixels[(y + row) * width + x + col] != BACKGROUND {
                *bits |= GLYPH_ROW_MSB >> col;
            }
        }
    }

    (0..DEFAULT_ATLAS.glyph_count() as u8)
        .find(|&glyph| (0..GLYPH_HEIGHT).all(|row| DEFAULT_ATLAS.row_bits(glyph, row) == rows[row]))
        .map(|glyph| (glyph + 0x20) as char)
        .unwrap_or('?')
}

/// Read `cells` glyph cells left to right from (x, y)
pub fn read_text(pixels: &[u16], width: usize, x: usize, y: usize, cells: usize) -> String {
    (0..cells).map(|i| read_cell(pixels, width, x + i * GLYPH_WIDTH, y)).collect()
}

/// Read from (x, y) to the right edge of the surface, without trailing blanks
pub fn read_line(pixels: &[u16], width: usize, x: usize, y: usize) -> String {
    let cells = (width - x) / GLYPH_WIDTH;
    read_text(pixels, width, x, y, cells).trim_end().to_string()
}

/// Color of the first non-background pixel in the cell at (x, y)
pub fn cell_color(pixels: &[u16], width: usize, x: usize, y: usize) -> Option<u16> {
    (0..GLYPH_HEIGHT)
        .flat_map(|row| (0..GLYPH_WIDTH).map(move |col| (row, col)))
        .map(|(row, col)| pixels[(y + row) * width + x + col])
        .find(|&pixel| pixel != BACKGROUND)
}
