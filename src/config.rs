//! Crash screen configuration

use crate::assets::{AssetProvider, NoAssets};
use crate::graphics::{BACKGROUND, DEFAULT_FOREGROUND};
use crate::process::{Tid, PRIORITY_APPMAX};
use crate::time::OS_CPU_COUNTER_HZ;

/// Thread id of the crash screen worker
pub const DEFAULT_WORKER_ID: Tid = 2;
/// Default banner label
pub const DEFAULT_BANNER: &str = "ERROR";

static NO_ASSETS: NoAssets = NoAssets;

/// Runtime settings for the crash screen
#[derive(Clone, Copy)]
pub struct CrashScreenConfig {
    /// Solid background color (RGBA5551)
    pub background: u16,
    /// Default glyph color (RGBA5551)
    pub foreground: u16,
    /// Label centred at the top of the screen
    pub banner: &'static str,
    /// Pause before the register dump is first shown
    pub first_pause_ms: u64,
    /// Pause before the memory word line
    pub second_pause_ms: u64,
    /// Cycle counter rate used for the pauses
    pub cycle_rate_hz: u64,
    pub worker_priority: i32,
    pub worker_id: Tid,
    pub assets: &'static (dyn AssetProvider + Sync),
}

impl Default for CrashScreenConfig {
    fn default() -> Self {
        Self {
            background: BACKGROUND,
            foreground: DEFAULT_FOREGROUND,
            banner: DEFAULT_BANNER,
            first_pause_ms: 2000,
            second_pause_ms: 500,
            cycle_rate_hz: OS_CPU_COUNTER_HZ,
            worker_priority: PRIORITY_APPMAX,
            worker_id: DEFAULT_WORKER_ID,
            assets: &NO_ASSETS,
        }
    }
}

impl CrashScreenConfig {
    pub fn with_background(mut self, color: u16) -> Self {
        self.background = color;
        self
    }

    pub fn with_foreground(mut self, color: u16) -> Self {
        self.foreground = color;
        self
    }

    pub fn with_banner(mut self, banner: &'static str) -> Self {
        self.banner = banner;
        self
    }

    pub fn with_pauses(mut self, first_ms: u64, second_ms: u64) -> Self {
        self.first_pause_ms = first_ms;
        self.second_pause_ms = second_ms;
        self
    }

    pub fn with_cycle_rate(mut self, rate_hz: u64) -> Self {
        self.cycle_rate_hz = rate_hz;
        self
    }

    pub fn with_worker(mut self, id: Tid, priority: i32) -> Self {
        self.worker_id = id;
        self.worker_priority = priority;
        self
    }

    pub fn with_assets(mut self, assets: &'static (dyn AssetProvider + Sync)) -> Self {
        self.assets = assets;
        self
    }
}

impl core::fmt::Debug for CrashScreenConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CrashScreenConfig")
            .field("background", &self.background)
            .field("foreground", &self.foreground)
            .field("banner", &self.banner)
            .field("first_pause_ms", &self.first_pause_ms)
            .field("second_pause_ms", &self.second_pause_ms)
            .field("cycle_rate_hz", &self.cycle_rate_hz)
            .field("worker_priority", &self.worker_priority)
            .field("worker_id", &self.worker_id)
            .finish()
    }
}
