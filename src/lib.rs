//! # Crash Screen
//!
//! A fault-time diagnostic overlay. A dedicated worker sleeps until the environment
//! reports a break or fault, finds the application thread that stopped, and draws
//! its registers straight into the 16-bit framebuffer with a bundled bitmap font.
//!
//! Nothing here allocates. The environment plugs in through [`Platform`].
//!
//! ```ignore
//! crash_screen::init(&mut platform, CrashScreenConfig::default())?;
//! unsafe { crash_screen::set_framebuffer(buffer, 320, 240)? };
//! ```

#![cfg_attr(not(test), no_std)]

use core::cell::UnsafeCell;

use lazy_static::lazy_static;
use spin::Once;

pub mod assets;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod fault;
pub mod font;
pub mod format;
pub mod graphics;
pub mod ipc;
pub mod logging;
pub mod platform;
pub mod process;
pub mod screen;
pub mod text;
pub mod time;

pub use assets::{AssetProvider, NoAssets};
pub use config::CrashScreenConfig;
pub use dispatch::{run, Dispatcher, DispatcherState};
pub use error::{CrashScreenError, Result};
pub use graphics::{Framebuffer, SurfaceSlot};
pub use ipc::{FaultEventKind, FaultQueue};
pub use platform::{Platform, WorkerParams};
pub use process::{ThreadContext, ThreadFlags, ThreadInfo};
pub use time::CycleCounter;

/// Size of the worker's private stack in bytes
pub const WORKER_STACK_SIZE: usize = 0x800;

#[repr(C, align(16))]
struct WorkerStack(UnsafeCell<[u8; WORKER_STACK_SIZE]>);

// Only the worker thread touches the stack memory, through the pointer it is given.
unsafe impl Sync for WorkerStack {}

impl WorkerStack {
    const fn new() -> Self {
        Self(UnsafeCell::new([0; WORKER_STACK_SIZE]))
    }

    fn top(&self) -> *mut u8 {
        self.0.get().cast::<u8>().wrapping_add(WORKER_STACK_SIZE)
    }
}

/// Process-wide crash screen state
pub struct CrashScreen {
    config: Once<CrashScreenConfig>,
    queue: FaultQueue,
    surface: SurfaceSlot,
    stack: WorkerStack,
}

lazy_static! {
    static ref CRASH_SCREEN: CrashScreen = CrashScreen {
        config: Once::new(),
        queue: FaultQueue::new(),
        surface: SurfaceSlot::new(),
        stack: WorkerStack::new(),
    };
}

impl CrashScreen {
    /// The initialized crash screen
    pub fn instance() -> Result<&'static CrashScreen> {
        let screen: &'static CrashScreen = &CRASH_SCREEN;
        if screen.config.is_completed() {
            Ok(screen)
        } else {
            Err(CrashScreenError::NotInitialized)
        }
    }

    pub fn config(&self) -> Result<&CrashScreenConfig> {
        self.config.get().ok_or(CrashScreenError::NotInitialized)
    }

    pub fn queue(&self) -> &FaultQueue {
        &self.queue
    }

    pub fn surface(&self) -> &SurfaceSlot {
        &self.surface
    }
}

/// Set up the crash screen: subscribe to break and fault events and start the worker.
///
/// May run once per process.
pub fn init<P: Platform>(platform: &mut P, config: CrashScreenConfig) -> Result<()> {
    let screen: &'static CrashScreen = &CRASH_SCREEN;

    let mut first = false;
    screen.config.call_once(|| {
        first = true;
        config
    });
    if !first {
        return Err(CrashScreenError::AlreadyInitialized);
    }

    for kind in FaultEventKind::ALL {
        platform.subscribe(kind, &screen.queue);
    }

    let params = WorkerParams {
        id: config.worker_id,
        priority: config.worker_priority,
        stack_top: screen.stack.top(),
        stack_size: WORKER_STACK_SIZE,
    };
    platform.spawn_worker(params, dispatch::run::<P>);

    log::info!(
        "crash screen: initialized, worker {} at priority {}",
        config.worker_id,
        config.worker_priority
    );
    Ok(())
}

/// Register the buffer the crash screen should draw into.
///
/// Call again whenever the drawable buffer changes.
///
/// # Safety
/// `buffer` must point to `width * height` writable RGBA5551 pixels that stay valid
/// until the next registration.
pub unsafe fn set_framebuffer(buffer: *mut u16, width: usize, height: usize) -> Result<()> {
    CRASH_SCREEN.surface.set(buffer, width, height)
}

/// Register a `'static` pixel slice as the drawable buffer
pub fn set_framebuffer_slice(pixels: &'static mut [u16], width: usize, height: usize) -> Result<()> {
    CRASH_SCREEN.surface.set_slice(pixels, width, height)
}

/// Feed a fault notification to the worker.
///
/// Returns false if an earlier notification is still pending and this one was dropped.
pub fn post_fault_event(kind: FaultEventKind) -> bool {
    CRASH_SCREEN.queue.post(kind)
}
