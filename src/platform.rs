//! # Platform Interface
//!
//! Everything the crash screen needs from the environment: worker creation, fault
//! notifications, the thread list, saved registers, cache maintenance, presentation
//! and raw memory reads.

use crate::graphics::Framebuffer;
use crate::ipc::{FaultEventKind, FaultQueue};
use crate::process::{ThreadContext, ThreadInfo, Tid};
use crate::time::CycleCounter;

/// Parameters for the crash screen worker thread
#[derive(Debug, Clone, Copy)]
pub struct WorkerParams {
    pub id: Tid,
    pub priority: i32,
    /// One past the highest usable stack byte
    pub stack_top: *mut u8,
    pub stack_size: usize,
}

/// Environment services used by the crash screen
pub trait Platform: CycleCounter + Sized {
    /// Iterator over the environment's thread list
    type Threads<'a>: Iterator<Item = ThreadInfo>
    where
        Self: 'a;

    /// Route `kind` events to `queue`
    fn subscribe(&mut self, kind: FaultEventKind, queue: &'static FaultQueue);

    /// Create and start the worker thread running `entry`
    fn spawn_worker(&mut self, params: WorkerParams, entry: fn(&mut Self) -> !);

    /// Block until an event arrives on `queue`
    fn wait(&mut self, queue: &FaultQueue) -> FaultEventKind {
        loop {
            if let Some(kind) = queue.try_recv() {
                return kind;
            }
            core::hint::spin_loop();
        }
    }

    /// Current thread list, possibly ending in a sentinel entry
    fn threads(&self) -> Self::Threads<'_>;

    /// Saved registers of a stopped thread
    fn snapshot(&self, id: Tid) -> Option<ThreadContext>;

    /// Write back the whole data cache so saved state in memory is current
    fn writeback_dcache(&mut self) {}

    /// Unblank the display and make `surface` the scanned-out buffer
    fn present(&mut self, surface: &Framebuffer<'_>);

    /// Read one word of memory; `None` if the address cannot be read
    fn read_word(&self, address: u32) -> Option<u32>;
}
