//! Thread Inspection
//!
//! The view of the environment's threads the crash screen needs: ids, priorities and
//! the fault flags, plus the rule that picks out the thread that crashed.

use bitflags::bitflags;

pub mod context;

pub use context::ThreadContext;

/// Thread ID type
pub type Tid = i32;

/// Priority of the idle thread
pub const PRIORITY_IDLE: i32 = 0;
/// Highest priority an application thread may hold
pub const PRIORITY_APPMAX: i32 = 127;
/// Priority that marks the end of the thread list
pub const PRIORITY_SENTINEL: i32 = -1;

bitflags! {
    /// Fault state the environment records on a stopped thread
    pub struct ThreadFlags: u16 {
        /// Stopped on a breakpoint
        const CPU_BREAK = 1 << 0;
        /// Stopped on any other exception
        const FAULT = 1 << 1;
    }
}

/// One entry of the environment's thread list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadInfo {
    pub id: Tid,
    pub priority: i32,
    pub flags: ThreadFlags,
}

impl ThreadInfo {
    pub const fn new(id: Tid, priority: i32, flags: ThreadFlags) -> Self {
        Self { id, priority, flags }
    }

    /// The sentinel entry that ends the thread list
    pub const fn sentinel() -> Self {
        Self::new(0, PRIORITY_SENTINEL, ThreadFlags::empty())
    }

    pub const fn is_sentinel(&self) -> bool {
        self.priority == PRIORITY_SENTINEL
    }

    /// An application thread stopped by a break or a fault
    pub fn is_crash_candidate(&self) -> bool {
        self.priority > PRIORITY_IDLE
            && self.priority < PRIORITY_APPMAX
            && self.flags.intersects(ThreadFlags::CPU_BREAK | ThreadFlags::FAULT)
    }
}

/// First crashed application thread, scanning up to the sentinel entry
pub fn find_crashed_thread<I>(threads: I) -> Option<ThreadInfo>
where
    I: IntoIterator<Item = ThreadInfo>,
{
    threads
        .into_iter()
        .take_while(|thread| !thread.is_sentinel())
        .find(ThreadInfo::is_crash_candidate)
}
