//! Fault Notification Queue
//!
//! One-message mailbox between the environment's fault path and the crash screen
//! worker. Posting never blocks: a second event while one is pending is dropped, the
//! same as a non-blocking send into a full queue.

use core::sync::atomic::{AtomicU8, Ordering};

const EMPTY: u8 = 0;

/// Event classes the crash screen subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultEventKind {
    /// A thread hit a breakpoint
    CpuBreak = 1,
    /// A thread raised any other exception
    Fault = 2,
}

impl FaultEventKind {
    pub const ALL: [FaultEventKind; 2] = [FaultEventKind::CpuBreak, FaultEventKind::Fault];

    fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            1 => Some(FaultEventKind::CpuBreak),
            2 => Some(FaultEventKind::Fault),
            _ => None,
        }
    }
}

/// One-slot fault event mailbox
#[derive(Debug)]
pub struct FaultQueue {
    slot: AtomicU8,
}

impl FaultQueue {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(EMPTY),
        }
    }

    /// Store `kind` if the slot is free; returns false when the event was dropped.
    pub fn post(&self, kind: FaultEventKind) -> bool {
        self.slot
            .compare_exchange(EMPTY, kind as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Take the pending event, if any
    pub fn try_recv(&self) -> Option<FaultEventKind> {
        FaultEventKind::from_raw(self.slot.swap(EMPTY, Ordering::AcqRel))
    }

    pub fn is_empty(&self) -> bool {
        self.slot.load(Ordering::Acquire) == EMPTY
    }
}

impl Default for FaultQueue {
    fn default() -> Self {
        Self::new()
    }
}
