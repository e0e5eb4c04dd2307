//! Saved Register State
//!
//! The register file of a paused thread as the environment hands it to the crash
//! screen, plus the naming tables the register dump walks.

/// Number of general purpose registers
pub const GPR_COUNT: usize = 32;
/// Number of floating point registers shown (the even registers F00..F30)
pub const FPR_COUNT: usize = 16;

/// Register state of a paused thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
pub struct ThreadContext {
    /// General purpose registers, indexed by register number
    pub gpr: [u64; GPR_COUNT],
    /// Program counter at the fault
    pub pc: u32,
    /// Status register
    pub sr: u32,
    /// Cause register
    pub cause: u32,
    /// Bad virtual address of the faulting access
    pub badvaddr: u32,
    /// FPU control/status register
    pub fpcsr: u32,
    /// Raw IEEE-754 single precision bits of F00, F02, ... F30
    pub fpr: [u32; FPR_COUNT],
}

impl Default for ThreadContext {
    fn default() -> Self {
        Self {
            gpr: [0; GPR_COUNT],
            pc: 0,
            sr: 0,
            cause: 0,
            badvaddr: 0,
            fpcsr: 0,
            fpr: [0; FPR_COUNT],
        }
    }
}

impl ThreadContext {
    /// Low 32 bits of a general purpose register
    pub fn gpr32(&self, index: usize) -> u32 {
        self.gpr[index] as u32
    }

    /// Floating point slot `slot` (register F{2*slot}) as a float
    pub fn fpr_value(&self, slot: usize) -> f32 {
        f32::from_bits(self.fpr[slot])
    }

    /// Register number of floating point slot `slot`
    pub const fn fpr_number(slot: usize) -> usize {
        slot * 2
    }
}

/// Whether a raw float pattern is shown in scientific notation.
///
/// Zero and normal numbers qualify; denormals, infinities and NaNs are dashed out.
pub const fn is_printable_float(bits: u32) -> bool {
    let exponent = ((bits & 0x7F80_0000) >> 23) as i32 - 127;
    bits == 0 || (exponent >= -126 && exponent <= 127)
}

/// Registers shown in the integer dump, in display order
pub const DUMPED_REGISTERS: [(&str, usize); 29] = [
    ("AT", 1),
    ("V0", 2),
    ("V1", 3),
    ("A0", 4),
    ("A1", 5),
    ("A2", 6),
    ("A3", 7),
    ("T0", 8),
    ("T1", 9),
    ("T2", 10),
    ("T3", 11),
    ("T4", 12),
    ("T5", 13),
    ("T6", 14),
    ("T7", 15),
    ("S0", 16),
    ("S1", 17),
    ("S2", 18),
    ("S3", 19),
    ("S4", 20),
    ("S5", 21),
    ("S6", 22),
    ("S7", 23),
    ("T8", 24),
    ("T9", 25),
    ("GP", 28),
    ("SP", 29),
    ("S8", 30),
    ("RA", 31),
];
