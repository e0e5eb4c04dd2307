//! # Fault Classification
//!
//! Decoding of the CPU cause register and the FPU control/status register into the
//! descriptions shown on the crash screen.

use bitflags::bitflags;

/// Description shown for cause codes the CPU reserves
pub const UNKNOWN_EXCEPTION: &str = "Unknown exception";

/// Bit position of the exception code in the cause register
const CAUSE_CODE_SHIFT: u32 = 2;
const CAUSE_CODE_MASK: u32 = 0x1F;

/// Exception classes with a crash screen description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCause {
    Interrupt = 0,
    TlbModification = 1,
    TlbLoad = 2,
    TlbStore = 3,
    AddressErrorLoad = 4,
    AddressErrorStore = 5,
    BusErrorInstruction = 6,
    BusErrorData = 7,
    Syscall = 8,
    Breakpoint = 9,
    ReservedInstruction = 10,
    CoprocessorUnusable = 11,
    ArithmeticOverflow = 12,
    Trap = 13,
    VirtualCoherencyInstruction = 14,
    FloatingPoint = 15,
    Watchpoint = 16,
    VirtualCoherencyData = 17,
}

impl FaultCause {
    /// Every cause, in description table order
    pub const ALL: [FaultCause; 18] = [
        FaultCause::Interrupt,
        FaultCause::TlbModification,
        FaultCause::TlbLoad,
        FaultCause::TlbStore,
        FaultCause::AddressErrorLoad,
        FaultCause::AddressErrorStore,
        FaultCause::BusErrorInstruction,
        FaultCause::BusErrorData,
        FaultCause::Syscall,
        FaultCause::Breakpoint,
        FaultCause::ReservedInstruction,
        FaultCause::CoprocessorUnusable,
        FaultCause::ArithmeticOverflow,
        FaultCause::Trap,
        FaultCause::VirtualCoherencyInstruction,
        FaultCause::FloatingPoint,
        FaultCause::Watchpoint,
        FaultCause::VirtualCoherencyData,
    ];

    /// Extract the 5-bit exception code from a cause register value
    pub const fn exception_code(cause: u32) -> u32 {
        (cause >> CAUSE_CODE_SHIFT) & CAUSE_CODE_MASK
    }

    /// Decode a cause register value; reserved codes give `None`.
    pub fn from_cause_register(cause: u32) -> Option<Self> {
        let index = match Self::exception_code(cause) {
            code @ 0..=15 => code as usize,
            23 => 16,
            31 => 17,
            _ => return None,
        };
        Self::ALL.get(index).copied()
    }

    /// Position in the description table
    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn description(self) -> &'static str {
        match self {
            FaultCause::Interrupt => "Interrupt",
            FaultCause::TlbModification => "TLB modification",
            FaultCause::TlbLoad => "TLB exception on load",
            FaultCause::TlbStore => "TLB exception on store",
            FaultCause::AddressErrorLoad => "Address error on load",
            FaultCause::AddressErrorStore => "Address error on store",
            FaultCause::BusErrorInstruction => "Bus error on inst.",
            FaultCause::BusErrorData => "Bus error on data",
            FaultCause::Syscall => "System call exception",
            FaultCause::Breakpoint => "Breakpoint exception",
            FaultCause::ReservedInstruction => "Reserved instruction",
            FaultCause::CoprocessorUnusable => "Coprocessor unusable",
            FaultCause::ArithmeticOverflow => "Arithmetic overflow",
            FaultCause::Trap => "Trap exception",
            FaultCause::VirtualCoherencyInstruction => "Virtual coherency on inst.",
            FaultCause::FloatingPoint => "Floating point exception",
            FaultCause::Watchpoint => "Watchpoint exception",
            FaultCause::VirtualCoherencyData => "Virtual coherency on data",
        }
    }
}

/// Description line for a raw cause register value
pub fn cause_description(cause: u32) -> &'static str {
    FaultCause::from_cause_register(cause)
        .map(FaultCause::description)
        .unwrap_or(UNKNOWN_EXCEPTION)
}

bitflags! {
    /// Cause bits of the FPU control/status register
    pub struct FpcsrCause: u32 {
        const INEXACT = 1 << 12;
        const UNDERFLOW = 1 << 13;
        const OVERFLOW = 1 << 14;
        const DIVISION_BY_ZERO = 1 << 15;
        const INVALID = 1 << 16;
        const UNIMPLEMENTED = 1 << 17;
    }
}

/// Floating point exception classes, highest priority first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FpuException {
    Unimplemented,
    Invalid,
    DivisionByZero,
    Overflow,
    Underflow,
    Inexact,
}

impl FpuException {
    const PRIORITY: [(FpcsrCause, FpuException); 6] = [
        (FpcsrCause::UNIMPLEMENTED, FpuException::Unimplemented),
        (FpcsrCause::INVALID, FpuException::Invalid),
        (FpcsrCause::DIVISION_BY_ZERO, FpuException::DivisionByZero),
        (FpcsrCause::OVERFLOW, FpuException::Overflow),
        (FpcsrCause::UNDERFLOW, FpuException::Underflow),
        (FpcsrCause::INEXACT, FpuException::Inexact),
    ];

    /// The most significant cause set in `fpcsr`, if any
    pub fn from_fpcsr(fpcsr: u32) -> Option<Self> {
        let cause = FpcsrCause::from_bits_truncate(fpcsr);
        Self::PRIORITY
            .iter()
            .find(|(bit, _)| cause.contains(*bit))
            .map(|&(_, exception)| exception)
    }

    pub const fn description(self) -> &'static str {
        match self {
            FpuException::Unimplemented => "Unimplemented operation",
            FpuException::Invalid => "Invalid operation",
            FpuException::DivisionByZero => "Division by zero",
            FpuException::Overflow => "Overflow",
            FpuException::Underflow => "Underflow",
            FpuException::Inexact => "Inexact operation",
        }
    }
}
