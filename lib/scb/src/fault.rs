// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fault status: what went wrong, and clearing it afterwards.
//!
//! The status registers are latched by hardware and cleared by writing ones.
//! On ARMv6-M only DFSR exists; a HardFault there carries no cause.

use crate::access::RegisterAccess;
use crate::control::Scb;
use crate::map::regs;

bitflags::bitflags! {
    /// Bits in the Configurable Fault Status Register.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct Cfsr: u32 {
        // Bits 0-7: MMFSR (Memory Management Fault Status Register)
        const IACCVIOL = 1 << 0;
        const DACCVIOL = 1 << 1;
        // MMFSR bit 2 reserved
        const MUNSTKERR = 1 << 3;
        const MSTKERR = 1 << 4;
        #[cfg(armv7em)]
        const MLSPERR = 1 << 5;
        // MMFSR bit 6 reserved
        const MMARVALID = 1 << 7;

        // Bits 8-15: BFSR (Bus Fault Status Register)
        const IBUSERR = 1 << (8 + 0);
        const PRECISERR = 1 << (8 + 1);
        const IMPRECISERR = 1 << (8 + 2);
        const UNSTKERR = 1 << (8 + 3);
        const STKERR = 1 << (8 + 4);
        #[cfg(armv7em)]
        const LSPERR = 1 << (8 + 5);
        // BFSR bit 6 reserved
        const BFARVALID = 1 << (8 + 7);

        // Bits 16-31: UFSR (Usage Fault Status Register)
        const UNDEFINSTR = 1 << (16 + 0);
        const INVSTATE = 1 << (16 + 1);
        const INVPC = 1 << (16 + 2);
        const NOCP = 1 << (16 + 3);
        // UFSR bits 4-7 reserved
        const UNALIGNED = 1 << (16 + 8);
        const DIVBYZERO = 1 << (16 + 9);
        // UFSR bits 10-15 reserved
    }
}

impl Cfsr {
    pub const MMFSR: u32 = 0x0000_00FF;
    pub const BFSR: u32 = 0x0000_FF00;
    pub const UFSR: u32 = 0xFFFF_0000;

    /// Memory management fault bits only.
    pub fn mmfsr(self) -> Self {
        self & Self::from_bits_truncate(Self::MMFSR)
    }

    /// Bus fault bits only.
    pub fn bfsr(self) -> Self {
        self & Self::from_bits_truncate(Self::BFSR)
    }

    /// Usage fault bits only.
    pub fn ufsr(self) -> Self {
        self & Self::from_bits_truncate(Self::UFSR)
    }

    /// The fault happened while stacking or unstacking exception state, so
    /// the stacked frame can't be trusted.
    pub fn is_stacking_error(self) -> bool {
        #[cfg_attr(not(armv7em), allow(unused_mut))]
        let mut stacking = Self::MSTKERR
            | Self::MUNSTKERR
            | Self::STKERR
            | Self::UNSTKERR;
        #[cfg(armv7em)]
        {
            stacking |= Self::MLSPERR | Self::LSPERR;
        }
        self.intersects(stacking)
    }
}

bitflags::bitflags! {
    /// Bits in the HardFault Status Register.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct Hfsr: u32 {
        /// Bus error on a vector table read.
        const VECTTBL = 1 << 1;
        /// A configurable fault escalated, because its handler was disabled
        /// or couldn't preempt.
        const FORCED = 1 << 30;
        const DEBUGEVT = 1 << 31;
    }
}

bitflags::bitflags! {
    /// Bits in the Debug Fault Status Register.
    #[derive(Copy, Clone, Debug, Eq, PartialEq)]
    #[repr(transparent)]
    pub struct Dfsr: u32 {
        const HALTED = 1 << 0;
        const BKPT = 1 << 1;
        const DWTTRAP = 1 << 2;
        const VCATCH = 1 << 3;
        const EXTERNAL = 1 << 4;
    }
}

/// A snapshot of every fault status register. Registers the variant doesn't
/// have read as empty.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FaultStatus {
    pub cfsr: Cfsr,
    pub hfsr: Hfsr,
    pub dfsr: Dfsr,
    pub afsr: u32,
    /// Faulting address for a memory management fault, if MMARVALID.
    pub mmfar: Option<u32>,
    /// Faulting address for a precise bus fault, if BFARVALID.
    pub bfar: Option<u32>,
}

impl Default for FaultStatus {
    fn default() -> Self {
        Self {
            cfsr: Cfsr::empty(),
            hfsr: Hfsr::empty(),
            dfsr: Dfsr::empty(),
            afsr: 0,
            mmfar: None,
            bfar: None,
        }
    }
}

/// What a fault handler would report, in a form it can act on.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum FaultCause {
    /// Stacking or unstacking hit a fault; the stack pointer is probably
    /// trashed.
    StackError,
    /// Instruction fetch from a non-executable region.
    IllegalText,
    MemoryAccess { address: Option<u32> },
    BusError { address: Option<u32> },
    DivideByZero,
    IllegalInstruction,
    /// Some other usage fault; the UFSR bits say which.
    InvalidOperation(u32),
    VectorTableRead,
    /// Escalated to HardFault without any configurable fault bits latched.
    Forced,
    Debug(Dfsr),
    /// Only the implementation-defined AFSR has anything latched.
    Auxiliary(u32),
}

impl FaultStatus {
    pub fn is_clear(&self) -> bool {
        self.cfsr.is_empty()
            && self.hfsr.is_empty()
            && self.dfsr.is_empty()
            && self.afsr == 0
    }

    /// Everything latched, for passing straight to
    /// [`Scb::clear_fault_status`].
    pub fn latched(&self) -> FaultFlags {
        FaultFlags {
            cfsr: self.cfsr,
            hfsr: self.hfsr,
            dfsr: self.dfsr,
            afsr: self.afsr,
        }
    }

    /// Best single explanation of the fault, or `None` if nothing is
    /// latched.
    ///
    /// Stacking errors win, since everything else about the fault was
    /// observed through a bad stack. Then memory management, bus and usage
    /// faults in that order, then the HardFault-only causes, then debug
    /// events, and last the auxiliary status.
    pub fn cause(&self) -> Option<FaultCause> {
        let cfsr = self.cfsr;

        if cfsr.is_stacking_error() {
            return Some(FaultCause::StackError);
        }
        if !cfsr.mmfsr().is_empty() {
            return Some(if cfsr.contains(Cfsr::IACCVIOL) {
                FaultCause::IllegalText
            } else {
                FaultCause::MemoryAccess {
                    address: self.mmfar,
                }
            });
        }
        if !cfsr.bfsr().is_empty() {
            return Some(FaultCause::BusError { address: self.bfar });
        }
        let ufsr = cfsr.ufsr();
        if !ufsr.is_empty() {
            return Some(if ufsr.contains(Cfsr::DIVBYZERO) {
                FaultCause::DivideByZero
            } else if ufsr.contains(Cfsr::UNDEFINSTR) {
                FaultCause::IllegalInstruction
            } else {
                FaultCause::InvalidOperation(ufsr.bits())
            });
        }
        if self.hfsr.contains(Hfsr::VECTTBL) {
            return Some(FaultCause::VectorTableRead);
        }
        if self.hfsr.contains(Hfsr::FORCED) {
            return Some(FaultCause::Forced);
        }
        if !self.dfsr.is_empty() {
            return Some(FaultCause::Debug(self.dfsr));
        }
        if self.afsr != 0 {
            return Some(FaultCause::Auxiliary(self.afsr));
        }
        None
    }
}

/// Which latched fault bits to clear. Zero bits leave the corresponding
/// status alone.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct FaultFlags {
    pub cfsr: Cfsr,
    pub hfsr: Hfsr,
    pub dfsr: Dfsr,
    pub afsr: u32,
}

impl FaultFlags {
    pub fn none() -> Self {
        Self {
            cfsr: Cfsr::empty(),
            hfsr: Hfsr::empty(),
            dfsr: Dfsr::empty(),
            afsr: 0,
        }
    }

    /// Every flag the map knows about.
    pub fn all() -> Self {
        Self {
            cfsr: Cfsr::all(),
            hfsr: Hfsr::all(),
            dfsr: Dfsr::all(),
            afsr: u32::MAX,
        }
    }
}

impl<A: RegisterAccess> Scb<A> {
    /// Reads every fault status register. No side effects.
    pub fn read_fault_status(&self) -> FaultStatus {
        #[cfg_attr(armv6m, allow(unused_mut))]
        let mut status = FaultStatus {
            dfsr: Dfsr::from_bits_truncate(self.read(regs::DFSR)),
            ..FaultStatus::default()
        };

        #[cfg(armv7m)]
        {
            let cfsr = Cfsr::from_bits_truncate(self.read(regs::CFSR));
            status.cfsr = cfsr;
            status.hfsr = Hfsr::from_bits_truncate(self.read(regs::HFSR));
            status.afsr = self.read(regs::AFSR);
            if cfsr.contains(Cfsr::MMARVALID) {
                status.mmfar = Some(self.read(regs::MMFAR));
            }
            if cfsr.contains(Cfsr::BFARVALID) {
                status.bfar = Some(self.read(regs::BFAR));
            }
        }

        status
    }

    /// Clears exactly the given latched flags.
    ///
    /// One write-one-to-clear store per register with something to clear;
    /// registers with nothing requested aren't written at all. Flags for
    /// registers the variant doesn't have are ignored.
    pub fn clear_fault_status(&self, flags: FaultFlags) {
        scblog!(
            "scb: clearing CFSR={:#010x} HFSR={:#010x} DFSR={:#x}",
            flags.cfsr.bits(),
            flags.hfsr.bits(),
            flags.dfsr.bits(),
        );

        #[cfg(armv7m)]
        {
            if !flags.cfsr.is_empty() {
                self.write(regs::CFSR, flags.cfsr.bits());
            }
            if !flags.hfsr.is_empty() {
                self.write(regs::HFSR, flags.hfsr.bits());
            }
            if flags.afsr != 0 {
                self.write(regs::AFSR, flags.afsr);
            }
        }
        if !flags.dfsr.is_empty() {
            self.write(regs::DFSR, flags.dfsr.bits());
        }
    }
}
