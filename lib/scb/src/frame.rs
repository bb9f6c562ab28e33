// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The register state hardware pushes on exception entry.

use static_assertions::const_assert_eq;
use zerocopy::{FromBytes, Immutable, KnownLayout};

/// The eight words stacked on exception entry, lowest address first.
///
/// Cores with an active FPU context stack another 18 words above these; this
/// is only the part every exception frame has.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[derive(FromBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct ExceptionStackFrame {
    pub r0: u32,
    pub r1: u32,
    pub r2: u32,
    pub r3: u32,
    pub r12: u32,
    pub lr: u32,
    pub pc: u32,
    pub xpsr: u32,
}

const_assert_eq!(core::mem::size_of::<ExceptionStackFrame>(), 32);
const_assert_eq!(core::mem::align_of::<ExceptionStackFrame>(), 4);

impl ExceptionStackFrame {
    pub const WORDS: usize = 8;

    pub fn from_words(w: [u32; Self::WORDS]) -> Self {
        Self {
            r0: w[0],
            r1: w[1],
            r2: w[2],
            r3: w[3],
            r12: w[4],
            lr: w[5],
            pc: w[6],
            xpsr: w[7],
        }
    }

    pub fn to_words(&self) -> [u32; Self::WORDS] {
        [
            self.r0, self.r1, self.r2, self.r3, self.r12, self.lr, self.pc,
            self.xpsr,
        ]
    }

    /// Parses a frame from the front of `bytes`, e.g. a copy of a stack
    /// taken by a debugger. Native byte order.
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        Self::read_from_prefix(bytes).ok().map(|(frame, _rest)| frame)
    }

    /// Copies the frame at `sp`.
    ///
    /// # Safety
    ///
    /// `sp` must be 4-byte aligned and valid for reading 32 bytes, which it
    /// is if it's the stack pointer an exception was taken on.
    pub unsafe fn from_stack_pointer(sp: *const u32) -> Self {
        // Safety: our caller guarantees alignment and validity, and any bit
        // pattern is a valid frame.
        unsafe { core::ptr::read_volatile(sp.cast::<Self>()) }
    }

    pub fn psr(&self) -> Xpsr {
        Xpsr(self.xpsr)
    }

    /// The stack pointer of the interrupted code, given the address the
    /// frame was found at. Accounts for the padding word hardware inserts to
    /// align the frame to 8 bytes, but not for an FPU extension.
    pub fn interrupted_stack_pointer(&self, frame_address: u32) -> u32 {
        let pad = if self.psr().stack_realigned() { 4 } else { 0 };
        frame_address
            .wrapping_add(4 * Self::WORDS as u32)
            .wrapping_add(pad)
    }
}

/// Reads the frame for the exception being handled off the current stack.
///
/// # Safety
///
/// Must be inlined into an exception handler at a point where nothing has
/// been pushed since exception entry, and where the exception was taken on
/// the current stack (MSP, for anything interrupting handler mode or a
/// system that never uses PSP). In practice that means the very start of a
/// naked handler; a normal Rust function's prologue moves SP before this
/// runs.
#[cfg(target_arch = "arm")]
#[inline(always)]
pub unsafe fn capture_exception_frame() -> ExceptionStackFrame {
    let sp: *const u32;
    // Safety: reads a register, nothing else.
    unsafe {
        core::arch::asm!(
            "mov {}, sp",
            out(reg) sp,
            options(nomem, nostack, preserves_flags),
        );
    }
    // Safety: per our contract, SP points at the stacked frame.
    unsafe { ExceptionStackFrame::from_stack_pointer(sp) }
}

/// Reads the frame stacked on the process stack, for an exception taken
/// from thread mode running on PSP.
///
/// # Safety
///
/// The interrupted code must actually have been using PSP (check
/// [`ExcReturn::uses_process_stack`]), and PSP must not have been changed
/// since exception entry.
#[cfg(target_arch = "arm")]
pub unsafe fn capture_process_exception_frame() -> ExceptionStackFrame {
    let psp = cortex_m::register::psp::read() as *const u32;
    // Safety: per our contract, PSP points at the stacked frame.
    unsafe { ExceptionStackFrame::from_stack_pointer(psp) }
}

/// Stacked program status register.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Xpsr(pub u32);

impl Xpsr {
    /// IPSR: the exception that was active when the frame was stacked.
    pub fn exception_number(self) -> u16 {
        (self.0 & 0x1FF) as u16
    }

    /// EPSR.T. Always set in valid state; clear means an INVSTATE fault is
    /// coming or already happened.
    pub fn thumb(self) -> bool {
        self.0 & (1 << 24) != 0
    }

    /// Bit 9 in a stacked xPSR records that hardware inserted a padding word
    /// to 8-byte align the frame.
    pub fn stack_realigned(self) -> bool {
        self.0 & (1 << 9) != 0
    }
}

/// The EXC_RETURN value found in LR on exception entry.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ExcReturn(pub u32);

impl ExcReturn {
    /// The exception interrupted thread mode rather than another handler.
    pub fn returns_to_thread(self) -> bool {
        self.0 & 0b1000 != 0
    }

    /// The frame is on PSP rather than MSP.
    pub fn uses_process_stack(self) -> bool {
        self.0 & 0b100 != 0
    }

    /// The frame includes FP state. Never true on ARMv6-M.
    pub fn has_fp_frame(self) -> bool {
        cfg!(armv7m) && self.0 & 0b1_0000 == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STACK: [u32; 8] = [
        0x1111_1111,
        0x2222_2222,
        0x3333_3333,
        0x4444_4444,
        0xCCCC_CCCC,
        0x0800_1235,
        0x0800_1000,
        0x0100_0003,
    ];

    #[test]
    fn from_stack_pointer_reads_in_order() {
        // Put the frame somewhere other than the start of the region, as it
        // would be on a real stack.
        let mut region = [0u32; 12];
        region[2..10].copy_from_slice(&STACK);

        let frame =
            unsafe { ExceptionStackFrame::from_stack_pointer(&region[2]) };
        assert_eq!(frame.r0, 0x1111_1111);
        assert_eq!(frame.r1, 0x2222_2222);
        assert_eq!(frame.r2, 0x3333_3333);
        assert_eq!(frame.r3, 0x4444_4444);
        assert_eq!(frame.r12, 0xCCCC_CCCC);
        assert_eq!(frame.lr, 0x0800_1235);
        assert_eq!(frame.pc, 0x0800_1000);
        assert_eq!(frame.xpsr, 0x0100_0003);
        assert_eq!(frame, ExceptionStackFrame::from_words(STACK));
        assert_eq!(frame.to_words(), STACK);
    }

    #[test]
    fn from_bytes_needs_32() {
        let bytes: Vec<u8> =
            STACK.iter().flat_map(|w| w.to_ne_bytes()).collect();
        assert_eq!(
            ExceptionStackFrame::from_bytes(&bytes),
            Some(ExceptionStackFrame::from_words(STACK))
        );
        assert_eq!(ExceptionStackFrame::from_bytes(&bytes[..31]), None);
    }

    #[test]
    fn psr_fields() {
        let frame = ExceptionStackFrame::from_words(STACK);
        let psr = frame.psr();
        // HardFault
        assert_eq!(psr.exception_number(), 3);
        assert!(psr.thumb());
        assert!(!psr.stack_realigned());
        assert_eq!(frame.interrupted_stack_pointer(0x2000_0FE0), 0x2000_1000);

        let padded = ExceptionStackFrame {
            xpsr: frame.xpsr | 1 << 9,
            ..frame
        };
        assert_eq!(
            padded.interrupted_stack_pointer(0x2000_0FDC),
            0x2000_1000
        );
    }

    #[test]
    fn exc_return_bits() {
        // Thread mode, PSP, basic frame.
        let r = ExcReturn(0xFFFF_FFFD);
        assert!(r.returns_to_thread());
        assert!(r.uses_process_stack());
        assert!(!r.has_fp_frame());

        // Handler mode, MSP.
        let r = ExcReturn(0xFFFF_FFF1);
        assert!(!r.returns_to_thread());
        assert!(!r.uses_process_stack());

        // Thread mode, PSP, with FP state.
        assert_eq!(ExcReturn(0xFFFF_FFED).has_fp_frame(), cfg!(armv7m));
    }
}
