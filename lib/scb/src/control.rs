// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Typed operations on the SCB.
//!
//! Each operation documents how it touches its register:
//!
//! - **write**: a single store, with no read first. Safe to race with
//!   anything.
//! - **read-modify-write**: read, change some bits, store. Can lose a
//!   concurrent update to the same register made between the read and the
//!   store; see [`crate::access::with_interrupts_masked`].
//! - **read**: no side effects.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::access::{Mmio, RegisterAccess};
use crate::cpuid::Cpuid;
use crate::err::ScbError;
use crate::map::{
    aircr, ccr, icsr, regs, scr, vtor, PrioritySlot, RegisterDesc,
    SystemHandler, Width,
};

/// Handle on the System Control Block.
///
/// There's one SCB per core, and this doesn't try to police that: handles are
/// cheap and any number can coexist. What matters is that read-modify-write
/// operations aren't interleaved, which is up to the caller.
pub struct Scb<A: RegisterAccess = Mmio> {
    regs: A,
}

impl Scb<Mmio> {
    /// Produces a handle on the real SCB.
    ///
    /// # Safety
    ///
    /// Same contract as [`Mmio::new`]: this must be running on a Cortex-M
    /// core, privileged.
    pub unsafe fn steal() -> Self {
        // Safety: passed through to our caller.
        Self::new(unsafe { Mmio::new() })
    }
}

impl<A: RegisterAccess> Scb<A> {
    pub fn new(regs: A) -> Self {
        Self { regs }
    }

    /// The underlying register access, e.g. a fake to inspect in tests.
    pub fn access(&self) -> &A {
        &self.regs
    }

    pub(crate) fn read(&self, desc: RegisterDesc) -> u32 {
        self.regs.read(desc.offset)
    }

    pub(crate) fn write(&self, desc: RegisterDesc, value: u32) {
        self.regs.write(desc.offset, value)
    }

    fn modify(&self, desc: RegisterDesc, f: impl FnOnce(u32) -> u32) {
        let value = self.regs.read(desc.offset);
        self.regs.write(desc.offset, f(value));
    }

    fn set_bits(&self, desc: RegisterDesc, mask: u32) {
        self.modify(desc, |v| v | mask);
    }

    fn clear_bits(&self, desc: RegisterDesc, mask: u32) {
        self.modify(desc, |v| v & !mask);
    }

    /// The only way anything in this crate writes AIRCR. Puts the key in the
    /// top half-word, replacing whatever `bits` had there.
    fn write_aircr(&self, bits: u32) {
        self.write(regs::AIRCR, aircr::keyed(bits));
    }

    /// Asks for a reset of the whole system, core and peripherals. Does not
    /// return.
    ///
    /// Write: exactly `0x05FA_0004`. Because this is a plain overwrite, the
    /// priority grouping reads back as 0 if the reset is somehow held off.
    pub fn request_system_reset(&self) -> ! {
        scblog!("scb: system reset");
        self.regs.barrier();
        self.write_aircr(aircr::SYSRESETREQ.mask());
        self.regs.barrier();
        self.regs.await_reset()
    }

    /// Asks for a reset of the core only, leaving the rest of the system
    /// alone. Intended for debuggers; the architecture leaves the outcome
    /// unpredictable if it is used while SYSRESETREQ is also pending. Does
    /// not return.
    ///
    /// Write: exactly `0x05FA_0001`.
    #[cfg(armv7m)]
    pub fn request_core_reset(&self) -> ! {
        scblog!("scb: core reset");
        self.regs.barrier();
        self.write_aircr(aircr::VECTRESET.mask());
        self.regs.barrier();
        self.regs.await_reset()
    }

    /// Sets the split between preemption priority and subpriority.
    ///
    /// Write: exactly `0x05FA_0000 | grouping << 8`. Nothing else in AIRCR is
    /// persistent state, so the overwrite loses nothing.
    #[cfg(armv7m)]
    pub fn set_priority_grouping(&self, grouping: PriorityGrouping) {
        scblog!("scb: PRIGROUP={}", grouping as u8);
        self.write_aircr(aircr::PRIGROUP.insert(0, grouping as u32));
    }

    /// Read.
    #[cfg(armv7m)]
    pub fn priority_grouping(&self) -> PriorityGrouping {
        let bits = aircr::PRIGROUP.extract(self.read(regs::AIRCR));
        PriorityGrouping::from_field(bits)
    }

    /// Makes WFI/WFE enter deep sleep rather than sleep.
    ///
    /// Read-modify-write of SCR.
    pub fn enter_deep_sleep(&self) {
        self.set_bits(regs::SCR, scr::SLEEPDEEP.mask());
    }

    /// Read-modify-write of SCR.
    pub fn exit_deep_sleep(&self) {
        self.clear_bits(regs::SCR, scr::SLEEPDEEP.mask());
    }

    /// Makes the core go back to sleep when it returns from the last active
    /// handler to thread mode.
    ///
    /// Read-modify-write of SCR.
    pub fn enable_sleep_on_exit(&self) {
        self.set_bits(regs::SCR, scr::SLEEPONEXIT.mask());
    }

    /// Read-modify-write of SCR.
    pub fn disable_sleep_on_exit(&self) {
        self.clear_bits(regs::SCR, scr::SLEEPONEXIT.mask());
    }

    /// Makes interrupts that become pending wake WFE, even while disabled.
    ///
    /// Read-modify-write of SCR.
    pub fn enable_send_event_on_pending(&self) {
        self.set_bits(regs::SCR, scr::SEVONPEND.mask());
    }

    /// Read-modify-write of SCR.
    pub fn disable_send_event_on_pending(&self) {
        self.clear_bits(regs::SCR, scr::SEVONPEND.mask());
    }

    /// Write.
    pub fn set_pendsv(&self) {
        self.write(regs::ICSR, icsr::PENDSVSET.mask());
    }

    /// Write.
    pub fn clear_pendsv(&self) {
        self.write(regs::ICSR, icsr::PENDSVCLR.mask());
    }

    pub fn is_pendsv_pending(&self) -> bool {
        self.read(regs::ICSR) & icsr::PENDSVSET.mask() != 0
    }

    /// Write.
    pub fn set_pendst(&self) {
        self.write(regs::ICSR, icsr::PENDSTSET.mask());
    }

    /// Write.
    pub fn clear_pendst(&self) {
        self.write(regs::ICSR, icsr::PENDSTCLR.mask());
    }

    pub fn is_pendst_pending(&self) -> bool {
        self.read(regs::ICSR) & icsr::PENDSTSET.mask() != 0
    }

    /// Pends the NMI. Write.
    pub fn set_nmi_pending(&self) {
        self.write(regs::ICSR, icsr::NMIPENDSET.mask());
    }

    /// Exception number of the active handler, or 0 in thread mode.
    pub fn vect_active(&self) -> u16 {
        icsr::VECTACTIVE.extract(self.read(regs::ICSR)) as u16
    }

    /// Highest-priority pending exception number, or 0 if none.
    pub fn vect_pending(&self) -> u16 {
        icsr::VECTPENDING.extract(self.read(regs::ICSR)) as u16
    }

    /// Whether an external interrupt (not a system exception) is pending.
    pub fn is_isr_pending(&self) -> bool {
        self.read(regs::ICSR) & icsr::ISRPENDING.mask() != 0
    }

    /// Clears all active state for exceptions. For debuggers recovering from
    /// a fault, never for running firmware: the stacked context becomes
    /// meaningless.
    ///
    /// Keyed write of AIRCR. The priority grouping is carried over, since
    /// unlike a reset this doesn't wipe it out.
    pub fn clear_active_vectors(&self) {
        let mut bits = aircr::VECTCLRACTIVE.mask();
        if cfg!(armv7m) {
            let current = aircr::PRIGROUP.extract(self.read(regs::AIRCR));
            bits = aircr::PRIGROUP.insert(bits, current);
        }
        self.write_aircr(bits);
    }

    /// Address of the vector table. Read.
    pub fn vector_table_offset(&self) -> u32 {
        self.read(regs::VTOR) & vtor::TBLOFF.mask()
    }

    /// Relocates the vector table. The address must be aligned to 128 bytes
    /// on ARMv6-M and 512 bytes on ARMv7-M; tables with more than 128
    /// entries need more alignment than that, which is the caller's business.
    ///
    /// Write.
    pub fn set_vector_table_offset(
        &self,
        address: u32,
    ) -> Result<(), ScbError> {
        if address & !vtor::TBLOFF.mask() != 0 {
            return Err(ScbError::MisalignedVectorTable(address));
        }
        scblog!("scb: VTOR={:#010x}", address);
        self.write(regs::VTOR, address);
        self.regs.barrier();
        Ok(())
    }

    /// Whether exception entry aligns the stack to 8 bytes. Always true on
    /// ARMv6-M.
    pub fn stack_alignment_enforced(&self) -> bool {
        self.read(regs::CCR) & ccr::STKALIGN.mask() != 0
    }

    /// Read-modify-write of CCR.
    #[cfg(armv7m)]
    pub fn enable_unaligned_trap(&self) {
        self.set_bits(regs::CCR, ccr::UNALIGN_TRP.mask());
    }

    /// Read-modify-write of CCR.
    #[cfg(armv7m)]
    pub fn disable_unaligned_trap(&self) {
        self.clear_bits(regs::CCR, ccr::UNALIGN_TRP.mask());
    }

    /// Read-modify-write of CCR.
    #[cfg(armv7m)]
    pub fn enable_div_by_zero_trap(&self) {
        self.set_bits(regs::CCR, ccr::DIV_0_TRP.mask());
    }

    /// Read-modify-write of CCR.
    #[cfg(armv7m)]
    pub fn disable_div_by_zero_trap(&self) {
        self.clear_bits(regs::CCR, ccr::DIV_0_TRP.mask());
    }

    /// Priority of a system handler, as the 8-bit priority value with
    /// unimplemented low bits reading as zero. Read.
    pub fn system_handler_priority(&self, handler: SystemHandler) -> u8 {
        self.read_priority(handler.priority_slot())
    }

    /// Sets a system handler's priority. `priority` is the full 8-bit value;
    /// low bits the core doesn't implement are dropped (all but the top two,
    /// on ARMv6-M).
    ///
    /// Byte write on ARMv7-M. Read-modify-write of the containing word on
    /// ARMv6-M, which has no byte access to these registers.
    pub fn set_system_handler_priority(
        &self,
        handler: SystemHandler,
        priority: u8,
    ) {
        self.write_priority(handler.priority_slot(), priority);
    }

    fn read_priority(&self, slot: PrioritySlot) -> u8 {
        match slot.width {
            Width::Byte => self.regs.read_byte(slot.offset),
            Width::Word => {
                let bits = slot.field().extract(self.regs.read(slot.offset));
                (bits << (8 - slot.bits)) as u8
            }
        }
    }

    fn write_priority(&self, slot: PrioritySlot, priority: u8) {
        match slot.width {
            Width::Byte => self.regs.write_byte(slot.offset, priority),
            Width::Word => {
                let bits = u32::from(priority) >> (8 - slot.bits);
                let word = self.regs.read(slot.offset);
                self.regs.write(slot.offset, slot.field().insert(word, bits));
            }
        }
    }

    /// Turns on the dedicated handler for a configurable fault. While it's
    /// off, that fault escalates to HardFault.
    ///
    /// Read-modify-write of SHCSR.
    #[cfg(armv7m)]
    pub fn enable_fault_handler(&self, fault: ConfigurableFault) {
        self.set_bits(regs::SHCSR, fault.enable_mask());
    }

    /// Read-modify-write of SHCSR.
    #[cfg(armv7m)]
    pub fn disable_fault_handler(&self, fault: ConfigurableFault) {
        self.clear_bits(regs::SHCSR, fault.enable_mask());
    }

    /// Drops any pended SVCall, BusFault, MemManage and UsageFault.
    ///
    /// A fault taken while entering another exception leaves that exception
    /// pended; a handler that deals with the fault by switching context
    /// needs to clear them or they fire in the wrong context.
    ///
    /// Read-modify-write of SHCSR.
    #[cfg(armv7m)]
    pub fn clear_pended_faults(&self) {
        self.clear_bits(regs::SHCSR, crate::map::shcsr::PENDED);
    }

    /// Gives privileged and unprivileged code full access to the FPU.
    ///
    /// Read-modify-write of CPACR, followed by barriers so the next
    /// instruction can use it.
    #[cfg(armv7m)]
    pub fn enable_fpu(&self) {
        use crate::map::cpacr;
        self.modify(regs::CPACR, |v| {
            cpacr::CP11.insert(cpacr::CP10.insert(v, cpacr::FULL), cpacr::FULL)
        });
        self.regs.barrier();
    }

    /// Read-modify-write of CPACR.
    #[cfg(armv7m)]
    pub fn disable_fpu(&self) {
        use crate::map::cpacr;
        self.modify(regs::CPACR, |v| {
            cpacr::CP11.insert(cpacr::CP10.insert(v, cpacr::NONE), cpacr::NONE)
        });
        self.regs.barrier();
    }

    /// Read.
    pub fn cpuid(&self) -> Cpuid {
        Cpuid(self.read(regs::CPUID))
    }
}

/// Cache and branch predictor maintenance, on cores that have them.
///
/// These assume a single level of cache, which is all any ARMv7E-M part has.
#[cfg(armv7em)]
impl<A: RegisterAccess> Scb<A> {
    pub fn icache_enabled(&self) -> bool {
        self.read(regs::CCR) & ccr::IC.mask() != 0
    }

    pub fn dcache_enabled(&self) -> bool {
        self.read(regs::CCR) & ccr::DC.mask() != 0
    }

    /// Invalidates then enables the instruction cache. Does nothing if it is
    /// already on.
    pub fn enable_icache(&self) {
        if self.icache_enabled() {
            return;
        }
        self.invalidate_icache();
        self.set_bits(regs::CCR, ccr::IC.mask());
        self.regs.barrier();
    }

    pub fn disable_icache(&self) {
        self.regs.barrier();
        self.clear_bits(regs::CCR, ccr::IC.mask());
        self.invalidate_icache();
    }

    pub fn invalidate_icache(&self) {
        self.regs.barrier();
        self.write(regs::ICIALLU, 0);
        self.regs.barrier();
    }

    /// Invalidates then enables the data cache. Does nothing if it is already
    /// on, since invalidating a live cache would throw away dirty lines.
    pub fn enable_dcache(&self) {
        if self.dcache_enabled() {
            return;
        }
        self.for_each_dcache_set_way(regs::DCISW);
        self.set_bits(regs::CCR, ccr::DC.mask());
        self.regs.barrier();
    }

    /// Disables the data cache, then cleans and invalidates it so memory
    /// holds everything that was only in the cache.
    pub fn disable_dcache(&self) {
        self.regs.barrier();
        self.clear_bits(regs::CCR, ccr::DC.mask());
        self.for_each_dcache_set_way(regs::DCCISW);
    }

    /// Writes back dirty lines covering `address..address + len` to memory,
    /// e.g. before a DMA engine reads it.
    pub fn clean_dcache_by_address(&self, address: u32, len: u32) {
        self.for_each_dcache_line(regs::DCCMVAC, address, len);
    }

    /// Discards lines covering `address..address + len`, e.g. after a DMA
    /// engine wrote it.
    ///
    /// # Safety
    ///
    /// Whole lines are discarded, including any bytes outside the range that
    /// share a line with it. Unless `address` and `len` are multiples of the
    /// line size, dirty data belonging to something else can be lost.
    pub unsafe fn invalidate_dcache_by_address(&self, address: u32, len: u32) {
        self.for_each_dcache_line(regs::DCIMVAC, address, len);
    }

    pub fn clean_invalidate_dcache_by_address(&self, address: u32, len: u32) {
        self.for_each_dcache_line(regs::DCCIMVAC, address, len);
    }

    pub fn invalidate_branch_predictor(&self) {
        self.regs.barrier();
        self.write(regs::BPIALL, 0);
        self.regs.barrier();
    }

    /// Smallest data cache line, in bytes.
    pub fn dcache_line_size(&self) -> u32 {
        use crate::map::ctr;
        4 << ctr::DMINLINE.extract(self.read(regs::CTR))
    }

    fn for_each_dcache_line(&self, op: RegisterDesc, address: u32, len: u32) {
        if len == 0 {
            return;
        }
        let line = self.dcache_line_size();
        let end = address.saturating_add(len);
        let mut addr = address & !(line - 1);

        self.regs.barrier();
        while addr < end {
            self.write(op, addr);
            addr = match addr.checked_add(line) {
                Some(next) => next,
                None => break,
            };
        }
        self.regs.barrier();
    }

    fn for_each_dcache_set_way(&self, op: RegisterDesc) {
        use crate::map::ccsidr;

        // Level 1, data.
        self.write(regs::CSSELR, 0);
        self.regs.barrier();
        let geometry = self.read(regs::CCSIDR);

        let sets = ccsidr::NUMSETS.extract(geometry) + 1;
        let ways = ccsidr::ASSOCIATIVITY.extract(geometry) + 1;
        let set_shift = ccsidr::LINESIZE.extract(geometry) + 4;
        // Ways are numbered down from bit 31.
        let way_shift = (ways - 1).leading_zeros();

        for set in 0..sets {
            for way in 0..ways {
                let way_bits = way.checked_shl(way_shift).unwrap_or(0);
                self.write(op, way_bits | set << set_shift);
            }
        }
        self.regs.barrier();
    }
}

/// Faults that have their own handler and enable bit in SHCSR.
#[cfg(armv7m)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConfigurableFault {
    MemoryManagement,
    BusFault,
    UsageFault,
}

#[cfg(armv7m)]
impl ConfigurableFault {
    fn enable_mask(self) -> u32 {
        use crate::map::shcsr;
        match self {
            Self::MemoryManagement => shcsr::MEMFAULTENA.mask(),
            Self::BusFault => shcsr::BUSFAULTENA.mask(),
            Self::UsageFault => shcsr::USGFAULTENA.mask(),
        }
    }

    pub fn handler(self) -> SystemHandler {
        match self {
            Self::MemoryManagement => SystemHandler::MemoryManagement,
            Self::BusFault => SystemHandler::BusFault,
            Self::UsageFault => SystemHandler::UsageFault,
        }
    }
}

/// Values of AIRCR.PRIGROUP.
///
/// PRIGROUP is the position of the binary point in an 8-bit priority: bits
/// above it are the preemption ("group") priority, bits at and below it are
/// the subpriority. The names from 3 up describe a core that implements 4
/// priority bits, which is the common case; [`PriorityGrouping::split`] gives
/// the real numbers for any core. Below 3, a 4-bit core sees the same thing
/// as `Group16NoSub`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive)]
#[repr(u8)]
pub enum PriorityGrouping {
    Prigroup0 = 0,
    Prigroup1 = 1,
    Prigroup2 = 2,
    Group16NoSub = 3,
    Group8Sub2 = 4,
    Group4Sub4 = 5,
    Group2Sub8 = 6,
    NoGroupSub16 = 7,
}

impl PriorityGrouping {
    /// Decodes a PRIGROUP field value; only the low three bits count.
    pub fn from_field(bits: u32) -> Self {
        // Three bits, eight variants: every value maps.
        Self::from_u32(bits & 0b111).unwrap_or(Self::Prigroup0)
    }

    /// Splits `implemented` priority bits into (preemption bits, subpriority
    /// bits) under this grouping.
    pub fn split(self, implemented: u8) -> (u8, u8) {
        let group = implemented.min(7 - self as u8);
        (group, implemented - group)
    }
}

impl TryFrom<u8> for PriorityGrouping {
    type Error = ScbError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::from_u8(value).ok_or(ScbError::InvalidPriorityGrouping(value))
    }
}
