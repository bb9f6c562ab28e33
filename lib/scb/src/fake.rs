// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! An in-memory SCB for host-side testing.
//!
//! [`FakeScb`] holds a register file and applies the access rules from the
//! register map for whichever variant it was created with: read-only fields
//! ignore writes, write-one-to-clear fields clear, write-only fields read as
//! zero, and AIRCR writes without the key are dropped on the floor, the same
//! as hardware. It is stricter than hardware in one respect: writing a 1 to a
//! reserved bit, or touching an offset the variant doesn't have, panics. That
//! turns a class of silent bugs into test failures.
//!
//! Every write is recorded, so tests can check the exact values an operation
//! issued as well as the resulting state.

use std::cell::{Cell, RefCell};

use crate::access::RegisterAccess;
use crate::map::{self, Access, Register, RegisterDesc};
use crate::variant::ArchVariant;

/// One recorded write, as issued.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum WriteOp {
    Word { offset: u16, value: u32 },
    Byte { offset: u16, value: u8 },
}

/// Panic payload raised by [`FakeScb::await_reset`], standing in for the
/// core going away. Catch it with `std::panic::catch_unwind`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct ResetRequested {
    /// The accepted AIRCR write that requested the reset.
    pub aircr: u32,
}

// Covers everything up to and including BPIALL.
const WORDS: usize = 0x280 / 4;

// CCSIDR contents for a Cortex-M7 with 16 KiB caches: 32-byte lines, a 4-way
// data cache with 128 sets and a 2-way instruction cache with 256 sets.
const CCSIDR_DCACHE: u32 = 0xF00F_E019;
const CCSIDR_ICACHE: u32 = 0x201F_E009;

pub struct FakeScb {
    variant: ArchVariant,
    regs: RefCell<[u32; WORDS]>,
    writes: RefCell<Vec<WriteOp>>,
    barriers: Cell<usize>,
    reset: Cell<Option<u32>>,
}

impl Default for FakeScb {
    fn default() -> Self {
        Self::new(ArchVariant::CURRENT)
    }
}

impl FakeScb {
    /// Creates a fake in its reset state, with plausible identification
    /// register contents for a representative core of `variant`.
    pub fn new(variant: ArchVariant) -> Self {
        let mut regs = [0; WORDS];
        let mut set = |r: Register, value: u32| {
            if let Some(desc) = map::resolve(r, variant) {
                regs[usize::from(desc.offset) / 4] = value;
            }
        };
        match variant {
            ArchVariant::V6M => {
                // Cortex-M0+ r0p1
                set(Register::Cpuid, 0x410C_C601);
                set(Register::Ccr, 0x0000_0208);
            }
            ArchVariant::V7M => {
                // Cortex-M3 r2p1
                set(Register::Cpuid, 0x412F_C231);
                set(Register::Ccr, 0x0000_0200);
            }
            ArchVariant::V7EM => {
                // Cortex-M7 r1p2
                set(Register::Cpuid, 0x411F_C272);
                set(Register::Ccr, 0x0000_0200);
                set(Register::Clidr, 0x0900_0003);
                set(Register::Ctr, 0x8303_C003);
            }
        }

        Self {
            variant,
            regs: RefCell::new(regs),
            writes: RefCell::new(Vec::new()),
            barriers: Cell::new(0),
            reset: Cell::new(None),
        }
    }

    pub fn variant(&self) -> ArchVariant {
        self.variant
    }

    /// Stores `value` with no access rules applied, the way hardware
    /// updates status bits. Not recorded as a write.
    pub fn set_raw(&self, offset: u16, value: u32) {
        let desc = self.desc(offset);
        self.regs.borrow_mut()[usize::from(desc.offset) / 4] = value;
    }

    /// Sets `bits` as hardware would when latching a status flag.
    pub fn latch(&self, offset: u16, bits: u32) {
        let value = self.word(offset) | bits;
        self.set_raw(offset, value);
    }

    /// Raw stored contents, without read-side masking.
    pub fn word(&self, offset: u16) -> u32 {
        let desc = self.desc(offset);
        self.regs.borrow()[usize::from(desc.offset) / 4]
    }

    pub fn writes(&self) -> Vec<WriteOp> {
        self.writes.borrow().clone()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }

    pub fn barriers(&self) -> usize {
        self.barriers.get()
    }

    fn desc(&self, offset: u16) -> RegisterDesc {
        let word = offset & !0b11;
        Register::ALL
            .iter()
            .filter_map(|&r| map::resolve(r, self.variant))
            .find(|d| d.offset == word)
            .unwrap_or_else(|| {
                panic!(
                    "offset {offset:#x} is not an SCB register on {}",
                    self.variant.name()
                )
            })
    }

    fn is_priority_byte(&self, offset: u16) -> bool {
        self.variant.is_v7m_or_later() && (0x18..0x24).contains(&offset)
    }

    fn apply(&self, desc: &RegisterDesc, value: u32) {
        let reserved = value & desc.reserved_mask();
        assert_eq!(
            reserved,
            0,
            "write of {value:#010x} to {:?} sets reserved bits {reserved:#x}",
            desc.register,
        );

        if desc.mask_of(Access::Key) != 0 {
            if map::aircr::VECTKEY.extract(value) != map::aircr::KEY {
                // No key, no effect.
                return;
            }
            let reset =
                map::aircr::SYSRESETREQ.mask() | map::aircr::VECTRESET.mask();
            if value & reset != 0 {
                self.reset.set(Some(value));
            }
        }

        let mut regs = self.regs.borrow_mut();
        let slot = &mut regs[usize::from(desc.offset) / 4];
        let old = *slot;

        let rw = desc.mask_of(Access::ReadWrite);
        let mut new = (old & !rw) | (value & rw);
        new &= !(value & desc.mask_of(Access::WriteOneToClear));
        new |= value & desc.mask_of(Access::WriteOneToSet);

        if desc.register == Register::Icsr {
            if value & map::icsr::PENDSVCLR.mask() != 0 {
                new &= !map::icsr::PENDSVSET.mask();
            }
            if value & map::icsr::PENDSTCLR.mask() != 0 {
                new &= !map::icsr::PENDSTSET.mask();
            }
        }

        *slot = new;
    }
}

impl RegisterAccess for FakeScb {
    fn read(&self, offset: u16) -> u32 {
        assert_eq!(offset % 4, 0, "unaligned word read at {offset:#x}");
        let desc = self.desc(offset);
        let stored = self.word(offset);

        match desc.register {
            Register::Ccsidr => {
                let csselr = self.word(0x84);
                if map::csselr::IND.extract(csselr) != 0 {
                    CCSIDR_ICACHE
                } else {
                    CCSIDR_DCACHE
                }
            }
            _ => {
                let hidden = desc.mask_of(Access::WriteOnly)
                    | desc.mask_of(Access::Key)
                    | desc.reserved_mask();
                let mut value = stored & !hidden;
                if desc.mask_of(Access::Key) != 0 {
                    let status = map::aircr::KEY_STATUS;
                    value = map::aircr::VECTKEY.insert(value, status);
                }
                value
            }
        }
    }

    fn write(&self, offset: u16, value: u32) {
        assert_eq!(offset % 4, 0, "unaligned word write at {offset:#x}");
        let desc = self.desc(offset);
        self.writes.borrow_mut().push(WriteOp::Word { offset, value });
        self.apply(&desc, value);
    }

    fn read_byte(&self, offset: u16) -> u8 {
        assert!(
            self.is_priority_byte(offset),
            "byte read at {offset:#x} on {}",
            self.variant.name()
        );
        let shift = (offset % 4) * 8;
        (self.read(offset & !0b11) >> shift) as u8
    }

    fn write_byte(&self, offset: u16, value: u8) {
        assert!(
            self.is_priority_byte(offset),
            "byte write at {offset:#x} on {}",
            self.variant.name()
        );
        self.writes.borrow_mut().push(WriteOp::Byte { offset, value });

        let desc = self.desc(offset);
        let shift = (offset % 4) * 8;
        let lane = 0xFFu32 << shift;
        let merged = (self.word(offset) & !lane) | (u32::from(value) << shift);
        self.apply(&desc, merged);
    }

    fn barrier(&self) {
        self.barriers.set(self.barriers.get() + 1);
    }

    fn await_reset(&self) -> ! {
        match self.reset.get() {
            Some(aircr) => std::panic::panic_any(ResetRequested { aircr }),
            None => panic!("waiting for a reset that was never requested"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aircr_reads_key_status() {
        let fake = FakeScb::new(ArchVariant::V7M);
        assert_eq!(fake.read(0x0C) >> 16, 0xFA05);
    }

    #[test]
    fn unkeyed_aircr_write_is_ignored() {
        let fake = FakeScb::new(ArchVariant::V7M);
        fake.write(0x0C, 0x0000_0500);
        assert_eq!(map::aircr::PRIGROUP.extract(fake.read(0x0C)), 0);
        // It still shows up as issued.
        assert_eq!(
            fake.writes(),
            [WriteOp::Word {
                offset: 0x0C,
                value: 0x0000_0500
            }]
        );

        fake.write(0x0C, 0x05FA_0500);
        assert_eq!(map::aircr::PRIGROUP.extract(fake.read(0x0C)), 5);
    }

    #[test]
    fn write_one_to_clear() {
        let fake = FakeScb::new(ArchVariant::V7EM);
        fake.latch(0x28, 0b1000_0010);
        fake.write(0x28, 0b0000_0010);
        assert_eq!(fake.read(0x28), 0b1000_0000);
        fake.write(0x28, 0);
        assert_eq!(fake.read(0x28), 0b1000_0000);
    }

    #[test]
    fn read_only_fields_ignore_writes() {
        let fake = FakeScb::new(ArchVariant::V6M);
        // STKALIGN and UNALIGN_TRP are hardwired on ARMv6-M.
        fake.write(0x14, 0);
        assert_eq!(fake.read(0x14), 0x208);
    }

    #[test]
    fn pendsv_set_and_clear() {
        let fake = FakeScb::new(ArchVariant::V6M);
        fake.write(0x04, map::icsr::PENDSVSET.mask());
        assert_ne!(fake.read(0x04) & map::icsr::PENDSVSET.mask(), 0);
        fake.write(0x04, map::icsr::PENDSVCLR.mask());
        assert_eq!(fake.read(0x04), 0);
    }

    #[test]
    #[should_panic(expected = "reserved bits")]
    fn reserved_write_panics() {
        let fake = FakeScb::new(ArchVariant::V7M);
        fake.write(0x10, 1 << 0);
    }

    #[test]
    #[should_panic(expected = "not an SCB register")]
    fn absent_register_panics() {
        let fake = FakeScb::new(ArchVariant::V6M);
        fake.read(0x28);
    }

    #[test]
    #[should_panic(expected = "byte write")]
    fn v6m_priorities_are_word_only() {
        let fake = FakeScb::new(ArchVariant::V6M);
        fake.write_byte(0x1F, 0xC0);
    }

    #[test]
    fn priority_bytes_share_a_word() {
        let fake = FakeScb::new(ArchVariant::V7M);
        fake.write_byte(0x22, 0x40);
        fake.write_byte(0x23, 0x80);
        assert_eq!(fake.read(0x20), 0x8040_0000);
        assert_eq!(fake.read_byte(0x22), 0x40);
    }

    #[test]
    fn ccsidr_follows_csselr() {
        let fake = FakeScb::new(ArchVariant::V7EM);
        assert_eq!(fake.read(0x80), CCSIDR_DCACHE);
        fake.write(0x84, 1);
        assert_eq!(fake.read(0x80), CCSIDR_ICACHE);
    }
}
