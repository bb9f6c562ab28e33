// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The SCB register map, as data.
//!
//! Everything here is `const` and has no side effects. [`resolve`] answers
//! "what does register X look like on variant Y" for every pair, including
//! the ones where the answer is "it doesn't exist". [`regs`] holds the
//! descriptors for the variant this crate was built for; registers that
//! don't exist on that variant aren't in there, so naming one is a compile
//! error rather than a surprise at runtime.
//!
//! Offsets are relative to [`SCB_BASE`]. The cache maintenance and FP
//! registers live past the end of the "classic" SCB, in the wider System
//! Control Space, but they're addressed from the same base here to keep a
//! single coordinate system.

use crate::variant::ArchVariant;

/// Address of CPUID, the first SCB register.
pub const SCB_BASE: usize = 0xE000_ED00;

/// How software may touch a bitfield.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum Access {
    ReadOnly,
    ReadWrite,
    /// Writing 1 triggers an action; reads return 0.
    WriteOnly,
    /// Latched by hardware; writing 1 clears, writing 0 does nothing.
    WriteOneToClear,
    /// Writing 1 sets, writing 0 does nothing; reads return current state.
    WriteOneToSet,
    /// AIRCR's VECTKEY on write, VECTKEYSTAT on read.
    Key,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Width {
    Byte,
    Word,
}

impl Width {
    pub const fn bits(self) -> u8 {
        match self {
            Width::Byte => 8,
            Width::Word => 32,
        }
    }
}

/// A named bitfield within a register.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Field {
    pub name: &'static str,
    pub lsb: u8,
    pub width: u8,
    pub access: Access,
}

impl Field {
    pub const fn new(
        name: &'static str,
        lsb: u8,
        width: u8,
        access: Access,
    ) -> Self {
        Self {
            name,
            lsb,
            width,
            access,
        }
    }

    /// Shorthand for single-bit fields, which are most of them.
    pub const fn bit(name: &'static str, lsb: u8, access: Access) -> Self {
        Self::new(name, lsb, 1, access)
    }

    /// The field's bits, in position.
    pub const fn mask(&self) -> u32 {
        let ones = if self.width >= 32 {
            u32::MAX
        } else {
            (1 << self.width) - 1
        };
        ones << self.lsb
    }

    /// Pulls this field's value out of a register value, shifted down.
    pub const fn extract(&self, register: u32) -> u32 {
        (register & self.mask()) >> self.lsb
    }

    /// Replaces this field in `register` with `value`, leaving every other
    /// bit alone. Bits of `value` that don't fit are dropped.
    pub const fn insert(&self, register: u32, value: u32) -> u32 {
        (register & !self.mask()) | ((value << self.lsb) & self.mask())
    }
}

/// Every register the map knows about, on any variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Register {
    Cpuid,
    Icsr,
    Vtor,
    Aircr,
    Scr,
    Ccr,
    Shpr1,
    Shpr2,
    Shpr3,
    Shcsr,
    Cfsr,
    Hfsr,
    Dfsr,
    Mmfar,
    Bfar,
    Afsr,
    IdPfr0,
    IdPfr1,
    IdDfr0,
    IdAfr0,
    IdMmfr0,
    IdMmfr1,
    IdMmfr2,
    IdMmfr3,
    IdIsar0,
    IdIsar1,
    IdIsar2,
    IdIsar3,
    IdIsar4,
    Clidr,
    Ctr,
    Ccsidr,
    Csselr,
    Cpacr,
    Fpccr,
    Fpcar,
    Fpdscr,
    Mvfr0,
    Mvfr1,
    Iciallu,
    Icimvau,
    Dcimvac,
    Dcisw,
    Dccmvau,
    Dccmvac,
    Dccsw,
    Dccimvac,
    Dccisw,
    Bpiall,
}

impl Register {
    pub const ALL: [Register; 49] = [
        Register::Cpuid,
        Register::Icsr,
        Register::Vtor,
        Register::Aircr,
        Register::Scr,
        Register::Ccr,
        Register::Shpr1,
        Register::Shpr2,
        Register::Shpr3,
        Register::Shcsr,
        Register::Cfsr,
        Register::Hfsr,
        Register::Dfsr,
        Register::Mmfar,
        Register::Bfar,
        Register::Afsr,
        Register::IdPfr0,
        Register::IdPfr1,
        Register::IdDfr0,
        Register::IdAfr0,
        Register::IdMmfr0,
        Register::IdMmfr1,
        Register::IdMmfr2,
        Register::IdMmfr3,
        Register::IdIsar0,
        Register::IdIsar1,
        Register::IdIsar2,
        Register::IdIsar3,
        Register::IdIsar4,
        Register::Clidr,
        Register::Ctr,
        Register::Ccsidr,
        Register::Csselr,
        Register::Cpacr,
        Register::Fpccr,
        Register::Fpcar,
        Register::Fpdscr,
        Register::Mvfr0,
        Register::Mvfr1,
        Register::Iciallu,
        Register::Icimvau,
        Register::Dcimvac,
        Register::Dcisw,
        Register::Dccmvau,
        Register::Dccmvac,
        Register::Dccsw,
        Register::Dccimvac,
        Register::Dccisw,
        Register::Bpiall,
    ];
}

/// What a register looks like on a particular variant.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct RegisterDesc {
    pub register: Register,
    pub offset: u16,
    pub width: Width,
    pub fields: &'static [Field],
}

impl RegisterDesc {
    pub const fn address(&self) -> usize {
        SCB_BASE + self.offset as usize
    }

    /// Bits covered by some field.
    pub const fn defined_mask(&self) -> u32 {
        let mut mask = 0;
        let mut i = 0;
        while i < self.fields.len() {
            mask |= self.fields[i].mask();
            i += 1;
        }
        mask
    }

    /// Bits software must never set.
    pub const fn reserved_mask(&self) -> u32 {
        !self.defined_mask()
    }

    /// Bits belonging to fields with the given access kind.
    pub const fn mask_of(&self, access: Access) -> u32 {
        let mut mask = 0;
        let mut i = 0;
        while i < self.fields.len() {
            if self.fields[i].access as u8 == access as u8 {
                mask |= self.fields[i].mask();
            }
            i += 1;
        }
        mask
    }

    pub fn field(&self, name: &str) -> Option<&'static Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

/// Looks up `register` on `variant`, or `None` if it doesn't exist there.
pub const fn resolve(
    register: Register,
    variant: ArchVariant,
) -> Option<RegisterDesc> {
    use Register as R;

    let v7 = variant.is_v7m_or_later();
    let v7em = variant.has_cache_maintenance();

    let (offset, fields): (u16, &'static [Field]) = match register {
        R::Cpuid => (0x00, cpuid::FIELDS),
        R::Icsr if v7 => (0x04, icsr::FIELDS_V7M),
        R::Icsr => (0x04, icsr::FIELDS_V6M),
        R::Vtor if v7 => (0x08, vtor::FIELDS_V7M),
        R::Vtor => (0x08, vtor::FIELDS_V6M),
        R::Aircr if v7 => (0x0C, aircr::FIELDS_V7M),
        R::Aircr => (0x0C, aircr::FIELDS_V6M),
        R::Scr => (0x10, scr::FIELDS),
        R::Ccr if v7em => (0x14, ccr::FIELDS_V7EM),
        R::Ccr if v7 => (0x14, ccr::FIELDS_V7M),
        R::Ccr => (0x14, ccr::FIELDS_V6M),
        R::Shpr1 if v7 => (0x18, shpr::SHPR1_V7M),
        R::Shpr2 if v7 => (0x1C, shpr::SHPR2_V7M),
        R::Shpr2 => (0x1C, shpr::SHPR2_V6M),
        R::Shpr3 if v7 => (0x20, shpr::SHPR3_V7M),
        R::Shpr3 => (0x20, shpr::SHPR3_V6M),
        R::Shcsr if v7 => (0x24, shcsr::FIELDS_V7M),
        R::Shcsr => (0x24, shcsr::FIELDS_V6M),
        R::Cfsr if v7em => (0x28, cfsr::FIELDS_V7EM),
        R::Cfsr if v7 => (0x28, cfsr::FIELDS_V7M),
        R::Hfsr if v7 => (0x2C, hfsr::FIELDS),
        R::Dfsr => (0x30, dfsr::FIELDS),
        R::Mmfar if v7 => (0x34, address::FIELDS),
        R::Bfar if v7 => (0x38, address::FIELDS),
        R::Afsr if v7 => (0x3C, afsr::FIELDS),
        R::IdPfr0 if v7 => (0x40, id::FIELDS),
        R::IdPfr1 if v7 => (0x44, id::FIELDS),
        R::IdDfr0 if v7 => (0x48, id::FIELDS),
        R::IdAfr0 if v7 => (0x4C, id::FIELDS),
        R::IdMmfr0 if v7 => (0x50, id::FIELDS),
        R::IdMmfr1 if v7 => (0x54, id::FIELDS),
        R::IdMmfr2 if v7 => (0x58, id::FIELDS),
        R::IdMmfr3 if v7 => (0x5C, id::FIELDS),
        R::IdIsar0 if v7 => (0x60, id::FIELDS),
        R::IdIsar1 if v7 => (0x64, id::FIELDS),
        R::IdIsar2 if v7 => (0x68, id::FIELDS),
        R::IdIsar3 if v7 => (0x6C, id::FIELDS),
        R::IdIsar4 if v7 => (0x70, id::FIELDS),
        R::Clidr if v7em => (0x78, clidr::FIELDS),
        R::Ctr if v7em => (0x7C, ctr::FIELDS),
        R::Ccsidr if v7em => (0x80, ccsidr::FIELDS),
        R::Csselr if v7em => (0x84, csselr::FIELDS),
        R::Cpacr if v7 => (0x88, cpacr::FIELDS),
        R::Fpccr if v7 => (0x234, fpccr::FIELDS),
        R::Fpcar if v7 => (0x238, fpcar::FIELDS),
        R::Fpdscr if v7 => (0x23C, fpdscr::FIELDS),
        R::Mvfr0 if v7 => (0x240, id::FIELDS),
        R::Mvfr1 if v7 => (0x244, id::FIELDS),
        R::Iciallu if v7em => (0x250, maintenance::IGNORED),
        R::Icimvau if v7em => (0x258, maintenance::BY_ADDRESS),
        R::Dcimvac if v7em => (0x25C, maintenance::BY_ADDRESS),
        R::Dcisw if v7em => (0x260, maintenance::BY_SET_WAY),
        R::Dccmvau if v7em => (0x264, maintenance::BY_ADDRESS),
        R::Dccmvac if v7em => (0x268, maintenance::BY_ADDRESS),
        R::Dccsw if v7em => (0x26C, maintenance::BY_SET_WAY),
        R::Dccimvac if v7em => (0x270, maintenance::BY_ADDRESS),
        R::Dccisw if v7em => (0x274, maintenance::BY_SET_WAY),
        R::Bpiall if v7em => (0x278, maintenance::IGNORED),
        _ => return None,
    };

    Some(RegisterDesc {
        register,
        offset,
        width: Width::Word,
        fields,
    })
}

/// Looks up `register` on the configured variant. Only called to initialize
/// the `regs` constants, so a register the variant doesn't have fails the
/// build.
const fn require(register: Register) -> RegisterDesc {
    match resolve(register, ArchVariant::CURRENT) {
        Some(desc) => desc,
        None => panic!("register does not exist on this architecture variant"),
    }
}

/// Descriptors for the configured variant.
pub mod regs {
    use super::{require, Register, RegisterDesc};

    pub const CPUID: RegisterDesc = require(Register::Cpuid);
    pub const ICSR: RegisterDesc = require(Register::Icsr);
    pub const VTOR: RegisterDesc = require(Register::Vtor);
    pub const AIRCR: RegisterDesc = require(Register::Aircr);
    pub const SCR: RegisterDesc = require(Register::Scr);
    pub const CCR: RegisterDesc = require(Register::Ccr);
    #[cfg(armv7m)]
    pub const SHPR1: RegisterDesc = require(Register::Shpr1);
    pub const SHPR2: RegisterDesc = require(Register::Shpr2);
    pub const SHPR3: RegisterDesc = require(Register::Shpr3);
    pub const SHCSR: RegisterDesc = require(Register::Shcsr);
    pub const DFSR: RegisterDesc = require(Register::Dfsr);

    #[cfg(armv7m)]
    pub const CFSR: RegisterDesc = require(Register::Cfsr);
    #[cfg(armv7m)]
    pub const HFSR: RegisterDesc = require(Register::Hfsr);
    #[cfg(armv7m)]
    pub const MMFAR: RegisterDesc = require(Register::Mmfar);
    #[cfg(armv7m)]
    pub const BFAR: RegisterDesc = require(Register::Bfar);
    #[cfg(armv7m)]
    pub const AFSR: RegisterDesc = require(Register::Afsr);
    #[cfg(armv7m)]
    pub const CPACR: RegisterDesc = require(Register::Cpacr);
    #[cfg(armv7m)]
    pub const FPCCR: RegisterDesc = require(Register::Fpccr);
    #[cfg(armv7m)]
    pub const FPCAR: RegisterDesc = require(Register::Fpcar);
    #[cfg(armv7m)]
    pub const FPDSCR: RegisterDesc = require(Register::Fpdscr);

    #[cfg(armv7em)]
    pub const CLIDR: RegisterDesc = require(Register::Clidr);
    #[cfg(armv7em)]
    pub const CTR: RegisterDesc = require(Register::Ctr);
    #[cfg(armv7em)]
    pub const CCSIDR: RegisterDesc = require(Register::Ccsidr);
    #[cfg(armv7em)]
    pub const CSSELR: RegisterDesc = require(Register::Csselr);
    #[cfg(armv7em)]
    pub const ICIALLU: RegisterDesc = require(Register::Iciallu);
    #[cfg(armv7em)]
    pub const DCIMVAC: RegisterDesc = require(Register::Dcimvac);
    #[cfg(armv7em)]
    pub const DCISW: RegisterDesc = require(Register::Dcisw);
    #[cfg(armv7em)]
    pub const DCCMVAC: RegisterDesc = require(Register::Dccmvac);
    #[cfg(armv7em)]
    pub const DCCSW: RegisterDesc = require(Register::Dccsw);
    #[cfg(armv7em)]
    pub const DCCIMVAC: RegisterDesc = require(Register::Dccimvac);
    #[cfg(armv7em)]
    pub const DCCISW: RegisterDesc = require(Register::Dccisw);
    #[cfg(armv7em)]
    pub const BPIALL: RegisterDesc = require(Register::Bpiall);
}

pub mod cpuid {
    use super::{Access::ReadOnly, Field};

    pub const IMPLEMENTER: Field = Field::new("IMPLEMENTER", 24, 8, ReadOnly);
    pub const VARIANT: Field = Field::new("VARIANT", 20, 4, ReadOnly);
    /// Reads as 0xC on ARMv6-M and 0xF on ARMv7-M.
    pub const ARCHITECTURE: Field =
        Field::new("ARCHITECTURE", 16, 4, ReadOnly);
    pub const PARTNO: Field = Field::new("PARTNO", 4, 12, ReadOnly);
    pub const REVISION: Field = Field::new("REVISION", 0, 4, ReadOnly);

    pub(super) const FIELDS: &[Field] =
        &[IMPLEMENTER, VARIANT, ARCHITECTURE, PARTNO, REVISION];
}

pub mod icsr {
    use super::{Access::*, Field};

    pub const NMIPENDSET: Field = Field::bit("NMIPENDSET", 31, WriteOneToSet);
    pub const PENDSVSET: Field = Field::bit("PENDSVSET", 28, WriteOneToSet);
    pub const PENDSVCLR: Field = Field::bit("PENDSVCLR", 27, WriteOnly);
    pub const PENDSTSET: Field = Field::bit("PENDSTSET", 26, WriteOneToSet);
    pub const PENDSTCLR: Field = Field::bit("PENDSTCLR", 25, WriteOnly);
    pub const ISRPREEMPT: Field = Field::bit("ISRPREEMPT", 23, ReadOnly);
    pub const ISRPENDING: Field = Field::bit("ISRPENDING", 22, ReadOnly);
    pub const VECTPENDING: Field = Field::new("VECTPENDING", 12, 9, ReadOnly);
    pub const RETTOBASE: Field = Field::bit("RETTOBASE", 11, ReadOnly);
    pub const VECTACTIVE: Field = Field::new("VECTACTIVE", 0, 9, ReadOnly);

    pub(super) const FIELDS_V6M: &[Field] = &[
        NMIPENDSET,
        PENDSVSET,
        PENDSVCLR,
        PENDSTSET,
        PENDSTCLR,
        ISRPREEMPT,
        ISRPENDING,
        VECTPENDING,
        VECTACTIVE,
    ];
    pub(super) const FIELDS_V7M: &[Field] = &[
        NMIPENDSET,
        PENDSVSET,
        PENDSVCLR,
        PENDSTSET,
        PENDSTCLR,
        ISRPREEMPT,
        ISRPENDING,
        VECTPENDING,
        RETTOBASE,
        VECTACTIVE,
    ];
}

pub mod vtor {
    use super::{Access::ReadWrite, Field};

    /// ARMv6-M keeps the table offset in bits 31:7.
    pub const TBLOFF_V6M: Field = Field::new("TBLOFF", 7, 25, ReadWrite);
    /// ARMv7-M and later keep it in bits 31:9.
    pub const TBLOFF_V7M: Field = Field::new("TBLOFF", 9, 23, ReadWrite);

    #[cfg(armv7m)]
    pub const TBLOFF: Field = TBLOFF_V7M;
    #[cfg(armv6m)]
    pub const TBLOFF: Field = TBLOFF_V6M;

    pub(super) const FIELDS_V6M: &[Field] = &[TBLOFF_V6M];
    pub(super) const FIELDS_V7M: &[Field] = &[TBLOFF_V7M];
}

pub mod aircr {
    use super::{Access::*, Field};

    /// Must be in bits 31:16 of every AIRCR write, or hardware drops it.
    pub const KEY: u32 = 0x05FA;
    /// What bits 31:16 read back as.
    pub const KEY_STATUS: u32 = 0xFA05;

    pub const VECTKEY: Field = Field::new("VECTKEY", 16, 16, Key);
    pub const ENDIANNESS: Field = Field::bit("ENDIANNESS", 15, ReadOnly);
    pub const PRIGROUP: Field = Field::new("PRIGROUP", 8, 3, ReadWrite);
    pub const SYSRESETREQ: Field = Field::bit("SYSRESETREQ", 2, WriteOnly);
    pub const VECTCLRACTIVE: Field =
        Field::bit("VECTCLRACTIVE", 1, WriteOnly);
    pub const VECTRESET: Field = Field::bit("VECTRESET", 0, WriteOnly);

    /// Puts the key on the low half-word `bits`.
    pub const fn keyed(bits: u32) -> u32 {
        VECTKEY.insert(bits, KEY)
    }

    pub(super) const FIELDS_V6M: &[Field] =
        &[VECTKEY, ENDIANNESS, SYSRESETREQ, VECTCLRACTIVE];
    pub(super) const FIELDS_V7M: &[Field] = &[
        VECTKEY,
        ENDIANNESS,
        PRIGROUP,
        SYSRESETREQ,
        VECTCLRACTIVE,
        VECTRESET,
    ];
}

pub mod scr {
    use super::{Access::ReadWrite, Field};

    pub const SEVONPEND: Field = Field::bit("SEVONPEND", 4, ReadWrite);
    pub const SLEEPDEEP: Field = Field::bit("SLEEPDEEP", 2, ReadWrite);
    pub const SLEEPONEXIT: Field = Field::bit("SLEEPONEXIT", 1, ReadWrite);

    pub(super) const FIELDS: &[Field] = &[SEVONPEND, SLEEPDEEP, SLEEPONEXIT];
}

pub mod ccr {
    use super::{Access::*, Field};

    pub const BP: Field = Field::bit("BP", 18, ReadWrite);
    pub const IC: Field = Field::bit("IC", 17, ReadWrite);
    pub const DC: Field = Field::bit("DC", 16, ReadWrite);
    pub const STKALIGN: Field = Field::bit("STKALIGN", 9, ReadWrite);
    pub const BFHFNMIGN: Field = Field::bit("BFHFNMIGN", 8, ReadWrite);
    pub const DIV_0_TRP: Field = Field::bit("DIV_0_TRP", 4, ReadWrite);
    pub const UNALIGN_TRP: Field = Field::bit("UNALIGN_TRP", 3, ReadWrite);
    pub const USERSETMPEND: Field = Field::bit("USERSETMPEND", 1, ReadWrite);
    pub const NONBASETHRDENA: Field =
        Field::bit("NONBASETHRDENA", 0, ReadWrite);

    // Both are hardwired to 1 on ARMv6-M.
    const STKALIGN_V6M: Field = Field::bit("STKALIGN", 9, ReadOnly);
    const UNALIGN_TRP_V6M: Field = Field::bit("UNALIGN_TRP", 3, ReadOnly);

    pub(super) const FIELDS_V6M: &[Field] = &[STKALIGN_V6M, UNALIGN_TRP_V6M];
    pub(super) const FIELDS_V7M: &[Field] = &[
        STKALIGN,
        BFHFNMIGN,
        DIV_0_TRP,
        UNALIGN_TRP,
        USERSETMPEND,
        NONBASETHRDENA,
    ];
    pub(super) const FIELDS_V7EM: &[Field] = &[
        BP,
        IC,
        DC,
        STKALIGN,
        BFHFNMIGN,
        DIV_0_TRP,
        UNALIGN_TRP,
        USERSETMPEND,
        NONBASETHRDENA,
    ];
}

/// System handler priority registers. Field names are `PRI_n`, for exception
/// number `n`.
pub mod shpr {
    use super::{Access::ReadWrite, Field};

    const fn byte(name: &'static str, lane: u8) -> Field {
        Field::new(name, lane * 8, 8, ReadWrite)
    }

    // ARMv6-M implements only the top two bits of each lane.
    const fn top2(name: &'static str, lane: u8) -> Field {
        Field::new(name, lane * 8 + 6, 2, ReadWrite)
    }

    pub(super) const SHPR1_V7M: &[Field] =
        &[byte("PRI_4", 0), byte("PRI_5", 1), byte("PRI_6", 2)];
    pub(super) const SHPR2_V7M: &[Field] = &[byte("PRI_11", 3)];
    pub(super) const SHPR3_V7M: &[Field] =
        &[byte("PRI_12", 0), byte("PRI_14", 2), byte("PRI_15", 3)];

    pub(super) const SHPR2_V6M: &[Field] = &[top2("PRI_11", 3)];
    pub(super) const SHPR3_V6M: &[Field] =
        &[top2("PRI_14", 2), top2("PRI_15", 3)];
}

pub mod shcsr {
    use super::{Access::ReadWrite, Field};

    pub const USGFAULTENA: Field = Field::bit("USGFAULTENA", 18, ReadWrite);
    pub const BUSFAULTENA: Field = Field::bit("BUSFAULTENA", 17, ReadWrite);
    pub const MEMFAULTENA: Field = Field::bit("MEMFAULTENA", 16, ReadWrite);
    pub const SVCALLPENDED: Field = Field::bit("SVCALLPENDED", 15, ReadWrite);
    pub const BUSFAULTPENDED: Field =
        Field::bit("BUSFAULTPENDED", 14, ReadWrite);
    pub const MEMFAULTPENDED: Field =
        Field::bit("MEMFAULTPENDED", 13, ReadWrite);
    pub const USGFAULTPENDED: Field =
        Field::bit("USGFAULTPENDED", 12, ReadWrite);
    pub const SYSTICKACT: Field = Field::bit("SYSTICKACT", 11, ReadWrite);
    pub const PENDSVACT: Field = Field::bit("PENDSVACT", 10, ReadWrite);
    pub const MONITORACT: Field = Field::bit("MONITORACT", 8, ReadWrite);
    pub const SVCALLACT: Field = Field::bit("SVCALLACT", 7, ReadWrite);
    pub const USGFAULTACT: Field = Field::bit("USGFAULTACT", 3, ReadWrite);
    pub const BUSFAULTACT: Field = Field::bit("BUSFAULTACT", 1, ReadWrite);
    pub const MEMFAULTACT: Field = Field::bit("MEMFAULTACT", 0, ReadWrite);

    /// The four pended-exception bits, 15:12.
    pub const PENDED: u32 = SVCALLPENDED.mask()
        | BUSFAULTPENDED.mask()
        | MEMFAULTPENDED.mask()
        | USGFAULTPENDED.mask();

    pub(super) const FIELDS_V6M: &[Field] = &[SVCALLPENDED];
    pub(super) const FIELDS_V7M: &[Field] = &[
        USGFAULTENA,
        BUSFAULTENA,
        MEMFAULTENA,
        SVCALLPENDED,
        BUSFAULTPENDED,
        MEMFAULTPENDED,
        USGFAULTPENDED,
        SYSTICKACT,
        PENDSVACT,
        MONITORACT,
        SVCALLACT,
        USGFAULTACT,
        BUSFAULTACT,
        MEMFAULTACT,
    ];
}

// The bit-level view of the fault status registers lives in `crate::fault`.
mod cfsr {
    use super::{Access::WriteOneToClear, Field};

    const fn w1c(name: &'static str, lsb: u8) -> Field {
        Field::bit(name, lsb, WriteOneToClear)
    }

    pub(super) const FIELDS_V7M: &[Field] = &[
        w1c("IACCVIOL", 0),
        w1c("DACCVIOL", 1),
        w1c("MUNSTKERR", 3),
        w1c("MSTKERR", 4),
        w1c("MMARVALID", 7),
        w1c("IBUSERR", 8),
        w1c("PRECISERR", 9),
        w1c("IMPRECISERR", 10),
        w1c("UNSTKERR", 11),
        w1c("STKERR", 12),
        w1c("BFARVALID", 15),
        w1c("UNDEFINSTR", 16),
        w1c("INVSTATE", 17),
        w1c("INVPC", 18),
        w1c("NOCP", 19),
        w1c("UNALIGNED", 24),
        w1c("DIVBYZERO", 25),
    ];
    // Plus the lazy FP state preservation errors.
    pub(super) const FIELDS_V7EM: &[Field] = &[
        w1c("IACCVIOL", 0),
        w1c("DACCVIOL", 1),
        w1c("MUNSTKERR", 3),
        w1c("MSTKERR", 4),
        w1c("MLSPERR", 5),
        w1c("MMARVALID", 7),
        w1c("IBUSERR", 8),
        w1c("PRECISERR", 9),
        w1c("IMPRECISERR", 10),
        w1c("UNSTKERR", 11),
        w1c("STKERR", 12),
        w1c("LSPERR", 13),
        w1c("BFARVALID", 15),
        w1c("UNDEFINSTR", 16),
        w1c("INVSTATE", 17),
        w1c("INVPC", 18),
        w1c("NOCP", 19),
        w1c("UNALIGNED", 24),
        w1c("DIVBYZERO", 25),
    ];
}

mod hfsr {
    use super::{Access::WriteOneToClear, Field};

    pub(super) const FIELDS: &[Field] = &[
        Field::bit("VECTTBL", 1, WriteOneToClear),
        Field::bit("FORCED", 30, WriteOneToClear),
        Field::bit("DEBUGEVT", 31, WriteOneToClear),
    ];
}

mod dfsr {
    use super::{Access::WriteOneToClear, Field};

    pub(super) const FIELDS: &[Field] = &[
        Field::bit("HALTED", 0, WriteOneToClear),
        Field::bit("BKPT", 1, WriteOneToClear),
        Field::bit("DWTTRAP", 2, WriteOneToClear),
        Field::bit("VCATCH", 3, WriteOneToClear),
        Field::bit("EXTERNAL", 4, WriteOneToClear),
    ];
}

/// MMFAR and BFAR.
mod address {
    use super::{Access::ReadWrite, Field};

    pub(super) const FIELDS: &[Field] =
        &[Field::new("ADDRESS", 0, 32, ReadWrite)];
}

mod afsr {
    use super::{Access::WriteOneToClear, Field};

    // Contents are implementation defined. Every core that implements any of
    // it latches and clears it like the other status registers.
    pub(super) const FIELDS: &[Field] =
        &[Field::new("IMPDEF", 0, 32, WriteOneToClear)];
}

/// Feature identification registers, which we don't pick apart.
mod id {
    use super::{Access::ReadOnly, Field};

    pub(super) const FIELDS: &[Field] = &[Field::new("VALUE", 0, 32, ReadOnly)];
}

pub mod clidr {
    use super::{Access::ReadOnly, Field};

    pub const LOUU: Field = Field::new("LOUU", 27, 3, ReadOnly);
    pub const LOC: Field = Field::new("LOC", 24, 3, ReadOnly);
    pub const LOUIS: Field = Field::new("LOUIS", 21, 3, ReadOnly);
    pub const CTYPE1: Field = Field::new("CTYPE1", 0, 3, ReadOnly);

    pub(super) const FIELDS: &[Field] = &[LOUU, LOC, LOUIS, CTYPE1];
}

pub mod ctr {
    use super::{Access::ReadOnly, Field};

    pub const FORMAT: Field = Field::new("FORMAT", 29, 3, ReadOnly);
    pub const CWG: Field = Field::new("CWG", 24, 4, ReadOnly);
    pub const ERG: Field = Field::new("ERG", 20, 4, ReadOnly);
    /// Log2 of the number of words in the smallest data cache line.
    pub const DMINLINE: Field = Field::new("DMINLINE", 16, 4, ReadOnly);
    /// Log2 of the number of words in the smallest instruction cache line.
    pub const IMINLINE: Field = Field::new("IMINLINE", 0, 4, ReadOnly);

    pub(super) const FIELDS: &[Field] = &[FORMAT, CWG, ERG, DMINLINE, IMINLINE];
}

pub mod ccsidr {
    use super::{Access::ReadOnly, Field};

    pub const WT: Field = Field::bit("WT", 31, ReadOnly);
    pub const WB: Field = Field::bit("WB", 30, ReadOnly);
    pub const RA: Field = Field::bit("RA", 29, ReadOnly);
    pub const WA: Field = Field::bit("WA", 28, ReadOnly);
    /// Number of sets, minus one.
    pub const NUMSETS: Field = Field::new("NUMSETS", 13, 15, ReadOnly);
    /// Number of ways, minus one.
    pub const ASSOCIATIVITY: Field =
        Field::new("ASSOCIATIVITY", 3, 10, ReadOnly);
    /// Log2 of the line length in words, minus two.
    pub const LINESIZE: Field = Field::new("LINESIZE", 0, 3, ReadOnly);

    pub(super) const FIELDS: &[Field] =
        &[WT, WB, RA, WA, NUMSETS, ASSOCIATIVITY, LINESIZE];
}

pub mod csselr {
    use super::{Access::ReadWrite, Field};

    pub const LEVEL: Field = Field::new("LEVEL", 1, 3, ReadWrite);
    /// 1 selects the instruction cache, 0 the data (or unified) cache.
    pub const IND: Field = Field::bit("IND", 0, ReadWrite);

    pub(super) const FIELDS: &[Field] = &[LEVEL, IND];
}

pub mod cpacr {
    use super::{Access::ReadWrite, Field};

    pub const CP10: Field = Field::new("CP10", 20, 2, ReadWrite);
    pub const CP11: Field = Field::new("CP11", 22, 2, ReadWrite);

    /// Access-denied encoding for a coprocessor field.
    pub const NONE: u32 = 0;
    /// Privileged-only encoding.
    pub const PRIV: u32 = 1;
    /// Full-access encoding.
    pub const FULL: u32 = 3;

    pub(super) const FIELDS: &[Field] = &[CP10, CP11];
}

pub mod fpccr {
    use super::{Access::ReadWrite, Field};

    pub const ASPEN: Field = Field::bit("ASPEN", 31, ReadWrite);
    pub const LSPEN: Field = Field::bit("LSPEN", 30, ReadWrite);
    pub const MONRDY: Field = Field::bit("MONRDY", 8, ReadWrite);
    pub const BFRDY: Field = Field::bit("BFRDY", 6, ReadWrite);
    pub const MMRDY: Field = Field::bit("MMRDY", 5, ReadWrite);
    pub const HFRDY: Field = Field::bit("HFRDY", 4, ReadWrite);
    pub const THREAD: Field = Field::bit("THREAD", 3, ReadWrite);
    pub const USER: Field = Field::bit("USER", 1, ReadWrite);
    pub const LSPACT: Field = Field::bit("LSPACT", 0, ReadWrite);

    pub(super) const FIELDS: &[Field] = &[
        ASPEN, LSPEN, MONRDY, BFRDY, MMRDY, HFRDY, THREAD, USER, LSPACT,
    ];
}

mod fpcar {
    use super::{Access::ReadWrite, Field};

    pub(super) const FIELDS: &[Field] =
        &[Field::new("ADDRESS", 3, 29, ReadWrite)];
}

mod fpdscr {
    use super::{Access::ReadWrite, Field};

    pub(super) const FIELDS: &[Field] = &[
        Field::bit("AHP", 26, ReadWrite),
        Field::bit("DN", 25, ReadWrite),
        Field::bit("FZ", 24, ReadWrite),
        Field::new("RMODE", 22, 2, ReadWrite),
    ];
}

/// Cache and branch predictor maintenance operations. All write-only.
pub mod maintenance {
    use super::{Access::WriteOnly, Field};

    pub const ADDRESS: Field = Field::new("ADDRESS", 0, 32, WriteOnly);
    /// Way, at the top of the word. Two bits covers the 4-way caches on the
    /// parts that have any.
    pub const WAY: Field = Field::new("WAY", 30, 2, WriteOnly);
    pub const SET: Field = Field::new("SET", 5, 9, WriteOnly);
    pub const LEVEL: Field = Field::new("LEVEL", 1, 3, WriteOnly);

    // Value written is ignored.
    pub(super) const IGNORED: &[Field] =
        &[Field::new("IGNORED", 0, 32, WriteOnly)];
    pub(super) const BY_ADDRESS: &[Field] = &[ADDRESS];
    pub(super) const BY_SET_WAY: &[Field] = &[WAY, SET, LEVEL];
}

/// System exceptions whose priority is set through SHPR1..3.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum SystemHandler {
    #[cfg(armv7m)]
    MemoryManagement = 4,
    #[cfg(armv7m)]
    BusFault = 5,
    #[cfg(armv7m)]
    UsageFault = 6,
    SvCall = 11,
    #[cfg(armv7m)]
    DebugMonitor = 12,
    PendSv = 14,
    SysTick = 15,
}

impl SystemHandler {
    pub const fn exception_number(self) -> u8 {
        self as u8
    }

    /// Where this handler's priority lives on the configured variant.
    pub const fn priority_slot(self) -> PrioritySlot {
        // Every arm is evaluated at compile time, so a handler without a
        // slot on this variant is a build error.
        match self {
            #[cfg(armv7m)]
            SystemHandler::MemoryManagement => {
                const { slot_on_current(SystemHandler::MemoryManagement) }
            }
            #[cfg(armv7m)]
            SystemHandler::BusFault => {
                const { slot_on_current(SystemHandler::BusFault) }
            }
            #[cfg(armv7m)]
            SystemHandler::UsageFault => {
                const { slot_on_current(SystemHandler::UsageFault) }
            }
            SystemHandler::SvCall => {
                const { slot_on_current(SystemHandler::SvCall) }
            }
            #[cfg(armv7m)]
            SystemHandler::DebugMonitor => {
                const { slot_on_current(SystemHandler::DebugMonitor) }
            }
            SystemHandler::PendSv => {
                const { slot_on_current(SystemHandler::PendSv) }
            }
            SystemHandler::SysTick => {
                const { slot_on_current(SystemHandler::SysTick) }
            }
        }
    }
}

const fn slot_on_current(handler: SystemHandler) -> PrioritySlot {
    match handler_priority_slot(handler, ArchVariant::CURRENT) {
        Some(slot) => slot,
        None => panic!("system handler has no priority on this variant"),
    }
}

/// Location of one system handler's priority.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PrioritySlot {
    /// Offset of the unit to access, which is the byte itself on ARMv7-M and
    /// the containing word on ARMv6-M.
    pub offset: u16,
    pub width: Width,
    /// Position of the implemented bits within that unit.
    pub lsb: u8,
    /// Number of implemented bits. These are always the top bits of the
    /// priority byte.
    pub bits: u8,
}

impl PrioritySlot {
    pub const fn field(&self) -> Field {
        Field::new("PRI", self.lsb, self.bits, Access::ReadWrite)
    }
}

/// Finds a handler's priority on `variant`.
///
/// ARMv7-M priority registers are byte-addressable, so each handler gets its
/// own byte. ARMv6-M only supports word access to SHPR2/SHPR3 and implements
/// just the top two bits of each byte lane; it has no configurable priority
/// for the fault handlers or the debug monitor.
pub const fn handler_priority_slot(
    handler: SystemHandler,
    variant: ArchVariant,
) -> Option<PrioritySlot> {
    let n = handler.exception_number() as u16;
    if variant.is_v7m_or_later() {
        Some(PrioritySlot {
            offset: 0x18 + (n - 4),
            width: Width::Byte,
            lsb: 0,
            bits: 8,
        })
    } else if matches!(
        handler,
        SystemHandler::SvCall | SystemHandler::PendSv | SystemHandler::SysTick
    ) {
        let lane = (n - 4) % 4;
        Some(PrioritySlot {
            offset: 0x18 + (n - 4) / 4 * 4,
            width: Width::Word,
            lsb: lane as u8 * 8 + 6,
            bits: 2,
        })
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offset(r: Register, v: ArchVariant) -> Option<u16> {
        resolve(r, v).map(|d| d.offset)
    }

    #[test]
    fn golden_offsets() {
        use Register as R;
        let table: &[(Register, u16)] = &[
            (R::Cpuid, 0x00),
            (R::Icsr, 0x04),
            (R::Vtor, 0x08),
            (R::Aircr, 0x0C),
            (R::Scr, 0x10),
            (R::Ccr, 0x14),
            (R::Shpr1, 0x18),
            (R::Shpr2, 0x1C),
            (R::Shpr3, 0x20),
            (R::Shcsr, 0x24),
            (R::Cfsr, 0x28),
            (R::Hfsr, 0x2C),
            (R::Dfsr, 0x30),
            (R::Mmfar, 0x34),
            (R::Bfar, 0x38),
            (R::Afsr, 0x3C),
            (R::IdPfr0, 0x40),
            (R::IdPfr1, 0x44),
            (R::IdDfr0, 0x48),
            (R::IdAfr0, 0x4C),
            (R::IdMmfr0, 0x50),
            (R::IdMmfr1, 0x54),
            (R::IdMmfr2, 0x58),
            (R::IdMmfr3, 0x5C),
            (R::IdIsar0, 0x60),
            (R::IdIsar1, 0x64),
            (R::IdIsar2, 0x68),
            (R::IdIsar3, 0x6C),
            (R::IdIsar4, 0x70),
            (R::Clidr, 0x78),
            (R::Ctr, 0x7C),
            (R::Ccsidr, 0x80),
            (R::Csselr, 0x84),
            (R::Cpacr, 0x88),
            (R::Fpccr, 0x234),
            (R::Fpcar, 0x238),
            (R::Fpdscr, 0x23C),
            (R::Mvfr0, 0x240),
            (R::Mvfr1, 0x244),
            (R::Iciallu, 0x250),
            (R::Icimvau, 0x258),
            (R::Dcimvac, 0x25C),
            (R::Dcisw, 0x260),
            (R::Dccmvau, 0x264),
            (R::Dccmvac, 0x268),
            (R::Dccsw, 0x26C),
            (R::Dccimvac, 0x270),
            (R::Dccisw, 0x274),
            (R::Bpiall, 0x278),
        ];
        assert_eq!(table.len(), Register::ALL.len());

        // ARMv7E-M has everything, so it checks the whole table.
        for &(r, off) in table {
            assert_eq!(offset(r, ArchVariant::V7EM), Some(off), "{r:?}");
        }
        // Offsets don't move between variants, registers just disappear.
        for v in ArchVariant::ALL {
            for &(r, off) in table {
                if let Some(got) = offset(r, v) {
                    assert_eq!(got, off, "{r:?} on {v:?}");
                }
            }
        }
    }

    #[test]
    fn absolute_addresses() {
        let aircr = resolve(Register::Aircr, ArchVariant::V6M).unwrap();
        assert_eq!(aircr.address(), 0xE000_ED0C);
        let bpiall = resolve(Register::Bpiall, ArchVariant::V7EM).unwrap();
        assert_eq!(bpiall.address(), 0xE000_EF78);
    }

    #[test]
    fn v6m_availability() {
        use Register as R;
        let absent = [
            R::Shpr1,
            R::Cfsr,
            R::Hfsr,
            R::Mmfar,
            R::Bfar,
            R::Afsr,
            R::IdPfr0,
            R::IdIsar4,
            R::Cpacr,
            R::Fpccr,
            R::Mvfr1,
            R::Ctr,
            R::Dccisw,
        ];
        for r in absent {
            assert_eq!(resolve(r, ArchVariant::V6M), None, "{r:?}");
        }
        let present = [
            R::Cpuid,
            R::Icsr,
            R::Vtor,
            R::Aircr,
            R::Scr,
            R::Ccr,
            R::Shpr2,
            R::Shpr3,
            R::Shcsr,
            R::Dfsr,
        ];
        for r in present {
            assert!(resolve(r, ArchVariant::V6M).is_some(), "{r:?}");
        }
    }

    #[test]
    fn cache_registers_only_on_v7em() {
        use Register as R;
        for r in [R::Clidr, R::Ctr, R::Ccsidr, R::Csselr, R::Iciallu, R::Bpiall]
        {
            assert_eq!(resolve(r, ArchVariant::V6M), None, "{r:?}");
            assert_eq!(resolve(r, ArchVariant::V7M), None, "{r:?}");
            assert!(resolve(r, ArchVariant::V7EM).is_some(), "{r:?}");
        }
        // The FP and fault registers are there on plain ARMv7-M.
        for r in [R::Cfsr, R::Fpccr, R::Cpacr, R::IdPfr0] {
            assert!(resolve(r, ArchVariant::V7M).is_some(), "{r:?}");
        }
    }

    #[test]
    fn golden_masks() {
        assert_eq!(vtor::TBLOFF_V6M.mask(), 0xFFFF_FF80);
        assert_eq!(vtor::TBLOFF_V7M.mask(), 0xFFFF_FE00);
        assert_eq!(aircr::VECTKEY.mask(), 0xFFFF_0000);
        assert_eq!(aircr::PRIGROUP.mask(), 0x0000_0700);
        assert_eq!(aircr::SYSRESETREQ.mask(), 1 << 2);
        assert_eq!(aircr::VECTCLRACTIVE.mask(), 1 << 1);
        assert_eq!(aircr::VECTRESET.mask(), 1 << 0);
        assert_eq!(scr::SLEEPDEEP.mask(), 1 << 2);
        assert_eq!(scr::SLEEPONEXIT.mask(), 1 << 1);
        assert_eq!(scr::SEVONPEND.mask(), 1 << 4);
        assert_eq!(icsr::VECTACTIVE.mask(), 0x1FF);
        assert_eq!(icsr::VECTPENDING.mask(), 0x1FF << 12);
        assert_eq!(shcsr::PENDED, 0b1111 << 12);
        assert_eq!(cpacr::CP10.mask() | cpacr::CP11.mask(), 0xF << 20);
        assert_eq!(ctr::DMINLINE.mask(), 0xF << 16);
    }

    #[test]
    fn aircr_layout_per_variant() {
        let v6 = resolve(Register::Aircr, ArchVariant::V6M).unwrap();
        assert!(v6.field("PRIGROUP").is_none());
        assert!(v6.field("VECTRESET").is_none());
        assert_eq!(v6.mask_of(Access::Key), 0xFFFF_0000);

        let v7 = resolve(Register::Aircr, ArchVariant::V7M).unwrap();
        assert_eq!(v7.field("PRIGROUP"), Some(&aircr::PRIGROUP));
        assert_eq!(v7.mask_of(Access::WriteOnly), 0b111);
        assert_eq!(v7.reserved_mask(), 0x0000_78F8);
    }

    #[test]
    fn keyed_writes() {
        assert_eq!(aircr::keyed(0), 0x05FA_0000);
        assert_eq!(aircr::keyed(aircr::SYSRESETREQ.mask()), 0x05FA_0004);
        // A stale key status from a read gets replaced, not merged.
        assert_eq!(aircr::keyed(0xFA05_0300), 0x05FA_0300);
    }

    #[test]
    fn fault_layout_per_variant() {
        let v7 = resolve(Register::Cfsr, ArchVariant::V7M).unwrap();
        let v7em = resolve(Register::Cfsr, ArchVariant::V7EM).unwrap();
        assert!(v7.field("MLSPERR").is_none());
        assert!(v7em.field("LSPERR").is_some());
        assert_eq!(
            v7em.defined_mask() & !v7.defined_mask(),
            (1 << 5) | (1 << 13)
        );
        assert_eq!(v7em.mask_of(Access::WriteOneToClear), v7em.defined_mask());
    }

    #[test]
    fn ccr_is_hardwired_on_v6m() {
        let v6 = resolve(Register::Ccr, ArchVariant::V6M).unwrap();
        assert_eq!(v6.mask_of(Access::ReadWrite), 0);
        assert_eq!(v6.mask_of(Access::ReadOnly), (1 << 9) | (1 << 3));
        let v7 = resolve(Register::Ccr, ArchVariant::V7M).unwrap();
        assert!(v7.field("DC").is_none());
        let v7em = resolve(Register::Ccr, ArchVariant::V7EM).unwrap();
        assert_eq!(v7em.field("IC"), Some(&ccr::IC));
    }

    #[test]
    fn field_arithmetic() {
        let f = aircr::PRIGROUP;
        assert_eq!(f.extract(0xFA05_0500), 5);
        assert_eq!(f.insert(0xFFFF_FFFF, 2), 0xFFFF_FAFF);
        // Overwide values are truncated to the field.
        assert_eq!(f.insert(0, 0xF), 0x700);
        let whole = Field::new("ALL", 0, 32, Access::ReadOnly);
        assert_eq!(whole.mask(), u32::MAX);
        assert_eq!(whole.extract(0x1234_5678), 0x1234_5678);
    }

    #[test]
    fn v7m_priority_bytes() {
        let v = ArchVariant::V7M;
        let slot = |h| handler_priority_slot(h, v).unwrap();
        assert_eq!(slot(SystemHandler::SvCall).offset, 0x1F);
        assert_eq!(slot(SystemHandler::PendSv).offset, 0x22);
        assert_eq!(slot(SystemHandler::SysTick).offset, 0x23);
        assert_eq!(slot(SystemHandler::SysTick).width, Width::Byte);
        #[cfg(armv7m)]
        {
            assert_eq!(slot(SystemHandler::MemoryManagement).offset, 0x18);
            assert_eq!(slot(SystemHandler::UsageFault).offset, 0x1A);
            assert_eq!(slot(SystemHandler::DebugMonitor).offset, 0x20);
        }
    }

    #[test]
    fn v6m_priority_words() {
        let v = ArchVariant::V6M;
        let svc = handler_priority_slot(SystemHandler::SvCall, v).unwrap();
        assert_eq!(
            (svc.offset, svc.width, svc.lsb, svc.bits),
            (0x1C, Width::Word, 30, 2)
        );
        let pendsv = handler_priority_slot(SystemHandler::PendSv, v).unwrap();
        assert_eq!((pendsv.offset, pendsv.lsb), (0x20, 22));
        let systick =
            handler_priority_slot(SystemHandler::SysTick, v).unwrap();
        assert_eq!((systick.offset, systick.lsb), (0x20, 30));
        assert_eq!(systick.field().mask(), 0xC000_0000);

        // Each slot lands inside a field the map declares for that register.
        for (h, r) in [
            (SystemHandler::SvCall, Register::Shpr2),
            (SystemHandler::PendSv, Register::Shpr3),
            (SystemHandler::SysTick, Register::Shpr3),
        ] {
            let slot = handler_priority_slot(h, v).unwrap();
            let desc = resolve(r, v).unwrap();
            assert_eq!(slot.field().mask() & desc.reserved_mask(), 0);
        }

        #[cfg(armv7m)]
        {
            assert_eq!(
                handler_priority_slot(SystemHandler::BusFault, v),
                None
            );
            assert_eq!(
                handler_priority_slot(SystemHandler::DebugMonitor, v),
                None
            );
        }
    }

    #[test]
    fn current_regs_agree_with_resolve() {
        assert_eq!(
            Some(regs::AIRCR),
            resolve(Register::Aircr, ArchVariant::CURRENT)
        );
        #[cfg(armv7em)]
        assert_eq!(regs::CTR.offset, 0x7C);
        #[cfg(armv7m)]
        assert_eq!(regs::CFSR.offset, 0x28);
    }

    #[test]
    fn priority_slot_agrees_with_lookup() {
        let handlers = [
            #[cfg(armv7m)]
            SystemHandler::MemoryManagement,
            #[cfg(armv7m)]
            SystemHandler::BusFault,
            #[cfg(armv7m)]
            SystemHandler::UsageFault,
            SystemHandler::SvCall,
            #[cfg(armv7m)]
            SystemHandler::DebugMonitor,
            SystemHandler::PendSv,
            SystemHandler::SysTick,
        ];
        for h in handlers {
            assert_eq!(
                Some(h.priority_slot()),
                handler_priority_slot(h, ArchVariant::CURRENT),
                "{h:?}"
            );
        }
    }
}
