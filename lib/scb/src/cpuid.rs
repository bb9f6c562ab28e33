// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use bitfield::bitfield;
use num_derive::FromPrimitive;
use num_traits::FromPrimitive;

use crate::variant::ArchVariant;

bitfield! {
    /// The CPUID base register.
    #[derive(Copy, Clone, Eq, PartialEq)]
    pub struct Cpuid(u32);
    impl Debug;
    pub u8, implementer, _: 31, 24;
    pub u8, variant, _: 23, 20;
    pub u8, architecture, _: 19, 16;
    pub u16, partno, _: 15, 4;
    pub u8, revision, _: 3, 0;
}

/// ARM Ltd's implementer code.
pub const IMPLEMENTER_ARM: u8 = 0x41;

/// Architecture field value on ARMv6-M cores.
pub const ARCHITECTURE_V6M: u8 = 0xC;
/// Architecture field value on ARMv7-M and ARMv7E-M cores.
pub const ARCHITECTURE_V7M: u8 = 0xF;

/// ARM's M-profile cores, by part number.
#[derive(Copy, Clone, Debug, Eq, PartialEq, FromPrimitive)]
pub enum CorePart {
    CortexM0 = 0xC20,
    CortexM0Plus = 0xC60,
    CortexM1 = 0xC21,
    CortexM3 = 0xC23,
    CortexM4 = 0xC24,
    CortexM7 = 0xC27,
}

impl CorePart {
    pub fn variant(self) -> ArchVariant {
        match self {
            CorePart::CortexM0
            | CorePart::CortexM0Plus
            | CorePart::CortexM1 => ArchVariant::V6M,
            CorePart::CortexM3 => ArchVariant::V7M,
            CorePart::CortexM4 | CorePart::CortexM7 => ArchVariant::V7EM,
        }
    }
}

impl Cpuid {
    /// The core, if it's one of ARM's that we know.
    pub fn part(&self) -> Option<CorePart> {
        if self.implementer() != IMPLEMENTER_ARM {
            return None;
        }
        CorePart::from_u16(self.partno())
    }

    /// Revision as the usual `rNpM` pair.
    pub fn rev(&self) -> (u8, u8) {
        (self.variant(), self.revision())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cortex_m7_r1p2() {
        let id = Cpuid(0x411F_C272);
        assert_eq!(id.implementer(), IMPLEMENTER_ARM);
        assert_eq!(id.architecture(), ARCHITECTURE_V7M);
        assert_eq!(id.partno(), 0xC27);
        assert_eq!(id.rev(), (1, 2));
        assert_eq!(id.part(), Some(CorePart::CortexM7));
        assert_eq!(id.part().map(CorePart::variant), Some(ArchVariant::V7EM));
    }

    #[test]
    fn cortex_m0plus() {
        let id = Cpuid(0x410C_C601);
        assert_eq!(id.architecture(), ARCHITECTURE_V6M);
        assert_eq!(id.part(), Some(CorePart::CortexM0Plus));
        assert_eq!(id.rev(), (0, 1));
    }

    #[test]
    fn cortex_m3() {
        let id = Cpuid(0x412F_C231);
        assert_eq!(id.part().map(CorePart::variant), Some(ArchVariant::V7M));
        assert_eq!(id.rev(), (2, 1));
    }

    #[test]
    fn unknown_parts() {
        // Right part number, someone else's core.
        assert_eq!(Cpuid(0x511F_C272).part(), None);
        // ARMv8-M Cortex-M33.
        assert_eq!(Cpuid(0x410F_D210).part(), None);
    }
}
