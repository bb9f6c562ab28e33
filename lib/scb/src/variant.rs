// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The architecture variant this crate was configured for.

cfg_if::cfg_if! {
    if #[cfg(armv7em)] {
        const CONFIGURED: ArchVariant = ArchVariant::V7EM;
    } else if #[cfg(armv7m)] {
        const CONFIGURED: ArchVariant = ArchVariant::V7M;
    } else if #[cfg(armv6m)] {
        const CONFIGURED: ArchVariant = ArchVariant::V6M;
    } else {
        compile_error!("no M-profile variant cfg; is build.rs running?");
    }
}

/// M-profile architecture variants with distinct SCB layouts.
///
/// Whatever a variant lacks is left out of a build for it, so using it is a
/// compile error rather than a fault. ARMv6-M has no core reset:
///
#[cfg_attr(armv7m, doc = "```")]
#[cfg_attr(not(armv7m), doc = "```compile_fail")]
/// fn reset(scb: &scb::Scb) -> ! {
///     scb.request_core_reset()
/// }
/// ```
///
/// nor priority grouping:
///
#[cfg_attr(armv7m, doc = "```")]
#[cfg_attr(not(armv7m), doc = "```compile_fail")]
/// fn group(scb: &scb::Scb) {
///     scb.set_priority_grouping(scb::PriorityGrouping::Group4Sub4);
/// }
/// ```
///
/// nor configurable fault status:
///
#[cfg_attr(armv7m, doc = "```")]
#[cfg_attr(not(armv7m), doc = "```compile_fail")]
/// let cfsr = scb::map::regs::CFSR;
/// assert_eq!(cfsr.offset, 0x28);
/// ```
///
/// and only ARMv7E-M has the cache registers:
///
#[cfg_attr(armv7em, doc = "```")]
#[cfg_attr(not(armv7em), doc = "```compile_fail")]
/// let ctr = scb::map::regs::CTR;
/// assert_eq!(ctr.offset, 0x7C);
/// ```
///
/// There is no way to look up a register on the configured variant at run
/// time and fail there; [`crate::map::resolve`] answers `None` instead.
///
/// ```compile_fail
/// use scb::map::{require, Register, RegisterDesc};
///
/// const CTR: RegisterDesc = require(Register::Ctr);
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ArchVariant {
    /// ARMv6-M: Cortex-M0, M0+, M1.
    V6M,
    /// ARMv7-M: Cortex-M3.
    V7M,
    /// ARMv7E-M: Cortex-M4, M7.
    V7EM,
}

impl ArchVariant {
    pub const ALL: [ArchVariant; 3] =
        [ArchVariant::V6M, ArchVariant::V7M, ArchVariant::V7EM];

    /// The variant selected by `build-util` for this build.
    pub const CURRENT: ArchVariant = CONFIGURED;

    /// True for ARMv7-M and ARMv7E-M, which share the full fault and
    /// priority-grouping register set.
    pub const fn is_v7m_or_later(self) -> bool {
        !matches!(self, ArchVariant::V6M)
    }

    /// True where the SCB has the cache identification and maintenance
    /// registers. Whether a given part actually has caches is a separate
    /// question, answered by CLIDR.
    pub const fn has_cache_maintenance(self) -> bool {
        matches!(self, ArchVariant::V7EM)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ArchVariant::V6M => "armv6m",
            ArchVariant::V7M => "armv7m",
            ArchVariant::V7EM => "armv7em",
        }
    }
}
