// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use anyhow::{bail, Result};
use std::env;

/// Environment variable that overrides the architecture variant derived from
/// `TARGET`. Mostly useful for host builds, where `TARGET` says nothing about
/// which Cortex-M core the code is meant for.
pub const VARIANT_OVERRIDE_VAR: &str = "SCB_ARCH_VARIANT";

/// M-profile architecture variants that change the shape of the System
/// Control Block.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum MProfile {
    /// Cortex-M0, M0+ and M1.
    Armv6m,
    /// Cortex-M3.
    Armv7m,
    /// Cortex-M4 and M7: ARMv7-M plus the DSP extension and, on the M7, the
    /// L1 caches.
    Armv7em,
}

impl MProfile {
    /// The `cfg`s a crate sees when built for this variant.
    ///
    /// ARMv7E-M is a superset of ARMv7-M, so it sets `armv7m` as well. Code
    /// that only cares about the v7 register set can keep writing
    /// `cfg(armv7m)`.
    pub fn cfgs(self) -> &'static [&'static str] {
        match self {
            MProfile::Armv6m => &["armv6m"],
            MProfile::Armv7m => &["armv7m"],
            MProfile::Armv7em => &["armv7m", "armv7em"],
        }
    }

    /// Maps a rustc target triple onto a variant, if it is an M-profile
    /// target we know about.
    pub fn from_target(target: &str) -> Option<Self> {
        if target.starts_with("thumbv6m") {
            Some(MProfile::Armv6m)
        } else if target.starts_with("thumbv7em") {
            Some(MProfile::Armv7em)
        } else if target.starts_with("thumbv7m") {
            Some(MProfile::Armv7m)
        } else {
            None
        }
    }

    /// Parses the value of [`VARIANT_OVERRIDE_VAR`].
    pub fn from_override(value: &str) -> Result<Self> {
        match value.trim() {
            "armv6m" => Ok(MProfile::Armv6m),
            "armv7m" => Ok(MProfile::Armv7m),
            "armv7em" => Ok(MProfile::Armv7em),
            other => bail!(
                "{VARIANT_OVERRIDE_VAR}={other:?} is not one of \
                 armv6m, armv7m, armv7em"
            ),
        }
    }
}

/// Picks the variant for a build.
///
/// An explicit override wins. Otherwise a Cortex-M target decides. Anything
/// else (i.e. a host build, typically for tests) gets ARMv7E-M, which has the
/// largest register set.
pub fn select_m_profile(
    target: &str,
    override_value: Option<&str>,
) -> Result<MProfile> {
    if let Some(value) = override_value {
        return MProfile::from_override(value);
    }
    Ok(MProfile::from_target(target).unwrap_or(MProfile::Armv7em))
}

/// Exposes the CPU's M-profile architecture version. This isn't available in
/// rustc's standard environment.
///
/// This will set `cfg(armv6m)`, `cfg(armv7m)`, or `cfg(armv7m)` plus
/// `cfg(armv7em)`, depending on the value of the `TARGET` environment variable
/// or of the `SCB_ARCH_VARIANT` override.
pub fn expose_m_profile() -> Result<MProfile> {
    let target = env::var("TARGET")?;
    println!("cargo:rerun-if-env-changed={VARIANT_OVERRIDE_VAR}");
    let override_value = env::var(VARIANT_OVERRIDE_VAR).ok();

    let profile = select_m_profile(&target, override_value.as_deref())?;
    for cfg in profile.cfgs() {
        println!("cargo:rustc-cfg={cfg}");
    }
    Ok(profile)
}
