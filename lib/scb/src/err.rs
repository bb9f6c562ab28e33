// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

/// Things a caller can get wrong at runtime.
///
/// Everything else (asking for a register or operation the architecture
/// variant doesn't have) is caught at build time.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ScbError {
    /// PRIGROUP is three bits wide; the value didn't fit.
    InvalidPriorityGrouping(u8),
    /// The vector table address isn't aligned to what VTOR.TBLOFF can
    /// express on this variant.
    MisalignedVectorTable(u32),
}
