// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diagnostic output for state-changing SCB operations.
//!
//! Pick at most one backend with a feature:
//!
//! - `log-itm` writes to ITM stimulus port 0 (ARMv7-M and later only; ARMv6-M
//!   has no ITM).
//! - `log-semihosting` uses semihosting, which requires a debugger and halts
//!   the core without one.
//!
//! With neither, `scblog!` compiles to nothing, though its arguments are
//! still type-checked.

macro_rules! scblog {
    ($($arg:tt)*) => {{
        #[cfg(all(feature = "log-itm", target_arch = "arm", armv7m))]
        {
            // Safety: stimulus port 0 is a write-only FIFO. Concurrent writers
            // can interleave their output but can't break anything else.
            let stim = unsafe {
                &mut (*cortex_m::peripheral::ITM::PTR.cast_mut()).stim[0]
            };
            cortex_m::iprintln!(stim, $($arg)*);
        }
        #[cfg(all(
            feature = "log-semihosting",
            not(feature = "log-itm"),
            target_arch = "arm"
        ))]
        {
            cortex_m_semihosting::hprintln!($($arg)*);
        }
        #[cfg(not(all(
            any(
                all(feature = "log-itm", armv7m),
                feature = "log-semihosting"
            ),
            target_arch = "arm"
        )))]
        {
            let _ = format_args!($($arg)*);
        }
    }};
}
