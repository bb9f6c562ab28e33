// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! How [`Scb`](crate::Scb) actually touches registers.
//!
//! [`Mmio`] is the real thing. Host tests swap in
//! [`FakeScb`](crate::fake::FakeScb), which models the same access rules in
//! memory.

use crate::map::SCB_BASE;

/// Register-level access to the SCB, by offset from [`SCB_BASE`].
///
/// Implementations don't interpret values. The exception is
/// [`RegisterAccess::await_reset`], which is what happens after a reset has
/// been requested.
pub trait RegisterAccess {
    fn read(&self, offset: u16) -> u32;
    fn write(&self, offset: u16, value: u32);

    /// Byte access, for the ARMv7-M priority registers. Nothing else in the
    /// SCB may be accessed this way.
    fn read_byte(&self, offset: u16) -> u8;
    fn write_byte(&self, offset: u16, value: u8);

    /// Waits for prior register writes to complete and take effect.
    fn barrier(&self);

    /// Spins until a requested reset takes the core away.
    fn await_reset(&self) -> !;
}

/// Volatile access to the SCB at its architectural address.
///
/// Zero-sized. All the state is in the hardware.
#[derive(Debug)]
pub struct Mmio {
    _private: (),
}

impl Mmio {
    /// # Safety
    ///
    /// The caller must be running on a Cortex-M core, in privileged mode,
    /// where the SCB is at [`SCB_BASE`]. Any number of these may exist at
    /// once; they all alias the same registers.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }

    fn ptr(offset: u16) -> *mut u32 {
        (SCB_BASE + usize::from(offset)) as *mut u32
    }
}

impl RegisterAccess for Mmio {
    fn read(&self, offset: u16) -> u32 {
        // Safety: constructing `Mmio` promised us the SCB is mapped here, and
        // offsets come from the register map.
        unsafe { core::ptr::read_volatile(Self::ptr(offset)) }
    }

    fn write(&self, offset: u16, value: u32) {
        // Safety: as for `read`.
        unsafe { core::ptr::write_volatile(Self::ptr(offset), value) }
    }

    fn read_byte(&self, offset: u16) -> u8 {
        // Safety: as for `read`.
        unsafe { core::ptr::read_volatile(Self::ptr(offset).cast::<u8>()) }
    }

    fn write_byte(&self, offset: u16, value: u8) {
        // Safety: as for `read`.
        unsafe {
            core::ptr::write_volatile(Self::ptr(offset).cast::<u8>(), value)
        }
    }

    fn barrier(&self) {
        cfg_if::cfg_if! {
            if #[cfg(target_arch = "arm")] {
                cortex_m::asm::dsb();
                cortex_m::asm::isb();
            } else {
                core::sync::atomic::fence(core::sync::atomic::Ordering::SeqCst);
            }
        }
    }

    fn await_reset(&self) -> ! {
        loop {
            cfg_if::cfg_if! {
                if #[cfg(target_arch = "arm")] {
                    cortex_m::asm::nop();
                } else {
                    core::hint::spin_loop();
                }
            }
        }
    }
}

/// Runs `f` with interrupts masked, so that a read-modify-write inside it
/// can't be torn by a handler touching the same register.
///
/// Off-target there's nothing to mask and `f` is just called.
pub fn with_interrupts_masked<R>(f: impl FnOnce() -> R) -> R {
    #[cfg(target_arch = "arm")]
    {
        cortex_m::interrupt::free(|_| f())
    }
    #[cfg(not(target_arch = "arm"))]
    {
        f()
    }
}
