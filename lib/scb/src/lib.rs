// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the ARMv{6,7}-M System Control Block.
//!
//! The SCB is the group of memory-mapped registers at `0xE000_ED00` that
//! controls exception and fault handling, reset, sleep behavior, and (on
//! ARMv7E-M parts with caches) cache maintenance. This crate provides:
//!
//! - [`map`]: the register map, as data. Every register's offset, width and
//!   bitfields, for each architecture variant.
//! - [`Scb`]: one operation per thing you'd actually want to do to the SCB,
//!   implemented against the map for the variant this crate was built for.
//! - [`FaultStatus`] and [`ExceptionStackFrame`]: what a fault handler reads.
//!
//! # Architecture variants
//!
//! The variant is fixed at build time by `build-util`, from the compilation
//! target (`thumbv6m`, `thumbv7m`, `thumbv7em`) or from the
//! `SCB_ARCH_VARIANT` environment variable. Things that don't exist on the
//! configured variant don't exist in the API either: on ARMv6-M there is no
//! `Scb::request_core_reset`, no `Scb::set_priority_grouping`, and naming
//! `map::regs::CFSR` is a compile error.
//!
//! # Sharing
//!
//! The SCB is a single piece of hardware shared by everything running on the
//! core, and this crate doesn't pretend otherwise. Operations documented as
//! read-modify-write can be corrupted by an interrupt handler that writes the
//! same register between the read and the write. Callers that have such
//! handlers need to mask interrupts around those operations, e.g. with
//! [`access::with_interrupts_masked`].
//!
//! # The AIRCR key
//!
//! Every write to the Application Interrupt and Reset Control Register must
//! carry `0x05FA` in its top half-word. Hardware *silently ignores* writes
//! that don't: no fault, no status bit, nothing. Everything in this crate that
//! writes AIRCR goes through one helper that applies the key, and none of it
//! exposes a raw AIRCR write.

#![cfg_attr(target_os = "none", no_std)]

#[macro_use]
mod log;

pub mod access;
pub mod control;
pub mod cpuid;
pub mod err;
pub mod fault;
pub mod frame;
pub mod map;
pub mod variant;

#[cfg(not(target_os = "none"))]
pub mod fake;

pub use access::{Mmio, RegisterAccess};
#[cfg(armv7m)]
pub use control::ConfigurableFault;
pub use control::{PriorityGrouping, Scb};
pub use cpuid::{CorePart, Cpuid};
pub use err::ScbError;
pub use fault::{Cfsr, Dfsr, FaultCause, FaultFlags, FaultStatus, Hfsr};
pub use frame::{ExcReturn, ExceptionStackFrame, Xpsr};
#[cfg(target_arch = "arm")]
pub use frame::{capture_exception_frame, capture_process_exception_frame};
pub use map::SystemHandler;
pub use variant::ArchVariant;
